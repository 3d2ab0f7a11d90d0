//! Reference and link extraction from rendered pages.
//!
//! The in-page script only classifies anchors and reports raw hrefs; all URL
//! resolution, origin filtering and query normalization happens here on the
//! Rust side against the page's final URL.

pub mod js_scripts;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::utils::normalize_href;

/// A scripture reference found on a page: the anchor text plus the opaque
/// OSIS citation key from its `data-osis` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub text: String,
    pub osis: String,
}

/// Everything a single page visit produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// References in document order.
    pub references: Vec<Reference>,
    /// Normalized same-origin links in document order, duplicates included;
    /// the frontier is responsible for dedup.
    pub links: Vec<String>,
}

/// Raw payload returned by [`js_scripts::ANCHOR_SCAN_SCRIPT`].
///
/// `hrefs` entries are `None` for anchors that carry no href attribute at
/// all; those produce no link. `Some("")` is a real (self-referential) href
/// and stays in.
#[derive(Debug, Deserialize)]
struct AnchorScan {
    references: Vec<Reference>,
    hrefs: Vec<Option<String>>,
}

/// Run the anchor scan on `page` and normalize its hrefs into followable
/// links.
///
/// The base for resolution is the page's final URL (redirects included),
/// falling back to the requested URL if the browser cannot report one.
pub async fn extract_page_result(
    page: &Page,
    requested_url: &str,
    significant_params: &[String],
) -> Result<PageResult> {
    let js_result = page
        .evaluate(js_scripts::ANCHOR_SCAN_SCRIPT)
        .await
        .context("failed to execute anchor scan script")?;

    let scan: AnchorScan = js_result
        .into_value()
        .context("failed to parse anchor scan result")?;

    let base = resolve_base_url(page, requested_url).await?;

    Ok(PageResult {
        links: collect_links(&scan.hrefs, &base, significant_params),
        references: scan.references,
    })
}

/// Turn scanned hrefs into followable links: drop attribute-less anchors,
/// normalize the rest.
fn collect_links(hrefs: &[Option<String>], base: &Url, significant_params: &[String]) -> Vec<String> {
    hrefs
        .iter()
        .flatten()
        .filter_map(|href| normalize_href(href, base, significant_params))
        .collect()
}

async fn resolve_base_url(page: &Page, requested_url: &str) -> Result<Url> {
    if let Ok(Some(current)) = page.url().await
        && let Ok(parsed) = Url::parse(&current)
    {
        return Ok(parsed);
    }
    Url::parse(requested_url)
        .with_context(|| format!("requested URL is not parseable: {requested_url}"))
}
