//! URL normalization for discovered links.
//!
//! Every href found on a page passes through [`normalize_href`] before the
//! whitelists or the frontier ever see it. The canonical form strips
//! fragments, keeps only significant query parameters, and rejects anything
//! that leaves the page's origin.

use url::Url;

/// Resolve `href` against the origin of the page it was found on and derive
/// the canonical crawl key.
///
/// Document-relative paths resolve against the bare origin, not the page's
/// own path: `lesson.php` found anywhere on the site points at
/// `/lesson.php`. Returns `None` for hrefs that must not be followed:
/// unparsable values, non-http(s) schemes (`mailto:`, `javascript:`, ...),
/// and links whose resolved origin differs from the page's origin.
///
/// The surviving query parameters keep their original order. An empty
/// `significant_params` list drops the query string entirely. An empty href
/// resolves to the origin root and is a perfectly followable link; the
/// frontier's dedup is what keeps it from looping.
pub fn normalize_href(href: &str, page_url: &Url, significant_params: &[String]) -> Option<String> {
    let origin_base = page_url.join("/").ok()?;
    let mut resolved = origin_base.join(href).ok()?;

    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    if resolved.origin() != page_url.origin() {
        return None;
    }

    resolved.set_fragment(None);

    let retained: Vec<(String, String)> = resolved
        .query_pairs()
        .filter(|(name, _)| significant_params.iter().any(|param| param == name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if retained.is_empty() {
        resolved.set_query(None);
    } else {
        resolved.query_pairs_mut().clear().extend_pairs(retained);
    }

    Some(resolved.into())
}
