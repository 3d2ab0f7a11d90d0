//! JavaScript evaluated inside the rendered page.

/// Classify every anchor on the page.
///
/// Anchors carrying a `data-osis` attribute are scripture references; the
/// attribute's presence, not its content, drives the classification.
/// Everything else is reported as its raw href attribute (null when the
/// anchor has none) for the Rust side to resolve and filter, so that URL
/// policy lives in testable code instead of here.
pub const ANCHOR_SCAN_SCRIPT: &str = r#"
    (() => {
        const references = [];
        const hrefs = [];
        document.querySelectorAll('a').forEach((anchor) => {
            const osis = anchor.getAttribute('data-osis');
            if (osis) {
                references.push({ text: anchor.innerText, osis });
            } else {
                hrefs.push(anchor.getAttribute('href'));
            }
        });
        return { references, hrefs };
    })()
"#;
