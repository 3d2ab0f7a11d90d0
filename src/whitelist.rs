//! URL prefix whitelists.
//!
//! Membership is a literal `str::starts_with` test against each entry, with
//! no path-segment awareness: `"/mod/page"` matches `"/mod/pages"` as well.
//! That coarse matching is deliberate and relied on by existing configs.

/// An ordered list of URL prefixes. An empty list allows every URL.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    prefixes: Vec<String>,
}

impl Whitelist {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Build the effective crawling whitelist: anything worth scraping must
    /// also be reachable, so the scraping entries are appended to the
    /// crawling entries.
    #[must_use]
    pub fn union(&self, other: &Whitelist) -> Whitelist {
        let mut prefixes = self.prefixes.clone();
        prefixes.extend(other.prefixes.iter().cloned());
        Whitelist { prefixes }
    }

    /// True iff the whitelist is empty or some entry prefixes `url`.
    #[must_use]
    pub fn is_allowed(&self, url: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|entry| url.starts_with(entry))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
