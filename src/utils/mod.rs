//! Small shared utilities.

pub mod url;

pub use url::normalize_href;
