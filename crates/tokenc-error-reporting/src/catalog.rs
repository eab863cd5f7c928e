//! Error code catalog and lookup.
//!
//! Maps error codes (like "T-1-1") to their metadata (subsystem, title,
//! message template, docs URL).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "references", "decorators", "sources")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default message template
    pub message_template: String,

    /// URL to documentation (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, embedded at compile time from `error_catalog.json`.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid. This can only happen if the catalog
/// file is edited incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON - this is a bug in tokenc")
});

/// Look up error code information.
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Get documentation URL for an error code.
///
/// ```
/// use tokenc_error_reporting::get_docs_url;
///
/// assert_eq!(get_docs_url("T-1-2"), Some("https://tokenc.dev/docs/errors/T-1-2"));
/// ```
pub fn get_docs_url(code: &str) -> Option<&str> {
    get_error_info(code).and_then(|info| info.docs_url.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_loads() {
        assert!(!ERROR_CATALOG.is_empty());
    }

    #[test]
    fn test_every_code_is_well_formed() {
        for (code, info) in ERROR_CATALOG.iter() {
            assert!(code.starts_with("T-"), "bad code {code}");
            assert_eq!(code.split('-').count(), 3, "bad code {code}");
            let url = info.docs_url.as_deref().unwrap_or_default();
            assert!(url.ends_with(code.as_str()), "{code} has docs url {url}");
        }
    }

    #[test]
    fn test_lookup() {
        let info = get_error_info("T-1-2").unwrap();
        assert_eq!(info.title, "Circular Reference");
        assert_eq!(get_error_info("T-2-1").unwrap().subsystem, "decorators");
        assert!(get_error_info("T-99-99").is_none());
        assert!(get_docs_url("T-99-99").is_none());
    }
}
