//! Key Space Module
//!
//! Pure string composition of backend keys. One entry key exists per
//! distinct (URI, media-type string form) pair; the URI-only index key
//! addresses the set of variant entry keys for that URI.
//!
//! Invariant enforced by construction: every entry key extends its owning
//! index key, so a prefix deletion rooted at the index key covers the
//! entries as well.

use crate::cache::KEY_DELIMITER;
use crate::codec::MediaType;

// == Index Key ==
/// Key of the variant-index set for a URI.
pub fn index_key(namespace: Option<&str>, uri: &str) -> String {
    match namespace {
        Some(ns) => format!("{}{}{}", ns, KEY_DELIMITER, uri),
        None => uri.to_string(),
    }
}

// == Entry Key ==
/// Key of the entry storing one media-type variant of a URI.
pub fn entry_key(namespace: Option<&str>, uri: &str, media_type: &MediaType) -> String {
    format!(
        "{}{}{}",
        index_key(namespace, uri),
        KEY_DELIMITER,
        media_type
    )
}

// == Namespace Prefix ==
/// Prefix matching every key owned by a namespace, for bulk scans.
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{}{}", namespace, KEY_DELIMITER)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_key_without_namespace() {
        assert_eq!(index_key(None, "/users/42"), "/users/42");
    }

    #[test]
    fn test_index_key_with_namespace() {
        assert_eq!(index_key(Some("api"), "/users/42"), "api:/users/42");
    }

    #[test]
    fn test_entry_key_extends_index_key() {
        let media_type = MediaType::new("text", "html");
        let index = index_key(Some("api"), "/users/42");
        let entry = entry_key(Some("api"), "/users/42", &media_type);

        assert_eq!(entry, "api:/users/42:text/html");
        assert!(entry.starts_with(&index));
    }

    #[test]
    fn test_entry_key_includes_parameters() {
        let media_type = MediaType::new("text", "html").with_parameter("charset", "utf-8");
        assert_eq!(
            entry_key(None, "/page", &media_type),
            "/page:text/html;charset=utf-8"
        );
    }

    #[test]
    fn test_distinct_media_types_give_distinct_keys() {
        let plain = entry_key(None, "/page", &MediaType::new("text", "plain"));
        let html = entry_key(None, "/page", &MediaType::new("text", "html"));
        assert_ne!(plain, html);
    }

    #[test]
    fn test_namespace_prefix() {
        assert_eq!(namespace_prefix("api"), "api:");
        assert!(index_key(Some("api"), "/x").starts_with(&namespace_prefix("api")));
    }
}
