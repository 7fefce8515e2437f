//! WordPress field name normalization.
//!
//! WXR exports mix namespaced (`wp:`, `dc:`, `content:`) and prefixed
//! (`post_`, `comment_`, `meta_`) element names. Every field is reduced to a
//! flat semantic key before the item normalizer dispatches on it.

/// Prefixes removed after namespace stripping. Only the first match applies.
const SEMANTIC_PREFIXES: &[&str] = &["dc:", "post_", "meta_", "comment_"];

/// Normalize one raw field key into its semantic key
///
/// `wp:post_type`, `content:encoded` and `excerpt:encoded` are special-cased
/// to `postType`, `content` and `excerpt`. Unknown keys pass through.
pub fn normalize_key(raw: &str) -> String {
    match raw {
        "wp:post_type" => return "postType".to_string(),
        "content:encoded" => return "content".to_string(),
        "excerpt:encoded" => return "excerpt".to_string(),
        _ => {}
    }

    let key = raw.strip_prefix("wp:").unwrap_or(raw);

    SEMANTIC_PREFIXES
        .iter()
        .find_map(|prefix| key.strip_prefix(prefix))
        .unwrap_or(key)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_cased_keys() {
        assert_eq!(normalize_key("wp:post_type"), "postType");
        assert_eq!(normalize_key("content:encoded"), "content");
        assert_eq!(normalize_key("excerpt:encoded"), "excerpt");
    }

    #[test]
    fn test_post_fields() {
        assert_eq!(normalize_key("wp:post_id"), "id");
        assert_eq!(normalize_key("wp:post_date_gmt"), "date_gmt");
        assert_eq!(normalize_key("wp:post_modified"), "modified");
        assert_eq!(normalize_key("wp:post_parent"), "parent");
        assert_eq!(normalize_key("wp:post_name"), "name");
        assert_eq!(normalize_key("wp:status"), "status");
        assert_eq!(normalize_key("wp:attachment_url"), "attachment_url");
    }

    #[test]
    fn test_comment_fields() {
        assert_eq!(normalize_key("wp:comment"), "comment");
        assert_eq!(normalize_key("wp:comment_id"), "id");
        assert_eq!(normalize_key("wp:comment_author_email"), "author_email");
        assert_eq!(normalize_key("wp:comment_parent"), "parent");
        assert_eq!(normalize_key("wp:commentmeta"), "commentmeta");
    }

    #[test]
    fn test_meta_fields() {
        assert_eq!(normalize_key("wp:postmeta"), "postmeta");
        assert_eq!(normalize_key("wp:meta_key"), "key");
        assert_eq!(normalize_key("wp:meta_value"), "value");
    }

    #[test]
    fn test_dublin_core_and_passthrough() {
        assert_eq!(normalize_key("dc:creator"), "creator");
        assert_eq!(normalize_key("title"), "title");
        assert_eq!(normalize_key("link"), "link");
        assert_eq!(normalize_key("category"), "category");
    }

    #[test]
    fn test_only_first_prefix_is_removed() {
        assert_eq!(normalize_key("wp:post_meta_thing"), "meta_thing");
    }
}
