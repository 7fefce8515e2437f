//! Steps shared by every subcommand: configuration, reading, and normalization.

use crate::prelude::*;
use std::path::Path;
use wpexport_core::config::SiteConfig;
use wpexport_core::item::{channel_items, normalize_item, NormalizedItem};

/// Site configuration, with an optional TOML override on top of the defaults
pub fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    let Some(path) = path else {
        return Ok(SiteConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| f!("Failed to read config file {}", path.display()))?;
    SiteConfig::from_toml(&text)
        .with_context(|| f!("Invalid config file {}", path.display()))
}

pub fn read_export(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| f!("Failed to read WordPress export {}", path.display()))
}

/// Parse an export and normalize every channel item, in document order
///
/// Meta values that fell back to their raw form are logged and kept on the
/// items.
pub fn parse_items(xml: &str, config: &SiteConfig) -> Result<Vec<NormalizedItem>> {
    let document = crate::xml::parse_document(xml)?;
    if document.get("rss").and_then(|rss| rss.get("channel")).is_none() {
        return Err(Error::MissingChannel.into());
    }

    let items: Vec<NormalizedItem> = channel_items(&document)
        .unwrap_or_default()
        .into_iter()
        .map(|raw| normalize_item(raw, config))
        .collect();

    for item in &items {
        log::debug!(
            "Walking {} {} {:?}",
            item.post_type.as_ref().map_or("?", |t| t.as_str()),
            item.id.as_deref().unwrap_or("?"),
            item.title.as_deref().unwrap_or_default(),
        );
        for error in decode_errors(item) {
            log::warn!("Item {}: {}", item.id.as_deref().unwrap_or("?"), error);
        }
    }

    Ok(items)
}

/// Decode fallbacks of an item and of its comments
pub fn decode_errors(
    item: &NormalizedItem,
) -> impl Iterator<Item = &wpexport_core::meta::MetaDecodeError> {
    item.decode_errors
        .iter()
        .chain(item.comments.iter().flat_map(|c| c.decode_errors.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">
  <channel>
    <title>Renoir Boulanger</title>
    <item>
      <title>Only item</title>
      <wp:post_id>1</wp:post_id>
      <wp:post_type><![CDATA[post]]></wp:post_type>
      <wp:postmeta>
        <wp:meta_key><![CDATA[_wp_attachment_metadata]]></wp:meta_key>
        <wp:meta_value><![CDATA[not php]]></wp:meta_value>
      </wp:postmeta>
    </item>
  </channel>
</rss>
"#;

    #[test]
    fn test_parse_items_single_item() {
        let items = parse_items(EXPORT, &SiteConfig::default()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("Only item"));
        assert_eq!(decode_errors(&items[0]).count(), 1);
    }

    #[test]
    fn test_parse_items_empty_channel() {
        let xml = "<rss><channel><title>x</title></channel></rss>";
        assert!(parse_items(xml, &SiteConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_items_missing_channel() {
        let err = parse_items("<rss></rss>", &SiteConfig::default()).unwrap_err();
        assert!(err.to_string().contains("rss.channel"));
    }

    #[test]
    fn test_load_config_defaults_and_override() {
        assert_eq!(load_config(None).unwrap(), SiteConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(&path, "hostname = \"example.org\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.hostname, "example.org");
        assert_eq!(config.redirects, SiteConfig::default().redirects);
    }

    #[test]
    fn test_read_export_missing_file() {
        let err = read_export(Path::new("/nonexistent/wordpress.xml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read WordPress export"));
    }
}
