use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hostname stripped from every item link when deriving its path.
pub const SITE_HOSTNAME: &str = "renoirboulanger.com";

/// Handle of the site owner, as it appears in their comment email addresses.
pub const OWNER_HANDLE: &str = "renoirb";

/// Paths that are classified and reported but never written as documents.
pub const EXCLUDED_PATHS: &[&str] = &[
    "/cv/",
    "/home/",
    "/renoirb/",
    "/resume/",
    "/resume/detailed/",
];

/// Words whose presence in a title flags it as English.
pub const STOP_WORDS_ENGLISH: &[&str] = &[
    "about", "add", "and", "few", "for", "from", "in", "into", "key", "leaving", "make", "run",
    "share", "the", "thing", "was", "with", "your",
];

/// Meta keys whose values are PHP `serialize()` payloads.
pub const PHP_SERIALIZED_KEYS: &[&str] = &[
    "akismet_history",
    "_social_aggregated_ids",
    "_social_aggregation_log",
    "_social_broadcasted_ids",
    "_social_broadcast_meta",
    "_social_broadcast_content",
    "_wp_attachment_metadata",
    "_menu_item_classes",
    "_wp_attachment_backup_sizes",
];

/// Legacy normalized paths and the canonical path they now live at.
pub const LEGACY_REDIRECTS: &[(&str, &str)] = &[
    ("/home/", "/blog/"),
    ("/renoirb/", "/blog/"),
    (
        "/blog/2009/11/realisation-du-site-et-de-limage-c2abbrandingc2bb-de-beebox-2008/",
        "/blog/2009/11/realisation-2008-du-site-et-branding-de-beebox/",
    ),
    (
        "/blog/2010/01/le-manifeste-open-cloud-pour-standardiser-linformatique-c2abdans-les-nuagesc2bb/",
        "/blog/2010/01/le-open-cloud-manifest-pour-standardiser-linformatique-dans-le-nuage/",
    ),
    (
        "/blog/2010/01/le-defi-c2abproject52c2bb-un-billet-par-semaine-minimum/",
        "/blog/2010/01/le-defi-project52-pour-un-billet-de-blogue-par-semaine/",
    ),
    (
        "/blog/2010/02/realisation-dune-application-dechange-de-cadeau-avec-red-lagence-le-c2abclub-echangistec2bb-2009/",
        "/blog/2010/02/realisation-2009-application-echange-de-cadeau-avec-agence-red/",
    ),
];

/// Site-specific settings driving the export.
///
/// `SiteConfig::default()` carries the fixed constants above. A TOML file with
/// the same keys may override any subset of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub hostname: String,
    pub owner_handle: String,
    pub excluded_paths: Vec<String>,
    pub redirects: BTreeMap<String, String>,
    pub stop_words: Vec<String>,
    pub php_serialized_keys: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hostname: SITE_HOSTNAME.to_string(),
            owner_handle: OWNER_HANDLE.to_string(),
            excluded_paths: EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect(),
            redirects: LEGACY_REDIRECTS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            stop_words: STOP_WORDS_ENGLISH.iter().map(|w| w.to_string()).collect(),
            php_serialized_keys: PHP_SERIALIZED_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl SiteConfig {
    /// Parse a TOML override, falling back to defaults for missing keys
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_paths.iter().any(|p| p == path)
    }

    pub fn redirect_target(&self, path_normalized: &str) -> Option<&str> {
        self.redirects.get(path_normalized).map(String::as_str)
    }

    pub fn is_php_serialized(&self, key: &str) -> bool {
        self.php_serialized_keys.iter().any(|k| k == key)
    }
}
