//! Document assembly for posts and pages: YAML front matter plus Markdown body.

use serde::Serialize;

use crate::item::NormalizedItem;
use crate::locale::LocaleDetector;
use crate::markdown::to_markdown;

pub const META_DESCRIPTION_KEY: &str = "_yoast_wpseo_metadesc";
pub const META_TITLE_KEY: &str = "_yoast_wpseo_title";
pub const META_KEYWORDS_KEY: &str = "keywords";

/// Front matter of a generated document, in output order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    pub locale: String,
    pub created: String,
    pub updated: String,
    pub canonical: String,
    pub status: String,
    pub revising: bool,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_alternate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Keep the date part of a `YYYY-MM-DD HH:MM:SS` timestamp
fn date_only(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(|t| t.split(' ').next())
        .unwrap_or_default()
        .to_string()
}

/// Build front matter and body for a post or page
pub fn build_document(item: &NormalizedItem, locales: &LocaleDetector) -> Document {
    let title = item.title.clone().unwrap_or_default();
    let locale = locales.detect(&title).to_string();

    let mut front_matter = FrontMatter {
        locale,
        created: date_only(item.date.as_deref()),
        updated: date_only(item.modified.as_deref()),
        canonical: item.link.clone().unwrap_or_default(),
        status: item
            .status
            .as_ref()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        revising: true,
        categories: item.categories_in("category"),
        tags: item.categories_in("post_tag"),
        keywords: Vec::new(),
        excerpt: to_markdown(item.excerpt.as_deref().unwrap_or_default()),
        description: None,
        title_alternate: None,
        title,
    };

    apply_seo_meta(&mut front_matter, item);

    Document {
        front_matter,
        body: to_markdown(item.content.as_deref().unwrap_or_default()),
    }
}

fn apply_seo_meta(front_matter: &mut FrontMatter, item: &NormalizedItem) {
    if let Some(description) = item.meta_str(META_DESCRIPTION_KEY) {
        front_matter.description = Some(description.to_string());
    }

    if let Some(title) = item.meta_str(META_TITLE_KEY) {
        front_matter.title_alternate = Some(title.to_string());
    }

    if let Some(keywords) = item.meta_str(META_KEYWORDS_KEY) {
        front_matter.keywords.extend(
            keywords
                .split(',')
                .map(|k| k.trim().to_string()),
        );
    }
}

/// Serialize a value as YAML without the leading document marker
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(value)?;
    Ok(yaml
        .strip_prefix("---\n")
        .unwrap_or(&yaml)
        .trim()
        .to_string())
}

/// Join rendered front matter and body into the final document text
pub fn compose_document(front_matter_yaml: &str, body: &str) -> String {
    ["---", front_matter_yaml, "---", "", body].join("\n")
}
