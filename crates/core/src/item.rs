//! Normalization of raw WXR `<item>` records.
//!
//! A raw item is the generic nested object produced by XML parsing: keys are
//! WordPress element names, values are strings, objects, or arrays depending on
//! how many times an element repeats. [`normalize_item`] walks one such record
//! and produces a [`NormalizedItem`] with semantic keys and typed fields.
//!
//! Each normalized key is dispatched through [`FIELD_HANDLERS`]; keys without a
//! dedicated handler are stored as plain fields.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::SiteConfig;
use crate::keys::normalize_key;
use crate::meta::{decode_meta, MetaDecodeError};

/// Key under which the XML mapping stores element text next to attributes
pub const TEXT_KEY: &str = "$t";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostType {
    Attachment,
    NavMenuItem,
    Page,
    Post,
    Other(String),
}

impl PostType {
    pub fn parse(s: &str) -> Self {
        match s {
            "attachment" => PostType::Attachment,
            "nav_menu_item" => PostType::NavMenuItem,
            "page" => PostType::Page,
            "post" => PostType::Post,
            other => PostType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PostType::Attachment => "attachment",
            PostType::NavMenuItem => "nav_menu_item",
            PostType::Page => "page",
            PostType::Post => "post",
            PostType::Other(other) => other,
        }
    }

    /// Posts and pages become documents; everything else does not
    pub fn is_document(&self) -> bool {
        matches!(self, PostType::Page | PostType::Post)
    }
}

impl Serialize for PostType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostStatus {
    Trash,
    Draft,
    Inherit,
    Private,
    Publish,
    Other(String),
}

impl PostStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "trash" => PostStatus::Trash,
            "draft" => PostStatus::Draft,
            "inherit" => PostStatus::Inherit,
            "private" => PostStatus::Private,
            "publish" => PostStatus::Publish,
            other => PostStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PostStatus::Trash => "trash",
            PostStatus::Draft => "draft",
            PostStatus::Inherit => "inherit",
            PostStatus::Private => "private",
            PostStatus::Publish => "publish",
            PostStatus::Other(other) => other,
        }
    }
}

impl Serialize for PostStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One `<category>` element; tags share the element and differ by domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Category {
    pub domain: String,
    pub nicename: String,
    pub label: String,
}

/// A WordPress item (or comment) with semantic keys and typed fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "date_gmt", skip_serializing_if = "Option::is_none")]
    pub date_gmt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(rename = "modified_gmt", skip_serializing_if = "Option::is_none")]
    pub modified_gmt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "author_email", skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(rename = "attachment_url", skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(rename = "category", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    /// Decoded `postmeta` or `commentmeta`, keyed by meta key
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(rename = "comment", skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<NormalizedItem>,
    /// Fields without a typed slot, under their normalized key
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_normalized: Option<String>,
    /// Meta values that fell back to their raw form
    #[serde(skip)]
    pub decode_errors: Vec<MetaDecodeError>,
}

impl NormalizedItem {
    pub fn is_published(&self) -> bool {
        self.status == Some(PostStatus::Publish)
    }

    pub fn is_document(&self) -> bool {
        self.post_type.as_ref().is_some_and(PostType::is_document)
    }

    /// Nicenames of the categories in `domain`, in document order
    pub fn categories_in(&self, domain: &str) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| c.domain == domain)
            .map(|c| c.nicename.clone())
            .collect()
    }

    /// A meta value, when it is a non-empty string
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn set_field(&mut self, key: &str, value: &Value) {
        let slot = match key {
            "postType" => {
                self.post_type = text_of(value).map(|s| PostType::parse(&s));
                return;
            }
            "status" => {
                self.status = text_of(value).map(|s| PostStatus::parse(&s));
                return;
            }
            "id" => &mut self.id,
            "title" => &mut self.title,
            "link" => &mut self.link,
            "date" => &mut self.date,
            "date_gmt" => &mut self.date_gmt,
            "modified" => &mut self.modified,
            "modified_gmt" => &mut self.modified_gmt,
            "name" => &mut self.name,
            "parent" => &mut self.parent,
            "author" => &mut self.author,
            "author_email" => &mut self.author_email,
            "attachment_url" => &mut self.attachment_url,
            _ => {
                self.extra.insert(key.to_string(), value.clone());
                return;
            }
        };
        *slot = text_of(value);
    }
}

type FieldHandler = fn(&mut NormalizedItem, &str, &Value, &SiteConfig);

/// Normalized keys with dedicated handling; anything else is a plain field
const FIELD_HANDLERS: &[(&str, FieldHandler)] = &[
    ("comment", handle_comments),
    ("postmeta", handle_meta),
    ("commentmeta", handle_meta),
    ("category", handle_categories),
    ("content", handle_encoded),
    ("excerpt", handle_encoded),
];

fn handler_for(key: &str) -> FieldHandler {
    FIELD_HANDLERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, handler)| *handler)
        .unwrap_or(handle_field)
}

/// Normalize one raw item (or raw comment) record
pub fn normalize_item(raw: &Map<String, Value>, config: &SiteConfig) -> NormalizedItem {
    let mut item = NormalizedItem::default();
    for (raw_key, value) in raw {
        let key = normalize_key(raw_key);
        handler_for(&key)(&mut item, &key, value, config);
    }
    item
}

/// Items of `rss.channel.item`, coercing a lone item into a sequence
pub fn channel_items(document: &Value) -> Option<Vec<&Map<String, Value>>> {
    let items = document.get("rss")?.get("channel")?.get("item")?;
    Some(
        coerce_sequence(items)
            .into_iter()
            .filter_map(Value::as_object)
            .collect(),
    )
}

/// Treat a single value as a one-element sequence
pub fn coerce_sequence(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Text content of a scalar field, if it has any
///
/// Elements with attributes carry their text under [`TEXT_KEY`]; empty
/// elements map to `{}` and have no text.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get(TEXT_KEY).and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn handle_field(item: &mut NormalizedItem, key: &str, value: &Value, _config: &SiteConfig) {
    item.set_field(key, value);
}

fn handle_encoded(item: &mut NormalizedItem, key: &str, value: &Value, _config: &SiteConfig) {
    let text = value.as_str().unwrap_or_default().to_string();
    if key == "content" {
        item.content = Some(text);
    } else {
        item.excerpt = Some(text);
    }
}

fn handle_comments(item: &mut NormalizedItem, _key: &str, value: &Value, config: &SiteConfig) {
    item.comments = coerce_sequence(value)
        .into_iter()
        .filter_map(Value::as_object)
        .map(|raw| normalize_item(raw, config))
        .collect();
}

fn handle_meta(item: &mut NormalizedItem, _key: &str, value: &Value, config: &SiteConfig) {
    for entry in coerce_sequence(value).into_iter().filter_map(Value::as_object) {
        let mut meta_key = None;
        let mut meta_value = Value::Null;
        for (raw_key, raw_value) in entry {
            match normalize_key(raw_key).as_str() {
                "key" => meta_key = text_of(raw_value),
                "value" => meta_value = raw_value.clone(),
                _ => {}
            }
        }

        let Some(meta_key) = meta_key else {
            continue;
        };

        let decoded = decode_meta(&meta_key, meta_value, config);
        if let Some(error) = decoded.fallback {
            item.decode_errors.push(error);
        }
        item.meta.insert(meta_key, decoded.value);
    }
}

fn handle_categories(item: &mut NormalizedItem, _key: &str, value: &Value, _config: &SiteConfig) {
    item.categories = coerce_sequence(value)
        .into_iter()
        .map(|entry| {
            let attr = |name: &str| {
                entry
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Category {
                domain: attr("domain"),
                nicename: attr("nicename"),
                label: text_of(entry).unwrap_or_default(),
            }
        })
        .collect();
}
