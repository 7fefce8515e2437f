use chrono::NaiveDateTime;
use serde::Serialize;

use crate::item::NormalizedItem;
use crate::markdown::to_markdown;

/// A comment flattened for Staticman-style storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticmanRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// Empty for top-level comments
    #[serde(rename = "_reply_to_id")]
    pub reply_to_id: String,
    #[serde(rename = "_parent")]
    pub parent_link: String,
    #[serde(rename = "date")]
    pub epoch_millis: Option<i64>,
    #[serde(rename = "name")]
    pub author_name: String,
    #[serde(rename = "email")]
    pub author_email_hash: String,
    #[serde(rename = "message")]
    pub markdown_message: String,
}

/// Parse a WordPress `YYYY-MM-DD HH:MM:SS` GMT timestamp into epoch milliseconds
pub fn parse_gmt_millis(date_gmt: &str) -> Option<i64> {
    let stamped = format!("{} GMT", date_gmt.trim());
    NaiveDateTime::parse_from_str(&stamped, "%Y-%m-%d %H:%M:%S GMT")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Hex MD5 of an email address, as used by Gravatar URLs
///
/// The address is hashed as given; an empty address yields an empty hash.
pub fn email_hash(email: &str) -> String {
    if email.is_empty() {
        return String::new();
    }
    format!("{:x}", md5::compute(email.as_bytes()))
}

/// Build the Staticman record for one comment of the post at `parent_link`
pub fn build_staticman_record(comment: &NormalizedItem, parent_link: &str) -> StaticmanRecord {
    let reply_to_id = match comment.parent.as_deref() {
        Some("0") | None => String::new(),
        Some(parent) => parent.to_string(),
    };

    StaticmanRecord {
        id: comment.id.clone().unwrap_or_default(),
        reply_to_id,
        parent_link: parent_link.to_string(),
        epoch_millis: comment.date_gmt.as_deref().and_then(parse_gmt_millis),
        author_name: comment.author.clone().unwrap_or_default(),
        author_email_hash: email_hash(comment.author_email.as_deref().unwrap_or_default()),
        markdown_message: to_markdown(comment.content.as_deref().unwrap_or_default()),
    }
}

/// File name of a comment record, keyed by its timestamp
///
/// Comments without a parseable date fall back to their id.
pub fn comment_file_name(record: &StaticmanRecord) -> String {
    match record.epoch_millis {
        Some(millis) => format!("comment-{millis}.yaml"),
        None => format!("comment-{}.yaml", record.id),
    }
}
