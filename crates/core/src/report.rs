//! CSV manifests of exported URLs and attachments.

use crate::item::NormalizedItem;

pub const URLS_CSV_HEADER: &str = "URL;post_id;title;status;locale";
pub const ATTACHMENTS_CSV_HEADER: &str = "Parent post_id;URL;attachmentURL;excerpt;title;content";

const CSV_SEPARATOR: &str = ";";

/// Largest integer a double represents exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub link: String,
    pub id: String,
    pub title: String,
    pub status: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRow {
    pub parent_id: String,
    pub link: String,
    pub attachment_url: String,
    pub excerpt: String,
    pub title: String,
    pub content: String,
}

/// Rows accumulated during one export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub urls: Vec<ExportRow>,
    pub attachments: Vec<AttachmentRow>,
}

impl ExportReport {
    pub fn record_item(&mut self, item: &NormalizedItem, locale: &str) {
        self.urls.push(ExportRow {
            link: item.link.clone().unwrap_or_default(),
            id: item.id.clone().unwrap_or_default(),
            title: item.title.clone().unwrap_or_default(),
            status: item
                .status
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            locale: locale.to_string(),
        });
    }

    pub fn record_attachment(&mut self, item: &NormalizedItem) {
        self.attachments.push(AttachmentRow {
            parent_id: item.parent.clone().unwrap_or_default(),
            link: item.link.clone().unwrap_or_default(),
            attachment_url: item.attachment_url.clone().unwrap_or_default(),
            excerpt: item.excerpt.clone().unwrap_or_default(),
            title: item.title.clone().unwrap_or_default(),
            content: item.content.clone().unwrap_or_default(),
        });
    }

    /// URL rows sorted by link, ascending
    pub fn sorted_urls(&self) -> Vec<&ExportRow> {
        let mut rows: Vec<&ExportRow> = self.urls.iter().collect();
        rows.sort_by(|a, b| a.link.cmp(&b.link));
        rows
    }

    pub fn urls_csv(&self) -> String {
        let lines = self.sorted_urls().into_iter().map(|row| {
            csv_line(&[
                row.link.as_str(),
                row.id.as_str(),
                row.title.as_str(),
                row.status.as_str(),
                row.locale.as_str(),
            ])
        });
        std::iter::once(URLS_CSV_HEADER.to_string())
            .chain(lines)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn attachments_csv(&self) -> String {
        let lines = self.attachments.iter().map(|row| {
            csv_line(&[
                row.parent_id.as_str(),
                row.link.as_str(),
                row.attachment_url.as_str(),
                row.excerpt.as_str(),
                row.title.as_str(),
                row.content.as_str(),
            ])
        });
        std::iter::once(ATTACHMENTS_CSV_HEADER.to_string())
            .chain(lines)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn csv_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(CSV_SEPARATOR)
}

/// Escape one CSV field
///
/// Numeric-looking and URL-looking fields pass through. Anything else is
/// URI-encoded and quoted.
pub fn csv_field(value: &str) -> String {
    if is_numeric_like(value) || value.starts_with("http") {
        value.to_string()
    } else {
        format!("\"{}\"", encode_uri(value))
    }
}

/// Blank strings count as numeric, matching how they coerce to zero
fn is_numeric_like(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    trimmed
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER)
}

/// Percent-encode everything outside the URI reserved and unreserved sets
pub fn encode_uri(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || ";,/?:@&=+$-_.!~*'()#".contains(ch) {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::item::normalize_item;
    use serde_json::json;

    fn item(raw: serde_json::Value) -> NormalizedItem {
        normalize_item(raw.as_object().unwrap(), &SiteConfig::default())
    }

    #[test]
    fn test_csv_field_numbers_pass_through() {
        assert_eq!(csv_field("6189"), "6189");
        assert_eq!(csv_field("0"), "0");
        assert_eq!(csv_field(""), "");
    }

    #[test]
    fn test_csv_field_urls_pass_through() {
        assert_eq!(
            csv_field("https://renoirboulanger.com/blog/x/"),
            "https://renoirboulanger.com/blog/x/"
        );
    }

    #[test]
    fn test_csv_field_text_is_quoted_and_encoded() {
        assert_eq!(csv_field("publish"), "\"publish\"");
        assert_eq!(csv_field("Gérer mes clés"), "\"G%C3%A9rer%20mes%20cl%C3%A9s\"");
        assert_eq!(csv_field("say \"hi\""), "\"say%20%22hi%22\"");
    }

    #[test]
    fn test_csv_field_large_or_fractional_numbers_are_text() {
        assert_eq!(csv_field("1.5"), "\"1.5\"");
        assert_eq!(csv_field("99999999999999999999"), "\"99999999999999999999\"");
    }

    #[test]
    fn test_encode_uri_keeps_reserved() {
        assert_eq!(encode_uri("a/b?c=d&e#f"), "a/b?c=d&e#f");
        assert_eq!(encode_uri("a<b>"), "a%3Cb%3E");
    }

    #[test]
    fn test_urls_csv_sorted_by_link() {
        let mut report = ExportReport::default();
        for (link, id) in [
            ("https://renoirboulanger.com/blog/b/", "2"),
            ("https://renoirboulanger.com/blog/a/", "1"),
        ] {
            report.record_item(
                &item(json!({"link": link, "wp:post_id": id, "title": "Titre", "wp:status": "publish"})),
                "fr-CA",
            );
        }
        let csv = report.urls_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], URLS_CSV_HEADER);
        assert_eq!(
            lines[1],
            "https://renoirboulanger.com/blog/a/;1;\"Titre\";\"publish\";\"fr-CA\""
        );
        assert!(lines[2].starts_with("https://renoirboulanger.com/blog/b/;2;"));
    }

    #[test]
    fn test_attachments_csv() {
        let mut report = ExportReport::default();
        report.record_attachment(&item(json!({
            "wp:post_type": "attachment",
            "wp:post_parent": "6189",
            "link": "https://renoirboulanger.com/blog/x/image/",
            "wp:attachment_url": "https://renoirboulanger.com/wp-content/uploads/image.png",
            "title": "image",
            "excerpt:encoded": "",
            "content:encoded": ""
        })));
        let csv = report.attachments_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], ATTACHMENTS_CSV_HEADER);
        assert_eq!(
            lines[1],
            "6189;https://renoirboulanger.com/blog/x/image/;https://renoirboulanger.com/wp-content/uploads/image.png;;\"image\";"
        );
    }

    #[test]
    fn test_empty_report_has_headers_only() {
        let report = ExportReport::default();
        assert_eq!(report.urls_csv(), URLS_CSV_HEADER);
        assert_eq!(report.attachments_csv(), ATTACHMENTS_CSV_HEADER);
    }
}
