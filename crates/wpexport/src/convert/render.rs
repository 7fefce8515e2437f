//! In-memory rendering of every file a conversion writes.

use crate::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use wpexport_core::classify::{classify, Classification, CommentEntry};
use wpexport_core::config::SiteConfig;
use wpexport_core::front_matter::{build_document, compose_document, to_yaml};
use wpexport_core::locale::LocaleDetector;
use wpexport_core::report::ExportReport;

/// A file to write, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug)]
pub struct ConvertOutput {
    pub classification: Classification,
    pub documents: Vec<RenderedFile>,
    pub comments: Vec<RenderedFile>,
    /// Documents not rendered because their path is excluded
    pub skipped: Vec<String>,
    pub report: ExportReport,
    pub decode_fallbacks: usize,
}

/// Run the whole pipeline on an export, without touching the filesystem
pub fn convert_data(xml: &str, config: &SiteConfig) -> Result<ConvertOutput> {
    let items = crate::pipeline::parse_items(xml, config)?;
    let decode_fallbacks = items
        .iter()
        .map(|item| crate::pipeline::decode_errors(item).count())
        .sum();

    let classification = classify(items, config)?;
    let locales = LocaleDetector::new(&config.stop_words)
        .context("Invalid stop word list")?;

    let mut report = ExportReport::default();
    let mut documents = Vec::new();
    let mut skipped = Vec::new();

    for item in classification.documents() {
        let document = build_document(item, &locales);
        report.record_item(item, &document.front_matter.locale);

        let path = item.path.as_deref().unwrap_or("/");
        if config.is_excluded(path) {
            log::info!("Skipping excluded path {path}");
            skipped.push(path.to_string());
            continue;
        }

        let yaml = render_yaml(&document.front_matter, path);
        documents.push(RenderedFile {
            path: document_file(path),
            contents: compose_document(&yaml, &document.body),
        });
    }

    for attachment in &classification.attachments {
        report.record_attachment(attachment);
    }

    let comments = classification
        .comments
        .iter()
        .map(|entry| render_comment(entry, config))
        .collect();

    Ok(ConvertOutput {
        classification,
        documents,
        comments,
        skipped,
        report,
        decode_fallbacks,
    })
}

fn render_comment(entry: &CommentEntry, config: &SiteConfig) -> RenderedFile {
    if let Some(email) = entry.comment.author_email.as_deref() {
        if email.contains(&config.owner_handle) {
            log::debug!("{email} hashes to {}", entry.for_staticman.author_email_hash);
        }
    }

    let mut path = relative_dir(&entry.path);
    path.push(&entry.file_name);
    let context = f!("{}/{}", entry.path.trim_end_matches('/'), entry.file_name);
    RenderedFile {
        path,
        contents: f!("{}\n", render_yaml(&entry.for_staticman, &context)),
    }
}

/// YAML for `value`, or an empty string when it cannot be serialized
fn render_yaml<T: Serialize>(value: &T, context: &str) -> String {
    to_yaml(value).unwrap_or_else(|err| {
        log::error!("Failed to render YAML for {context}: {err}");
        String::new()
    })
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    // `.` and `..` never leave the output directory.
    path.split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
}

fn relative_dir(path: &str) -> PathBuf {
    segments(path).collect()
}

/// Document file for a URL path: `/blog/2020/01/example/` is `blog/2020/01/example.md`
pub fn document_file(path: &str) -> PathBuf {
    let mut parts: Vec<&str> = segments(path).collect();
    let Some(last) = parts.pop() else {
        return PathBuf::from("index.md");
    };
    let mut file: PathBuf = parts.into_iter().collect();
    file.push(f!("{last}.md"));
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_document_file() {
        assert_eq!(
            document_file("/blog/2020/01/example/"),
            Path::new("blog/2020/01/example.md")
        );
        assert_eq!(document_file("/about/"), Path::new("about.md"));
        assert_eq!(document_file("/"), Path::new("index.md"));
        assert_eq!(
            document_file("/unpublished/p/6189/"),
            Path::new("unpublished/p/6189.md")
        );
    }

    #[test]
    fn test_document_file_stays_inside_output() {
        assert_eq!(document_file("/../../etc/passwd/"), Path::new("etc/passwd.md"));
    }

    #[test]
    fn test_relative_dir() {
        assert_eq!(
            relative_dir("/comments/blog/x/"),
            Path::new("comments/blog/x")
        );
    }
}
