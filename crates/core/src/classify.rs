//! Routing of normalized items into output buckets.
//!
//! | post type     | status      | outcome                                          |
//! |---------------|-------------|--------------------------------------------------|
//! | post, page    | publish     | redirect record if needed, else posts / pages    |
//! | post, page    | not publish | unpublished, path prefixed with `/unpublished`   |
//! | attachment    | any         | attachments                                      |
//! | nav_menu_item | any         | dropped                                          |
//! | other/missing | any         | oddities                                         |
//!
//! Comments of any published item are lifted into the comments bucket.

use thiserror::Error;

use crate::comments::{build_staticman_record, comment_file_name, StaticmanRecord};
use crate::config::SiteConfig;
use crate::item::{NormalizedItem, PostType};
use crate::paths::{is_short_permalink, redirect_for, resolve_paths, Redirect};

pub const UNPUBLISHED_PREFIX: &str = "/unpublished";
pub const COMMENTS_PREFIX: &str = "/comments";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("{post_type} {id} ({title:?}) has no path; every post and page must resolve to one")]
    MissingPath {
        post_type: String,
        id: String,
        title: String,
    },
}

/// A comment lifted out of its parent, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct CommentEntry {
    /// Directory of the record, `/comments` + the parent's path
    pub path: String,
    pub file_name: String,
    pub for_staticman: StaticmanRecord,
    pub comment: NormalizedItem,
}

/// Every bucket of one export, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub posts: Vec<NormalizedItem>,
    pub pages: Vec<NormalizedItem>,
    pub attachments: Vec<NormalizedItem>,
    pub unpublished: Vec<NormalizedItem>,
    pub comments: Vec<CommentEntry>,
    pub redirects: Vec<Redirect>,
    pub oddities: Vec<NormalizedItem>,
}

impl Classification {
    /// Items that get a document and an export row, in writing order
    pub fn documents(&self) -> impl Iterator<Item = &NormalizedItem> {
        self.posts
            .iter()
            .chain(self.pages.iter())
            .chain(self.unpublished.iter())
    }
}

/// Classify every item of an export
///
/// Stops at the first post or page without a path.
pub fn classify(
    items: Vec<NormalizedItem>,
    config: &SiteConfig,
) -> Result<Classification, ClassifyError> {
    let mut classification = Classification::default();
    for item in items {
        classify_item(item, config, &mut classification)?;
    }
    Ok(classification)
}

fn classify_item(
    mut item: NormalizedItem,
    config: &SiteConfig,
    out: &mut Classification,
) -> Result<(), ClassifyError> {
    let paths = item.link.as_deref().map(|link| resolve_paths(link, config));
    if let Some(paths) = &paths {
        item.path = Some(paths.path.clone());
        item.path_normalized = Some(paths.path_normalized.clone());
    }

    if item.is_published() && !item.comments.is_empty() {
        let parent_link = item.link.clone().unwrap_or_default();
        let parent_path = paths.as_ref().map_or("/", |p| p.path.as_str());
        out.comments.extend(
            item.comments
                .iter()
                .map(|comment| lift_comment(comment, &parent_link, parent_path)),
        );
    }

    let mut redirected = false;
    if item.is_document() {
        if item.is_published() {
            if let Some(redirect) = paths.as_ref().and_then(|p| redirect_for(p, config)) {
                out.redirects.push(redirect);
                redirected = true;
            }
        } else if let Some(paths) = &paths {
            let path = if is_short_permalink(&paths.path_normalized) {
                &paths.path_normalized
            } else {
                &paths.path
            };
            item.path = Some(format!("{UNPUBLISHED_PREFIX}{path}"));
        }

        if item.path.as_deref().map_or(true, str::is_empty) {
            return Err(ClassifyError::MissingPath {
                post_type: item
                    .post_type
                    .as_ref()
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default(),
                id: item.id.clone().unwrap_or_default(),
                title: item.title.clone().unwrap_or_default(),
            });
        }
    }

    match (&item.post_type, item.is_published()) {
        (Some(PostType::Post), true) if !redirected => out.posts.push(item),
        (Some(PostType::Page), true) if !redirected => out.pages.push(item),
        (Some(PostType::Post | PostType::Page), true) => {}
        (Some(PostType::Post | PostType::Page), false) => out.unpublished.push(item),
        (Some(PostType::Attachment), _) => out.attachments.push(item),
        (Some(PostType::NavMenuItem), _) => {}
        (Some(PostType::Other(_)) | None, _) => out.oddities.push(item),
    }

    Ok(())
}

fn lift_comment(comment: &NormalizedItem, parent_link: &str, parent_path: &str) -> CommentEntry {
    let for_staticman = build_staticman_record(comment, parent_link);
    CommentEntry {
        path: format!("{COMMENTS_PREFIX}{parent_path}"),
        file_name: comment_file_name(&for_staticman),
        for_staticman,
        comment: comment.clone(),
    }
}
