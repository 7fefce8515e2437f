//! Console rendering of a classification.

use crate::prelude::{println, *};
use colored::Colorize;
use serde::Serialize;
use wpexport_core::classify::Classification;
use wpexport_core::item::NormalizedItem;
use wpexport_core::paths::Redirect;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub post_type: String,
    pub status: String,
    pub id: String,
    pub title: String,
    pub path: String,
    pub comments: usize,
}

impl From<&NormalizedItem> for ItemSummary {
    fn from(item: &NormalizedItem) -> Self {
        Self {
            post_type: item
                .post_type
                .as_ref()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            status: item
                .status
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            id: item.id.clone().unwrap_or_default(),
            title: item.title.clone().unwrap_or_default(),
            path: item.path.clone().unwrap_or_default(),
            comments: item.comments.len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotals {
    pub posts: usize,
    pub pages: usize,
    pub attachments: usize,
    pub unpublished: usize,
    pub comments: usize,
    pub redirects: usize,
    pub oddities: usize,
}

impl From<&Classification> for BucketTotals {
    fn from(c: &Classification) -> Self {
        Self {
            posts: c.posts.len(),
            pages: c.pages.len(),
            attachments: c.attachments.len(),
            unpublished: c.unpublished.len(),
            comments: c.comments.len(),
            redirects: c.redirects.len(),
            oddities: c.oddities.len(),
        }
    }
}

impl BucketTotals {
    fn rows(&self) -> [(&'static str, usize); 7] {
        [
            ("Posts", self.posts),
            ("Pages", self.pages),
            ("Attachments", self.attachments),
            ("Unpublished", self.unpublished),
            ("Comments", self.comments),
            ("Redirects", self.redirects),
            ("Oddities", self.oddities),
        ]
    }
}

pub fn print_items(items: &[ItemSummary]) {
    if items.is_empty() {
        println!("{}", "No items.".yellow());
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Type", "Status", "ID", "Comments", "Path", "Title"]);
    for item in items {
        table.add_row(prettytable::row![
            item.post_type.bright_white(),
            item.status.bright_yellow(),
            item.id,
            item.comments.to_string().bright_magenta(),
            item.path.cyan(),
            item.title
        ]);
    }
    table.printstd();
}

pub fn print_redirects(redirects: &[Redirect]) {
    if redirects.is_empty() {
        println!("{}", "No redirects.".yellow());
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Path", "Normalized", "To"]);
    for redirect in redirects {
        table.add_row(prettytable::row![
            redirect.path_unescaped.bright_white(),
            redirect.path_normalized.cyan(),
            redirect.to.as_deref().unwrap_or("-").green()
        ]);
    }
    table.printstd();
}

pub fn print_totals(totals: &BucketTotals) {
    let mut table = new_table();
    for (label, count) in totals.rows() {
        table.add_row(prettytable::row![
            label.green(),
            count.to_string().bright_cyan().bold()
        ]);
    }
    table.printstd();
}

/// Print the sections common to `convert` and `inspect`
pub fn print_classification(classification: &Classification, verbose: bool) {
    if verbose {
        print_header("Documents");
        let items: Vec<ItemSummary> = classification.documents().map(ItemSummary::from).collect();
        print_items(&items);
    }

    print_header("Redirects");
    print_redirects(&classification.redirects);

    print_header("Oddities");
    let oddities: Vec<ItemSummary> = classification.oddities.iter().map(ItemSummary::from).collect();
    print_items(&oddities);

    print_header("Totals");
    print_totals(&BucketTotals::from(classification));
}
