//! Core library for wpexport
//!
//! This crate implements the **Functional Core** of the wpexport application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`wpexport_core`** (this crate): Pure transformation of a parsed WordPress
//!   export into documents, comment records, redirects, and report rows
//! - **`wpexport`**: File reading, XML parsing, file writing, logging, and the
//!   console report (the Imperative Shell)
//!
//! Nothing in this crate touches the filesystem or logs. Problems that should
//! not stop a run (a meta value that fails to decode) are returned as data and
//! surfaced by the shell.
//!
//! # Pipeline
//!
//! 1. [`item::channel_items`] pulls `rss.channel.item` out of the parsed document
//! 2. [`item::normalize_item`] renames keys ([`keys`]) and decodes meta ([`meta`], [`php`])
//! 3. [`classify::classify`] derives paths ([`paths`]) and routes items into buckets
//! 4. [`front_matter::build_document`] renders posts and pages ([`markdown`], [`locale`])
//! 5. [`report::ExportReport`] accumulates the CSV manifests
//!
//! Site-specific constants live in [`config`].
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use wpexport_core::classify::classify;
//! use wpexport_core::config::SiteConfig;
//! use wpexport_core::item::{channel_items, normalize_item};
//!
//! let config = SiteConfig::default();
//! let items = channel_items(&document)
//!     .unwrap_or_default()
//!     .into_iter()
//!     .map(|raw| normalize_item(raw, &config))
//!     .collect();
//!
//! let classification = classify(items, &config)?;
//! assert!(classification.redirects.iter().all(|r| r.path.ends_with('/')));
//! ```

pub mod classify;
pub mod comments;
pub mod config;
pub mod front_matter;
pub mod item;
pub mod keys;
pub mod locale;
pub mod markdown;
pub mod meta;
pub mod paths;
pub mod php;
pub mod report;
