//! Download module for mirroring remote trees.
//!
//! This module provides:
//! - The recursive tree downloader
//! - Per-run result tracking
//! - Streaming file content to disk

pub mod file;
pub mod mirror;
pub mod state;

pub use mirror::TreeDownloader;
pub use state::{format_elapsed, DownloadTask, ItemFailure, ItemKind, MirrorReport};
