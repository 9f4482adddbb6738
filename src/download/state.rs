//! Per-run download results.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local};

use crate::error::Error;

/// A pending unit of work produced by a listing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub id: String,
    pub name: String,
    pub local_dir: PathBuf,
}

impl DownloadTask {
    pub fn new(id: impl Into<String>, name: impl Into<String>, local_dir: &Path) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            local_dir: local_dir.to_path_buf(),
        }
    }
}

/// What a failure record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Folder,
    /// Listing the children of a container.
    Listing,
}

/// One item that could not be mirrored.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    pub kind: ItemKind,
    pub id: String,
    pub local_path: PathBuf,
    pub message: String,
}

/// Results of one mirror run.
#[derive(Debug, Default)]
pub struct MirrorReport {
    pub started_at: Option<DateTime<Local>>,
    pub finished_at: Option<DateTime<Local>>,

    /// Files written, in the order they were fetched.
    pub downloaded: Vec<PathBuf>,

    /// Files skipped because a local copy was kept.
    pub kept_local: Vec<PathBuf>,

    /// Folders created or reused, in the order they were descended into.
    pub folders: Vec<PathBuf>,

    pub failures: Vec<ItemFailure>,
}

impl MirrorReport {
    /// Record a failed item.
    pub fn record_failure(&mut self, kind: ItemKind, id: &str, local_path: &Path, error: &Error) {
        self.failures.push(ItemFailure {
            kind,
            id: id.to_string(),
            local_path: local_path.to_path_buf(),
            message: error.to_string(),
        });
    }

    /// Whether every item was mirrored.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Wall-clock run time, once the run has finished.
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// Format a duration as `[D day(s), ]H:MM:SS[.ffffff]`.
///
/// The fraction is left out when it is zero. Negative durations print as zero.
pub fn format_elapsed(elapsed: Duration) -> String {
    let micros = elapsed.num_microseconds().unwrap_or(i64::MAX).max(0);

    let days = micros / 86_400_000_000;
    let hours = (micros / 3_600_000_000) % 24;
    let minutes = (micros / 60_000_000) % 60;
    let seconds = (micros / 1_000_000) % 60;
    let fraction = micros % 1_000_000;

    let mut out = String::new();
    if days > 0 {
        let unit = if days == 1 { "day" } else { "days" };
        out.push_str(&format!("{} {}, ", days, unit));
    }
    out.push_str(&format!("{}:{:02}:{:02}", hours, minutes, seconds));
    if fraction > 0 {
        out.push_str(&format!(".{:06}", fraction));
    }
    out
}
