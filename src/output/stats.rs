//! Run summary reporting.

use console::style;

use crate::download::{format_elapsed, ItemKind, MirrorReport};

/// Print the totals of a mirror run and every failed item.
pub fn print_run_summary(report: &MirrorReport) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Summary:").bold());
    println!("  Folders:    {}", report.folders.len());
    println!("  Downloaded: {}", style(report.downloaded.len()).green());
    if !report.kept_local.is_empty() {
        println!("  Kept local: {}", style(report.kept_local.len()).yellow());
    }
    if !report.failures.is_empty() {
        println!("  Failed:     {}", style(report.failures.len()).red());
        for failure in &report.failures {
            let kind = match failure.kind {
                ItemKind::File => "file",
                ItemKind::Folder => "folder",
                ItemKind::Listing => "listing",
            };
            println!(
                "    {} {} ({}): {}",
                kind,
                failure.id,
                failure.local_path.display(),
                failure.message
            );
        }
    }
    if let Some(elapsed) = report.elapsed() {
        println!("  Run time:   {}", format_elapsed(elapsed));
    }
    println!("{}", style("═".repeat(50)).dim());
}
