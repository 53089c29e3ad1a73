//! CLI output formatting for the end-of-run report.
//!
//! Per-file progress goes through `tracing`; stdout only carries the summary:
//!
//! ```text
//! Pages:  12 written → logseq-output/pages
//! Assets: 5 copied, 1 missing → logseq-output/assets
//! Rejected: 1 asset link outside the export
//! Failed: 1 note (see log)
//! Collisions: 1 page overwritten
//! Logseqification for all Markdown files done.
//! ```
//!
//! The `Rejected`, `Failed` and `Collisions` lines only appear when non-zero.
//! [`format_summary`] is pure and returns lines for testability;
//! [`print_summary`] writes them to stdout.

use crate::config::ConvertConfig;
use crate::convert::RunSummary;

/// Final line of every successful run.
pub const DONE_MESSAGE: &str = "Logseqification for all Markdown files done.";

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

pub fn format_summary(summary: &RunSummary, config: &ConvertConfig) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Pages:  {} written → {}",
            summary.pages_written,
            config.output_pages_dir().display()
        ),
        format!(
            "Assets: {} copied, {} missing → {}",
            summary.assets_copied,
            summary.assets_missing,
            config.output_assets_dir().display()
        ),
    ];
    if summary.assets_rejected > 0 {
        lines.push(format!(
            "Rejected: {} outside the export",
            plural(summary.assets_rejected, "asset link", "asset links")
        ));
    }
    if summary.files_failed > 0 {
        lines.push(format!(
            "Failed: {} (see log)",
            plural(summary.files_failed, "note", "notes")
        ));
    }
    if summary.collisions > 0 {
        lines.push(format!(
            "Collisions: {} overwritten",
            plural(summary.collisions, "page", "pages")
        ));
    }
    lines.push(DONE_MESSAGE.to_string());
    lines
}

pub fn print_summary(summary: &RunSummary, config: &ConvertConfig) {
    for line in format_summary(summary, config) {
        println!("{}", line);
    }
}
