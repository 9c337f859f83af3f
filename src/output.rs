//! Output formatting and styling module.
//!
//! Status messages (success, error, warning, info) go to stderr so that stdout
//! carries only the `Rename ... to ...` lines and scan reports.

use crate::renamer::RenameSummary;
use crate::scan::ScanReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use imgstamp::output::OutputFormatter;
    /// OutputFormatter::success("Renamed 3 files");
    /// ```
    pub fn success(message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        eprintln!("{}", message.cyan());
    }

    /// Prints a regular message to stdout without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar that ticks once per directory entry.
    ///
    /// ```no_run
    /// use imgstamp::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the closing line of a rename run.
    pub fn rename_summary(summary: &RenameSummary) {
        let count = summary.renamed_count();
        if count == 0 {
            Self::info("Nothing to rename.");
        } else {
            Self::success(&format!(
                "Renamed {} {}",
                count,
                if count == 1 { "file" } else { "files" }
            ));
        }
    }

    /// Prints a scan report: flagged entries first, then the tallies.
    pub fn scan_report(report: &ScanReport) {
        for entry in &report.invalid {
            println!(
                "{} {}",
                format!("[Invalid {}]", entry.kind).red(),
                entry.path.display()
            );
        }

        println!(
            "\nInvalid count = {}",
            report.invalid_count().to_string().bold()
        );

        Self::header("Valid media files:");
        for (media_type, count) in &report.valid {
            println!("{}: {}", media_type, count.to_string().green());
        }

        Self::header("Extensions:");
        for (extension, count) in &report.extensions {
            println!(".{}: {}", extension, count);
        }

        println!(
            "\nTotal files: {} | Size = {:.1} MB",
            report.total_files.to_string().bold(),
            report.total_size as f64 / 1024.0 / 1024.0
        );
    }
}
