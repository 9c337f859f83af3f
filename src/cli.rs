//! Command-line interface module for imgstamp.
//!
//! Ties configuration loading, the renamer and the scanner together and turns
//! their errors into messages for the user.

use crate::config::RenameConfig;
use crate::output::OutputFormatter;
use crate::renamer::{RenameSummary, Renamer};
use crate::scan::Scanner;
use std::io::{self, Write};
use std::path::Path;

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampCommand {
    /// Rename image files after their modification time.
    Rename,
    /// Report entries that break the media naming convention.
    Scan {
        /// Print the report as JSON instead of text.
        json: bool,
    },
}

/// Runs the given command on a directory using the default configuration lookup.
///
/// ```no_run
/// use imgstamp::cli::{run_cli, StampCommand};
/// use std::path::Path;
///
/// if let Err(e) = run_cli(StampCommand::Rename, Path::new("/path/to/photos")) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: StampCommand, dir_path: &Path) -> Result<(), String> {
    run_cli_with_config(command, dir_path, None)
}

/// Runs the given command with an optional explicit configuration file.
pub fn run_cli_with_config(
    command: StampCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
) -> Result<(), String> {
    match command {
        StampCommand::Rename => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let summary = rename_directory_with_config(dir_path, config_path, &mut out)?;
            out.flush()
                .map_err(|e| format!("Error writing output: {}", e))?;
            OutputFormatter::rename_summary(&summary);
            Ok(())
        }
        StampCommand::Scan { json } => scan_directory(dir_path, json),
    }
}

/// Renames the image files of `base_path`, announcing each rename on `out`.
///
/// The configuration is loaded and validated before any file is touched. The
/// first failing file aborts the run.
pub fn rename_directory_with_config<W: Write>(
    base_path: &Path,
    config_path: Option<&Path>,
    out: &mut W,
) -> Result<RenameSummary, String> {
    let config = RenameConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?
        .compile()
        .map_err(|e| format!("Error compiling configuration: {}", e))?;

    Renamer::new(base_path, config)
        .run(out)
        .map_err(|e| e.to_string())
}

/// Prints a naming report for `base_path`.
fn scan_directory(base_path: &Path, json: bool) -> Result<(), String> {
    let report = Scanner::scan(base_path, !json).map_err(|e| e.to_string())?;

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Error serializing report: {}", e))?;
        OutputFormatter::plain(&text);
    } else {
        OutputFormatter::scan_report(&report);
    }

    if report.invalid_count() > 0 {
        OutputFormatter::warning(&format!(
            "{} {} break the naming convention",
            report.invalid_count(),
            if report.invalid_count() == 1 {
                "entry"
            } else {
                "entries"
            }
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rename_with_missing_config_fails_before_touching_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("vacation.jpg");
        fs::write(&file_path, "image").unwrap();

        let result = rename_directory_with_config(
            temp_dir.path(),
            Some(Path::new("/non/existent/config.toml")),
            &mut Vec::new(),
        );

        assert!(result.is_err());
        assert!(file_path.exists());
    }

    #[test]
    fn test_scan_command_on_missing_directory() {
        let result = run_cli(
            StampCommand::Scan { json: true },
            Path::new("/non/existent/path"),
        );
        assert!(result.is_err());
    }
}
