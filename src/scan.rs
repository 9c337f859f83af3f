//! Read-only naming report for a media directory.
//!
//! Checks the direct children of a directory against the media naming
//! conventions in [`crate::naming`] and tallies what it finds. Nothing on disk
//! is changed.

use crate::naming::{self, MediaNameError, MediaType};
use crate::output::OutputFormatter;
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Why an entry was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidKind {
    /// The filename follows no media naming pattern, or uses an unknown
    /// prefix or an extension its media type does not allow.
    Name,
    /// The filename has the right shape but an impossible date.
    Date,
    /// A directory where only files are expected.
    Structure,
}

impl std::fmt::Display for InvalidKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidKind::Name => write!(f, "name"),
            InvalidKind::Date => write!(f, "date"),
            InvalidKind::Structure => write!(f, "structure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidEntry {
    pub path: PathBuf,
    pub kind: InvalidKind,
}

/// Tally of one scanned directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub directory: PathBuf,
    pub invalid: Vec<InvalidEntry>,
    /// Valid files per media type; every type is present, possibly with 0.
    pub valid: BTreeMap<MediaType, usize>,
    /// Files per lowercased extension (`no-ext` when there is none).
    pub extensions: BTreeMap<String, usize>,
    pub total_files: usize,
    pub total_size: u64,
}

impl ScanReport {
    fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            valid: MediaType::ALL.iter().map(|t| (*t, 0)).collect(),
            ..Default::default()
        }
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    pub fn valid_count(&self) -> usize {
        self.valid.values().sum()
    }

    fn flag(&mut self, path: PathBuf, kind: InvalidKind) {
        self.invalid.push(InvalidEntry { path, kind });
    }
}

/// Errors that stop a scan.
#[derive(Debug)]
pub enum ScanError {
    InvalidDirectory { path: PathBuf },
    ReadDirectory { path: PathBuf, source: io::Error },
    Metadata { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDirectory { path } => {
                write!(f, "{}: not a directory", path.display())
            }
            Self::ReadDirectory { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::Metadata { path, source } => {
                write!(f, "Failed to read metadata of {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {}

pub type ScanResult<T> = Result<T, ScanError>;

/// Scans the direct children of a directory.
pub struct Scanner;

impl Scanner {
    /// Builds a naming report for `directory`.
    ///
    /// With `show_progress` a progress bar ticks once per entry.
    pub fn scan(directory: &Path, show_progress: bool) -> ScanResult<ScanReport> {
        if !directory.is_dir() {
            return Err(ScanError::InvalidDirectory {
                path: directory.to_path_buf(),
            });
        }

        let entries = fs::read_dir(directory)
            .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
            .map_err(|e| ScanError::ReadDirectory {
                path: directory.to_path_buf(),
                source: e,
            })?;

        let pb = if show_progress {
            OutputFormatter::create_progress_bar(entries.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let mut report = ScanReport::new(directory);
        for entry in entries {
            let path = entry.path();
            let metadata = entry.metadata().map_err(|e| ScanError::Metadata {
                path: path.clone(),
                source: e,
            })?;

            if metadata.is_dir() {
                report.flag(path, InvalidKind::Structure);
            } else {
                let file_name = entry.file_name().to_string_lossy().into_owned();

                report.total_files += 1;
                report.total_size += metadata.len();
                let extension = naming::extension_of(&file_name)
                    .unwrap_or("no-ext")
                    .to_lowercase();
                *report.extensions.entry(extension).or_insert(0) += 1;

                match Self::classify(&file_name) {
                    Ok(media_type) => *report.valid.entry(media_type).or_insert(0) += 1,
                    Err(kind) => report.flag(path, kind),
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(report)
    }

    /// Decides which media type a filename belongs to, or why it is invalid.
    pub fn classify(file_name: &str) -> Result<MediaType, InvalidKind> {
        let media = naming::parse_media_name(file_name).map_err(|e| match e {
            MediaNameError::Unrecognized => InvalidKind::Name,
            MediaNameError::InvalidDate => InvalidKind::Date,
        })?;

        match MediaType::from_prefix(&media.prefix) {
            Some(media_type) if media_type.accepts_extension(&media.extension) => Ok(media_type),
            _ => Err(InvalidKind::Name),
        }
    }
}
