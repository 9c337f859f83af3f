/// Renaming of image files after their modification timestamps.
///
/// The renamer looks at the direct children of one directory, keeps the image
/// files whose names are not yet `IMG_yyyyMMdd_HHmmss.<ext>`, and renames each
/// of them in place. Files are handled one at a time in directory listing order;
/// the first failure stops the run and leaves earlier renames in place.
use crate::config::CompiledConfig;
use crate::naming;
use std::fs::{self, DirEntry};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// An image file that will be renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Path of the file, as produced by listing the directory.
    pub path: PathBuf,
    /// The file's name within the directory.
    pub file_name: String,
    /// Everything after the last `.` of the name, verbatim.
    pub extension: String,
}

/// A rename that was carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRecord {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
}

impl RenameRecord {
    /// The new filename, without its directory.
    pub fn new_name(&self) -> String {
        self.new_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Everything a successful run renamed, in order.
#[derive(Debug, Clone, Default)]
pub struct RenameSummary {
    pub records: Vec<RenameRecord>,
}

impl RenameSummary {
    pub fn renamed_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Errors that abort a rename run.
#[derive(Debug)]
pub enum RenameError {
    /// The directory to process does not exist or is not a directory.
    InvalidDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Listing the directory failed.
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The modification time (or file type) of an entry could not be read.
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Another file already has the computed name.
    TargetExists {
        source: PathBuf,
        destination: PathBuf,
    },
    /// The move itself failed.
    RenameFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Writing the rename announcement failed.
    OutputFailed { source: std::io::Error },
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDirectory { path, source } => {
                write!(f, "Invalid directory {}: {}", path.display(), source)
            }
            Self::ReadDirectory { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::Metadata { path, source } => {
                write!(
                    f,
                    "Failed to read modification time of {}: {}",
                    path.display(),
                    source
                )
            }
            Self::TargetExists {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Cannot rename {} to {}: target already exists",
                    source.display(),
                    destination.display()
                )
            }
            Self::RenameFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to rename {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::OutputFailed { source } => write!(f, "Failed to write output: {}", source),
        }
    }
}

impl std::error::Error for RenameError {}

/// Result type for rename operations.
pub type RenameResult<T> = Result<T, RenameError>;

/// Renames the image files of a single directory.
pub struct Renamer {
    directory: PathBuf,
    config: CompiledConfig,
}

impl Renamer {
    pub fn new(directory: impl Into<PathBuf>, config: CompiledConfig) -> Self {
        Self {
            directory: directory.into(),
            config,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Lists the files that a run would rename.
    ///
    /// Only files directly inside the directory are considered; a symlink
    /// counts when it points at a file. A file is a candidate when its path
    /// ends in a configured extension, its name is not already canonical, and
    /// no exclude rule names it.
    pub fn candidates(&self) -> RenameResult<Vec<CandidateFile>> {
        let mut candidates = Vec::new();
        for inspected in self.inspect_entries()? {
            if let Some(candidate) = inspected? {
                candidates.push(candidate);
            }
        }
        Ok(candidates)
    }

    /// Renames every candidate, writing one `Rename <path> to <name>` line per file.
    ///
    /// Entries are inspected and renamed one at a time in listing order. Stops
    /// at the first error; files renamed before it keep their new names.
    pub fn run<W: Write>(&self, out: &mut W) -> RenameResult<RenameSummary> {
        self.rename_each(self.inspect_entries()?, out)
    }

    fn rename_each<I, W>(&self, inspected: I, out: &mut W) -> RenameResult<RenameSummary>
    where
        I: IntoIterator<Item = RenameResult<Option<CandidateFile>>>,
        W: Write,
    {
        let mut summary = RenameSummary::default();
        for candidate in inspected {
            if let Some(candidate) = candidate? {
                let record = self.rename_candidate(&candidate, out)?;
                summary.records.push(record);
            }
        }
        Ok(summary)
    }

    /// Lazily inspects the directory listing, one entry per item.
    fn inspect_entries(
        &self,
    ) -> RenameResult<impl Iterator<Item = RenameResult<Option<CandidateFile>>> + '_> {
        if !self.directory.is_dir() {
            return Err(RenameError::InvalidDirectory {
                path: self.directory.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let entries = fs::read_dir(&self.directory).map_err(|e| RenameError::ReadDirectory {
            path: self.directory.clone(),
            source: e,
        })?;

        Ok(entries.map(move |entry| self.inspect_entry(entry)))
    }

    fn inspect_entry(&self, entry: io::Result<DirEntry>) -> RenameResult<Option<CandidateFile>> {
        let entry = entry.map_err(|e| RenameError::ReadDirectory {
            path: self.directory.clone(),
            source: e,
        })?;
        let path = entry.path();

        if !self.config.has_image_extension(&path) {
            return Ok(None);
        }

        let file_type = entry.file_type().map_err(|e| RenameError::Metadata {
            path: path.clone(),
            source: e,
        })?;
        let is_file = if file_type.is_symlink() {
            // Dangling links fail here, like any other unreadable entry.
            fs::metadata(&path)
                .map_err(|e| RenameError::Metadata {
                    path: path.clone(),
                    source: e,
                })?
                .is_file()
        } else {
            file_type.is_file()
        };
        if !is_file {
            return Ok(None);
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if self.config.is_canonical_name(&file_name) || self.config.is_excluded(&file_name) {
            return Ok(None);
        }

        let extension = naming::extension_of(&file_name).map(str::to_string);
        Ok(extension.map(|extension| CandidateFile {
            extension,
            path,
            file_name,
        }))
    }

    /// Computes the new name of one candidate and moves it.
    ///
    /// A symlink is renamed itself; its name comes from the target's
    /// modification time.
    pub fn rename_candidate<W: Write>(
        &self,
        candidate: &CandidateFile,
        out: &mut W,
    ) -> RenameResult<RenameRecord> {
        let modified = fs::metadata(&candidate.path)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| RenameError::Metadata {
                path: candidate.path.clone(),
                source: e,
            })?;

        let new_name = naming::canonical_name(
            self.config.prefix(),
            &naming::format_timestamp(modified),
            &candidate.extension,
        );
        let destination = candidate.path.with_file_name(&new_name);

        writeln!(out, "Rename {} to {}", candidate.path.display(), new_name)
            .map_err(|e| RenameError::OutputFailed { source: e })?;

        move_without_replace(&candidate.path, &destination)?;

        Ok(RenameRecord {
            original_path: candidate.path.clone(),
            new_path: destination,
        })
    }
}

/// Moves `source` to `destination`, failing if `destination` exists.
///
/// Two files modified in the same second map to the same name, so the target
/// may already be taken. Linking and then unlinking makes the existence check
/// and the move one step. Filesystems without hard links fall back to a check
/// followed by `fs::rename`.
fn move_without_replace(source: &Path, destination: &Path) -> RenameResult<()> {
    let target_exists = || RenameError::TargetExists {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
    };
    let rename_failed = |e| RenameError::RenameFailed {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source_error: e,
    };

    match fs::hard_link(source, destination) {
        Ok(()) => fs::remove_file(source).map_err(|e| {
            let _ = fs::remove_file(destination);
            rename_failed(e)
        }),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(target_exists()),
        Err(_) => {
            if fs::symlink_metadata(destination).is_ok() {
                return Err(target_exists());
            }
            fs::rename(source, destination).map_err(rename_failed)
        }
    }
}
