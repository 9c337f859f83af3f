//! imgstamp - rename images after their modification time
//!
//! This library renames the image files of a directory to
//! `IMG_yyyyMMdd_HHmmss.<ext>` based on their last-modification timestamp,
//! skips files already named that way, and reports entries of a media
//! directory that break the naming convention.

pub mod cli;
pub mod config;
pub mod naming;
pub mod output;
pub mod renamer;
pub mod scan;

pub use config::{CompiledConfig, ConfigError, RenameConfig};
pub use naming::MediaType;
pub use renamer::{CandidateFile, RenameError, RenameRecord, RenameSummary, Renamer};
pub use scan::{ScanReport, Scanner};

pub use cli::{StampCommand, run_cli};
