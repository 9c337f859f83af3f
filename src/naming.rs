//! Media file naming conventions.
//!
//! Files in a media library are named `<prefix>_yyyyMMdd_HHmmss[_descr].<ext>`
//! (or `<prefix>_yyyyMMdd_N<n>[_descr].<ext>` when only the date is known).
//! This module builds those names from modification timestamps and parses
//! them back for validation.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::SystemTime;

/// Prefix used for renamed images.
pub const DEFAULT_PREFIX: &str = "IMG";

/// Extensions picked up by the renamer when no configuration says otherwise.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// `yyyyMMdd_HHmmss`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const DATE_FORMAT: &str = "%Y%m%d";

static DATE_TIME_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z_]{3})_([0-9]{8}_[0-9]{6})(_.+?)?\.([0-9A-Za-z_]{3,4})$")
        .expect("date-time name pattern is valid")
});

static DATE_NUM_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z_]{3})_([0-9]{8})_N[0-9]{1,2}(_.+?)?\.([0-9A-Za-z_]{3,4})$")
        .expect("date-number name pattern is valid")
});

/// Kinds of media stored in a library, keyed by their filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Image,
    Panorama,
    Map,
    Screenshot,
    Video,
    Record,
}

impl MediaType {
    /// All media types, in report order.
    pub const ALL: [MediaType; 6] = [
        MediaType::Image,
        MediaType::Panorama,
        MediaType::Map,
        MediaType::Screenshot,
        MediaType::Video,
        MediaType::Record,
    ];

    /// The three-letter filename prefix of this media type.
    pub fn prefix(&self) -> &'static str {
        match self {
            MediaType::Image => "IMG",
            MediaType::Panorama => "PAN",
            MediaType::Map => "MAP",
            MediaType::Screenshot => "SCR",
            MediaType::Video => "VID",
            MediaType::Record => "REC",
        }
    }

    /// Extensions a file of this type may carry (exact, lowercase).
    pub fn valid_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaType::Image => &["jpg", "png"],
            MediaType::Panorama => &["jpg"],
            MediaType::Map => &["jpg", "png"],
            MediaType::Screenshot => &["png"],
            MediaType::Video => &["mp4", "mov"],
            MediaType::Record => &["opus"],
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.prefix() == prefix)
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.valid_extensions().contains(&extension)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MediaType::Image => "IMAGE",
            MediaType::Panorama => "PANORAMA",
            MediaType::Map => "MAP",
            MediaType::Screenshot => "SCREENSHOT",
            MediaType::Video => "VIDEO",
            MediaType::Record => "RECORD",
        };
        f.write_str(name)
    }
}

/// A filename that follows one of the media naming patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaName {
    pub prefix: String,
    pub date: NaiveDate,
    /// Optional `_descr` part, without the leading underscore.
    pub description: Option<String>,
    pub extension: String,
}

/// Why a filename is not a valid media name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaNameError {
    /// The name follows neither naming pattern.
    Unrecognized,
    /// The name has the right shape but its date part is not a real date.
    InvalidDate,
}

/// Formats a modification time in the local timezone as `yyyyMMdd_HHmmss`.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Returns everything after the last `.` of a filename.
pub fn extension_of(file_name: &str) -> Option<&str> {
    file_name.rfind('.').map(|idx| &file_name[idx + 1..])
}

/// Builds `<prefix>_<timestamp>.<extension>`.
pub fn canonical_name(prefix: &str, timestamp: &str, extension: &str) -> String {
    format!("{}_{}.{}", prefix, timestamp, extension)
}

/// Compiles the already-named pattern `^<prefix>_dddddddd_dddddd\.\w+$`.
pub fn canonical_name_regex(prefix: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^{}_[0-9]{{8}}_[0-9]{{6}}\.[0-9A-Za-z_]+$",
        regex::escape(prefix)
    ))
}

/// Compiles `^.+\.(ext1|ext2|...)$`, matched against whole path strings.
pub fn extension_filter_regex<S: AsRef<str>>(extensions: &[S]) -> Result<Regex, regex::Error> {
    let alternatives = extensions
        .iter()
        .map(|ext| regex::escape(ext.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"^.+\.({})$", alternatives))
}

/// Parses a filename against both media naming patterns.
pub fn parse_media_name(file_name: &str) -> Result<MediaName, MediaNameError> {
    if let Some(caps) = DATE_TIME_NAME.captures(file_name) {
        let date = NaiveDateTime::parse_from_str(&caps[2], TIMESTAMP_FORMAT)
            .map_err(|_| MediaNameError::InvalidDate)?
            .date();
        return Ok(media_name(&caps, date));
    }

    if let Some(caps) = DATE_NUM_NAME.captures(file_name) {
        let date = NaiveDate::parse_from_str(&caps[2], DATE_FORMAT)
            .map_err(|_| MediaNameError::InvalidDate)?;
        return Ok(media_name(&caps, date));
    }

    Err(MediaNameError::Unrecognized)
}

fn media_name(caps: &regex::Captures<'_>, date: NaiveDate) -> MediaName {
    MediaName {
        prefix: caps[1].to_string(),
        date,
        description: caps.get(3).map(|m| m.as_str()[1..].to_string()),
        extension: caps[4].to_string(),
    }
}
