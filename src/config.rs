//! Renamer configuration.
//!
//! Configuration is optional. Without a file the renamer behaves exactly as the
//! defaults below describe: `.jpg`, `.jpeg` and `.png` files are renamed to
//! `IMG_yyyyMMdd_HHmmss.<ext>` and nothing is excluded.
//!
//! # Configuration File Format
//!
//! ```toml
//! [naming]
//! prefix = "IMG"
//! extensions = ["jpg", "jpeg", "png"]
//!
//! [filters.exclude]
//! filenames = ["cover.jpg"]
//! patterns = ["*_edited.*"]
//! ```

use crate::naming::{self, DEFAULT_EXTENSIONS, DEFAULT_PREFIX};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".imgstamprc.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax, structure, or values.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// A naming rule produced a regex that does not compile.
    InvalidRegexPattern {
        /// The offending input.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid naming pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameConfig {
    #[serde(default)]
    pub naming: NamingRules,
    #[serde(default)]
    pub filters: FilterRules,
}

/// How renamed files are named and which extensions are picked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingRules {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Matched case-sensitively against the end of each entry's path.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Files the renamer must leave alone even if they look like images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the filename.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl RenameConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if provided (must exist)
    /// 2. `.imgstamprc.toml` in the current directory
    /// 3. `~/.config/imgstamp/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("imgstamp")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validate the configuration and compile its patterns.
    pub fn compile(self) -> Result<CompiledConfig, ConfigError> {
        CompiledConfig::new(self)
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validated configuration with all patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    prefix: String,
    extension_filter: Regex,
    canonical_name: Regex,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
}

impl CompiledConfig {
    fn new(config: RenameConfig) -> Result<Self, ConfigError> {
        let NamingRules { prefix, extensions } = config.naming;

        if prefix.is_empty() {
            return Err(ConfigError::ConfigInvalid(
                "naming.prefix must not be empty".to_string(),
            ));
        }
        if !is_word(&prefix) {
            return Err(ConfigError::ConfigInvalid(format!(
                "naming.prefix '{}' may only contain letters, digits and '_'",
                prefix
            )));
        }
        if extensions.is_empty() {
            return Err(ConfigError::ConfigInvalid(
                "naming.extensions must list at least one extension".to_string(),
            ));
        }
        // Renamed files must match the canonical pattern again, whose extension is `\w+`.
        if let Some(ext) = extensions.iter().find(|ext| !is_word(ext)) {
            return Err(ConfigError::ConfigInvalid(format!(
                "naming.extensions entry '{}' may only contain letters, digits and '_'",
                ext
            )));
        }

        let extension_filter = naming::extension_filter_regex(extensions.as_slice()).map_err(|e| {
            ConfigError::InvalidRegexPattern {
                pattern: extensions.join(", "),
                reason: e.to_string(),
            }
        })?;
        let canonical_name =
            naming::canonical_name_regex(&prefix).map_err(|e| ConfigError::InvalidRegexPattern {
                pattern: prefix.clone(),
                reason: e.to_string(),
            })?;

        let exclude_patterns = config
            .filters
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            prefix,
            extension_filter,
            canonical_name,
            exclude_filenames: config.filters.exclude.filenames.into_iter().collect(),
            exclude_patterns,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True when the path string ends in one of the configured extensions.
    ///
    /// The whole path is matched, not just the filename.
    pub fn has_image_extension(&self, path: &Path) -> bool {
        self.extension_filter.is_match(&path.to_string_lossy())
    }

    /// True when the filename already follows `<prefix>_yyyyMMdd_HHmmss.<ext>`.
    pub fn is_canonical_name(&self, file_name: &str) -> bool {
        self.canonical_name.is_match(file_name)
    }

    /// True when an exclude rule names this file.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude_filenames.contains(file_name)
            || self
                .exclude_patterns
                .iter()
                .any(|pattern| pattern.matches(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_builtin_naming() {
        let compiled = RenameConfig::default().compile().unwrap();

        assert_eq!(compiled.prefix(), "IMG");
        assert!(compiled.has_image_extension(Path::new("/photos/a.jpg")));
        assert!(compiled.has_image_extension(Path::new("/photos/a.jpeg")));
        assert!(compiled.has_image_extension(Path::new("/photos/a.png")));
        assert!(!compiled.has_image_extension(Path::new("/photos/a.gif")));
        assert!(compiled.is_canonical_name("IMG_20200101_000000.png"));
        assert!(!compiled.is_excluded("a.jpg"));
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = RenameConfig::from_toml("").unwrap();
        assert_eq!(config.naming.prefix, "IMG");
        assert_eq!(config.naming.extensions, vec!["jpg", "jpeg", "png"]);
        assert!(config.filters.exclude.filenames.is_empty());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = RenameConfig::from_toml(
            r#"
            [naming]
            prefix = "PIC"
            extensions = ["heic", "jpg"]

            [filters.exclude]
            filenames = ["cover.jpg"]
            patterns = ["*_edited.*"]
            "#,
        )
        .unwrap();
        let compiled = config.compile().unwrap();

        assert_eq!(compiled.prefix(), "PIC");
        assert!(compiled.has_image_extension(Path::new("dir/a.heic")));
        assert!(!compiled.has_image_extension(Path::new("dir/a.png")));
        assert!(compiled.is_canonical_name("PIC_20200101_000000.heic"));
        assert!(!compiled.is_canonical_name("IMG_20200101_000000.heic"));
        assert!(compiled.is_excluded("cover.jpg"));
        assert!(compiled.is_excluded("beach_edited.jpg"));
        assert!(!compiled.is_excluded("beach.jpg"));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = RenameConfig::from_toml("[naming\nprefix = ");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let mut config = RenameConfig::default();
        config.naming.prefix = String::new();
        assert!(matches!(
            config.compile(),
            Err(ConfigError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_prefix_with_separator_rejected() {
        let mut config = RenameConfig::default();
        config.naming.prefix = "IMG/".to_string();
        assert!(config.compile().is_err());
    }

    #[test]
    fn test_empty_extension_list_rejected() {
        let mut config = RenameConfig::default();
        config.naming.extensions.clear();
        assert!(config.compile().is_err());
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let mut config = RenameConfig::default();
        config.filters.exclude.patterns = vec!["[invalid".to_string()];
        assert!(matches!(
            config.compile(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_extension_with_dot_rejected() {
        let mut config = RenameConfig::default();
        config.naming.extensions = vec!["tar.png".to_string()];
        assert!(matches!(
            config.compile(),
            Err(ConfigError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_extensions_stay_case_sensitive() {
        let mut config = RenameConfig::default();
        config.naming.extensions = vec!["JPG".to_string()];
        let compiled = config.compile().unwrap();

        assert!(compiled.has_image_extension(Path::new("a.JPG")));
        assert!(!compiled.has_image_extension(Path::new("a.jpg")));
    }

    #[test]
    fn test_missing_config_file() {
        let result = RenameConfig::load(Some(Path::new("/non/existent/imgstamp.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }
}
