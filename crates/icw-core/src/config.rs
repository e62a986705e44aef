//! YAML configuration loading.
//!
//! The configuration file lives at `~/.config/icw/config.yaml` by
//! default and must at least name the directory containing the todo
//! list directories. Everything else has working defaults.
//!
//! ```yaml
//! lists_dir: ~/todo
//! date_format: "%Y-%m-%d"
//! reports:
//!   default:
//!     columns: summary,due,categories,status,list
//!     constraint: status:needs-action
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::dates::expand_prefix;

/// Errors raised while loading or querying the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("unable to read configuration file {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid YAML.
    #[error("configuration file {path} is not a valid YAML file: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A report name matched no or several configured reports.
    #[error("unknown or ambiguous report name \"{name}\", known reports are {}", .known.join(", "))]
    UnknownReport {
        /// The requested report name or prefix.
        name: String,
        /// All configured report names.
        known: Vec<String>,
    },

    /// The user configuration directory could not be determined.
    #[error("unable to determine the user configuration directory")]
    NoConfigDir,
}

/// Input syntax settings consumed by the date expression engine, the
/// constraint filter engine and the property assignment decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    /// strftime-style format for absolute dates.
    pub date_format: String,
    /// strftime-style format for absolute date-times.
    pub datetime_format: String,
    /// Fixed-width time format for `@time` suffixes on relative dates.
    pub relative_time_format: String,
    /// Character separating a relative date from its time suffix.
    pub relative_time_separator: char,
    /// Prefix marking a category include token.
    pub category_include_prefix: char,
    /// Prefix marking a category exclude token.
    pub category_exclude_prefix: char,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            datetime_format: "%Y-%m-%dT%H:%M".to_string(),
            relative_time_format: "%H:%M".to_string(),
            relative_time_separator: '@',
            category_include_prefix: '+',
            category_exclude_prefix: '_',
        }
    }
}

/// A report definition: which columns to print and which constraints to
/// apply implicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Comma-separated property names to show as columns.
    pub columns: String,
    /// Constraint tokens (whitespace-separated) appended to the ones
    /// given on the command line.
    #[serde(default)]
    pub constraint: Option<String>,
    /// Maximum number of rows to print.
    #[serde(default)]
    pub max_list_length: Option<usize>,
    /// Maximum column width; longer cells are truncated.
    #[serde(default)]
    pub max_column_width: Option<usize>,
}

/// The icw configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory containing one subdirectory per todo list.
    pub lists_dir: PathBuf,

    #[serde(default = "defaults::date_format")]
    pub date_format: String,

    #[serde(default = "defaults::datetime_format")]
    pub datetime_format: String,

    #[serde(default = "defaults::relative_time_format")]
    pub relative_time_format: String,

    #[serde(default = "defaults::relative_time_separator")]
    pub relative_time_separator: char,

    #[serde(default = "defaults::category_include_prefix")]
    pub category_include_prefix: char,

    #[serde(default = "defaults::category_exclude_prefix")]
    pub category_exclude_prefix: char,

    /// Comma-separated property order for the `show` command.
    #[serde(default = "defaults::info_columns")]
    pub info_columns: String,

    /// Report definitions by name.
    #[serde(default = "defaults::reports")]
    pub reports: BTreeMap<String, ReportConfig>,
}

mod defaults {
    use super::ReportConfig;
    use std::collections::BTreeMap;

    pub fn date_format() -> String {
        "%Y-%m-%d".to_string()
    }

    pub fn datetime_format() -> String {
        "%Y-%m-%dT%H:%M".to_string()
    }

    pub fn relative_time_format() -> String {
        "%H:%M".to_string()
    }

    pub fn relative_time_separator() -> char {
        '@'
    }

    pub fn category_include_prefix() -> char {
        '+'
    }

    pub fn category_exclude_prefix() -> char {
        '_'
    }

    pub fn info_columns() -> String {
        "id,uid,list,summary,description,categories,status,due,dtstart,dtend,\
         priority,percent-complete"
            .to_string()
    }

    pub fn reports() -> BTreeMap<String, ReportConfig> {
        let mut reports = BTreeMap::new();
        reports.insert(
            "default".to_string(),
            ReportConfig {
                columns: "id,summary,due,categories,status,list".to_string(),
                constraint: None,
                max_list_length: None,
                max_column_width: None,
            },
        );
        reports
    }
}

impl Config {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the default configuration file path
    /// (`<user config dir>/icw/config.yaml`).
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", "icw").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Returns the input syntax settings.
    pub fn syntax(&self) -> Syntax {
        Syntax {
            date_format: self.date_format.clone(),
            datetime_format: self.datetime_format.clone(),
            relative_time_format: self.relative_time_format.clone(),
            relative_time_separator: self.relative_time_separator,
            category_include_prefix: self.category_include_prefix,
            category_exclude_prefix: self.category_exclude_prefix,
        }
    }

    /// Resolves a report name or unambiguous prefix to its definition.
    pub fn report(&self, name: &str) -> Result<(&str, &ReportConfig), ConfigError> {
        let known: Vec<&str> = self.reports.keys().map(String::as_str).collect();
        let full = expand_prefix(name, known.iter().copied()).ok_or_else(|| {
            ConfigError::UnknownReport {
                name: name.to_string(),
                known: known.iter().map(|s| s.to_string()).collect(),
            }
        })?;
        // The key is known to be present after prefix expansion.
        match self.reports.get_key_value(full) {
            Some((key, report)) => Ok((key.as_str(), report)),
            None => Err(ConfigError::UnknownReport {
                name: name.to_string(),
                known: known.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let file = write_config("lists_dir: /tmp/lists\n");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.lists_dir, PathBuf::from("/tmp/lists"));
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.category_include_prefix, '+');
        assert!(config.reports.contains_key("default"));
    }

    #[test]
    fn report_lookup_by_prefix() {
        let file = write_config(
            "lists_dir: /tmp/lists\n\
             reports:\n\
             \x20 overdue:\n\
             \x20   columns: summary,due\n\
             \x20   constraint: due.before:today\n",
        );
        let config = Config::load(file.path()).unwrap();
        let (name, report) = config.report("ov").unwrap();
        assert_eq!(name, "overdue");
        assert_eq!(report.constraint.as_deref(), Some("due.before:today"));

        assert!(matches!(
            config.report("missing"),
            Err(ConfigError::UnknownReport { .. })
        ));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let file = write_config("lists_dir: [unclosed\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
