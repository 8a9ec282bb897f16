//! Startup configuration from the environment

use std::path::PathBuf;

/// Overrides the data directory (database and log file)
pub const DATA_DIR_ENV: &str = "LINGOLINK_DATA_DIR";

/// Path to a word bank file to use instead of the embedded one
pub const WORDS_ENV: &str = "LINGOLINK_WORDS";

/// Log filter directive, e.g. `debug` or `lingolink=trace`
pub const LOG_ENV: &str = "LINGOLINK_LOG";

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "lingolink.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` means the OS-standard data directory
    pub data_dir: Option<PathBuf>,
    /// `None` means the embedded word bank
    pub word_bank: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            word_bank: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from),
            word_bank: get(WORDS_ENV).map(PathBuf::from),
            log_filter: get(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}
