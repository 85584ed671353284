//! Runtime configuration for the settings service.
//!
//! Every value has a compile-time default and can be overridden at runtime
//! through a dedicated environment variable:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SITECMS_DATA_DIR` | `$HOME/.config/sitecms/data`, else `./data` |
//! | `SITECMS_DATABASE_PATH` | `<data dir>/settings.db` |
//! | `SITECMS_LOG_DIR` | unset: log to stderr |
//! | `SITECMS_MAX_CONNECTIONS` | `5` |

use std::path::PathBuf;

const DEFAULT_CONFIG_DIR: &str = ".config/sitecms/data";
const DEV_DATA_DIR: &str = "./data";
const DATABASE_FILE_NAME: &str = "settings.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Get the data directory for persistence.
///
/// Priority:
/// 1. `SITECMS_DATA_DIR` env variable if set
/// 2. `$HOME/.config/sitecms/data` if HOME is set
/// 3. `./data` as fallback
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SITECMS_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// Get the SQLite database file.
///
/// Priority:
/// 1. `SITECMS_DATABASE_PATH` env variable if set
/// 2. `settings.db` inside [`get_data_dir`]
pub fn get_database_path() -> PathBuf {
    if let Ok(path) = std::env::var("SITECMS_DATABASE_PATH") {
        return PathBuf::from(path);
    }

    get_data_dir().join(DATABASE_FILE_NAME)
}

/// Directory for daily-rolling log files, if file logging is wanted.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("SITECMS_LOG_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
}

/// Get the connection pool size.
///
/// Priority:
/// 1. `SITECMS_MAX_CONNECTIONS` env variable if set (falls back to the default
///    if the value cannot be parsed as a `u32` or is zero)
/// 2. `5` as fallback
pub fn get_max_connections() -> u32 {
    if let Ok(value) = std::env::var("SITECMS_MAX_CONNECTIONS") {
        return parse_max_connections(&value);
    }

    DEFAULT_MAX_CONNECTIONS
}

fn parse_max_connections(value: &str) -> u32 {
    match value.trim().parse() {
        Ok(0) | Err(_) => DEFAULT_MAX_CONNECTIONS,
        Ok(n) => n,
    }
}
