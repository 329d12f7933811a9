// Eternal History platform abstraction
// Resolves where settings and the history database live on each OS.
//
// Uses `cfg(target_os)` to select the platform implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory on every platform.
pub const DATA_DIR_ENV: &str = "ETERNAL_HISTORY_DATA_DIR";

/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "eternal-history.db";

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/eternal-history` (or `$XDG_CONFIG_HOME/eternal-history`)
/// - **macOS**: `~/Library/Application Support/EternalHistory`
/// - **Windows**: `%APPDATA%/EternalHistory`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the directory holding the history database.
///
/// `$ETERNAL_HISTORY_DATA_DIR` wins when set; otherwise the platform default.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// Full path of the history database file.
pub fn get_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE_NAME)
}
