//! Filesystem locations for directory data, exports and configuration.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "staff-directory";

/// Directory used when the platform has no local data directory.
pub const FALLBACK_DATA_DIR: &str = ".staff-directory";

/// Returns the directory holding the persisted envelope and trace files.
///
/// This is the platform's local data directory (for example
/// `~/.local/share/staff-directory` on Linux), or `.staff-directory` relative
/// to the working directory when none is known.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from(FALLBACK_DATA_DIR), |dir| dir.join(APP_DIR))
}

/// Returns the directory CSV exports are written to: the user's download
/// directory if known, else `data_dir`.
#[must_use]
pub fn default_export_dir(data_dir: &Path) -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| data_dir.to_path_buf())
}

/// Returns the default configuration file, `staff-directory/config.toml` in
/// the platform config directory.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a tilde, and all paths when the home directory is unknown,
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use staff_directory::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/srv/staff"), PathBuf::from("/srv/staff"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
