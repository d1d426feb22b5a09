//! Paths inside the Zellij plugin sandbox.
//!
//! The host filesystem is visible under `/host`, which maps to the directory
//! Zellij was started from (usually the user's home). Configured dataset and
//! export paths are written the way the user sees them and mapped here.

use std::path::PathBuf;

/// Directory for Tabula's own files, such as trace output.
///
/// ```
/// use tabula::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/tabula"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("tabula")
}

/// Maps `~` to the sandbox's `/host`.
///
/// ```
/// use tabula::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/data/users.json"), "/host/data/users.json");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/data/users.json"), "/data/users.json");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

/// Removes the `/host` prefix for display.
///
/// ```
/// use tabula::infrastructure::strip_host_prefix;
///
/// assert_eq!(strip_host_prefix("/host/data/users.json"), "~/data/users.json");
/// assert_eq!(strip_host_prefix("/data/users.json"), "/data/users.json");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    path.strip_prefix("/host")
        .map_or_else(|| path.to_string(), |rest| format!("~{rest}"))
}
