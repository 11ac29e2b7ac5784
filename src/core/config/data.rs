use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `config.toml`. Every key is optional; see
/// [`crate::core::config::defaults`] for what an absent key means.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// URL the chat request is posted to
    pub endpoint: Option<String>,
    /// Delay between revealed words, in milliseconds
    pub tick_interval_ms: Option<u64>,
    /// Give up on the chat service after this many seconds (0 disables)
    pub request_timeout_secs: Option<u64>,
    /// UI theme name ("dark", "light", "monochrome")
    pub theme: Option<String>,
    /// Render assistant replies as markdown
    pub markdown: Option<bool>,
    /// Highlight fenced code blocks when markdown is enabled
    pub syntax: Option<bool>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
