use std::time::Duration;

use crate::core::config::data::Config;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/chat";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_THEME: &str = "dark";

/// Environment variable that overrides the configured endpoint.
pub const ENDPOINT_ENV: &str = "PARLANCE_ENDPOINT";

impl Config {
    pub fn endpoint_or_default(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS).max(1))
    }

    /// `None` when the timeout is disabled with `0`.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
        {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn theme_or_default(&self) -> &str {
        self.theme.as_deref().unwrap_or(DEFAULT_THEME)
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    pub fn syntax_enabled(&self) -> bool {
        self.syntax.unwrap_or(true)
    }
}

/// Values supplied on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub tick_interval_ms: Option<u64>,
    pub theme: Option<String>,
    pub no_markdown: bool,
    pub no_syntax: bool,
}

/// Effective settings after layering CLI, environment, file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub tick_interval: Duration,
    pub request_timeout: Option<Duration>,
    pub theme: String,
    pub markdown: bool,
    pub syntax: bool,
}

impl Settings {
    /// `env_endpoint` is the value of [`ENDPOINT_ENV`], if set.
    pub fn resolve(config: &Config, overrides: &Overrides, env_endpoint: Option<String>) -> Self {
        let endpoint = overrides
            .endpoint
            .clone()
            .or_else(|| env_endpoint.filter(|value| !value.trim().is_empty()))
            .unwrap_or_else(|| config.endpoint_or_default().to_string());

        let tick_interval = match overrides.tick_interval_ms {
            Some(ms) => Duration::from_millis(ms.max(1)),
            None => config.tick_interval(),
        };

        let theme = overrides
            .theme
            .clone()
            .unwrap_or_else(|| config.theme_or_default().to_string());

        Self {
            endpoint,
            tick_interval,
            request_timeout: config.request_timeout(),
            theme,
            markdown: !overrides.no_markdown && config.markdown_enabled(),
            syntax: !overrides.no_syntax && config.syntax_enabled(),
        }
    }

    pub fn from_env(config: &Config, overrides: &Overrides) -> Self {
        Self::resolve(config, overrides, std::env::var(ENDPOINT_ENV).ok())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&Config::default(), &Overrides::default(), None)
    }
}
