//! Suite configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Credentials;

/// Environment variable overriding `ui.base_url`
pub const ENV_UI_BASE_URL: &str = "CHALLENGE_UI_BASE_URL";
/// Environment variable overriding `api.base_url`
pub const ENV_API_BASE_URL: &str = "CHALLENGE_API_BASE_URL";
/// Environment variable overriding `ui.headless` (`0`/`false` to show the browser)
pub const ENV_HEADLESS: &str = "CHALLENGE_HEADLESS";

/// Top-level configuration for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Directory holding `ui.yaml` and `api.yaml`; built-in fixtures are used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures_dir: Option<PathBuf>,

    /// Storefront / browser settings
    pub ui: UiConfig,

    /// Booking API settings
    pub api: ApiConfig,

    /// Runner behaviour (retries, workers, artifacts)
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(Error::InvalidConfig(format!("unknown browser: {}", other))),
        }
    }
}

/// Storefront and browser-engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub base_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Engine default timeout for actions (click, fill, ...)
    pub action_timeout_ms: u64,

    /// Engine default timeout for auto-retrying expectations
    pub expect_timeout_ms: u64,

    /// `node_modules` directory the bridge resolves `playwright` from
    pub node_path: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.saucedemo.com".to_string(),
            browser: BrowserKind::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            action_timeout_ms: 30_000,
            expect_timeout_ms: 5_000,
            node_path: PathBuf::from("node_modules"),
        }
    }
}

/// How an authenticated API session presents its token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Cookie: token=<token>`
    #[default]
    Cookie,
    /// `Authorization: Bearer <token>`
    Bearer,
}

/// Booking API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub auth_scheme: AuthScheme,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://restful-booker.herokuapp.com".to_string(),
            username: "admin".to_string(),
            password: "password123".to_string(),
            auth_scheme: AuthScheme::Cookie,
        }
    }
}

impl ApiConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Whole-scenario retries after a failure
    pub retries: u32,

    /// Scenarios executed concurrently; each owns its own browser
    pub workers: usize,

    /// Results, reports, screenshots and videos land here
    pub output_dir: PathBuf,

    /// Capture a full-page screenshot when an attempt fails
    pub screenshot_on_failure: bool,

    /// Record video and keep it only for failed attempts
    pub video_on_failure: bool,

    /// Write `report.html` next to the JSON results
    pub html_report: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            retries: 1,
            workers: 1,
            output_dir: PathBuf::from("test-results"),
            screenshot_on_failure: true,
            video_on_failure: true,
            html_report: true,
        }
    }
}

impl SuiteConfig {
    /// Load configuration from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            debug!("Loaded configuration from {}", path.display());
            config
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `CHALLENGE_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_UI_BASE_URL) {
            self.ui.base_url = url;
        }
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api.base_url = url;
        }
        if let Some(headless) = lookup(ENV_HEADLESS) {
            self.ui.headless = !matches!(headless.as_str(), "0" | "false" | "no");
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("ui.base_url", &self.ui.base_url), ("api.base_url", &self.api.base_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidConfig(format!("{} must be an http(s) URL: {}", name, url)));
            }
        }
        if self.runner.workers == 0 {
            return Err(Error::InvalidConfig("runner.workers must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.runner.output_dir.join("screenshots")
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.runner.output_dir.join("videos")
    }
}
