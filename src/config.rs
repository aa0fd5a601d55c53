//! Runtime configuration: built-in defaults, an optional YAML file, then CLI flags.
//!
//! ```yaml
//! api_url: http://localhost:8000
//! default_category: technology
//! policy: latest-request
//! retries: 2
//! timeout_secs: 20
//! color: false
//! date_format: "%d %b %Y"
//! ```
//!
//! Every key is optional. A flag given on the command line (or through its
//! environment variable) wins over the file.

use crate::cli::Cli;
use crate::render::DEFAULT_DATE_FORMAT;
use crate::view::{ApplyPolicy, DEFAULT_CATEGORY};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid date format {format:?}")]
    InvalidDateFormat { format: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the News API.
    pub api_url: String,
    /// Category selected at startup.
    pub default_category: String,
    /// How out-of-order search responses are applied.
    pub policy: ApplyPolicy,
    /// Extra attempts per failed request. `0` disables retrying.
    pub retries: usize,
    /// Per-request timeout; absent means wait indefinitely.
    pub timeout_secs: Option<u64>,
    /// Colour sentiment badges with ANSI escapes.
    pub color: bool,
    /// `chrono` format string for publish dates.
    pub date_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            policy: ApplyPolicy::default(),
            retries: 0,
            timeout_secs: None,
            color: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml(&yaml, path)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Defaults, overlaid with the config file named by `--config`, overlaid with flags.
    pub async fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    /// Reject values that would only fail later, mid-render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat {
                format: self.date_format.clone(),
            });
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(category) = &cli.category {
            self.default_category = category.clone();
        }
        if let Some(policy) = cli.policy {
            self.policy = policy;
        }
        if let Some(retries) = cli.retries {
            self.retries = retries;
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = Some(secs);
        }
        if cli.no_color {
            self.color = false;
        }
        if let Some(format) = &cli.date_format {
            self.date_format = format.clone();
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
