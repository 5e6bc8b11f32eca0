use std::{path::PathBuf, time::Duration};

use clap::Args;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API URL '{url}': {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}

/// Runtime settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Base URL of the registration service
    #[arg(long, env = "REGISTRO_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "REGISTRO_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Directory holding the session file
    #[arg(long, env = "REGISTRO_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.api_url.trim()).map_err(|e| ConfigError::InvalidApiUrl {
            url: self.api_url.clone(),
            source: e,
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::UnsupportedScheme(self.api_url.clone())),
        }
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("registro")
        })
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir().join(SESSION_FILE_NAME)
    }
}
