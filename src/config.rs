use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub moviegraph: MovieGraphConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

/// Data store and logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MovieGraphConfig {
    /// SQLite file holding the movie/person records the graph is built from.
    pub db_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in MOVIEGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = std::env::var("MOVIEGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&config_str)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.moviegraph.db_path.as_os_str().is_empty() {
            anyhow::bail!("moviegraph.db_path must not be empty");
        }

        if self.http_server.port == 0 {
            anyhow::bail!("http_server.port must be greater than 0");
        }

        Ok(())
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.moviegraph.db_path
    }
}
