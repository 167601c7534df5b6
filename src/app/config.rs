use crate::app::driver::DriverConfig;
use crate::generator::GeneratorConfig;
use crate::sender::ClientConfig;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid metadata entry '{0}', expected key=value")]
    InvalidMetadata(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

/// Verbosity of the producer's own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl TracingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TracingLevel::Error => "error",
            TracingLevel::Warn => "warn",
            TracingLevel::Info => "info",
            TracingLevel::Debug => "debug",
            TracingLevel::Trace => "trace",
        }
    }
}

impl From<TracingLevel> for tracing::Level {
    fn from(level: TracingLevel) -> Self {
        match level {
            TracingLevel::Error => tracing::Level::ERROR,
            TracingLevel::Warn => tracing::Level::WARN,
            TracingLevel::Info => tracing::Level::INFO,
            TracingLevel::Debug => tracing::Level::DEBUG,
            TracingLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Ingestion endpoint URL
    #[arg(long, env = "LOGSTREAM_URL", default_value = "http://localhost:8080/ingest")]
    pub endpoint: String,

    /// Service identity stamped on every event
    #[arg(long, env = "SERVICE_NAME", default_value = "rask-demo-service")]
    pub service_name: String,

    /// Value of the `env` metadata tag (empty to omit it)
    #[arg(long, env = "LOGSTREAM_ENV", default_value = "production")]
    pub environment: String,

    /// Extra static metadata, repeatable: --metadata region=us-east-1
    #[arg(long = "metadata", value_name = "KEY=VALUE")]
    pub metadata: Vec<String>,

    /// Pause between cycles in milliseconds
    #[arg(long, env = "EMIT_INTERVAL_MS", default_value = "2000")]
    pub interval_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "500")]
    pub timeout_ms: u64,

    /// Stop after this many cycles (runs until signalled when unset)
    #[arg(long, env = "MAX_CYCLES")]
    pub max_cycles: Option<u64>,

    /// TOML file with `[[events]]` replacing the built-in catalog
    #[arg(long, env = "CATALOG_FILE")]
    pub catalog_file: Option<PathBuf>,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: TracingLevel,

    /// Diagnostics output format
    #[arg(long, env = "RUST_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub interval: Duration,

    #[serde(skip)]
    #[arg(skip)]
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/ingest".to_string(),
            service_name: "rask-demo-service".to_string(),
            environment: "production".to_string(),
            metadata: Vec::new(),
            interval_ms: 2000,
            timeout_ms: 500,
            max_cycles: None,
            catalog_file: None,
            config_file: None,
            log_level: TracingLevel::Info,
            log_format: LogFormat::Pretty,
            interval: Duration::from_millis(2000),
            timeout: Duration::from_millis(500),
        }
    }
}

impl Config {
    /// Parses CLI args (clap also reads the `env` fallbacks). A
    /// `--config-file` replaces everything else and is kept in `config_file`.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::try_parse_from(args)?;

        if let Some(config_file) = config.config_file.clone() {
            let mut loaded = Self::from_file(&config_file)?;
            loaded.config_file = Some(config_file);
            return Ok(loaded);
        }

        config.post_process();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.post_process();
        config.validate()?;
        Ok(config)
    }

    pub fn post_process(&mut self) {
        self.interval = Duration::from_millis(self.interval_ms);
        self.timeout = Duration::from_millis(self.timeout_ms);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid endpoint URL '{}': {}", self.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.service_name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Service name must not be empty".to_string(),
            ));
        }

        if self.interval_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Interval must be greater than 0".to_string(),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_cycles == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "Max cycles must be greater than 0 when set".to_string(),
            ));
        }

        self.metadata_map()?;
        Ok(())
    }

    /// Parses the repeated `key=value` metadata arguments.
    pub fn metadata_map(&self) -> Result<HashMap<String, String>, ConfigError> {
        self.metadata
            .iter()
            .map(|raw| parse_key_value(raw))
            .collect()
    }

    pub fn generator_config(&self) -> Result<GeneratorConfig, ConfigError> {
        Ok(GeneratorConfig {
            service_name: self.service_name.clone(),
            environment: self.environment.clone(),
            metadata: self.metadata_map()?,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            timeout: self.timeout,
            connect_timeout: self.timeout,
            ..ClientConfig::default()
        }
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            interval: self.interval,
            max_cycles: self.max_cycles,
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), ConfigError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(ConfigError::InvalidMetadata(raw.to_string()));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::InvalidMetadata(raw.to_string()));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
