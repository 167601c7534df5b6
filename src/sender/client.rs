use reqwest::{Client, ClientBuilder};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    /// Upper bound for the whole request, connect included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/ingest".to_string(),
            timeout: Duration::from_millis(500),
            connect_timeout: Duration::from_millis(500),
            user_agent: format!("rask-log-producer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client` and the parsed
/// ingestion URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    pub client: Client,
    pub config: ClientConfig,
    pub endpoint_url: Url,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let endpoint_url: Url = config.endpoint.parse().map_err(|e| {
            ClientError::InvalidConfiguration(format!(
                "Invalid endpoint URL '{}': {}",
                config.endpoint, e
            ))
        })?;

        if !matches!(endpoint_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfiguration(format!(
                "Unsupported endpoint scheme '{}'",
                endpoint_url.scheme()
            )));
        }

        if config.timeout.is_zero() {
            return Err(ClientError::InvalidConfiguration(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        // The connect phase never gets more time than the whole request.
        let connect_timeout = config.connect_timeout.min(config.timeout);

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            endpoint_url,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }
}

/// Attempt counters. Purely observational: nothing reads them to decide how
/// the next attempt behaves.
#[derive(Debug, Default)]
pub struct DeliveryStats {
    attempts: AtomicU64,
    delivered: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub attempts: u64,
    /// Attempts that got any HTTP response.
    pub delivered: u64,
    /// Subset of `delivered` whose status was not 2xx.
    pub rejected: u64,
    pub failed: u64,
}

impl DeliveryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_response(&self, status: u16) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.delivered.fetch_add(1, Ordering::Relaxed);
        if !(200..300).contains(&status) {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_fault(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
