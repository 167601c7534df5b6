pub mod config;
pub mod driver;
pub mod logging_system;
pub mod shutdown;

pub use config::{Config, ConfigError, LogFormat, TracingLevel};
pub use driver::{CycleDriver, CycleSummary, DriverConfig};
pub use logging_system::{LoggingError, init_tracing};
pub use shutdown::spawn_signal_listener;

use crate::domain::ProducerError;
use crate::generator::{Catalog, EventGenerator};
use crate::sender::{DeliveryClient, ReportSink, StdoutSink};
use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct App {
    config: Config,
    driver: CycleDriver,
}

impl App {
    pub fn from_args<I, T>(args: I) -> Result<Self, ProducerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args_and_env(args)?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, ProducerError> {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    /// Wires generator, client and driver, sending report lines to `sink`.
    pub fn with_sink(config: Config, sink: Arc<dyn ReportSink>) -> Result<Self, ProducerError> {
        let catalog = match &config.catalog_file {
            Some(path) => {
                info!("Loading event catalog from {}", path.display());
                Catalog::from_file(path)?
            }
            None => Catalog::default(),
        };

        let generator = EventGenerator::new(config.generator_config()?, catalog)?;
        let client = DeliveryClient::new(config.client_config(), sink)?;
        let driver = CycleDriver::new(generator, client, config.driver_config());

        Ok(Self { config, driver })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn driver(&self) -> &CycleDriver {
        &self.driver
    }

    /// Runs until SIGINT/SIGTERM or `max_cycles`.
    pub async fn run(self) -> CycleSummary {
        let cancel = CancellationToken::new();
        let listener = spawn_signal_listener(cancel.clone());

        info!("rask-log-producer is running. Press Ctrl+C to stop.");
        let summary = self.driver.run(cancel.clone()).await;

        cancel.cancel();
        if let Err(e) = listener.await {
            error!("Signal listener task failed: {}", e);
        }

        info!("rask-log-producer stopped.");
        summary
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the application
pub async fn main() -> anyhow::Result<()> {
    let config = match Config::from_args_and_env(std::env::args_os()) {
        Ok(config) => config,
        // --help, --version and usage errors print themselves and exit.
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => return Err(e).context("invalid configuration"),
    };

    init_tracing(config.log_level, config.log_format)
        .map_err(ProducerError::from)
        .context("failed to initialise logging")?;

    info!("Starting rask-log-producer v{}", get_version());
    if let Some(config_file) = &config.config_file {
        info!("Loaded configuration from file: {}", config_file.display());
    }
    info!(
        "Configuration: service={}, endpoint={}, interval_ms={}, timeout_ms={}",
        config.service_name, config.endpoint, config.interval_ms, config.timeout_ms
    );

    let app = App::from_config(config).context("failed to start rask-log-producer")?;
    app.run().await;
    Ok(())
}
