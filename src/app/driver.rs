use crate::domain::DeliveryResult;
use crate::generator::EventGenerator;
use crate::sender::{DeliveryClient, StatsSnapshot};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Fixed pause after each cycle.
    pub interval: Duration,
    /// `None` runs until the token is cancelled.
    pub max_cycles: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_cycles: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub cycles: u64,
    pub stats: StatsSnapshot,
}

/// Runs generate → deliver → report, then sleeps, one cycle at a time.
#[derive(Debug, Clone)]
pub struct CycleDriver {
    generator: EventGenerator,
    client: DeliveryClient,
    config: DriverConfig,
}

impl CycleDriver {
    pub fn new(generator: EventGenerator, client: DeliveryClient, config: DriverConfig) -> Self {
        Self {
            generator,
            client,
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// One cycle without the trailing sleep.
    pub async fn run_cycle(&self) -> DeliveryResult {
        let event = self.generator.generate();
        self.client.deliver(&event).await
    }

    /// Loops until `cancel` fires or `max_cycles` is reached.
    ///
    /// Cancellation is observed before each cycle and during the sleep; an
    /// in-flight delivery is only cut short by its own timeout.
    pub async fn run(&self, cancel: CancellationToken) -> CycleSummary {
        info!(
            "Starting cycle driver (service={}, endpoint={}, interval={:?}, max_cycles={:?})",
            self.generator.service(),
            self.client.endpoint(),
            self.config.interval,
            self.config.max_cycles
        );

        let mut cycles = 0u64;
        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.run_cycle().await;
            cycles += 1;

            if self.config.max_cycles.is_some_and(|max| cycles >= max) {
                info!("Reached max cycles ({}), stopping", cycles);
                break;
            }

            tokio::select! {
                () = cancel.cancelled() => {
                    info!("Cancellation received, stopping cycle driver");
                    break;
                }
                () = tokio::time::sleep(self.config.interval) => {}
            }
        }

        let stats = self.client.stats();
        info!(
            "Cycle driver stopped after {} cycles ({} delivered, {} non-2xx, {} failed)",
            cycles, stats.delivered, stats.rejected, stats.failed
        );

        CycleSummary { cycles, stats }
    }
}
