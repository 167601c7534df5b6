use super::client::{ClientConfig, ClientError, DeliveryStats, HttpClient, StatsSnapshot};
use super::report::{ReportSink, StdoutSink, format_report};
use crate::domain::{DeliveryFault, DeliveryResult, LogEvent};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Posts one event per call and reports the outcome.
///
/// `deliver` is infallible by construction: every transport fault is folded
/// into `DeliveryResult::Failed`, and a received response is always
/// `DeliveryResult::Delivered` whatever its status.
#[derive(Clone)]
pub struct DeliveryClient {
    client: HttpClient,
    sink: Arc<dyn ReportSink>,
    stats: Arc<DeliveryStats>,
}

impl DeliveryClient {
    pub fn new(config: ClientConfig, sink: Arc<dyn ReportSink>) -> Result<Self, ClientError> {
        Ok(Self::from_client(HttpClient::new(config)?, sink))
    }

    pub fn with_stdout(config: ClientConfig) -> Result<Self, ClientError> {
        Self::new(config, Arc::new(StdoutSink))
    }

    pub fn from_client(client: HttpClient, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            client,
            sink,
            stats: Arc::new(DeliveryStats::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Sends the event, records the attempt and writes one report line.
    pub async fn deliver(&self, event: &LogEvent) -> DeliveryResult {
        let result = self.send(event).await;

        match &result {
            DeliveryResult::Delivered { status, latency } => {
                self.stats.record_response(*status);
                if (200..300).contains(status) {
                    info!(
                        event_level = %event.level(),
                        status = *status,
                        latency_ms = latency.as_millis() as u64,
                        "Delivered event: {}",
                        event.message()
                    );
                } else {
                    warn!(
                        event_level = %event.level(),
                        status = *status,
                        latency_ms = latency.as_millis() as u64,
                        "Ingestion endpoint answered with non-success status: {}",
                        event.message()
                    );
                }
            }
            DeliveryResult::Failed(fault) => {
                self.stats.record_fault();
                warn!(
                    event_level = %event.level(),
                    endpoint = %self.client.endpoint(),
                    "Failed to deliver event: {}",
                    fault
                );
            }
        }

        self.sink.write_line(&format_report(event, &result));
        result
    }

    /// Performs the HTTP exchange without recording or reporting it.
    pub async fn send(&self, event: &LogEvent) -> DeliveryResult {
        let budget = self.client.timeout();
        let start = Instant::now();

        let body = match serde_json::to_vec(event) {
            Ok(body) => body,
            Err(e) => return DeliveryResult::Failed(DeliveryFault::Encode(e.to_string())),
        };

        debug!(
            "Posting {} bytes to {} (timeout {:?})",
            body.len(),
            self.client.endpoint(),
            budget
        );

        let request = self
            .client
            .client
            .post(self.client.endpoint_url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .timeout(budget)
            .body(body);

        match timeout(budget, request.send()).await {
            Err(_) => DeliveryResult::Failed(DeliveryFault::Timeout { after: budget }),
            Ok(Err(e)) => DeliveryResult::Failed(classify_fault(&e, budget)),
            Ok(Ok(response)) => DeliveryResult::Delivered {
                status: response.status().as_u16(),
                latency: start.elapsed(),
            },
        }
    }
}

impl std::fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryClient")
            .field("client", &self.client)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

fn classify_fault(error: &reqwest::Error, budget: std::time::Duration) -> DeliveryFault {
    if error.is_timeout() {
        DeliveryFault::Timeout { after: budget }
    } else if error.is_connect() {
        DeliveryFault::Connect(describe(error))
    } else {
        DeliveryFault::Request(describe(error))
    }
}

// reqwest's top-level message hides the cause (DNS, refused, TLS); append the chain.
fn describe(error: &reqwest::Error) -> String {
    let mut description = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}
