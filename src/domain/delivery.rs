use std::time::Duration;
use thiserror::Error;

/// A transport-level failure that prevented any response from arriving.
///
/// The `Display` output is the human-readable description written to the
/// local report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryFault {
    #[error("request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("could not encode event: {0}")]
    Encode(String),
}

/// Outcome of one delivery attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// A response arrived. The status is reported as-is, including 4xx/5xx.
    Delivered { status: u16, latency: Duration },
    /// No response was obtained.
    Failed(DeliveryFault),
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryResult::Delivered { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryResult::Delivered { status, .. } => Some(*status),
            DeliveryResult::Failed(_) => None,
        }
    }

    pub fn fault(&self) -> Option<&DeliveryFault> {
        match self {
            DeliveryResult::Delivered { .. } => None,
            DeliveryResult::Failed(fault) => Some(fault),
        }
    }
}
