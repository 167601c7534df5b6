use super::error::ProducerError;
use super::log_level::LogLevel;
use serde::Serialize;
use std::collections::HashMap;

/// A single log event as it is posted to the ingestion endpoint.
///
/// Serializes to exactly `service`, `level`, `message` and `metadata`.
/// Fields are private so an event cannot change between generation and
/// delivery; `metadata` is always an object on the wire, never `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    service: String,
    level: LogLevel,
    message: String,
    metadata: HashMap<String, String>,
}

impl LogEvent {
    /// Builds an event, rejecting an empty service identity.
    pub fn new(
        service: impl Into<String>,
        level: LogLevel,
        message: impl Into<String>,
        metadata: HashMap<String, String>,
    ) -> Result<Self, ProducerError> {
        let service = service.into();
        if service.trim().is_empty() {
            return Err(ProducerError::EmptyService);
        }

        Ok(Self::from_parts(service, level, message.into(), metadata))
    }

    // Callers guarantee a non-empty service (the generator validates it once at construction).
    pub(crate) fn from_parts(
        service: String,
        level: LogLevel,
        message: String,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            service,
            level,
            message,
            metadata,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}
