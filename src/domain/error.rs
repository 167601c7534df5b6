use thiserror::Error;

/// Top-level error for the producer's start-up path.
///
/// Delivery faults never show up here; they are folded into
/// `DeliveryResult::Failed` at the sender boundary.
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::app::ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::generator::CatalogError),

    #[error("Client error: {0}")]
    Client(#[from] crate::sender::ClientError),

    #[error("Logging error: {0}")]
    Logging(#[from] crate::app::LoggingError),

    #[error("Service name must not be empty")]
    EmptyService,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LoggingError;

    #[test]
    fn test_logging_error_converts() {
        let err: ProducerError =
            LoggingError::AlreadyInitialized("subscriber set".to_string()).into();
        assert!(matches!(err, ProducerError::Logging(_)));
        assert!(err.to_string().starts_with("Logging error:"));
    }

    #[test]
    fn test_empty_service_display() {
        assert_eq!(
            ProducerError::EmptyService.to_string(),
            "Service name must not be empty"
        );
    }
}
