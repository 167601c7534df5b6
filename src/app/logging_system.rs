use super::config::{LogFormat, TracingLevel};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid filter '{filter}': {details}")]
    InvalidFilter { filter: String, details: String },
    #[error("Failed to set global tracing subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Noisy HTTP stack targets capped below the producer's own level.
const DEFAULT_DIRECTIVES: &[(&str, &str)] = &[
    ("hyper", "warn"),
    ("reqwest", "warn"),
    ("h2", "warn"),
];

/// Builds the filter string: default level, library caps, then `RUST_LOG`
/// overrides (later directives win).
pub fn build_filter_string(level: TracingLevel, overrides: Option<&str>) -> String {
    let mut parts = Vec::with_capacity(DEFAULT_DIRECTIVES.len() + 2);
    parts.push(level.as_str().to_string());
    for (target, target_level) in DEFAULT_DIRECTIVES {
        parts.push(format!("{target}={target_level}"));
    }
    if let Some(overrides) = overrides.map(str::trim).filter(|o| !o.is_empty()) {
        parts.push(overrides.to_string());
    }
    parts.join(",")
}

/// Installs the global subscriber. Diagnostics go to stderr so stdout only
/// carries the per-cycle report lines.
pub fn init_tracing(level: TracingLevel, format: LogFormat) -> Result<(), LoggingError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter_string = build_filter_string(level, rust_log.as_deref());

    let env_filter =
        EnvFilter::try_new(&filter_string).map_err(|e| LoggingError::InvalidFilter {
            filter: filter_string.clone(),
            details: e.to_string(),
        })?;

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_string_without_overrides() {
        assert_eq!(
            build_filter_string(TracingLevel::Info, None),
            "info,hyper=warn,reqwest=warn,h2=warn"
        );
    }

    #[test]
    fn test_filter_string_appends_overrides() {
        let filter = build_filter_string(TracingLevel::Debug, Some("reqwest=debug"));
        assert!(filter.starts_with("debug,"));
        assert!(filter.ends_with(",reqwest=debug"));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        assert_eq!(
            build_filter_string(TracingLevel::Warn, Some("  ")),
            build_filter_string(TracingLevel::Warn, None)
        );
    }

    #[test]
    fn test_filter_string_is_accepted_by_env_filter() {
        let filter = build_filter_string(TracingLevel::Trace, Some("rask_log_producer=debug"));
        assert!(EnvFilter::try_new(filter).is_ok());
    }
}
