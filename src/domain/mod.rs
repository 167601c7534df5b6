//! Domain layer for rask-log-producer.
//!
//! Contains the canonical types shared across all modules:
//! - `LogEvent`: The event emitted once per cycle
//! - `LogLevel`: Event severity (Debug/Info/Warn/Error)
//! - `DeliveryResult` / `DeliveryFault`: Outcome of one send attempt
//! - `ProducerError`: Top-level start-up error type

pub mod delivery;
pub mod error;
pub mod log_event;
pub mod log_level;

pub use delivery::{DeliveryFault, DeliveryResult};
pub use error::ProducerError;
pub use log_event::LogEvent;
pub use log_level::LogLevel;
