pub mod client;
pub mod delivery;
pub mod report;

pub use client::{ClientConfig, ClientError, DeliveryStats, HttpClient, StatsSnapshot};
pub use delivery::DeliveryClient;
pub use report::{MemorySink, ReportSink, StdoutSink, format_report};
