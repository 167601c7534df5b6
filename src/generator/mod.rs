//! Event generation: picks one catalog entry per cycle and stamps it with
//! the producer's service identity and base metadata.

pub mod catalog;

pub use catalog::{Catalog, CatalogEntry, CatalogError};

use crate::domain::{LogEvent, ProducerError};
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub service_name: String,
    /// Value of the `env` metadata tag. Left out of the metadata when empty.
    pub environment: String,
    /// Extra static annotations attached to every event.
    pub metadata: HashMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            service_name: "rask-demo-service".to_string(),
            environment: "production".to_string(),
            metadata: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventGenerator {
    service: String,
    base_metadata: HashMap<String, String>,
    catalog: Catalog,
}

impl EventGenerator {
    pub fn new(config: GeneratorConfig, catalog: Catalog) -> Result<Self, ProducerError> {
        let service = config.service_name.trim().to_string();
        if service.is_empty() {
            return Err(ProducerError::EmptyService);
        }

        let mut base_metadata = config.metadata;
        if !config.environment.is_empty() {
            base_metadata.insert("env".to_string(), config.environment);
        }

        Ok(Self {
            service,
            base_metadata,
            catalog,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn generate(&self) -> LogEvent {
        self.generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> LogEvent {
        let entry = self.catalog.pick(rng);

        let mut metadata = self.base_metadata.clone();
        metadata.extend(
            entry
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        LogEvent::from_parts(
            self.service.clone(),
            entry.level,
            entry.message.clone(),
            metadata,
        )
    }
}
