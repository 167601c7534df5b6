use crate::domain::LogLevel;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog must contain at least one event")]
    Empty,
    #[error("Catalog entry {index} has an empty message")]
    EmptyMessage { index: usize },
    #[error("Catalog entry {index} has a control character in its message")]
    ControlCharacter { index: usize },
    #[error("Catalog entry {index} ('{message}') has weight 0")]
    ZeroWeight { index: usize, message: String },
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

fn default_weight() -> u32 {
    1
}

/// One representative event the generator can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Relative selection weight. Equal weights give uniform selection.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Layered over the generator's base metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CatalogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            weight: default_weight(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    events: Vec<CatalogEntry>,
}

/// A fixed, non-empty set of weighted events.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    // Running sum of weights, parallel to `entries`.
    cumulative: Vec<u64>,
    total_weight: u64,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, entry) in entries.iter().enumerate() {
            if entry.message.trim().is_empty() {
                return Err(CatalogError::EmptyMessage { index });
            }
            // Report lines are one line per attempt.
            if entry.message.chars().any(char::is_control) {
                return Err(CatalogError::ControlCharacter { index });
            }
            if entry.weight == 0 {
                return Err(CatalogError::ZeroWeight {
                    index,
                    message: entry.message.clone(),
                });
            }
        }

        Ok(Self::index(entries))
    }

    /// Parses a catalog from TOML made of `[[events]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.events)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn index(entries: Vec<CatalogEntry>) -> Self {
        let mut cumulative = Vec::with_capacity(entries.len());
        let mut total_weight = 0u64;
        for entry in &entries {
            total_weight += u64::from(entry.weight);
            cumulative.push(total_weight);
        }

        Self {
            entries,
            cumulative,
            total_weight,
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks an entry with probability `weight / total_weight`.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &CatalogEntry {
        let roll = rng.random_range(0..self.total_weight);
        let index = self
            .cumulative
            .partition_point(|&bound| bound <= roll)
            .min(self.entries.len() - 1);
        &self.entries[index]
    }

    /// Expected share of each level, derived from the weights.
    pub fn level_distribution(&self) -> HashMap<LogLevel, f64> {
        let mut distribution = HashMap::new();
        for entry in &self.entries {
            *distribution.entry(entry.level).or_insert(0.0) +=
                f64::from(entry.weight) / self.total_weight as f64;
        }
        distribution
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::index(vec![
            CatalogEntry::new(LogLevel::Info, "User login successful"),
            CatalogEntry::new(LogLevel::Info, "Page view: /dashboard"),
            CatalogEntry::new(LogLevel::Warn, "API response slow (1.2s)"),
            CatalogEntry::new(LogLevel::Error, "Database connection timeout"),
            CatalogEntry::new(LogLevel::Debug, "Variable x = 42"),
        ])
    }
}
