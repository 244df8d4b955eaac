//! In-memory lookup provider backed by a JSON array of load records.
//!
//! Used for offline CLI runs (`--fixture loads.json`) and tests. Records are
//! keyed by normalized reference, so "qf-98765" finds "QF-98765".

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::processor::extract::normalize_reference;
use crate::types::{LoadRecord, LookupOutcome};

use super::LoadLookupProvider;

#[derive(Debug, Clone, Default)]
pub struct FixtureLookupProvider {
    records: HashMap<String, LoadRecord>,
}

impl FixtureLookupProvider {
    /// Later records win when two normalize to the same key.
    pub fn from_records(records: Vec<LoadRecord>) -> Self {
        let records = records
            .into_iter()
            .filter_map(|record| {
                let key = normalize_reference(&record.reference);
                if key.is_empty() {
                    log::debug!("fixture: skipping record with empty reference");
                    return None;
                }
                Some((key, record))
            })
            .collect();
        Self { records }
    }

    /// Load records from a JSON array file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<LoadRecord> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let provider = Self::from_records(records);
        if provider.is_empty() {
            log::warn!("fixture: {} has no usable load records", path.display());
        } else {
            log::info!(
                "fixture: loaded {} load records from {}",
                provider.len(),
                path.display()
            );
        }
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LoadLookupProvider for FixtureLookupProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn lookup(&self, reference: &str, _timeout: Duration) -> LookupOutcome {
        match self.records.get(&normalize_reference(reference)) {
            Some(record) => LookupOutcome::Success {
                data: record.clone(),
            },
            None => LookupOutcome::NotFound,
        }
    }
}
