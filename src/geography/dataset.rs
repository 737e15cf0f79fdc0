//! Local geography provider backed by a world-cities JSON file.
//!
//! The file is an array of city records:
//!
//! ```json
//! [{ "country": "Canada", "name": "Toronto", "subcountry": "Ontario" }]
//! ```
//!
//! Countries are the distinct `country` values. The states of a country are
//! the distinct non-empty `subcountry` values of its cities.

use crate::domain::error::{DirectoryError, Result};
use crate::geography::GeographyProvider;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CityRecord {
    country: String,
    #[serde(default)]
    subcountry: Option<String>,
}

/// Country → states index built from city records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldCitiesDataset {
    states_by_country: BTreeMap<String, BTreeSet<String>>,
}

impl WorldCitiesDataset {
    /// Parses the dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Config`] if the text is not an array of city
    /// records.
    pub fn from_json(text: &str) -> Result<Self> {
        let records: Vec<CityRecord> = serde_json::from_str(text)
            .map_err(|e| DirectoryError::Config(format!("invalid world cities dataset: {e}")))?;

        let mut states_by_country: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in records {
            let states = states_by_country.entry(record.country).or_default();
            if let Some(state) = record.subcountry.filter(|s| !s.trim().is_empty()) {
                states.insert(state);
            }
        }

        tracing::debug!(country_count = states_by_country.len(), "world cities dataset indexed");
        Ok(Self { states_by_country })
    }

    /// Reads and parses the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Io`] if the file cannot be read and
    /// [`DirectoryError::Config`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let _span = tracing::debug_span!("load_world_cities", path = %path.display()).entered();
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states_by_country.is_empty()
    }
}

impl GeographyProvider for WorldCitiesDataset {
    fn countries(&self) -> Vec<String> {
        self.states_by_country.keys().cloned().collect()
    }

    fn states(&self, country: &str) -> Vec<String> {
        self.states_by_country
            .get(country)
            .map(|states| states.iter().cloned().collect())
            .unwrap_or_default()
    }
}
