//! Staff directory: employees and grade levels with local persistence.
//!
//! The crate keeps two record collections, employees and grade levels, in a
//! single versioned JSON envelope. It offers:
//! - An [`EntityStore`](store::EntityStore) that validates, assigns ids,
//!   writes every mutation through to storage and notifies subscribers
//! - A pure query engine for search, department filter, stable sorting and
//!   pagination
//! - CSV export of the filtered and sorted employee list
//! - Schema migrations from older persisted formats
//! - A list-view controller that turns user events into store actions and
//!   view models

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← List-view controller
//! │  - Event handling, actions, view models             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Query (query/)│   │ Store (store/)│   │ UI (ui/)      │
//! │ - Filter/sort │   │ - Mutations   │   │ - View models │
//! │ - Paginate    │   │ - Listeners   │   │               │
//! │ - CSV export  │   │ - Load status │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage (storage/)                                 │
//! │  - Key/value backends (JSON files, memory)          │
//! │  - Envelope format and migrations                   │
//! └─────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Geography & Infrastructure                 │
//! │  - Records, validation, errors (domain/)            │
//! │  - Country and state lists (geography/)             │
//! │  - Platform paths (infrastructure/)                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! A TOML file, all keys optional:
//!
//! ```toml
//! data_dir = "~/.local/share/staff-directory"
//! storage_key = "staff-storage"
//! page_size = 10
//! trace_level = "debug"
//! geography_dataset = "~/datasets/world-cities.json"
//! export_dir = "~/Downloads"
//! ```
//!
//! # Example
//!
//! ```
//! use staff_directory::domain::EmployeeInput;
//! use staff_directory::query::{self, EmployeeQuery};
//! use staff_directory::{open_store, Config};
//!
//! let dir = tempfile::tempdir()?;
//! let config = Config { data_dir: dir.path().to_path_buf(), ..Config::default() };
//!
//! let mut store = open_store(&config)?;
//! store.add_employee(EmployeeInput {
//!     full_name: "Ada Lovelace".into(),
//!     email: "ada@example.com".into(),
//!     phone_number: "+44 20 7946 0000".into(),
//!     country: "United Kingdom".into(),
//!     state: "England".into(),
//!     address: "12 St James's Square".into(),
//!     role: "Analyst".into(),
//!     department: "R&D".into(),
//!     grade_level: None,
//! })?;
//!
//! let snapshot = store.snapshot();
//! let page = query::run(snapshot.employees, &EmployeeQuery { search_term: "ada".into(), ..EmployeeQuery::default() });
//! assert_eq!(page.total_count, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod domain;
pub mod geography;
pub mod infrastructure;
pub mod observability;
pub mod query;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{DirectoryError, Result};

use crate::geography::{LocationData, WorldCitiesDataset};
use crate::infrastructure::paths;
use crate::storage::JsonFileStorage;
use crate::store::EntityStore;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Storage key of the persisted envelope.
pub const DEFAULT_STORAGE_KEY: &str = "staff-storage";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the persisted envelope and trace files.
    ///
    /// Default: [`paths::default_data_dir`].
    pub data_dir: PathBuf,

    /// Key the envelope is stored under. Default: `"staff-storage"`
    pub storage_key: String,

    /// Employees per page. Default: 10
    pub page_size: usize,

    /// `EnvFilter` directive for exported spans. Default: `"info"`
    pub trace_level: Option<String>,

    /// Local world-cities JSON file backing the country and state lists.
    pub geography_dataset: Option<PathBuf>,

    /// Where CSV exports are written. Default: [`paths::default_export_dir`].
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: paths::default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            page_size: query::DEFAULT_PAGE_SIZE,
            trace_level: None,
            geography_dataset: None,
            export_dir: None,
        }
    }
}

impl Config {
    /// Builds a configuration from a string map.
    ///
    /// Unknown keys are ignored. Values that fail to parse, blank values and
    /// a zero `page_size` fall back to the defaults. Paths may start with `~`.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use staff_directory::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "25".to_string());
    /// map.insert("storage_key".to_string(), "hr".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 25);
    /// assert_eq!(config.storage_key, "hr");
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| map.get(key).map(|s| s.trim()).filter(|s| !s.is_empty());
        let defaults = Self::default();

        Self {
            data_dir: value("data_dir").map_or(defaults.data_dir, paths::expand_tilde),
            storage_key: value("storage_key").map_or(defaults.storage_key, String::from),
            page_size: value("page_size")
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.page_size),
            trace_level: value("trace_level").map(String::from),
            geography_dataset: value("geography_dataset").map(paths::expand_tilde),
            export_dir: value("export_dir").map(paths::expand_tilde),
        }
    }

    /// Parses a TOML configuration. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Config`] for invalid TOML, unknown keys,
    /// mistyped values or a zero `page_size`.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| DirectoryError::Config(format!("invalid configuration: {e}")))?;
        if config.page_size == 0 {
            return Err(DirectoryError::Config("page_size must be at least 1".to_string()));
        }
        Ok(config.with_expanded_paths())
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Io`] if the file cannot be read, otherwise
    /// as [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self> {
        let _span = tracing::debug_span!("load_config", path = %path.display()).entered();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Loads the platform configuration file if there is one, else defaults.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(path) = paths::default_config_file().filter(|p| p.exists()) else {
            return Self::default();
        };
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unusable configuration file");
            Self::default()
        })
    }

    /// Directory CSV exports are written to.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| paths::default_export_dir(&self.data_dir))
    }

    fn with_expanded_paths(self) -> Self {
        let expand = |p: PathBuf| match p.to_str() {
            Some(s) => paths::expand_tilde(s),
            None => p,
        };
        Self {
            data_dir: expand(self.data_dir),
            geography_dataset: self.geography_dataset.map(expand),
            export_dir: self.export_dir.map(expand),
            ..self
        }
    }
}

/// Opens the entity store persisted as JSON files in `config.data_dir`.
///
/// Loading never fails on bad data; inspect
/// [`EntityStore::load_status`] for what was found.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn open_store(config: &Config) -> Result<EntityStore> {
    let storage = JsonFileStorage::new(config.data_dir.clone())?;
    Ok(EntityStore::open(Box::new(storage), config.storage_key.clone()))
}

/// Creates the list-view state for `config`.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(page_size = config.page_size, "initializing staff directory");
    AppState::new(config.page_size)
}

/// Loads the country and state lists from the configured dataset.
///
/// Without a configured dataset the lists are ready but empty.
#[must_use]
pub fn load_geography(config: &Config) -> LocationData {
    let Some(path) = config.geography_dataset.as_deref() else {
        return LocationData::ready(WorldCitiesDataset::default());
    };
    match WorldCitiesDataset::load(path) {
        Ok(dataset) => LocationData::ready(dataset),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to load world cities dataset");
            LocationData::failed(e.to_string())
        }
    }
}
