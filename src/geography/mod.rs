//! Country and state lists used to validate employee locations.
//!
//! The directory only depends on [`GeographyProvider`]. The bundled
//! implementation is [`WorldCitiesDataset`], read from a local JSON file;
//! [`LocationData`] wraps any provider with a loading/error state.

pub mod dataset;
pub mod location;

pub use dataset::WorldCitiesDataset;
pub use location::{LocationData, LocationStatus};

/// Source of country and state names.
///
/// Both lists are sorted and free of duplicates. Implementations degrade to
/// an empty list when a lookup fails.
pub trait GeographyProvider {
    fn countries(&self) -> Vec<String>;

    /// States of `country`; empty for unknown countries.
    fn states(&self, country: &str) -> Vec<String>;
}
