//! Loading state for country and state lists.

use crate::geography::GeographyProvider;

/// Progress of the geography lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Country and state lists together with their loading state.
///
/// Until a provider is installed with [`ready`](Self::ready), every list is
/// empty. A failed lookup behaves the same way and keeps the reason for
/// display.
pub struct LocationData {
    status: LocationStatus,
    provider: Option<Box<dyn GeographyProvider + Send>>,
}

impl LocationData {
    #[must_use]
    pub fn loading() -> Self {
        Self {
            status: LocationStatus::Loading,
            provider: None,
        }
    }

    #[must_use]
    pub fn ready(provider: impl GeographyProvider + Send + 'static) -> Self {
        Self {
            status: LocationStatus::Ready,
            provider: Some(Box::new(provider)),
        }
    }

    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(reason = %reason, "geography lookup failed");
        Self {
            status: LocationStatus::Failed(reason),
            provider: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> &LocationStatus {
        &self.status
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == LocationStatus::Loading
    }

    /// States for the selected country; empty when no country is selected.
    #[must_use]
    pub fn states_for(&self, country: Option<&str>) -> Vec<String> {
        match country.map(str::trim) {
            Some(country) if !country.is_empty() => self.states(country),
            _ => Vec::new(),
        }
    }
}

impl GeographyProvider for LocationData {
    fn countries(&self) -> Vec<String> {
        self.provider.as_ref().map(|p| p.countries()).unwrap_or_default()
    }

    fn states(&self, country: &str) -> Vec<String> {
        self.provider.as_ref().map(|p| p.states(country)).unwrap_or_default()
    }
}

impl std::fmt::Debug for LocationData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationData")
            .field("status", &self.status)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::WorldCitiesDataset;

    fn dataset() -> WorldCitiesDataset {
        WorldCitiesDataset::from_json(
            r#"[{"country": "Canada", "name": "Toronto", "subcountry": "Ontario"},
                {"country": "Canada", "name": "Halifax", "subcountry": "Nova Scotia"}]"#,
        )
        .unwrap()
    }

    #[test]
    fn loading_and_failed_lists_are_empty() {
        let loading = LocationData::loading();
        assert!(loading.is_loading());
        assert!(loading.countries().is_empty());

        let failed = LocationData::failed("offline");
        assert_eq!(failed.status(), &LocationStatus::Failed("offline".into()));
        assert!(failed.states_for(Some("Canada")).is_empty());
    }

    #[test]
    fn ready_lists_come_from_provider() {
        let data = LocationData::ready(dataset());
        assert_eq!(data.status(), &LocationStatus::Ready);
        assert_eq!(data.countries(), ["Canada"]);
        assert_eq!(data.states_for(Some("Canada")), ["Nova Scotia", "Ontario"]);
    }

    #[test]
    fn no_selected_country_means_no_states() {
        let data = LocationData::ready(dataset());
        assert!(data.states_for(None).is_empty());
        assert!(data.states_for(Some("  ")).is_empty());
    }
}
