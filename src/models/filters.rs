use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Sentinel meaning "unconstrained" for every single-choice filter.
pub const ANY: &str = "Any";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Any,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Any => "Any",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Difficulty::Any)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn any() -> String {
    ANY.to_string()
}

/// Structured trek constraints plus the free-text fort request.
///
/// Set-valued fields are `BTreeSet`s so that two requests selecting the same
/// regions in a different order serialize to the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryFilters {
    #[serde(default)]
    pub forts_list: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub regions: BTreeSet<String>,
    #[serde(default = "any")]
    pub proximity: String,
    #[serde(default = "any")]
    pub mountain_range: String,
    #[serde(default = "any")]
    pub trek_duration: String,
    #[serde(default)]
    pub trail_types: BTreeSet<String>,
    #[serde(default = "any")]
    pub historical_significance: String,
    #[serde(default = "any")]
    pub fort_type: String,
    #[serde(default)]
    pub key_features: BTreeSet<String>,
}

impl Default for ItineraryFilters {
    fn default() -> Self {
        Self {
            forts_list: String::new(),
            difficulty: Difficulty::Any,
            regions: BTreeSet::new(),
            proximity: any(),
            mountain_range: any(),
            trek_duration: any(),
            trail_types: BTreeSet::new(),
            historical_significance: any(),
            fort_type: any(),
            key_features: BTreeSet::new(),
        }
    }
}

impl ItineraryFilters {
    /// Returns a copy with the free-text field replaced.
    pub fn with_forts_list(&self, forts_list: impl Into<String>) -> Self {
        Self {
            forts_list: forts_list.into(),
            ..self.clone()
        }
    }

    /// Deterministic serialization used to identify equivalent requests.
    pub fn cache_key(&self) -> String {
        // Plain strings, enums and string sets: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    pub fn has_forts(&self) -> bool {
        !self.forts_list.trim().is_empty()
    }
}

pub fn is_unconstrained(value: &str) -> bool {
    value == ANY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unconstrained() {
        let filters = ItineraryFilters::default();
        assert!(filters.difficulty.is_any());
        assert!(is_unconstrained(&filters.proximity));
        assert!(is_unconstrained(&filters.fort_type));
        assert!(filters.regions.is_empty());
        assert!(!filters.has_forts());
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let filters: ItineraryFilters =
            serde_json::from_str(r#"{"fortsList": "Raigad", "difficulty": "Hard"}"#).unwrap();
        assert_eq!(filters.forts_list, "Raigad");
        assert_eq!(filters.difficulty, Difficulty::Hard);
        assert_eq!(filters.mountain_range, ANY);
        assert!(filters.key_features.is_empty());
    }

    #[test]
    fn test_cache_key_differs_by_difficulty() {
        let easy = ItineraryFilters {
            forts_list: "Raigad".to_string(),
            difficulty: Difficulty::Easy,
            ..Default::default()
        };
        let hard = ItineraryFilters {
            difficulty: Difficulty::Hard,
            ..easy.clone()
        };
        assert_ne!(easy.cache_key(), hard.cache_key());
    }

    #[test]
    fn test_cache_key_ignores_region_order() {
        let a: ItineraryFilters =
            serde_json::from_str(r#"{"regions": ["Pune", "Satara"]}"#).unwrap();
        let b: ItineraryFilters =
            serde_json::from_str(r#"{"regions": ["Satara", "Pune", "Pune"]}"#).unwrap();
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_with_forts_list_leaves_original_untouched() {
        let original = ItineraryFilters {
            forts_list: "<b>Torna</b>".to_string(),
            ..Default::default()
        };
        let sanitized = original.with_forts_list("bTorna/b");
        assert_eq!(original.forts_list, "<b>Torna</b>");
        assert_eq!(sanitized.forts_list, "bTorna/b");
    }
}
