use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::{ensure_in_range, ensure_positive, NutritionError, NutritionResult};

pub const FALLBACK_FOOD_ENV_VAR: &str = "NUTRI_FALLBACK_FOOD";
pub const MAX_DETECTED_FOODS_ENV_VAR: &str = "NUTRI_MAX_DETECTED_FOODS";
pub const DEFAULT_PORTION_ENV_VAR: &str = "NUTRI_DEFAULT_PORTION_GRAMS";
pub const PORTION_CONFIDENCE_ENV_VAR: &str = "NUTRI_PORTION_CONFIDENCE";
pub const FOOD_CATEGORIES_ENV_VAR: &str = "NUTRI_FOOD_CATEGORIES";
pub const WINDOW_DAYS_ENV_VAR: &str = "NUTRI_WINDOW_DAYS";
pub const CONSISTENCY_BASIS_ENV_VAR: &str = "NUTRI_CONSISTENCY_BASIS";
pub const ON_TRACK_TOLERANCE_ENV_VAR: &str = "NUTRI_ON_TRACK_TOLERANCE";

/// What the consistency sub-score counts towards its 7-per-window target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyBasis {
    /// Every log entry counts, so several meals on one day add up.
    Entries,
    /// Only distinct calendar days (UTC) with at least one entry count.
    DistinctDays,
}

impl FromStr for ConsistencyBasis {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entries" => Ok(ConsistencyBasis::Entries),
            "distinct_days" | "days" => Ok(ConsistencyBasis::DistinctDays),
            other => Err(NutritionError::invalid(
                CONSISTENCY_BASIS_ENV_VAR,
                format!("expected 'entries' or 'distinct_days', got '{}'", other),
            )),
        }
    }
}

/// Replaceable policies of the engine. `Default` reproduces the reference behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub fallback_food: String,
    pub max_detected_foods: usize,
    pub default_portion_grams: f64,
    pub portion_unit: String,
    pub portion_confidence: f64,
    pub food_categories: Vec<String>,
    pub window_days: i64,
    pub consistency_basis: ConsistencyBasis,
    /// Fraction of the calorie requirement a day may deviate by and stay on track.
    pub on_track_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_food: "rice".to_string(),
            max_detected_foods: 5,
            default_portion_grams: 150.0,
            portion_unit: "grams".to_string(),
            portion_confidence: 0.7,
            food_categories: ["Food", "Dish", "Meal", "Cuisine"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            window_days: 7,
            consistency_basis: ConsistencyBasis::Entries,
            on_track_tolerance: 0.1,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> NutritionResult<Option<T>> {
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| NutritionError::invalid(var, format!("could not parse '{}'", raw))),
        None => Ok(None),
    }
}

impl EngineConfig {
    /// Applies any `NUTRI_*` process environment overrides on top of the defaults.
    /// Expects `.env` to have been loaded by the caller.
    pub fn from_env() -> NutritionResult<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> NutritionResult<Self> {
        let mut config = Self::default();

        if let Some(food) = lookup(FALLBACK_FOOD_ENV_VAR) {
            config.fallback_food = food.trim().to_lowercase();
        }
        if let Some(max) = parse_var::<usize>(&lookup, MAX_DETECTED_FOODS_ENV_VAR)? {
            config.max_detected_foods = max;
        }
        if let Some(grams) = parse_var::<f64>(&lookup, DEFAULT_PORTION_ENV_VAR)? {
            config.default_portion_grams = grams;
        }
        if let Some(confidence) = parse_var::<f64>(&lookup, PORTION_CONFIDENCE_ENV_VAR)? {
            config.portion_confidence = confidence;
        }
        if let Some(categories) = lookup(FOOD_CATEGORIES_ENV_VAR) {
            config.food_categories = categories
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
        if let Some(days) = parse_var::<i64>(&lookup, WINDOW_DAYS_ENV_VAR)? {
            config.window_days = days;
        }
        if let Some(basis) = parse_var::<ConsistencyBasis>(&lookup, CONSISTENCY_BASIS_ENV_VAR)? {
            config.consistency_basis = basis;
        }
        if let Some(tolerance) = parse_var::<f64>(&lookup, ON_TRACK_TOLERANCE_ENV_VAR)? {
            config.on_track_tolerance = tolerance;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NutritionResult<()> {
        if self.fallback_food.trim().is_empty() {
            return Err(NutritionError::invalid("fallback_food", "must not be empty"));
        }
        if self.max_detected_foods == 0 {
            return Err(NutritionError::invalid("max_detected_foods", "must be at least 1"));
        }
        ensure_positive("default_portion_grams", self.default_portion_grams)?;
        ensure_in_range("portion_confidence", self.portion_confidence, 0.0, 1.0)?;
        if self.food_categories.is_empty() {
            return Err(NutritionError::invalid("food_categories", "must name at least one category"));
        }
        if self.window_days <= 0 {
            return Err(NutritionError::invalid("window_days", "must be at least 1"));
        }
        ensure_in_range("on_track_tolerance", self.on_track_tolerance, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_matches_reference_policies() {
        let config = EngineConfig::default();
        assert_eq!(config.fallback_food, "rice");
        assert_eq!(config.max_detected_foods, 5);
        assert_eq!(config.default_portion_grams, 150.0);
        assert_eq!(config.portion_confidence, 0.7);
        assert_eq!(config.food_categories, vec!["Food", "Dish", "Meal", "Cuisine"]);
        assert_eq!(config.window_days, 7);
        assert_eq!(config.consistency_basis, ConsistencyBasis::Entries);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_consistency_basis_parsing() {
        assert_eq!("entries".parse::<ConsistencyBasis>(), Ok(ConsistencyBasis::Entries));
        assert_eq!(" Distinct_Days ".parse::<ConsistencyBasis>(), Ok(ConsistencyBasis::DistinctDays));
        assert!("weekly".parse::<ConsistencyBasis>().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_policies() {
        let mut config = EngineConfig::default();
        config.portion_confidence = 1.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.max_detected_foods = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.food_categories.clear();
        assert!(config.validate().is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_from_lookup_without_overrides_is_default() {
        assert_eq!(EngineConfig::from_lookup(vars(&[])).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_from_lookup_applies_overrides() {
        let config = EngineConfig::from_lookup(vars(&[
            (MAX_DETECTED_FOODS_ENV_VAR, " 3 "),
            (CONSISTENCY_BASIS_ENV_VAR, "distinct_days"),
            (FALLBACK_FOOD_ENV_VAR, "Pasta"),
            (FOOD_CATEGORIES_ENV_VAR, "Food, Snack,,"),
        ]))
        .unwrap();
        assert_eq!(config.max_detected_foods, 3);
        assert_eq!(config.consistency_basis, ConsistencyBasis::DistinctDays);
        assert_eq!(config.fallback_food, "pasta");
        assert_eq!(config.food_categories, vec!["Food", "Snack"]);
    }

    #[test]
    fn test_from_lookup_rejects_unparsable_or_invalid_values() {
        match EngineConfig::from_lookup(vars(&[(MAX_DETECTED_FOODS_ENV_VAR, "many")])) {
            Err(NutritionError::InvalidInput { field, .. }) => assert_eq!(field, MAX_DETECTED_FOODS_ENV_VAR),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert!(EngineConfig::from_lookup(vars(&[(WINDOW_DAYS_ENV_VAR, "0")])).is_err());
    }
}
