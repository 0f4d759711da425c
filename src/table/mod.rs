pub mod data_loader;

pub use data_loader::load_nutrition_table;

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{ensure_finite, ensure_positive, NutritionError, NutritionResult};
use crate::models::{round_half_up, FoodIdentity, MacroNutrients, NutritionBaseline, NutritionSummary};

pub const DEFAULT_FALLBACK_FOOD: &str = "rice";

/// Reference rows: (name, kcal, protein, carbohydrates, fats, fiber) per 100 g.
const BUILTIN_FOODS: &[(&str, f64, f64, f64, f64, f64)] = &[
    ("rice", 130.0, 2.7, 28.0, 0.3, 0.4),
    ("chicken", 165.0, 31.0, 0.0, 3.6, 0.0),
    ("bread", 265.0, 9.0, 49.0, 3.2, 2.7),
    ("egg", 155.0, 13.0, 1.1, 11.0, 0.0),
    ("banana", 89.0, 1.1, 23.0, 0.3, 2.6),
    ("apple", 52.0, 0.3, 14.0, 0.2, 2.4),
    ("milk", 42.0, 3.4, 5.0, 1.0, 0.0),
    ("potato", 77.0, 2.0, 17.0, 0.1, 2.2),
    ("fish", 206.0, 22.0, 0.0, 12.0, 0.0),
    ("pasta", 131.0, 5.0, 25.0, 1.1, 1.8),
];

impl NutritionBaseline {
    /// Nutrition for `portion_amount` units: calories to the nearest integer,
    /// each macro to one decimal place.
    pub fn scale(&self, portion_amount: f64) -> NutritionResult<NutritionSummary> {
        ensure_positive("portionAmount", portion_amount)?;
        let multiplier = portion_amount / 100.0;
        let summary = NutritionSummary {
            calories: round_half_up(self.calories_per_100 * multiplier),
            macros: self.macros_per_100.scaled(multiplier),
        };
        ensure_finite("calories", summary.calories)?;
        ensure_finite("protein", summary.macros.protein)?;
        ensure_finite("carbohydrates", summary.macros.carbohydrates)?;
        ensure_finite("fats", summary.macros.fats)?;
        ensure_finite("fiber", summary.macros.fiber)?;
        Ok(summary)
    }
}

/// Immutable food -> baseline mapping. Lookups never fail: unknown identities
/// resolve to the fallback entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionTable {
    entries: HashMap<FoodIdentity, NutritionBaseline>,
    fallback: FoodIdentity,
}

impl NutritionTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN_FOODS
            .iter()
            .map(|&(name, calories, protein, carbohydrates, fats, fiber)| {
                (
                    FoodIdentity::new(name),
                    NutritionBaseline {
                        calories_per_100: calories,
                        macros_per_100: MacroNutrients { protein, carbohydrates, fats, fiber },
                    },
                )
            })
            .collect();
        NutritionTable {
            entries,
            fallback: FoodIdentity::new(DEFAULT_FALLBACK_FOOD),
        }
    }

    /// Builds a table from arbitrary entries. The fallback identity must be one of them.
    pub fn from_entries(
        entries: HashMap<FoodIdentity, NutritionBaseline>,
        fallback: &str,
    ) -> NutritionResult<Self> {
        let table = NutritionTable {
            entries,
            fallback: FoodIdentity::new(DEFAULT_FALLBACK_FOOD),
        };
        table.with_fallback(fallback)
    }

    pub fn with_fallback(mut self, fallback: &str) -> NutritionResult<Self> {
        let identity = FoodIdentity::new(fallback);
        if !self.entries.contains_key(&identity) {
            return Err(NutritionError::TableLoad(format!(
                "fallback food '{}' is not in the nutrition table",
                identity
            )));
        }
        self.fallback = identity;
        Ok(self)
    }

    pub fn fallback(&self) -> &FoodIdentity {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&FoodIdentity::new(name))
    }

    /// Case-insensitive lookup with fallback.
    pub fn lookup(&self, name: &str) -> &NutritionBaseline {
        let identity = FoodIdentity::new(name);
        match self.entries.get(&identity) {
            Some(baseline) => baseline,
            None => {
                warn!(food = %identity, fallback = %self.fallback, "unknown food, using fallback baseline");
                &self.entries[&self.fallback]
            }
        }
    }

    pub fn nutrition_for(&self, name: &str, portion_grams: f64) -> NutritionResult<NutritionSummary> {
        let summary = self.lookup(name).scale(portion_grams)?;
        debug!(food = name, portion_grams, calories = summary.calories, "scaled nutrition");
        Ok(summary)
    }
}

impl Default for NutritionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
