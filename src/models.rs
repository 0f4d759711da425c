use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

use crate::error::{ensure_in_range, ensure_non_negative, ensure_positive, NutritionResult};

/// Rounds half-way cases towards positive infinity, so 247.5 -> 248.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Same rounding as `round_half_up`, kept to one decimal place.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Normalized lowercase food name, used as the nutrition table key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodIdentity(String);

impl FoodIdentity {
    pub fn new(name: &str) -> Self {
        FoodIdentity(name.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grams of each macronutrient. Always handled as a complete record.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct MacroNutrients {
    pub protein: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: f64,
}

impl MacroNutrients {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn scaled(&self, multiplier: f64) -> Self {
        MacroNutrients {
            protein: round_one_decimal(self.protein * multiplier),
            carbohydrates: round_one_decimal(self.carbohydrates * multiplier),
            fats: round_one_decimal(self.fats * multiplier),
            fiber: round_one_decimal(self.fiber * multiplier),
        }
    }

    pub fn validate(&self, field: &str) -> NutritionResult<()> {
        ensure_non_negative(&format!("{}.protein", field), self.protein)?;
        ensure_non_negative(&format!("{}.carbohydrates", field), self.carbohydrates)?;
        ensure_non_negative(&format!("{}.fats", field), self.fats)?;
        ensure_non_negative(&format!("{}.fiber", field), self.fiber)
    }
}

impl Add for MacroNutrients {
    type Output = MacroNutrients;

    fn add(self, other: MacroNutrients) -> MacroNutrients {
        MacroNutrients {
            protein: self.protein + other.protein,
            carbohydrates: self.carbohydrates + other.carbohydrates,
            fats: self.fats + other.fats,
            fiber: self.fiber + other.fiber,
        }
    }
}

/// Reference values for 100 mass units of one food.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionBaseline {
    pub calories_per_100: f64,
    pub macros_per_100: MacroNutrients,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct NutritionSummary {
    pub calories: f64,
    pub macros: MacroNutrients,
}

impl NutritionSummary {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn validate(&self, field: &str) -> NutritionResult<()> {
        ensure_non_negative(&format!("{}.calories", field), self.calories)?;
        self.macros.validate(&format!("{}.macros", field))
    }
}

impl Add for NutritionSummary {
    type Output = NutritionSummary;

    fn add(self, other: NutritionSummary) -> NutritionSummary {
        NutritionSummary {
            calories: self.calories + other.calories,
            macros: self.macros + other.macros,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PortionEstimate {
    pub amount: f64,
    pub unit: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFood {
    /// Label as reported by the labeling service.
    pub name: String,
    pub identity: FoodIdentity,
    pub confidence: f64,
    pub portion_size: PortionEstimate,
    pub nutrition: NutritionSummary,
}

impl DetectedFood {
    pub fn validate(&self) -> NutritionResult<()> {
        ensure_in_range("food.confidence", self.confidence, 0.0, 1.0)?;
        ensure_positive("food.portionSize.amount", self.portion_size.amount)?;
        ensure_in_range("food.portionSize.confidence", self.portion_size.confidence, 0.0, 1.0)?;
        self.nutrition.validate("food.nutrition")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    MuscleGain,
    DiabetesControl,
    GeneralFitness,
}

impl Goal {
    /// Daily kcal added to (or removed from) the energy expenditure.
    pub fn calorie_adjustment(self) -> f64 {
        match self {
            Goal::WeightLoss => -500.0,
            Goal::MuscleGain => 300.0,
            Goal::DiabetesControl | Goal::GeneralFitness => 0.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: f64,
    #[serde(rename = "weight", alias = "weightKg")]
    pub weight_kg: f64,
    #[serde(rename = "height", alias = "heightCm")]
    pub height_cm: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_calories: Option<f64>,
}

impl UserProfile {
    pub fn validate(&self) -> NutritionResult<()> {
        ensure_positive("age", self.age)?;
        ensure_positive("weight", self.weight_kg)?;
        ensure_positive("height", self.height_cm)?;
        if let Some(target) = self.target_weight {
            ensure_positive("targetWeight", target)?;
        }
        if let Some(target) = self.target_calories {
            ensure_positive("targetCalories", target)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DailyRequirement {
    pub calories: f64,
    pub macros: MacroNutrients,
}

impl DailyRequirement {
    pub fn validate(&self) -> NutritionResult<()> {
        ensure_non_negative("requirement.calories", self.calories)?;
        self.macros.validate("requirement.macros")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub meal_type: MealType,
    #[serde(default)]
    pub foods: Vec<DetectedFood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_key: Option<String>,
    pub total_nutrition: NutritionSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MealLogEntry {
    pub fn validate(&self) -> NutritionResult<()> {
        for food in &self.foods {
            food.validate()?;
        }
        self.total_nutrition.validate("totalNutrition")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub calorie_balance: u32,
    pub macro_balance: u32,
    pub consistency: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub overall: u32,
    /// `None` when the window held no logs.
    pub components: Option<ScoreComponents>,
}
