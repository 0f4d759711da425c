use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::NutritionResult;
use crate::meal_log::entries_on;
use crate::models::{DailyRequirement, MealLogEntry, NutritionSummary};
use crate::nutrition_aggregator::aggregate_meals;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalComparison {
    pub calories_diff: f64,
    pub protein_diff: f64,
    pub carbs_diff: f64,
    pub fats_diff: f64,
    pub on_track: bool,
}

impl GoalComparison {
    /// Differences are `consumed - required`; on track while calories stay within
    /// `tolerance` (a fraction of the requirement) either way.
    pub fn compare(consumed: &NutritionSummary, requirement: &DailyRequirement, tolerance: f64) -> Self {
        let calories_diff = consumed.calories - requirement.calories;
        GoalComparison {
            calories_diff,
            protein_diff: consumed.macros.protein - requirement.macros.protein,
            carbs_diff: consumed.macros.carbohydrates - requirement.macros.carbohydrates,
            fats_diff: consumed.macros.fats - requirement.macros.fats,
            on_track: calories_diff.abs() <= tolerance * requirement.calories,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub meals: Vec<MealLogEntry>,
    pub total_nutrition: NutritionSummary,
    pub goal_comparison: GoalComparison,
}

/// Rolls the meals logged on `date` (UTC) up into one day and compares them
/// against the requirement.
pub fn daily_summary(
    date: NaiveDate,
    logs: &[MealLogEntry],
    requirement: &DailyRequirement,
    config: &EngineConfig,
) -> NutritionResult<DailySummary> {
    requirement.validate()?;
    let meals = entries_on(logs, date);
    for meal in &meals {
        meal.validate()?;
    }

    let total_nutrition = aggregate_meals(&meals);
    let goal_comparison = GoalComparison::compare(&total_nutrition, requirement, config.on_track_tolerance);
    debug!(%date, meals = meals.len(), on_track = goal_comparison.on_track, "built daily summary");

    Ok(DailySummary {
        date,
        meals,
        total_nutrition,
        goal_comparison,
    })
}
