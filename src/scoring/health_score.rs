use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::config::{ConsistencyBasis, EngineConfig};
use crate::error::NutritionResult;
use crate::meal_log::trailing_window;
use crate::models::{round_half_up, DailyRequirement, HealthScore, MealLogEntry, ScoreComponents};

/// Overall score when there is nothing to judge.
pub const NEUTRAL_SCORE: u32 = 50;

const CALORIE_WEIGHT: f64 = 0.4;
const MACRO_WEIGHT: f64 = 0.3;
const CONSISTENCY_WEIGHT: f64 = 0.3;

/// kcal of average deviation that cost one point of calorie balance.
const CALORIE_POINTS_DIVISOR: f64 = 10.0;
/// grams of protein deviation that cost one point of macro balance.
const PROTEIN_POINTS_DIVISOR: f64 = 2.0;

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    values.sum::<f64>() / count as f64
}

pub fn calorie_balance(avg_calories: f64, requirement: &DailyRequirement) -> f64 {
    (100.0 - (avg_calories - requirement.calories).abs() / CALORIE_POINTS_DIVISOR).max(0.0)
}

pub fn macro_balance(avg_protein: f64, requirement: &DailyRequirement) -> f64 {
    (100.0 - (avg_protein - requirement.macros.protein).abs() / PROTEIN_POINTS_DIVISOR).max(0.0)
}

/// 100 once `target` logs (entries or distinct days, per `basis`) are present,
/// proportional below that.
pub fn consistency(logs: &[MealLogEntry], basis: ConsistencyBasis, target: i64) -> f64 {
    let count = match basis {
        ConsistencyBasis::Entries => logs.len(),
        ConsistencyBasis::DistinctDays => logs
            .iter()
            .map(|entry| entry.timestamp.date_naive())
            .collect::<HashSet<_>>()
            .len(),
    };
    let target = target.max(1) as f64;
    if count as f64 >= target {
        100.0
    } else {
        (count as f64 / target) * 100.0
    }
}

/// Scores logs that are already restricted to the trailing window.
pub fn score(
    logs: &[MealLogEntry],
    requirement: &DailyRequirement,
    config: &EngineConfig,
) -> NutritionResult<HealthScore> {
    requirement.validate()?;
    for entry in logs {
        entry.validate()?;
    }

    if logs.is_empty() {
        debug!("no logs in window, returning neutral score");
        return Ok(HealthScore {
            overall: NEUTRAL_SCORE,
            components: None,
        });
    }

    let count = logs.len();
    let avg_calories = mean(logs.iter().map(|e| e.total_nutrition.calories), count);
    let avg_protein = mean(logs.iter().map(|e| e.total_nutrition.macros.protein), count);

    let calorie = calorie_balance(avg_calories, requirement);
    let macros = macro_balance(avg_protein, requirement);
    let regularity = consistency(logs, config.consistency_basis, config.window_days);

    let overall = round_half_up(
        calorie * CALORIE_WEIGHT + macros * MACRO_WEIGHT + regularity * CONSISTENCY_WEIGHT,
    ) as u32;

    debug!(
        avg_calories,
        avg_protein, calorie, macros, regularity, overall, "computed health score"
    );

    Ok(HealthScore {
        overall,
        components: Some(ScoreComponents {
            calorie_balance: round_half_up(calorie) as u32,
            macro_balance: round_half_up(macros) as u32,
            consistency: round_half_up(regularity) as u32,
        }),
    })
}

/// Restricts `logs` to the configured trailing window ending at `now`, then scores them.
pub fn score_window(
    logs: &[MealLogEntry],
    requirement: &DailyRequirement,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> NutritionResult<HealthScore> {
    let window = trailing_window(logs, now, config.window_days)?;
    score(&window, requirement, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MacroNutrients, MealType, NutritionSummary};
    use chrono::Duration;

    fn requirement(calories: f64, protein: f64) -> DailyRequirement {
        DailyRequirement {
            calories,
            macros: MacroNutrients {
                protein,
                carbohydrates: 300.0,
                fats: 70.0,
                fiber: 25.0,
            },
        }
    }

    fn log(timestamp: DateTime<Utc>, calories: f64, protein: f64) -> MealLogEntry {
        MealLogEntry {
            log_id: None,
            timestamp,
            meal_type: MealType::Dinner,
            foods: Vec::new(),
            image_key: None,
            total_nutrition: NutritionSummary {
                calories,
                macros: MacroNutrients {
                    protein,
                    ..MacroNutrients::zero()
                },
            },
            notes: None,
        }
    }

    fn week_of_logs(now: DateTime<Utc>, calories: f64, protein: f64) -> Vec<MealLogEntry> {
        (0..7).map(|day| log(now - Duration::days(day), calories, protein)).collect()
    }

    #[test]
    fn test_empty_window_is_neutral() {
        let result = score(&[], &requirement(2500.0, 112.0), &EngineConfig::default()).unwrap();
        assert_eq!(result.overall, 50);
        assert!(result.components.is_none());
    }

    #[test]
    fn test_reference_week() {
        let logs = week_of_logs(Utc::now(), 2000.0, 100.0);
        let result = score(&logs, &requirement(2500.0, 112.0), &EngineConfig::default()).unwrap();
        assert_eq!(result.overall, 78);
        assert_eq!(
            result.components,
            Some(ScoreComponents {
                calorie_balance: 50,
                macro_balance: 94,
                consistency: 100,
            })
        );
    }

    #[test]
    fn test_balances_floor_at_zero() {
        assert_eq!(calorie_balance(5000.0, &requirement(2000.0, 100.0)), 0.0);
        assert_eq!(macro_balance(0.0, &requirement(2000.0, 400.0)), 0.0);
        assert_eq!(calorie_balance(2000.0, &requirement(2000.0, 100.0)), 100.0);
    }

    #[test]
    fn test_consistency_partial_week() {
        let now = Utc::now();
        let logs: Vec<MealLogEntry> = (0..3).map(|day| log(now - Duration::days(day), 2000.0, 100.0)).collect();
        let value = consistency(&logs, ConsistencyBasis::Entries, 7);
        assert!((value - 300.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_entries_vs_distinct_days() {
        let now: DateTime<Utc> = "2026-10-18T20:00:00Z".parse().unwrap();
        // Seven meals, all on the same day.
        let logs: Vec<MealLogEntry> = (0..7).map(|hour| log(now - Duration::hours(hour), 400.0, 20.0)).collect();

        assert_eq!(consistency(&logs, ConsistencyBasis::Entries, 7), 100.0);
        let by_day = consistency(&logs, ConsistencyBasis::DistinctDays, 7);
        assert!((by_day - 100.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_window_drops_old_logs() {
        let now: DateTime<Utc> = "2026-10-18T12:00:00Z".parse().unwrap();
        let logs = vec![log(now - Duration::days(30), 2000.0, 100.0)];
        let result = score_window(&logs, &requirement(2500.0, 112.0), now, &EngineConfig::default()).unwrap();
        assert_eq!(result.overall, NEUTRAL_SCORE);
    }

    #[test]
    fn test_negative_totals_are_rejected() {
        let logs = vec![log(Utc::now(), -10.0, 100.0)];
        assert!(score(&logs, &requirement(2500.0, 112.0), &EngineConfig::default()).is_err());
    }
}
