use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{NutritionError, NutritionResult};
use crate::models::{DetectedFood, MealLogEntry, MealType};
use crate::nutrition_aggregator::aggregate_foods;

impl MealLogEntry {
    /// New entry whose total is the aggregate of `foods`. Identifiers, image
    /// keys and notes are left for the calling layer to fill in.
    pub fn new(
        timestamp: DateTime<Utc>,
        meal_type: MealType,
        foods: Vec<DetectedFood>,
    ) -> NutritionResult<Self> {
        for food in &foods {
            food.validate()?;
        }
        let total_nutrition = aggregate_foods(&foods);
        Ok(MealLogEntry {
            log_id: None,
            timestamp,
            meal_type,
            foods,
            image_key: None,
            total_nutrition,
            notes: None,
        })
    }

    pub fn with_image_key(self, image_key: impl Into<String>) -> Self {
        MealLogEntry {
            image_key: Some(image_key.into()),
            ..self
        }
    }

    pub fn with_notes(self, notes: impl Into<String>) -> Self {
        MealLogEntry {
            notes: Some(notes.into()),
            ..self
        }
    }
}

/// Entries logged in the `days` days up to and including `now`.
pub fn trailing_window(logs: &[MealLogEntry], now: DateTime<Utc>, days: i64) -> NutritionResult<Vec<MealLogEntry>> {
    if days <= 0 {
        return Err(NutritionError::invalid("windowDays", format!("must be at least 1, got {}", days)));
    }
    let start = now - Duration::days(days);
    Ok(logs
        .iter()
        .filter(|entry| entry.timestamp >= start && entry.timestamp <= now)
        .cloned()
        .collect())
}

/// Inclusive UTC bounds of a calendar day: 00:00:00.000 to 23:59:59.999.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (start, end)
}

pub fn entries_on(logs: &[MealLogEntry], date: NaiveDate) -> Vec<MealLogEntry> {
    let (start, end) = day_bounds(date);
    logs.iter()
        .filter(|entry| entry.timestamp >= start && entry.timestamp <= end)
        .cloned()
        .collect()
}
