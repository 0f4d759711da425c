use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::NutritionResult;
use crate::label_normalizer::{normalize, RawLabel};
use crate::models::{DetectedFood, MacroNutrients};
use crate::nutrition_aggregator::aggregate_foods;
use crate::table::NutritionTable;

/// Result of analysing one photographed meal.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_key: Option<String>,
    pub detected_foods: Vec<DetectedFood>,
    pub total_calories: f64,
    pub total_macros: MacroNutrients,
    /// Confidence of the first detected food, 0 when nothing was detected.
    pub confidence: f64,
}

pub fn analyze(
    raw_labels: &[RawLabel],
    image_key: Option<&str>,
    table: &NutritionTable,
    config: &EngineConfig,
) -> NutritionResult<FoodAnalysis> {
    let detected_foods = normalize(raw_labels, table, config)?;
    let totals = aggregate_foods(&detected_foods);
    let confidence = detected_foods.first().map_or(0.0, |food| food.confidence);

    info!(
        image_key = image_key.unwrap_or("-"),
        foods = detected_foods.len(),
        calories = totals.calories,
        "analysed meal image labels"
    );

    Ok(FoodAnalysis {
        image_key: image_key.map(str::to_string),
        detected_foods,
        total_calories: totals.calories,
        total_macros: totals.macros,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food_label(name: &str, confidence: f64) -> RawLabel {
        RawLabel {
            name: name.to_string(),
            confidence,
            category_tags: vec!["Food".to_string()],
        }
    }

    #[test]
    fn test_analyze_totals_and_confidence() {
        let labels = vec![food_label("Chicken", 92.0), food_label("Potato", 99.0)];
        let analysis = analyze(&labels, Some("abc.jpg"), &NutritionTable::builtin(), &EngineConfig::default()).unwrap();

        assert_eq!(analysis.detected_foods.len(), 2);
        // chicken 248 + potato 116 (115.5 rounded up)
        assert_eq!(analysis.total_calories, 364.0);
        assert!((analysis.confidence - 0.92).abs() < 1e-12);
        assert_eq!(analysis.image_key.as_deref(), Some("abc.jpg"));
    }

    #[test]
    fn test_analyze_without_food_labels() {
        let labels = vec![RawLabel {
            name: "Fork".to_string(),
            confidence: 99.0,
            category_tags: vec!["Tableware".to_string()],
        }];
        let analysis = analyze(&labels, None, &NutritionTable::builtin(), &EngineConfig::default()).unwrap();
        assert!(analysis.detected_foods.is_empty());
        assert_eq!(analysis.total_calories, 0.0);
        assert_eq!(analysis.total_macros, MacroNutrients::zero());
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_analysis_serializes_with_camel_case() {
        let labels = vec![food_label("Egg", 90.0)];
        let analysis = analyze(&labels, None, &NutritionTable::builtin(), &EngineConfig::default()).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("detectedFoods").is_some());
        assert!(json.get("totalMacros").is_some());
        assert_eq!(json["detectedFoods"][0]["portionSize"]["unit"], "grams");
    }
}
