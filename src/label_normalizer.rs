use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ensure_in_range, NutritionResult};
use crate::models::{DetectedFood, FoodIdentity, PortionEstimate};
use crate::table::NutritionTable;

pub const UNKNOWN_FOOD_NAME: &str = "Unknown Food";

/// One label as returned by the image-labeling service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawLabel {
    #[serde(default)]
    pub name: String,
    /// Detection confidence on a 0-100 scale.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, alias = "categories")]
    pub category_tags: Vec<String>,
}

impl RawLabel {
    fn is_food(&self, allowed: &[String]) -> bool {
        self.category_tags.iter().any(|tag| allowed.contains(tag))
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_FOOD_NAME
        } else {
            &self.name
        }
    }
}

/// Turns raw labels into at most `max_detected_foods` candidate foods.
///
/// Labels are kept in the order the labeling service supplied them; there is
/// no re-ranking by confidence. Every survivor gets the configured default
/// portion, since portion size is not estimated from the image.
pub fn normalize(
    raw_labels: &[RawLabel],
    table: &NutritionTable,
    config: &EngineConfig,
) -> NutritionResult<Vec<DetectedFood>> {
    for label in raw_labels {
        ensure_in_range("label.confidence", label.confidence, 0.0, 100.0)?;
    }

    let detected = raw_labels
        .iter()
        .filter(|label| label.is_food(&config.food_categories))
        .take(config.max_detected_foods)
        .map(|label| -> NutritionResult<DetectedFood> {
            let name = label.display_name();
            let nutrition = table.nutrition_for(name, config.default_portion_grams)?;
            Ok(DetectedFood {
                name: name.to_string(),
                identity: FoodIdentity::new(name),
                confidence: label.confidence / 100.0,
                portion_size: PortionEstimate {
                    amount: config.default_portion_grams,
                    unit: config.portion_unit.clone(),
                    confidence: config.portion_confidence,
                },
                nutrition,
            })
        })
        .collect::<NutritionResult<Vec<DetectedFood>>>()?;

    debug!(
        labels = raw_labels.len(),
        detected = detected.len(),
        "normalized label detection output"
    );
    Ok(detected)
}
