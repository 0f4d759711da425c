use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{round_half_up, HealthScore, ScoreComponents};

// Display weights of the presentation breakdown
const DISPLAY_CALORIE_SHARE: f64 = 0.4;
const DISPLAY_MACRO_SHARE: f64 = 0.3;
const DISPLAY_CONSISTENCY_SHARE: f64 = 0.2;
const DISPLAY_VARIETY_SHARE: f64 = 0.1;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayComponents {
    pub calorie_balance: u32,
    pub macro_balance: u32,
    pub consistency: u32,
    pub variety: u32,
}

/// Reporting view of a health score.
///
/// `components` is the presentation breakdown existing clients render: fixed
/// shares of `overall`, not the underlying sub-scores. The real sub-scores
/// are reported alongside in `sub_scores`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub overall: u32,
    pub components: DisplayComponents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_scores: Option<ScoreComponents>,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn from_score(score: &HealthScore, timestamp: DateTime<Utc>) -> Self {
        let share = |fraction: f64| round_half_up(score.overall as f64 * fraction) as u32;
        HealthReport {
            overall: score.overall,
            components: DisplayComponents {
                calorie_balance: share(DISPLAY_CALORIE_SHARE),
                macro_balance: share(DISPLAY_MACRO_SHARE),
                consistency: share(DISPLAY_CONSISTENCY_SHARE),
                variety: share(DISPLAY_VARIETY_SHARE),
            },
            sub_scores: score.components,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_breakdown_is_share_of_overall() {
        let score = HealthScore {
            overall: 78,
            components: Some(ScoreComponents {
                calorie_balance: 50,
                macro_balance: 94,
                consistency: 100,
            }),
        };
        let report = HealthReport::from_score(&score, Utc::now());
        assert_eq!(report.overall, 78);
        assert_eq!(
            report.components,
            DisplayComponents {
                calorie_balance: 31, // 31.2
                macro_balance: 23,   // 23.4
                consistency: 16,     // 15.6
                variety: 8,          // 7.8
            }
        );
        assert_eq!(report.sub_scores, score.components);
    }

    #[test]
    fn test_neutral_report_serializes_without_sub_scores() {
        let score = HealthScore {
            overall: 50,
            components: None,
        };
        let report = HealthReport::from_score(&score, "2026-10-18T00:00:00Z".parse().unwrap());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["overall"], 50);
        assert_eq!(json["components"]["calorieBalance"], 20);
        assert_eq!(json["components"]["variety"], 5);
        assert!(json.get("subScores").is_none());
    }
}
