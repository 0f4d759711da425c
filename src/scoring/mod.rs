pub mod health_score;
pub mod report;
pub mod requirements;

pub use health_score::{score, score_window, NEUTRAL_SCORE};
pub use report::{DisplayComponents, HealthReport};
pub use requirements::calculate_daily_requirement;
