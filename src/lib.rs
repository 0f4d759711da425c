pub mod analysis;
pub mod cli;
pub mod config;
pub mod daily;
pub mod error;
pub mod label_normalizer;
pub mod logging;
pub mod meal_log;
pub mod models;
pub mod nutrition_aggregator;
pub mod scoring;
pub mod table;

pub use error::{NutritionError, NutritionResult};
