use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::info;

use nutri_score::analysis::analyze;
use nutri_score::cli::{parse_args, Command};
use nutri_score::config::EngineConfig;
use nutri_score::daily::daily_summary;
use nutri_score::label_normalizer::{normalize, RawLabel};
use nutri_score::logging::LoggingConfig;
use nutri_score::models::{MealLogEntry, UserProfile};
use nutri_score::scoring::{calculate_daily_requirement, score_window, HealthReport};
use nutri_score::table::{load_nutrition_table, NutritionTable};

async fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file '{}'", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in '{}'", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_timestamp(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .with_context(|| format!("Invalid RFC 3339 timestamp '{}'", raw)),
        None => Ok(Utc::now()),
    }
}

fn load_table(path: Option<&str>, config: &EngineConfig) -> Result<NutritionTable> {
    match path {
        Some(path) => load_nutrition_table(Path::new(path), &config.fallback_food),
        None => Ok(NutritionTable::builtin().with_fallback(&config.fallback_food)?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    LoggingConfig::from_env().init()?;

    let cli = parse_args();
    let config = EngineConfig::from_env().context("Invalid engine configuration")?;
    let table = load_table(cli.table.as_deref(), &config)?;
    info!(foods = table.len(), fallback = %table.fallback(), "nutrition table ready");

    match cli.command {
        Command::Analyze { labels, image_key } => {
            let raw_labels: Vec<RawLabel> = read_json(&labels).await?;
            let analysis = analyze(&raw_labels, image_key.as_deref(), &table, &config)?;
            print_json(&analysis)?;
        }
        Command::LogMeal { labels, meal_type, timestamp, image_key, notes } => {
            let raw_labels: Vec<RawLabel> = read_json(&labels).await?;
            let foods = normalize(&raw_labels, &table, &config)?;
            let mut entry = MealLogEntry::new(parse_timestamp(timestamp.as_deref())?, meal_type.into(), foods)?;
            if let Some(key) = image_key {
                entry = entry.with_image_key(key);
            }
            if let Some(notes) = notes {
                entry = entry.with_notes(notes);
            }
            print_json(&entry)?;
        }
        Command::Requirements { profile } => {
            let profile: UserProfile = read_json(&profile).await?;
            print_json(&calculate_daily_requirement(&profile)?)?;
        }
        Command::Score { profile, logs, now } => {
            let profile: UserProfile = read_json(&profile).await?;
            let logs: Vec<MealLogEntry> = read_json(&logs).await?;
            let now = parse_timestamp(now.as_deref())?;

            let requirement = calculate_daily_requirement(&profile)?;
            let score = score_window(&logs, &requirement, now, &config)?;
            print_json(&HealthReport::from_score(&score, now))?;
        }
        Command::Daily { profile, logs, date } => {
            let profile: UserProfile = read_json(&profile).await?;
            let logs: Vec<MealLogEntry> = read_json(&logs).await?;
            let date = match date {
                Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))?,
                None => Utc::now().date_naive(),
            };

            let requirement = calculate_daily_requirement(&profile)?;
            print_json(&daily_summary(date, &logs, &requirement, &config)?)?;
        }
    }

    Ok(())
}
