use clap::{Parser, Subcommand, ValueEnum};

use crate::models::MealType;

#[derive(Parser, Debug)]
#[command(author, version, about = "Nutrition estimation and health scoring", long_about = None)]
pub struct Cli {
    /// Nutrition table CSV replacing the built-in table
    #[arg(short, long, global = true)]
    pub table: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Turn label-detection output into detected foods and meal totals
    Analyze {
        /// JSON array of {name, confidence, categoryTags}
        #[arg(short, long)]
        labels: String,
        #[arg(long)]
        image_key: Option<String>,
    },
    /// Build a meal log entry from label-detection output
    LogMeal {
        #[arg(short, long)]
        labels: String,
        #[arg(short, long, value_enum)]
        meal_type: MealTypeArg,
        /// RFC 3339 timestamp, defaults to now
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long)]
        image_key: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Daily calorie and macro targets for a profile
    Requirements {
        #[arg(short, long)]
        profile: String,
    },
    /// Health score over the trailing window of meal logs
    Score {
        #[arg(short, long)]
        profile: String,
        /// JSON array of meal log entries
        #[arg(short, long)]
        logs: String,
        /// RFC 3339 end of the window, defaults to now
        #[arg(long)]
        now: Option<String>,
    },
    /// One day's meals, totals and comparison against the requirement
    Daily {
        #[arg(short, long)]
        profile: String,
        #[arg(short, long)]
        logs: String,
        /// YYYY-MM-DD, defaults to today (UTC)
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MealTypeArg {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl From<MealTypeArg> for MealType {
    fn from(arg: MealTypeArg) -> Self {
        match arg {
            MealTypeArg::Breakfast => MealType::Breakfast,
            MealTypeArg::Lunch => MealType::Lunch,
            MealTypeArg::Dinner => MealType::Dinner,
            MealTypeArg::Snack => MealType::Snack,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
