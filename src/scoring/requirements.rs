use tracing::{debug, warn};

use crate::error::{ensure_finite, NutritionResult};
use crate::models::{round_half_up, DailyRequirement, Gender, MacroNutrients, UserProfile};

pub const PROTEIN_G_PER_KG: f64 = 1.6;
pub const FAT_ENERGY_SHARE: f64 = 0.25;
pub const FIBER_TARGET_G: f64 = 25.0;

// Atwater factors, kcal per gram
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Sex-specific constant of the Mifflin-St Jeor equation.
fn bmr_offset(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
        // Kept on the female constant until a dedicated formula is chosen.
        Gender::Other => -161.0,
    }
}

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day.
pub fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age + bmr_offset(profile.gender)
}

/// Energy expenditure after activity multiplier and goal adjustment, unrounded.
pub fn energy_target(profile: &UserProfile) -> f64 {
    basal_metabolic_rate(profile) * profile.activity_level.multiplier() + profile.goal.calorie_adjustment()
}

/// Computes daily calorie and macro targets for a profile.
///
/// Calories, protein, fats and carbohydrates are rounded to whole numbers;
/// fiber is a flat 25 g. A carbohydrate target that would go negative (very
/// low energy target with a high protein target) is clamped to zero.
pub fn calculate_daily_requirement(profile: &UserProfile) -> NutritionResult<DailyRequirement> {
    profile.validate()?;

    let tdee = energy_target(profile).max(0.0);
    let protein = profile.weight_kg * PROTEIN_G_PER_KG;
    ensure_finite("calories", tdee)?;
    ensure_finite("protein", protein * KCAL_PER_G_PROTEIN)?;
    let fats = (tdee * FAT_ENERGY_SHARE) / KCAL_PER_G_FAT;
    let mut carbohydrates = (tdee - (protein * KCAL_PER_G_PROTEIN + fats * KCAL_PER_G_FAT)) / KCAL_PER_G_CARB;

    if carbohydrates < 0.0 {
        warn!(
            carbohydrates,
            tdee, protein, "negative carbohydrate target clamped to zero"
        );
        carbohydrates = 0.0;
    }

    let requirement = DailyRequirement {
        calories: round_half_up(tdee),
        macros: MacroNutrients {
            protein: round_half_up(protein),
            carbohydrates: round_half_up(carbohydrates),
            fats: round_half_up(fats),
            fiber: FIBER_TARGET_G,
        },
    };
    debug!(?requirement, "calculated daily requirement");
    Ok(requirement)
}
