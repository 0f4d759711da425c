use crate::models::{round_half_up, DetectedFood, MacroNutrients, MealLogEntry, NutritionSummary};

/// Anything that carries an already-rounded nutrition total.
pub trait NutritionSource {
    fn nutrition(&self) -> NutritionSummary;
}

impl NutritionSource for NutritionSummary {
    fn nutrition(&self) -> NutritionSummary {
        *self
    }
}

impl NutritionSource for DetectedFood {
    fn nutrition(&self) -> NutritionSummary {
        self.nutrition
    }
}

impl NutritionSource for MealLogEntry {
    fn nutrition(&self) -> NutritionSummary {
        self.total_nutrition
    }
}

/// Inputs carry at most one decimal, so each value is an exact count of tenths.
fn to_tenths(value: f64) -> i64 {
    round_half_up(value * 10.0) as i64
}

/// Sums in integer tenths and converts back once. Integer addition makes the
/// result independent of both order and grouping.
fn tenths_sum(values: impl Iterator<Item = f64>) -> f64 {
    values.map(to_tenths).sum::<i64>() as f64 / 10.0
}

/// Field-wise sum of calories and every macro. No rounding is applied here;
/// inputs are expected to be rounded at scaling time already.
pub fn aggregate<'a, T, I>(items: I) -> NutritionSummary
where
    T: NutritionSource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let summaries: Vec<NutritionSummary> = items.into_iter().map(|item| item.nutrition()).collect();
    if summaries.is_empty() {
        return NutritionSummary::zero();
    }

    macro_rules! sum_field {
        ($($path:tt)+) => {
            tenths_sum(summaries.iter().map(|s| s.$($path)+))
        };
    }

    NutritionSummary {
        calories: sum_field!(calories),
        macros: MacroNutrients {
            protein: sum_field!(macros.protein),
            carbohydrates: sum_field!(macros.carbohydrates),
            fats: sum_field!(macros.fats),
            fiber: sum_field!(macros.fiber),
        },
    }
}

pub fn aggregate_foods(foods: &[DetectedFood]) -> NutritionSummary {
    aggregate(foods)
}

pub fn aggregate_meals(meals: &[MealLogEntry]) -> NutritionSummary {
    aggregate(meals)
}
