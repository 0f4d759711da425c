use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::models::{FoodIdentity, MacroNutrients, NutritionBaseline};
use crate::table::NutritionTable;

// Expected column headers
const NAME_COL: &str = "Name";
const KCAL_COL: &str = "kcal/100g";
const PROTEIN_COL: &str = "Protein (g/100g)";
const CARB_COL: &str = "Carbohydrate (g/100g)";
const FAT_COL: &str = "Fat (g/100g)";
const FIBER_COL: &str = "Fiber (g/100g)";

/// Blank cells read as 0 so every row yields a complete macro record.
fn parse_value(raw: Option<&str>, column: &str, row_index: usize) -> Result<f64> {
    let raw = raw.unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("Invalid value '{}' in column '{}' at row {}", raw, column, row_index))?;
    if !value.is_finite() || value < 0.0 {
        return Err(anyhow::anyhow!(
            "Value {} in column '{}' at row {} must be a non-negative number",
            value,
            column,
            row_index
        ));
    }
    Ok(value)
}

/// Loads a nutrition table from CSV; `fallback` must name one of its rows.
pub fn load_nutrition_table(csv_path: &Path, fallback: &str) -> Result<NutritionTable> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Nutrition CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open nutrition CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
    };
    let name_idx = column(NAME_COL)?;
    let kcal_idx = column(KCAL_COL)?;
    let protein_idx = column(PROTEIN_COL)?;
    let carb_idx = column(CARB_COL)?;
    let fat_idx = column(FAT_COL)?;
    let fiber_idx = column(FIBER_COL)?;

    let mut entries = HashMap::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let name = record.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            warn!(row = row_index + 1, "skipping nutrition row with empty name");
            continue;
        }

        let baseline = NutritionBaseline {
            calories_per_100: parse_value(record.get(kcal_idx), KCAL_COL, row_index)?,
            macros_per_100: MacroNutrients {
                protein: parse_value(record.get(protein_idx), PROTEIN_COL, row_index)?,
                carbohydrates: parse_value(record.get(carb_idx), CARB_COL, row_index)?,
                fats: parse_value(record.get(fat_idx), FAT_COL, row_index)?,
                fiber: parse_value(record.get(fiber_idx), FIBER_COL, row_index)?,
            },
        };
        entries.insert(FoodIdentity::new(name), baseline);
    }

    if entries.is_empty() {
        return Err(anyhow::anyhow!("No valid nutrition data loaded from {:?}", csv_path));
    }

    info!(foods = entries.len(), path = ?csv_path, "loaded nutrition table");
    NutritionTable::from_entries(entries, fallback)
        .with_context(|| format!("Nutrition table at {:?} is unusable", csv_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn header_line() -> String {
        format!("{},{},{},{},{},{}", NAME_COL, KCAL_COL, PROTEIN_COL, CARB_COL, FAT_COL, FIBER_COL)
    }

    fn create_test_csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header_line())?;
        writeln!(file, "Rice,130,2.7,28,0.3,0.4")?;
        writeln!(file, "Tofu,76,8,1.9,4.8,")?; // Missing fiber
        writeln!(file, ",10,10,10,10,10")?; // Empty name
        writeln!(file, "Lentils,116,9,20,0.4,7.9")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_nutrition_table_success() -> Result<()> {
        let file = create_test_csv_file()?;
        let table = load_nutrition_table(file.path(), "rice")?;

        assert_eq!(table.len(), 3);
        let tofu = table.lookup("tofu");
        assert_eq!(tofu.calories_per_100, 76.0);
        assert_eq!(tofu.macros_per_100.fiber, 0.0);
        assert_eq!(table.lookup("LENTILS").macros_per_100.fiber, 7.9);
        assert_eq!(table.lookup("quinoa"), table.lookup("rice"));
        Ok(())
    }

    #[test]
    fn test_load_nutrition_table_missing_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{},{},{},{}", NAME_COL, PROTEIN_COL, CARB_COL, FAT_COL, FIBER_COL)?;
        writeln!(file, "Rice,2.7,28,0.3,0.4")?;
        file.flush()?;

        let result = load_nutrition_table(file.path(), "rice");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains(&format!("Column '{}' not found", KCAL_COL)));
        Ok(())
    }

    #[test]
    fn test_load_nutrition_table_rejects_negative_values() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header_line())?;
        writeln!(file, "Rice,-130,2.7,28,0.3,0.4")?;
        file.flush()?;

        assert!(load_nutrition_table(file.path(), "rice").is_err());
        Ok(())
    }

    #[test]
    fn test_load_nutrition_table_requires_fallback_row() -> Result<()> {
        let file = create_test_csv_file()?;
        let result = load_nutrition_table(file.path(), "pasta");
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_load_nutrition_table_empty_file_with_headers() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header_line())?;
        file.flush()?;

        let result = load_nutrition_table(file.path(), "rice");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No valid nutrition data loaded"));
        Ok(())
    }

    #[test]
    fn test_load_nutrition_table_file_not_found() {
        let path = Path::new("this_file_does_not_exist.csv");
        let result = load_nutrition_table(path, "rice");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Nutrition CSV file not found"));
    }
}
