use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Plan, RawFoodRecord};
use crate::state::Catalog;

/// Load and normalize a catalog from a JSON file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let content = fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// Parse a catalog from a JSON array of food records.
///
/// Records without a name or group are skipped with a warning; malformed
/// numeric fields fall back to zero.
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    let total = records.len();

    let foods: Vec<_> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<RawFoodRecord>(value) {
            Ok(raw) => Some(raw.normalize()),
            Err(e) => {
                warn!(index = i, error = %e, "Skipping malformed food record");
                None
            }
        })
        .collect();

    debug!(records = total, kept = foods.len(), "Parsed catalog");
    Ok(Catalog::new(foods))
}

pub fn save_plan<P: AsRef<Path>>(path: P, plan: &Plan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<Plan> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
