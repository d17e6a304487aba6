//! Load raw plans from JSON and CSV
//!
//! CSV files carry one plan per row with the wire field names as headers.
//! Each row is validated on its own so a bad row does not hide the others.

use super::{RawPlan, RawValue, RetirementPlan, ValidationErrors};
use csv::Reader;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors reading plan files (not validation errors)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a single raw plan from a JSON file
pub fn load_plan_json<P: AsRef<Path>>(path: P) -> Result<RawPlan, LoadError> {
    let file = File::open(path)?;
    load_plan_json_from_reader(file)
}

/// Load a single raw plan from any JSON reader
pub fn load_plan_json_from_reader<R: Read>(reader: R) -> Result<RawPlan, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load raw plans from a CSV file, one per row
pub fn load_raw_plans_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawPlan>, LoadError> {
    let file = File::open(path)?;
    load_raw_plans_csv_from_reader(file)
}

/// Load raw plans from any CSV reader (e.g., string buffer, network stream)
pub fn load_raw_plans_csv_from_reader<R: Read>(reader: R) -> Result<Vec<RawPlan>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut plans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: BTreeMap<String, String> = result?;
        let values: BTreeMap<String, RawValue> =
            row.into_iter().map(|(name, cell)| (name, RawValue::Text(cell))).collect();
        plans.push(RawPlan::from(values));
    }

    Ok(plans)
}

/// Load and validate every plan in a CSV file
pub fn load_plans_csv<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Result<RetirementPlan, ValidationErrors>>, LoadError> {
    Ok(load_raw_plans_csv(path)?.iter().map(RawPlan::validate).collect())
}

/// Load and validate every plan from a CSV reader
pub fn load_plans_csv_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<Result<RetirementPlan, ValidationErrors>>, LoadError> {
    Ok(load_raw_plans_csv_from_reader(reader)?.iter().map(RawPlan::validate).collect())
}
