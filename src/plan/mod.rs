//! Retirement plan inputs, validation and loading

mod data;
mod validate;
pub mod loader;

pub use data::{AssetClass, PlanField, RawPlan, RawValue, RetirementPlan};
pub use validate::{validate, ValidationErrors, ALLOCATION_SUM, ALLOCATION_SUM_FIELD};
pub use loader::{load_plan_json, load_plans_csv, load_raw_plans_csv, LoadError};
