//! Two-phase plan validation
//!
//! Phase 1 coerces and range-checks each field on its own. Phase 2 checks the
//! allocation sum, and only runs once all three allocation fields passed
//! phase 1. Every error found is returned, keyed by field.

use super::data::{AssetClass, PlanField, RawPlan, RawValue, RetirementPlan};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub const REQUIRED: &str = "Required";
pub const INVALID_NUMBER: &str = "Invalid number";
pub const CANNOT_BE_NEGATIVE: &str = "Cannot be negative";
pub const CANNOT_EXCEED_100: &str = "Cannot exceed 100";
pub const EXPECTED_INTEGER: &str = "Expected integer";
pub const AT_LEAST_ONE_YEAR: &str = "Must be at least 1 year";
pub const AT_LEAST_ZERO: &str = "Must be at least 0";
pub const ALLOCATION_SUM: &str = "Total allocation must be exactly 100%";

/// The field that carries the allocation-sum error
pub const ALLOCATION_SUM_FIELD: PlanField = PlanField::HybridMFAllocation;

/// Field-keyed validation failures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Error)]
#[error("plan failed validation with {count} field error(s)", count = .errors.len())]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<PlanField, String>,
}

impl ValidationErrors {
    /// Record an error; the first error recorded for a field wins
    pub(crate) fn insert(&mut self, field: PlanField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: PlanField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: PlanField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in form field order
    pub fn iter(&self) -> impl Iterator<Item = (PlanField, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Range rule applied to a field in phase 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Inflation and yields: 0..=100
    Percentage,
    /// Corpus and expenses: >= 0
    Amount,
    /// Horizon: integer 1..=100
    Years,
    /// Allocations: 0..=100
    Allocation,
}

fn rule_for(field: PlanField) -> Rule {
    match field {
        PlanField::InflationRate
        | PlanField::DebtFundYield
        | PlanField::PassiveMFYield
        | PlanField::HybridMFYield => Rule::Percentage,
        PlanField::RetirementCorpus | PlanField::YearlyExpenses => Rule::Amount,
        PlanField::YearsPlanned => Rule::Years,
        PlanField::DebtFundAllocation
        | PlanField::PassiveMFAllocation
        | PlanField::HybridMFAllocation => Rule::Allocation,
    }
}

/// Coerce and range-check a single field
fn check_field(field: PlanField, raw: Option<&RawValue>) -> Result<f64, &'static str> {
    let value = raw.ok_or(REQUIRED)?.coerce().ok_or(INVALID_NUMBER)?;

    match rule_for(field) {
        Rule::Percentage => {
            if value < 0.0 {
                return Err(CANNOT_BE_NEGATIVE);
            }
            if value > 100.0 {
                return Err(CANNOT_EXCEED_100);
            }
        }
        Rule::Amount => {
            if value < 0.0 {
                return Err(CANNOT_BE_NEGATIVE);
            }
        }
        Rule::Years => {
            if value.fract() != 0.0 {
                return Err(EXPECTED_INTEGER);
            }
            if value < 1.0 {
                return Err(AT_LEAST_ONE_YEAR);
            }
            if value > 100.0 {
                return Err(CANNOT_EXCEED_100);
            }
        }
        Rule::Allocation => {
            if value < 0.0 {
                return Err(AT_LEAST_ZERO);
            }
            if value > 100.0 {
                return Err(CANNOT_EXCEED_100);
            }
        }
    }

    Ok(value)
}

/// Validate raw field values into a typed plan
pub fn validate(raw: &RawPlan) -> Result<RetirementPlan, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut parsed: BTreeMap<PlanField, f64> = BTreeMap::new();

    for field in PlanField::ALL {
        match check_field(field, raw.get(field)) {
            Ok(value) => {
                parsed.insert(field, value);
            }
            Err(message) => errors.insert(field, message),
        }
    }

    let allocations: Option<Vec<f64>> = AssetClass::ALL
        .iter()
        .map(|asset| parsed.get(&asset.allocation_field()).copied())
        .collect();
    if let Some(allocations) = allocations {
        // Exact comparison, summed in form order
        let total: f64 = allocations.iter().sum();
        if total != 100.0 {
            errors.insert(ALLOCATION_SUM_FIELD, ALLOCATION_SUM);
        }
    }

    if !errors.is_empty() {
        debug!("validate: rejected plan with {} error(s): {:?}", errors.len(), errors.errors);
        return Err(errors);
    }

    // Every field parsed at this point
    let number = |field: PlanField| parsed.get(&field).copied().unwrap_or_default();

    Ok(RetirementPlan {
        inflation_rate: number(PlanField::InflationRate),
        retirement_corpus: number(PlanField::RetirementCorpus),
        debt_fund_yield: number(PlanField::DebtFundYield),
        passive_mf_yield: number(PlanField::PassiveMFYield),
        hybrid_mf_yield: number(PlanField::HybridMFYield),
        years_planned: number(PlanField::YearsPlanned) as u32,
        debt_fund_allocation: number(PlanField::DebtFundAllocation),
        passive_mf_allocation: number(PlanField::PassiveMFAllocation),
        hybrid_mf_allocation: number(PlanField::HybridMFAllocation),
        yearly_expenses: number(PlanField::YearlyExpenses),
    })
}
