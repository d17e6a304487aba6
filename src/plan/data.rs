//! Plan data structures: raw form values and the validated plan

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The ten named inputs of a retirement plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanField {
    #[serde(rename = "inflationRate")]
    InflationRate,
    #[serde(rename = "retirementCorpus")]
    RetirementCorpus,
    #[serde(rename = "debtFundYield")]
    DebtFundYield,
    #[serde(rename = "passiveMFYield")]
    PassiveMFYield,
    #[serde(rename = "hybridMFYield")]
    HybridMFYield,
    #[serde(rename = "yearsPlanned")]
    YearsPlanned,
    #[serde(rename = "debtFundAllocation")]
    DebtFundAllocation,
    #[serde(rename = "passiveMFAllocation")]
    PassiveMFAllocation,
    #[serde(rename = "hybridMFAllocation")]
    HybridMFAllocation,
    #[serde(rename = "yearlyExpenses")]
    YearlyExpenses,
}

impl PlanField {
    /// All fields in form order
    pub const ALL: [PlanField; 10] = [
        PlanField::InflationRate,
        PlanField::RetirementCorpus,
        PlanField::DebtFundYield,
        PlanField::PassiveMFYield,
        PlanField::HybridMFYield,
        PlanField::YearsPlanned,
        PlanField::DebtFundAllocation,
        PlanField::PassiveMFAllocation,
        PlanField::HybridMFAllocation,
        PlanField::YearlyExpenses,
    ];

    /// Wire name used in JSON, CSV headers and saved plans
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanField::InflationRate => "inflationRate",
            PlanField::RetirementCorpus => "retirementCorpus",
            PlanField::DebtFundYield => "debtFundYield",
            PlanField::PassiveMFYield => "passiveMFYield",
            PlanField::HybridMFYield => "hybridMFYield",
            PlanField::YearsPlanned => "yearsPlanned",
            PlanField::DebtFundAllocation => "debtFundAllocation",
            PlanField::PassiveMFAllocation => "passiveMFAllocation",
            PlanField::HybridMFAllocation => "hybridMFAllocation",
            PlanField::YearlyExpenses => "yearlyExpenses",
        }
    }

    /// Look up a field by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Human-readable label with unit
    pub fn label(&self) -> &'static str {
        match self {
            PlanField::InflationRate => "Inflation Rate (%)",
            PlanField::RetirementCorpus => "Retirement Corpus (Lacs)",
            PlanField::DebtFundYield => "Debt Fund Yield (%)",
            PlanField::PassiveMFYield => "Passive MF Yield (%)",
            PlanField::HybridMFYield => "Hybrid MF Yield (%)",
            PlanField::YearsPlanned => "Planning Horizon (Years)",
            PlanField::DebtFundAllocation => "Debt Fund (%)",
            PlanField::PassiveMFAllocation => "Passive MF (%)",
            PlanField::HybridMFAllocation => "Hybrid MF (%)",
            PlanField::YearlyExpenses => "Yearly Expenses (Lacs)",
        }
    }
}

impl fmt::Display for PlanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset class in the three-fund allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    DebtFund,
    PassiveMF,
    HybridMF,
}

impl AssetClass {
    pub const ALL: [AssetClass; 3] = [AssetClass::DebtFund, AssetClass::PassiveMF, AssetClass::HybridMF];

    pub fn allocation_field(&self) -> PlanField {
        match self {
            AssetClass::DebtFund => PlanField::DebtFundAllocation,
            AssetClass::PassiveMF => PlanField::PassiveMFAllocation,
            AssetClass::HybridMF => PlanField::HybridMFAllocation,
        }
    }

    pub fn yield_field(&self) -> PlanField {
        match self {
            AssetClass::DebtFund => PlanField::DebtFundYield,
            AssetClass::PassiveMF => PlanField::PassiveMFYield,
            AssetClass::HybridMF => PlanField::HybridMFYield,
        }
    }
}

/// A raw, unvalidated field value as it arrives from a form, file or request
///
/// Numbers and strings are both accepted; anything else (null, bool, arrays)
/// is kept so the validator can report it as an invalid number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    /// Coerce to a finite number, if possible
    ///
    /// Strings are trimmed before parsing. Empty strings, NaN and infinities
    /// are not coercible.
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Raw field values keyed by plan field
///
/// Unknown keys are dropped on deserialization; missing keys are reported by
/// the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, RawValue>", into = "BTreeMap<String, RawValue>")]
pub struct RawPlan {
    values: BTreeMap<PlanField, RawValue>,
}

impl RawPlan {
    /// Empty raw plan (every field missing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting values of a fresh plan form
    pub fn defaults() -> Self {
        Self::new()
            .with(PlanField::InflationRate, 6.0)
            .with(PlanField::RetirementCorpus, 200.0)
            .with(PlanField::DebtFundYield, 7.0)
            .with(PlanField::PassiveMFYield, 12.0)
            .with(PlanField::HybridMFYield, 13.0)
            .with(PlanField::YearsPlanned, 40.0)
            .with(PlanField::DebtFundAllocation, 50.0)
            .with(PlanField::PassiveMFAllocation, 20.0)
            .with(PlanField::HybridMFAllocation, 30.0)
            .with(PlanField::YearlyExpenses, 6.0)
    }

    /// Builder-style setter
    pub fn with(mut self, field: PlanField, value: impl Into<RawValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: PlanField, value: impl Into<RawValue>) {
        self.values.insert(field, value.into());
    }

    pub fn remove(&mut self, field: PlanField) -> Option<RawValue> {
        self.values.remove(&field)
    }

    pub fn get(&self, field: PlanField) -> Option<&RawValue> {
        self.values.get(&field)
    }

    /// Overlay every value present in `other` onto this plan
    pub fn merge(&mut self, other: &RawPlan) {
        for (field, value) in &other.values {
            self.values.insert(*field, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlanField, &RawValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Validate into a typed plan
    pub fn validate(&self) -> Result<RetirementPlan, super::ValidationErrors> {
        super::validate(self)
    }
}

impl From<BTreeMap<String, RawValue>> for RawPlan {
    fn from(map: BTreeMap<String, RawValue>) -> Self {
        let values = map
            .into_iter()
            .filter_map(|(name, value)| PlanField::from_name(&name).map(|f| (f, value)))
            .collect();
        Self { values }
    }
}

impl From<RawPlan> for BTreeMap<String, RawValue> {
    fn from(plan: RawPlan) -> Self {
        plan.values
            .into_iter()
            .map(|(f, v)| (f.as_str().to_string(), v))
            .collect()
    }
}

impl From<&RetirementPlan> for RawPlan {
    fn from(plan: &RetirementPlan) -> Self {
        let mut raw = RawPlan::new();
        for field in PlanField::ALL {
            raw.set(field, plan.value(field));
        }
        raw
    }
}

/// A validated retirement plan
///
/// Only obtainable through validation, so every instance satisfies the range
/// checks and the allocation-sum invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlan")]
pub struct RetirementPlan {
    #[serde(rename = "inflationRate")]
    pub(super) inflation_rate: f64,
    #[serde(rename = "retirementCorpus")]
    pub(super) retirement_corpus: f64,
    #[serde(rename = "debtFundYield")]
    pub(super) debt_fund_yield: f64,
    #[serde(rename = "passiveMFYield")]
    pub(super) passive_mf_yield: f64,
    #[serde(rename = "hybridMFYield")]
    pub(super) hybrid_mf_yield: f64,
    #[serde(rename = "yearsPlanned")]
    pub(super) years_planned: u32,
    #[serde(rename = "debtFundAllocation")]
    pub(super) debt_fund_allocation: f64,
    #[serde(rename = "passiveMFAllocation")]
    pub(super) passive_mf_allocation: f64,
    #[serde(rename = "hybridMFAllocation")]
    pub(super) hybrid_mf_allocation: f64,
    #[serde(rename = "yearlyExpenses")]
    pub(super) yearly_expenses: f64,
}

impl RetirementPlan {
    /// Annual inflation rate in percent
    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    /// Starting corpus (Lacs)
    pub fn retirement_corpus(&self) -> f64 {
        self.retirement_corpus
    }

    /// First-year withdrawal (Lacs)
    pub fn yearly_expenses(&self) -> f64 {
        self.yearly_expenses
    }

    pub fn years_planned(&self) -> u32 {
        self.years_planned
    }

    /// Allocation to an asset class in percent
    pub fn allocation(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::DebtFund => self.debt_fund_allocation,
            AssetClass::PassiveMF => self.passive_mf_allocation,
            AssetClass::HybridMF => self.hybrid_mf_allocation,
        }
    }

    /// Annual yield of an asset class in percent
    pub fn yield_rate(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::DebtFund => self.debt_fund_yield,
            AssetClass::PassiveMF => self.passive_mf_yield,
            AssetClass::HybridMF => self.hybrid_mf_yield,
        }
    }

    /// Value of any field as a number
    pub fn value(&self, field: PlanField) -> f64 {
        match field {
            PlanField::InflationRate => self.inflation_rate,
            PlanField::RetirementCorpus => self.retirement_corpus,
            PlanField::DebtFundYield => self.debt_fund_yield,
            PlanField::PassiveMFYield => self.passive_mf_yield,
            PlanField::HybridMFYield => self.hybrid_mf_yield,
            PlanField::YearsPlanned => self.years_planned as f64,
            PlanField::DebtFundAllocation => self.debt_fund_allocation,
            PlanField::PassiveMFAllocation => self.passive_mf_allocation,
            PlanField::HybridMFAllocation => self.hybrid_mf_allocation,
            PlanField::YearlyExpenses => self.yearly_expenses,
        }
    }
}

impl TryFrom<RawPlan> for RetirementPlan {
    type Error = super::ValidationErrors;

    fn try_from(raw: RawPlan) -> Result<Self, Self::Error> {
        super::validate(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in PlanField::ALL {
            assert_eq!(PlanField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(PlanField::from_name("passiveMfYield"), None);
    }

    #[test]
    fn test_coerce_strings_and_numbers() {
        assert_eq!(RawValue::from(" 12.5 ").coerce(), Some(12.5));
        assert_eq!(RawValue::from(7.0).coerce(), Some(7.0));
        assert_eq!(RawValue::from("abc").coerce(), None);
        assert_eq!(RawValue::from("").coerce(), None);
        assert_eq!(RawValue::from("NaN").coerce(), None);
        assert_eq!(RawValue::from("inf").coerce(), None);
        assert_eq!(RawValue::Number(f64::NAN).coerce(), None);
        assert_eq!(RawValue::Other(serde_json::Value::Bool(true)).coerce(), None);
    }

    #[test]
    fn test_raw_plan_from_json_ignores_unknown_keys() {
        let json = r#"{"inflationRate": "6", "yearsPlanned": 40, "theme": "dark", "hybridMFYield": null}"#;
        let raw: RawPlan = serde_json::from_str(json).unwrap();

        assert_eq!(raw.get(PlanField::InflationRate), Some(&RawValue::from("6")));
        assert_eq!(raw.get(PlanField::YearsPlanned), Some(&RawValue::Number(40.0)));
        assert!(matches!(raw.get(PlanField::HybridMFYield), Some(RawValue::Other(_))));
        assert_eq!(raw.iter().count(), 3);
    }

    #[test]
    fn test_merge_overlays_present_values() {
        let mut base = RawPlan::defaults();
        let overrides = RawPlan::new().with(PlanField::YearsPlanned, 10.0);
        base.merge(&overrides);

        assert_eq!(base.get(PlanField::YearsPlanned), Some(&RawValue::Number(10.0)));
        assert_eq!(base.get(PlanField::RetirementCorpus), Some(&RawValue::Number(200.0)));
    }

    #[test]
    fn test_plan_serializes_with_wire_names() {
        let plan = RawPlan::defaults().validate().unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["passiveMFYield"], 12.0);
        assert_eq!(json["yearsPlanned"], 40);
        assert_eq!(json["hybridMFAllocation"], 30.0);

        // And back again through validation
        let back: RetirementPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn test_invalid_plan_json_is_rejected() {
        let mut raw = RawPlan::defaults();
        raw.set(PlanField::HybridMFAllocation, 10.0);
        let json = serde_json::to_string(&raw).unwrap();

        assert!(serde_json::from_str::<RetirementPlan>(&json).is_err());
    }
}
