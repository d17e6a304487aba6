//! Projection output structures

use crate::plan::AssetClass;
use serde::{Deserialize, Serialize};

/// One simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionEntry {
    /// 1-based year index
    pub year: u32,
    pub opening_balance: f64,
    pub investment_returns: f64,
    /// Withdrawal for the year, already inflation-adjusted
    pub yearly_expenses: f64,
    /// Never negative
    pub closing_balance: f64,
}

impl ProjectionEntry {
    /// An all-zero entry for a year after depletion
    pub fn depleted(year: u32) -> Self {
        Self {
            year,
            opening_balance: 0.0,
            investment_returns: 0.0,
            yearly_expenses: 0.0,
            closing_balance: 0.0,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.closing_balance <= 0.0
    }
}

/// Per-fund view of one year's opening balance
///
/// The engine tracks a single aggregate balance; this split applies the
/// plan's fixed allocation weights to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundBreakdown {
    pub year: u32,
    pub debt_fund_balance: f64,
    #[serde(rename = "passiveMFBalance")]
    pub passive_mf_balance: f64,
    #[serde(rename = "hybridMFBalance")]
    pub hybrid_mf_balance: f64,
    /// Returns earned from year 1 through this year
    pub cumulative_returns: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Blended annual return used for every year
    pub weighted_return: f64,

    /// Allocation weights (fractions) in debt/passive/hybrid order
    allocation_weights: [f64; 3],

    /// Yearly entries, index 0 = year 1
    entries: Vec<ProjectionEntry>,
}

impl ProjectionResult {
    pub(super) fn new(weighted_return: f64, allocation_weights: [f64; 3], capacity: usize) -> Self {
        Self {
            weighted_return,
            allocation_weights,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn add_entry(&mut self, entry: ProjectionEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ProjectionEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ProjectionEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a 1-based year
    pub fn entry(&self, year: u32) -> Option<&ProjectionEntry> {
        year.checked_sub(1).and_then(|i| self.entries.get(i as usize))
    }

    /// First year whose closing balance is zero or below
    pub fn depletion_year(&self) -> Option<u32> {
        self.entries.iter().find(|e| e.is_depleted()).map(|e| e.year)
    }

    /// Per-fund split of a year's opening balance
    pub fn fund_breakdown(&self, year: u32) -> Option<FundBreakdown> {
        let entry = self.entry(year)?;
        let cumulative: f64 = self.entries[..year as usize]
            .iter()
            .map(|e| e.investment_returns)
            .sum();
        let share = |asset: AssetClass| {
            let weight = match asset {
                AssetClass::DebtFund => self.allocation_weights[0],
                AssetClass::PassiveMF => self.allocation_weights[1],
                AssetClass::HybridMF => self.allocation_weights[2],
            };
            super::round_to_cents(entry.opening_balance * weight)
        };

        Some(FundBreakdown {
            year,
            debt_fund_balance: share(AssetClass::DebtFund),
            passive_mf_balance: share(AssetClass::PassiveMF),
            hybrid_mf_balance: share(AssetClass::HybridMF),
            cumulative_returns: super::round_to_cents(cumulative),
        })
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_returns: f64 = self.entries.iter().map(|e| e.investment_returns).sum();
        let total_expenses: f64 = self.entries.iter().map(|e| e.yearly_expenses).sum();
        let final_balance = self.entries.last().map(|e| e.closing_balance).unwrap_or(0.0);

        ProjectionSummary {
            total_years: self.entries.len() as u32,
            depletion_year: self.depletion_year(),
            final_balance,
            total_returns: super::round_to_cents(total_returns),
            total_expenses: super::round_to_cents(total_expenses),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub depletion_year: Option<u32>,
    pub final_balance: f64,
    pub total_returns: f64,
    pub total_expenses: f64,
}
