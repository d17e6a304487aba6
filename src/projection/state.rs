//! Running state carried between projection years

use crate::plan::RetirementPlan;

/// State of the corpus at the start of a projection year
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current projection year (1-indexed, 0 before the first year)
    pub year: u32,

    /// Unrounded balance at the start of the year
    pub opening_balance: f64,

    /// Unrounded withdrawal for the year, already inflated
    pub current_expenses: f64,

    /// Multiplier applied to expenses at each year end
    expense_growth: f64,
}

impl ProjectionState {
    /// Initialize state from a plan at projection start
    pub fn from_plan(plan: &RetirementPlan) -> Self {
        Self {
            year: 0,
            opening_balance: plan.retirement_corpus(),
            current_expenses: plan.yearly_expenses(),
            expense_growth: 1.0 + plan.inflation_rate() / 100.0,
        }
    }

    /// Move to the next year
    pub fn advance_year(&mut self) {
        self.year += 1;
    }

    /// Carry the year's unrounded closing balance forward and inflate expenses
    pub fn close_year(&mut self, closing_balance: f64) {
        self.opening_balance = if closing_balance > 0.0 { closing_balance } else { 0.0 };
        self.current_expenses *= self.expense_growth;
    }

    /// No funds left to earn on or withdraw from
    pub fn is_depleted(&self) -> bool {
        self.opening_balance <= 0.0
    }
}
