//! Core projection engine for yearly corpus balances

use crate::plan::{AssetClass, RetirementPlan};
use log::debug;
use super::state::ProjectionState;
use super::entries::{ProjectionEntry, ProjectionResult};
use super::round_to_cents;

/// Blended annual return: each fund's yield weighted by its allocation share
///
/// Allocations are assumed never to drift, so one rate applies to the whole
/// balance for the entire horizon.
pub fn weighted_return(plan: &RetirementPlan) -> f64 {
    AssetClass::ALL
        .iter()
        .map(|&asset| (plan.allocation(asset) / 100.0) * (plan.yield_rate(asset) / 100.0))
        .sum()
}

/// Main projection engine
pub struct ProjectionEngine<'a> {
    plan: &'a RetirementPlan,
    weighted_return: f64,
}

impl<'a> ProjectionEngine<'a> {
    /// Create an engine for a validated plan
    pub fn new(plan: &'a RetirementPlan) -> Self {
        Self {
            plan,
            weighted_return: weighted_return(plan),
        }
    }

    pub fn weighted_return(&self) -> f64 {
        self.weighted_return
    }

    /// Run the projection over the plan's full horizon
    pub fn run(&self) -> ProjectionResult {
        let years = self.plan.years_planned();
        let weights = AssetClass::ALL.map(|asset| self.plan.allocation(asset) / 100.0);
        let mut result = ProjectionResult::new(self.weighted_return, weights, years as usize);
        let mut state = ProjectionState::from_plan(self.plan);

        debug!(
            "run: corpus={} expenses={} weighted_return={:.6} years={}",
            self.plan.retirement_corpus(),
            self.plan.yearly_expenses(),
            self.weighted_return,
            years
        );

        for _year in 1..=years {
            state.advance_year();

            if state.is_depleted() {
                result.add_entry(ProjectionEntry::depleted(state.year));
                continue;
            }

            let (entry, closing_balance) = self.calculate_year(&state);
            if entry.is_depleted() {
                debug!("run: corpus depleted in year {}", entry.year);
            }
            result.add_entry(entry);

            state.close_year(closing_balance);
        }

        result
    }

    /// Calculate one funded year
    ///
    /// Returns the rounded entry and the unrounded closing balance that seeds
    /// the following year. A closing balance that rounds to zero counts as
    /// depleted, so no sub-cent remainder is carried forward.
    fn calculate_year(&self, state: &ProjectionState) -> (ProjectionEntry, f64) {
        let opening_balance = state.opening_balance;
        let investment_returns = opening_balance * self.weighted_return;
        let closing_balance = opening_balance + investment_returns - state.current_expenses;
        let floored_closing = if closing_balance > 0.0 { closing_balance } else { 0.0 };

        let entry = ProjectionEntry {
            year: state.year,
            opening_balance: round_to_cents(opening_balance),
            investment_returns: round_to_cents(investment_returns),
            yearly_expenses: round_to_cents(state.current_expenses),
            closing_balance: round_to_cents(floored_closing),
        };

        let carried = if entry.is_depleted() { 0.0 } else { closing_balance };
        (entry, carried)
    }
}

/// Project a validated plan year by year
pub fn project(plan: &RetirementPlan) -> ProjectionResult {
    ProjectionEngine::new(plan).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{PlanField, RawPlan};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    fn scenario_a() -> RetirementPlan {
        RawPlan::defaults()
            .with(PlanField::RetirementCorpus, 200.0)
            .with(PlanField::YearsPlanned, 1.0)
            .validate()
            .unwrap()
    }

    fn zero_yield_plan(corpus: f64, expenses: f64, years: f64) -> RetirementPlan {
        RawPlan::defaults()
            .with(PlanField::RetirementCorpus, corpus)
            .with(PlanField::YearlyExpenses, expenses)
            .with(PlanField::YearsPlanned, years)
            .with(PlanField::DebtFundYield, 0.0)
            .with(PlanField::PassiveMFYield, 0.0)
            .with(PlanField::HybridMFYield, 0.0)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_weighted_return() {
        assert_relative_eq!(weighted_return(&scenario_a()), 0.074, epsilon = 1e-12);
    }

    #[test]
    fn test_single_year_projection() {
        let result = project(&scenario_a());
        assert_eq!(result.len(), 1);

        let entry = result.entries()[0];
        assert_eq!(entry.year, 1);
        assert_relative_eq!(entry.opening_balance, 200.00);
        assert_relative_eq!(entry.investment_returns, 14.80);
        assert_relative_eq!(entry.yearly_expenses, 6.00);
        assert_relative_eq!(entry.closing_balance, 208.80);
    }

    #[test]
    fn test_zero_corpus_is_depleted_from_year_one() {
        let plan = RawPlan::defaults()
            .with(PlanField::RetirementCorpus, 0.0)
            .with(PlanField::YearlyExpenses, 5.0)
            .with(PlanField::YearsPlanned, 3.0)
            .validate()
            .unwrap();
        let result = project(&plan);

        assert_eq!(result.len(), 3);
        for (i, entry) in result.entries().iter().enumerate() {
            assert_eq!(*entry, ProjectionEntry::depleted(i as u32 + 1));
        }
        assert_eq!(result.depletion_year(), Some(1));
    }

    #[test]
    fn test_shortfall_floors_closing_and_zeroes_later_years() {
        let result = project(&zero_yield_plan(10.0, 15.0, 2.0));

        let first = result.entries()[0];
        assert_eq!(first.opening_balance, 10.0);
        assert_eq!(first.investment_returns, 0.0);
        assert_eq!(first.yearly_expenses, 15.0);
        assert_eq!(first.closing_balance, 0.0);

        assert_eq!(result.entries()[1], ProjectionEntry::depleted(2));
        assert_eq!(result.depletion_year(), Some(1));
    }

    #[test]
    fn test_zero_return_balances_strictly_decrease() {
        let result = project(&zero_yield_plan(100.0, 10.0, 20.0));
        let funded: Vec<_> = result.entries().iter().take_while(|e| e.opening_balance > 0.0).collect();

        assert!(funded.len() > 1);
        for pair in funded.windows(2) {
            assert!(pair[1].opening_balance < pair[0].opening_balance);
        }
    }

    #[test]
    fn test_expenses_grow_with_inflation() {
        let plan = RawPlan::defaults().with(PlanField::YearsPlanned, 3.0).validate().unwrap();
        let result = project(&plan);
        let expenses: Vec<f64> = result.entries().iter().map(|e| e.yearly_expenses).collect();

        assert_relative_eq!(expenses[0], 6.0);
        assert_relative_eq!(expenses[1], 6.36);
        assert_relative_eq!(expenses[2], 6.74);
    }

    #[test]
    fn test_next_year_is_seeded_from_unrounded_closing() {
        let plan = RawPlan::defaults().with(PlanField::YearsPlanned, 2.0).validate().unwrap();
        let result = project(&plan);

        // Year 1 closes at 208.8 (unrounded 208.79999...)
        let year2 = result.entries()[1];
        assert_relative_eq!(year2.opening_balance, 208.8);
        let expected_returns = (200.0 + 200.0 * 0.074 - 6.0) * 0.074;
        assert_abs_diff_eq!(year2.investment_returns, expected_returns, epsilon = 0.005);
    }

    #[test]
    fn test_default_plan_full_horizon() {
        let plan = RawPlan::defaults().validate().unwrap();
        let result = project(&plan);

        assert_eq!(result.len(), 40);
        assert_eq!(result.entries().last().unwrap().year, 40);
    }

    #[test]
    fn test_depletion_mid_horizon() {
        let plan = RawPlan::defaults()
            .with(PlanField::RetirementCorpus, 50.0)
            .with(PlanField::YearlyExpenses, 10.0)
            .with(PlanField::YearsPlanned, 15.0)
            .validate()
            .unwrap();
        let result = project(&plan);
        let depleted_in = result.depletion_year().unwrap();

        assert!(depleted_in > 1 && depleted_in < 15);
        for entry in &result.entries()[depleted_in as usize..] {
            assert_eq!(*entry, ProjectionEntry::depleted(entry.year));
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let plan = RawPlan::defaults().validate().unwrap();
        let first = serde_json::to_string(&project(&plan)).unwrap();
        let second = serde_json::to_string(&project(&plan)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fund_breakdown_uses_allocation_weights() {
        let plan = RawPlan::defaults().with(PlanField::YearsPlanned, 2.0).validate().unwrap();
        let result = project(&plan);

        let year1 = result.fund_breakdown(1).unwrap();
        assert_relative_eq!(year1.debt_fund_balance, 100.0);
        assert_relative_eq!(year1.passive_mf_balance, 40.0);
        assert_relative_eq!(year1.hybrid_mf_balance, 60.0);
        assert_relative_eq!(year1.cumulative_returns, 14.8);

        let year2 = result.fund_breakdown(2).unwrap();
        let sum = year2.debt_fund_balance + year2.passive_mf_balance + year2.hybrid_mf_balance;
        assert_abs_diff_eq!(sum, result.entries()[1].opening_balance, epsilon = 0.02);

        assert!(result.fund_breakdown(0).is_none());
        assert!(result.fund_breakdown(3).is_none());
    }

    #[test]
    fn test_summary() {
        let result = project(&zero_yield_plan(30.0, 10.0, 5.0));
        let summary = result.summary();

        assert_eq!(summary.total_years, 5);
        assert_eq!(summary.depletion_year, Some(3));
        assert_eq!(summary.final_balance, 0.0);
        assert_relative_eq!(summary.total_returns, 0.0);
        // 10 + 10.6 + 11.24 (year 3 is the last funded year)
        assert_relative_eq!(summary.total_expenses, 31.84);
    }

    fn valid_plan() -> impl Strategy<Value = RetirementPlan> {
        (
            0.0f64..10_000.0,
            0.0f64..1_000.0,
            1u32..=100,
            0.0f64..=100.0,
            (0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0),
            (0u32..=100, 0u32..=100),
        )
            .prop_map(|(corpus, expenses, years, inflation, yields, (debt, passive))| {
                let passive = passive.min(100 - debt);
                let hybrid = 100 - debt - passive;
                RawPlan::new()
                    .with(PlanField::RetirementCorpus, corpus)
                    .with(PlanField::YearlyExpenses, expenses)
                    .with(PlanField::YearsPlanned, years)
                    .with(PlanField::InflationRate, inflation)
                    .with(PlanField::DebtFundYield, yields.0)
                    .with(PlanField::PassiveMFYield, yields.1)
                    .with(PlanField::HybridMFYield, yields.2)
                    .with(PlanField::DebtFundAllocation, debt)
                    .with(PlanField::PassiveMFAllocation, passive)
                    .with(PlanField::HybridMFAllocation, hybrid)
                    .validate()
                    .unwrap()
            })
    }

    proptest! {
        #[test]
        fn prop_one_entry_per_year_in_order(plan in valid_plan()) {
            let result = project(&plan);
            prop_assert_eq!(result.len(), plan.years_planned() as usize);
            for (i, entry) in result.entries().iter().enumerate() {
                prop_assert_eq!(entry.year, i as u32 + 1);
            }
        }

        #[test]
        fn prop_closing_balance_never_negative(plan in valid_plan()) {
            for entry in project(&plan).entries() {
                prop_assert!(entry.closing_balance >= 0.0);
                prop_assert!(entry.opening_balance >= 0.0);
            }
        }

        #[test]
        fn prop_depleted_stays_depleted(plan in valid_plan()) {
            let result = project(&plan);
            if let Some(year) = result.depletion_year() {
                for entry in &result.entries()[year as usize..] {
                    prop_assert_eq!(*entry, ProjectionEntry::depleted(entry.year));
                }
            }
        }

        #[test]
        fn prop_projection_is_deterministic(plan in valid_plan()) {
            prop_assert_eq!(project(&plan), project(&plan));
        }
    }
}
