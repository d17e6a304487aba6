//! Scenario runner for batch and what-if projections
//!
//! Holds a base raw plan and projects variations of it. Every variant is
//! re-validated, so a variation that breaks an invariant (e.g. the
//! allocation sum) comes back as validation errors instead of a projection.

use rayon::prelude::*;

use crate::plan::{PlanField, RawPlan, RetirementPlan, ValidationErrors};
use crate::projection::{project, ProjectionResult};

/// Result of projecting one variant
pub type ScenarioOutcome = Result<ProjectionResult, ValidationErrors>;

/// Pre-configured scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// // What if inflation is higher?
/// for outcome in runner.sweep(PlanField::InflationRate, &[6.0, 7.0, 8.0]) {
///     println!("{:?}", outcome.map(|r| r.depletion_year()));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: RawPlan,
}

impl ScenarioRunner {
    /// Runner over the default plan
    pub fn new() -> Self {
        Self {
            base: RawPlan::defaults(),
        }
    }

    pub fn with_base(base: RawPlan) -> Self {
        Self { base }
    }

    /// Run one variant: the base plan with `overrides` applied
    pub fn run(&self, overrides: &RawPlan) -> ScenarioOutcome {
        let mut raw = self.base.clone();
        raw.merge(overrides);
        Ok(project(&raw.validate()?))
    }

    /// Run many variants in parallel, preserving order
    pub fn run_variants(&self, variants: &[RawPlan]) -> Vec<ScenarioOutcome> {
        variants.par_iter().map(|overrides| self.run(overrides)).collect()
    }

    /// Vary one field over a set of values
    pub fn sweep(&self, field: PlanField, values: &[f64]) -> Vec<ScenarioOutcome> {
        let variants: Vec<RawPlan> = values
            .iter()
            .map(|&value| RawPlan::new().with(field, value))
            .collect();
        self.run_variants(&variants)
    }

    /// Project many validated plans in parallel, preserving order
    pub fn run_batch(plans: &[RetirementPlan]) -> Vec<ProjectionResult> {
        plans.par_iter().map(project).collect()
    }

    pub fn base(&self) -> &RawPlan {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut RawPlan {
        &mut self.base
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
