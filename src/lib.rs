//! Retirement Planner - Yearly corpus projection under blended returns
//!
//! This library provides:
//! - Plan validation (per-field ranges, then the allocation-sum invariant)
//! - Deterministic yearly projection with inflation-adjusted withdrawals
//! - Depletion detection and per-fund views of the balance
//! - Batch and what-if scenario runs
//! - Saved plans and an optional advice service client

pub mod plan;
pub mod projection;
pub mod scenario;
pub mod advice;
pub mod config;
pub mod report;
pub mod storage;

// Re-export commonly used types
pub use plan::{PlanField, RawPlan, RawValue, RetirementPlan, ValidationErrors};
pub use projection::{project, ProjectionEngine, ProjectionEntry, ProjectionResult, ProjectionSummary};
pub use scenario::ScenarioRunner;
pub use advice::{AdviceError, AdviceOutcome, AdviceProvider, AdviceSession, HttpAdviceClient};
pub use config::AdviceConfig;
pub use storage::{JsonFileStore, PlanStore};
