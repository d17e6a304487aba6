//! AdviceProvider trait definition

use async_trait::async_trait;
use crate::plan::RetirementPlan;
use super::AdviceError;

/// Source of free-text advice for a plan
///
/// Receives the validated plan only, never the projection output.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Request advice for a plan
    async fn request_advice(&self, plan: &RetirementPlan) -> Result<String, AdviceError>;
}
