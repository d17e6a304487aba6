//! AWS Lambda handler for retirement projections
//!
//! Accepts the raw plan fields as a JSON event and returns either the yearly
//! projection with its summary, or the field-level validation errors.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use retirement_planner::{project, ProjectionEntry, ProjectionSummary, RawPlan, ValidationErrors};
use serde::Serialize;
use std::time::Instant;

/// Output from the projection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Vec<ProjectionEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ProjectionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    pub execution_time_ms: u64,
}

fn respond(raw: &RawPlan) -> ProjectionResponse {
    let start = Instant::now();

    let (projection, summary, errors) = match raw.validate() {
        Ok(plan) => {
            let result = project(&plan);
            let summary = result.summary();
            (Some(result.into_entries()), Some(summary), None)
        }
        Err(errors) => (None, None, Some(errors)),
    };

    ProjectionResponse {
        projection,
        summary,
        errors,
        execution_time_ms: start.elapsed().as_millis() as u64,
    }
}

async fn handler(event: LambdaEvent<RawPlan>) -> Result<ProjectionResponse, Error> {
    let response = respond(&event.payload);
    info!(
        "handler: request_id={} valid={}",
        event.context.request_id,
        response.errors.is_none()
    );
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use retirement_planner::PlanField;

    #[test]
    fn test_valid_plan_returns_projection() {
        let raw: RawPlan = serde_json::from_str(
            r#"{"inflationRate": 6, "retirementCorpus": 200, "debtFundYield": 7,
                "passiveMFYield": 12, "hybridMFYield": 13, "yearsPlanned": 1,
                "debtFundAllocation": 50, "passiveMFAllocation": 20,
                "hybridMFAllocation": 30, "yearlyExpenses": 6}"#,
        )
        .unwrap();
        let response = respond(&raw);

        assert!(response.errors.is_none());
        let projection = response.projection.unwrap();
        assert_eq!(projection.len(), 1);
        assert_eq!(projection[0].closing_balance, 208.8);
        assert_eq!(response.summary.unwrap().depletion_year, None);
    }

    #[test]
    fn test_invalid_plan_returns_errors_only() {
        let raw = RawPlan::defaults()
            .with(PlanField::DebtFundAllocation, 40.0)
            .with(PlanField::PassiveMFAllocation, 40.0)
            .with(PlanField::HybridMFAllocation, 19.0);
        let response = respond(&raw);

        assert!(response.projection.is_none());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["errors"]["hybridMFAllocation"], "Total allocation must be exactly 100%");
        assert!(json.get("projection").is_none());
    }
}
