//! Advisor prompt rendering

use crate::plan::RetirementPlan;
use handlebars::Handlebars;
use log::debug;
use super::AdviceError;

/// Advisor prompt over the serialized plan fields
pub const ADVISOR_PROMPT: &str = "\
You are a financial advisor specializing in retirement planning. Based on the following retirement plan data, provide personalized advice on adjusting investment allocations to optimize the plan.

Retirement Plan Data:
- Inflation Rate: {{inflationRate}}%
- Retirement Corpus: {{retirementCorpus}} Lacs
- Debt Fund Yield: {{debtFundYield}}%
- Passive MF Yield: {{passiveMFYield}}%
- Hybrid MF Yield: {{hybridMFYield}}%
- Years Planned: {{yearsPlanned}} years
- Debt Fund Allocation: {{debtFundAllocation}}%
- Passive MF Allocation: {{passiveMFAllocation}}%
- Hybrid MF Allocation: {{hybridMFAllocation}}%
- Yearly Expenses: {{yearlyExpenses}} Lacs

Consider the user's goal to optimize their retirement plan and provide specific, actionable advice on whether they should adjust their investment allocations in debt funds, passive MFs, and hybrid MFs. Explain the reasoning behind your advice.
";

/// Renders the advisor prompt for a plan
pub struct AdvicePrompt {
    hbs: Handlebars<'static>,
    template: String,
}

impl AdvicePrompt {
    pub fn new() -> Self {
        Self::with_template(ADVISOR_PROMPT)
    }

    /// Use a custom template; it sees the same camelCase plan fields
    pub fn with_template(template: impl Into<String>) -> Self {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        Self {
            hbs,
            template: template.into(),
        }
    }

    pub fn render(&self, plan: &RetirementPlan) -> Result<String, AdviceError> {
        let prompt = self
            .hbs
            .render_template(&self.template, plan)
            .map_err(|e| AdviceError::Prompt(e.to_string()))?;
        debug!("render: prompt_len={}", prompt.len());
        Ok(prompt)
    }
}

impl Default for AdvicePrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{PlanField, RawPlan};

    #[test]
    fn test_render_includes_every_field() {
        let plan = RawPlan::defaults()
            .with(PlanField::RetirementCorpus, 250.0)
            .validate()
            .unwrap();
        let prompt = AdvicePrompt::new().render(&plan).unwrap();

        assert!(prompt.contains("- Inflation Rate: 6"));
        assert!(prompt.contains("- Retirement Corpus: 250"));
        assert!(prompt.contains("- Passive MF Yield: 12"));
        assert!(prompt.contains("- Years Planned: 40 years"));
        assert!(prompt.contains("- Hybrid MF Allocation: 30"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_unknown_variable_fails_in_strict_mode() {
        let plan = RawPlan::defaults().validate().unwrap();
        let err = AdvicePrompt::with_template("Risk: {{riskProfile}}").render(&plan).unwrap_err();
        assert!(matches!(err, AdviceError::Prompt(_)));
    }
}
