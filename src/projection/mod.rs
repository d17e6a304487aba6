//! Yearly projection of a retirement corpus

mod state;
mod engine;
mod entries;

pub use state::ProjectionState;
pub use engine::{project, weighted_return, ProjectionEngine};
pub use entries::{FundBreakdown, ProjectionEntry, ProjectionResult, ProjectionSummary};

/// Round to 2 decimal places, half away from zero
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(14.799999999999999), 14.8);
        assert_eq!(round_to_cents(6.7416), 6.74);
        assert_eq!(round_to_cents(2.5), 2.5);
        assert_eq!(round_to_cents(0.004), 0.0);
        assert_eq!(round_to_cents(-1.236), -1.24);
    }
}
