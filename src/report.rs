//! Presentation helpers: text table, depletion caption and CSV export

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use crate::projection::ProjectionResult;

/// Format an amount with Indian digit grouping and at most 2 decimals
///
/// `1234567.891` becomes `12,34,567.89`; trailing zero decimals are dropped.
pub fn format_lacs(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    let len = digits.len();
    for (i, digit) in digits.iter().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    let negative = value < 0.0 && (grouped != "0" || !frac.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// Caption naming the depletion year, if the corpus runs out
pub fn depletion_caption(result: &ProjectionResult) -> Option<String> {
    result
        .depletion_year()
        .map(|year| format!("Your corpus is projected to be depleted in year {}.", year))
}

/// Fixed-width table of every year with the per-fund split
pub fn render_table(result: &ProjectionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4} {:>14} {:>12} {:>12} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Opening (L)", "Interest (L)", "Expense (L)", "Closing (L)", "Debt (L)", "Passive MF (L)", "Hybrid MF (L)"
    );
    let _ = writeln!(out, "{}", "-".repeat(112));

    for entry in result.entries() {
        let funds = result.fund_breakdown(entry.year);
        let (debt, passive, hybrid) = funds
            .map(|f| (f.debt_fund_balance, f.passive_mf_balance, f.hybrid_mf_balance))
            .unwrap_or_default();
        let marker = if entry.is_depleted() { " *" } else { "" };
        let _ = writeln!(
            out,
            "{:>4} {:>14} {:>12} {:>12} {:>14} {:>14} {:>14} {:>14}{}",
            entry.year,
            format_lacs(entry.opening_balance),
            format_lacs(entry.investment_returns),
            format_lacs(entry.yearly_expenses),
            format_lacs(entry.closing_balance),
            format_lacs(debt),
            format_lacs(passive),
            format_lacs(hybrid),
            marker,
        );
    }

    if let Some(caption) = depletion_caption(result) {
        let _ = writeln!(out, "\n{}", caption);
    }
    out
}

/// Write the yearly entries as CSV
pub fn write_csv<W: Write>(result: &ProjectionResult, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in result.entries() {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the yearly entries to a CSV file
pub fn write_csv_path<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_csv(result, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{PlanField, RawPlan};
    use crate::projection::project;

    #[test]
    fn test_format_lacs_grouping() {
        assert_eq!(format_lacs(0.0), "0");
        assert_eq!(format_lacs(208.8), "208.8");
        assert_eq!(format_lacs(1234.5), "1,234.5");
        assert_eq!(format_lacs(123456.0), "1,23,456");
        assert_eq!(format_lacs(1234567.891), "12,34,567.89");
        assert_eq!(format_lacs(-5000.25), "-5,000.25");
        assert_eq!(format_lacs(-0.001), "0");
    }

    #[test]
    fn test_caption_only_when_depleted() {
        let funded = project(&RawPlan::defaults().with(PlanField::YearsPlanned, 5.0).validate().unwrap());
        assert!(depletion_caption(&funded).is_none());

        let depleted = project(
            &RawPlan::defaults()
                .with(PlanField::RetirementCorpus, 0.0)
                .with(PlanField::YearsPlanned, 2.0)
                .validate()
                .unwrap(),
        );
        assert_eq!(
            depletion_caption(&depleted).as_deref(),
            Some("Your corpus is projected to be depleted in year 1.")
        );
    }

    #[test]
    fn test_render_table_has_row_per_year() {
        let result = project(&RawPlan::defaults().with(PlanField::YearsPlanned, 3.0).validate().unwrap());
        let table = render_table(&result);

        assert_eq!(table.lines().count(), 2 + 3);
        assert!(table.contains("208.8"));
    }

    #[test]
    fn test_write_csv() {
        let result = project(&RawPlan::defaults().with(PlanField::YearsPlanned, 2.0).validate().unwrap());
        let mut buffer = Vec::new();
        write_csv(&result, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("year,openingBalance,investmentReturns,yearlyExpenses,closingBalance")
        );
        assert_eq!(lines.next(), Some("1,200.0,14.8,6.0,208.8"));
        assert_eq!(lines.count(), 1);
    }
}
