//! Terminal rendering of screen outcomes.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use screener::{Formula, ScreenOutcome, ScreenReport};

/// Severity of an outcome banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub(crate) const fn prefix(self) -> &'static str {
        match self {
            Self::Success => "✔",
            Self::Warning => "⚠",
            Self::Error => "✖",
        }
    }
}

/// One-line summary of how a screen ended.
pub(crate) fn banner(outcome: &ScreenOutcome, filter: &str) -> (Severity, String) {
    match outcome {
        ScreenOutcome::EmptySelection => (
            Severity::Warning,
            "No tickers to analyze. Pick a universe or sector, or pass --tickers.".to_string(),
        ),
        ScreenOutcome::NoData { requested } => (
            Severity::Error,
            format!(
                "Could not compute metrics for any of the {requested} tickers. \
                 Check the symbols or try a shorter lookback."
            ),
        ),
        ScreenOutcome::NoMatches { requested, fetched } => (
            Severity::Warning,
            format!("{fetched} of {requested} tickers had data, but none passed: {filter}."),
        ),
        ScreenOutcome::Matches(report) => (
            Severity::Success,
            format!(
                "{} of {} tickers passed ({} with data), ranked by {}: {filter}.",
                report.records.len(),
                report.requested,
                report.fetched,
                report.formula.primary_metric()
            ),
        ),
    }
}

/// Ranked results table, best first.
pub(crate) fn results_table(report: &ScreenReport) -> Table {
    let with_score = report.formula == Formula::RuleOf40;

    let mut header = vec![
        "Ticker",
        "Revenue CAGR (%)",
        "Net Profit Growth (%)",
        "Net Margin (%)",
    ];
    if with_score {
        header.push("Rule of 40");
    }
    header.push("Revenue (bn)");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for record in report.ranked() {
        let mut row = vec![
            Cell::new(report.display_ticker(&record.symbol)),
            number(record.revenue_cagr),
            number(record.profit_growth),
            number(record.net_margin),
        ];
        if with_score {
            row.push(match record.rule_of_40 {
                Some(score) => number(score),
                None => Cell::new("-").set_alignment(CellAlignment::Right),
            });
        }
        row.push(number(record.revenue_bn));
        table.add_row(row);
    }

    table
}

fn number(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener::{MetricRecord, Symbol};

    fn report(formula: Formula) -> ScreenReport {
        let record = |ticker: &str, growth: f64, score: Option<f64>| MetricRecord {
            symbol: Symbol::new(ticker),
            revenue_cagr: 12.5,
            profit_growth: growth,
            net_margin: 20.0,
            rule_of_40: score,
            revenue_bn: 1.23,
        };
        ScreenReport {
            formula,
            market_suffix: Some(".BK".to_string()),
            requested: 5,
            fetched: 3,
            records: vec![
                record("AOT.BK", 15.0, Some(32.5)),
                record("PTT.BK", 40.0, Some(32.5)),
            ],
        }
    }

    #[test]
    fn test_banner_severity() {
        let filter = "revenue CAGR >= 5%";
        assert_eq!(banner(&ScreenOutcome::EmptySelection, filter).0, Severity::Warning);
        assert_eq!(
            banner(&ScreenOutcome::NoData { requested: 4 }, filter).0,
            Severity::Error
        );

        let (severity, message) = banner(
            &ScreenOutcome::NoMatches {
                requested: 4,
                fetched: 2,
            },
            filter,
        );
        assert_eq!(severity, Severity::Warning);
        assert_eq!(message, "2 of 4 tickers had data, but none passed: revenue CAGR >= 5%.");

        let (severity, message) =
            banner(&ScreenOutcome::Matches(report(Formula::GrowthPair)), filter);
        assert_eq!(severity, Severity::Success);
        assert_eq!(
            message,
            "2 of 5 tickers passed (3 with data), ranked by Net Profit Growth (%): \
             revenue CAGR >= 5%."
        );

        let (_, message) = banner(&ScreenOutcome::Matches(report(Formula::RuleOf40)), filter);
        assert!(message.contains("ranked by Rule of 40:"));
    }

    #[test]
    fn test_table_strips_suffix_and_ranks() {
        let rendered = results_table(&report(Formula::GrowthPair)).to_string();

        assert!(!rendered.contains(".BK"));
        assert!(!rendered.contains("Rule of 40"));
        let ptt = rendered.find("PTT").unwrap();
        let aot = rendered.find("AOT").unwrap();
        assert!(ptt < aot);
    }

    #[test]
    fn test_table_shows_score_for_rule_of_40() {
        let rendered = results_table(&report(Formula::RuleOf40)).to_string();
        assert!(rendered.contains("Rule of 40"));
        assert!(rendered.contains("32.50"));
    }
}
