//! Text renditions of the Four Ms scorecard.
//!
//! The scorecard is rendered either as an ASCII table for terminal display or
//! as Markdown for notes and documentation.

use compounder_metrics::FourMs;
use serde::{Deserialize, Serialize};
use std::fmt;

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.1}%", v * 100.0))
}

/// One labelled line of the scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    /// Section the line belongs to.
    pub section: String,

    /// Label.
    pub label: String,

    /// Formatted value.
    pub value: String,
}

/// Four Ms scorecard for one company.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCard<'a> {
    /// Ticker symbol.
    pub ticker: &'a str,

    /// Company name, if known.
    pub name: Option<&'a str>,

    /// Computed scores.
    pub scores: &'a FourMs,
}

impl<'a> ScoreCard<'a> {
    /// Create a new scorecard.
    pub const fn new(ticker: &'a str, name: Option<&'a str>, scores: &'a FourMs) -> Self {
        Self {
            ticker,
            name,
            scores,
        }
    }

    fn title(&self) -> String {
        match self.name {
            Some(name) => format!("{} ({})", self.ticker, name),
            None => self.ticker.to_string(),
        }
    }

    /// Scorecard lines grouped by section, in display order.
    pub fn lines(&self) -> Vec<ScoreLine> {
        let moat = &self.scores.moat;
        let mgmt = &self.scores.management;
        let bs = &self.scores.balance_sheet;
        let mos = &self.scores.margin_of_safety;

        let raw = [
            ("Moat", "Score", fmt_opt(moat.score, 2)),
            ("Moat", "ROIC average", fmt_pct(moat.roic_avg)),
            ("Moat", "ROIC std dev", fmt_pct(moat.roic_sd)),
            ("Moat", "Margin stability", fmt_opt(moat.margin_stability, 2)),
            ("Moat", "Gross margin", fmt_pct(moat.latest_gross_margin)),
            ("Moat", "Gross margin trend", fmt_pct(moat.gross_margin_trend)),
            ("Moat", "Pricing power", fmt_opt(moat.pricing_power_score, 2)),
            (
                "Moat",
                "ROIC persistence",
                moat.roic_persistence_score
                    .map_or_else(|| "n/a".to_string(), |s| format!("{s}/5")),
            ),
            ("Management", "Score", fmt_opt(mgmt.score, 2)),
            ("Management", "Reinvestment ratio", fmt_pct(mgmt.reinvest_ratio_avg)),
            ("Management", "Payout ratio", fmt_pct(mgmt.payout_ratio_avg)),
            ("Balance sheet", "Score", fmt_opt(bs.score, 2)),
            ("Balance sheet", "Interest coverage", fmt_opt(bs.latest_coverage, 1)),
            ("Balance sheet", "Debt / equity", fmt_opt(bs.debt_to_equity, 2)),
            ("Balance sheet", "Net debt", fmt_opt(bs.latest_net_debt, 0)),
            (
                "Margin of safety",
                "Recommended",
                fmt_pct(Some(mos.recommended_mos)),
            ),
            (
                "Margin of safety",
                "Growth used",
                fmt_pct(Some(mos.drivers.growth)),
            ),
        ];

        raw.into_iter()
            .map(|(section, label, value)| ScoreLine {
                section: section.to_string(),
                label: label.to_string(),
                value,
            })
            .collect()
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nFour Ms: {}\n", self.title()));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        let mut section = String::new();
        for line in self.lines() {
            if line.section != section {
                output.push_str(&format!("\n{}:\n", line.section));
                output.push_str(&"-".repeat(60));
                output.push('\n');
                section = line.section;
            }
            output.push_str(&format!("  {:<28} {:>12}\n", line.label, line.value));
        }

        output.push_str(&"=".repeat(60));
        output.push('\n');
        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Four Ms: {}\n\n", self.title()));
        output.push_str("| Section | Metric | Value |\n");
        output.push_str("|---------|--------|-------|\n");
        for line in self.lines() {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                line.section, line.label, line.value
            ));
        }
        output
    }
}

impl fmt::Display for ScoreCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}

/// Render `(name, value)` pairs as a two-column ASCII table.
pub fn metrics_table<'a, I>(title: &str, entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<f64>)>,
{
    let mut output = String::new();
    output.push_str(&format!("\n{title}\n"));
    output.push_str(&"=".repeat(48));
    output.push('\n');
    output.push_str(&format!("{:<30} {:>16}\n", "Metric", "Value"));
    output.push_str(&"-".repeat(48));
    output.push('\n');
    for (name, value) in entries {
        output.push_str(&format!("{:<30} {:>16}\n", name, fmt_opt(value, 4)));
    }
    output.push_str(&"=".repeat(48));
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use compounder_metrics::scoring::MosDrivers;
    use compounder_metrics::{BalanceSheetScore, ManagementScore, MarginOfSafety, MoatScore};

    fn scores() -> FourMs {
        FourMs {
            moat: MoatScore {
                roic_avg: Some(0.21),
                score: Some(0.83),
                roic_persistence_score: Some(4),
                ..Default::default()
            },
            management: ManagementScore {
                reinvest_ratio_avg: Some(0.5),
                payout_ratio_avg: Some(0.3),
                score: Some(1.0),
            },
            balance_sheet: BalanceSheetScore::default(),
            margin_of_safety: MarginOfSafety {
                recommended_mos: 0.42,
                drivers: MosDrivers {
                    growth: 0.12,
                    moat_score: 0.83,
                    mgmt_score: 1.0,
                    balance_sheet_score: None,
                },
            },
        }
    }

    #[test]
    fn test_lines_cover_all_sections() {
        let scores = scores();
        let card = ScoreCard::new("KO", Some("Coca-Cola"), &scores);
        let lines = card.lines();
        let sections: Vec<&str> = lines.iter().map(|l| l.section.as_str()).collect();
        for section in ["Moat", "Management", "Balance sheet", "Margin of safety"] {
            assert!(sections.contains(&section), "missing {section}");
        }
        let persistence = lines.iter().find(|l| l.label == "ROIC persistence").unwrap();
        assert_eq!(persistence.value, "4/5");
    }

    #[test]
    fn test_ascii_table() {
        let scores = scores();
        let table = ScoreCard::new("KO", Some("Coca-Cola"), &scores).to_ascii_table();
        assert!(table.contains("Four Ms: KO (Coca-Cola)"));
        assert!(table.contains("ROIC average"));
        assert!(table.contains("21.0%"));
        assert!(table.contains("42.0%"));
        // Missing balance-sheet inputs
        assert!(table.contains("n/a"));
    }

    #[test]
    fn test_markdown() {
        let scores = scores();
        let md = ScoreCard::new("KO", None, &scores).to_markdown();
        assert!(md.starts_with("# Four Ms: KO\n"));
        assert!(md.contains("| Management | Score | 1.00 |"));
    }

    #[test]
    fn test_metrics_table() {
        let table = metrics_table("MSFT", vec![("rev_cagr_5y", Some(0.125)), ("roic_avg", None)]);
        assert!(table.contains("rev_cagr_5y"));
        assert!(table.contains("0.1250"));
        assert!(table.contains("n/a"));
    }
}
