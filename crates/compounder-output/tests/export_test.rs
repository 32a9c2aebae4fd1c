//! Exports built from store-backed computations

use compounder_data::{AnnualFacts, Company, SqliteStore};
use compounder_metrics::{
    FiscalSeriesExtractor, MetricsConfig, ScenarioData, ScenarioParams, four_ms, metric_summary,
    run_scenario, timeseries_all,
};
use compounder_output::{
    ExportFormat, Exporter, MetricsExport, ReportBuilder, ScoreCard, TimeseriesExport,
    ValuationExport,
};
use rstest::{fixture, rstest};

const CIK: &str = "0000000007";

#[fixture]
fn store() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    store
        .upsert_company(&Company::new(CIK, "EXPT", Some("Export Corp")))
        .unwrap();
    let years: Vec<AnnualFacts> = (0..6)
        .map(|i| {
            let growth = 1.08_f64.powi(i);
            let mut year = AnnualFacts::new(2018 + i);
            year.income.revenue = Some(500.0 * growth);
            year.income.eps_diluted = Some(2.0 * growth);
            year.income.ebit = Some(100.0 * growth);
            year.income.interest_expense = Some(5.0);
            year.income.shares_diluted = Some(50.0);
            year.cash_flow.cfo = Some(120.0 * growth);
            year.cash_flow.capex = Some(30.0 * growth);
            year
        })
        .collect();
    store.put_annual_facts(CIK, &years).unwrap();
    store
}

#[rstest]
fn test_metrics_csv_has_one_row_per_metric(store: SqliteStore) {
    let config = MetricsConfig::default();
    let series = FiscalSeriesExtractor::new(&store).load(CIK).unwrap();
    let summary = metric_summary(&series, &config.returns);

    let export = MetricsExport::from_entries("EXPT", summary.entries());
    let csv = export.export_to_string(ExportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "metric,value");
    assert_eq!(lines.len(), summary.entries().len() + 1);
    // No balance sheet was stored
    assert!(lines.contains(&"debt_to_equity,"));
}

#[rstest]
fn test_timeseries_csv(store: SqliteStore) {
    let config = MetricsConfig::default();
    let series = FiscalSeriesExtractor::new(&store).load(CIK).unwrap();
    let export = TimeseriesExport::new("EXPT", &timeseries_all(&series, &config.returns));

    assert_eq!(export.rows.len(), 6);
    assert_eq!(export.rows[0].fiscal_year, 2018);
    assert_eq!(export.rows[0].owner_earnings, Some(90.0));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("timeseries.{}", ExportFormat::Csv.extension()));
    export.export_to_file(&path, ExportFormat::Csv).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 7);
}

#[rstest]
fn test_valuation_and_report(store: SqliteStore) {
    let config = MetricsConfig::default();
    let series = FiscalSeriesExtractor::new(&store).load(CIK).unwrap();
    let summary = metric_summary(&series, &config.returns);
    let data = ScenarioData {
        latest_eps: summary.latest_eps,
        growth: summary.growth,
        owner_earnings_ps: summary.latest_owner_earnings_ps,
        current_price: Some(40.0),
    };
    let scenario = run_scenario(&data, &ScenarioParams::default(), &config.valuation).unwrap();

    let export = ValuationExport::new("EXPT", CIK, scenario);
    let json = export.export_to_string(ExportFormat::PrettyJson).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["cik"], CIK);
    assert_eq!(value["results"]["current_price"], 40.0);

    let report = ReportBuilder::new()
        .ticker("EXPT")
        .cik(CIK)
        .kind("valuation")
        .contents(&export)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(report.contents["ticker"], "EXPT");
}

#[rstest]
fn test_scorecard_renders(store: SqliteStore) {
    let config = MetricsConfig::default();
    let series = FiscalSeriesExtractor::new(&store).load(CIK).unwrap();
    let scores = four_ms(&series, &config);

    let table = ScoreCard::new("EXPT", Some("Export Corp"), &scores).to_string();
    assert!(table.contains("Four Ms: EXPT (Export Corp)"));
    assert!(table.contains("Recommended"));
}
