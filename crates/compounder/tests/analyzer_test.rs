//! End-to-end tests: companyfacts ingestion, analysis, valuation history and alerts

use approx::assert_abs_diff_eq;
use compounder::data::edgar::XbrlDocument;
use compounder::data::{AlertKind, SqliteStore};
use compounder::metrics::{GrowthSource, ScenarioParams};
use compounder::{
    AnalysisError, CompanyAnalyzer, TickerList, add_rule, evaluate_alerts, ingest_document,
    missing_tickers, seed_directory, seed_file, valuation_snapshot,
};
use rstest::{fixture, rstest};

/// Annual entries for one concept, `fy` ascending from 2019.
fn annual(values: &[f64]) -> String {
    values
        .iter()
        .zip(2019..)
        .map(|(v, fy)| {
            format!(
                r#"{{"start": "{fy}-01-01", "end": "{fy}-12-31", "val": {v}, "fy": {fy}, "fp": "FY", "form": "10-K"}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn concept(name: &str, unit: &str, values: &[f64]) -> String {
    format!(
        r#""{name}": {{"label": "{name}", "description": null, "units": {{"{unit}": [{}]}}}}"#,
        annual(values)
    )
}

/// Five fiscal years of a company compounding at 10% a year.
fn companyfacts(cik: u32, name: &str) -> String {
    let growth: Vec<f64> = (0..5).map(|i| 1.1_f64.powi(i)).collect();
    let scaled = |base: f64| growth.iter().map(|g| base * g).collect::<Vec<_>>();
    let concepts = [
        concept("Revenues", "USD", &scaled(1_000.0)),
        concept("GrossProfit", "USD", &scaled(600.0)),
        concept("OperatingIncomeLoss", "USD", &scaled(300.0)),
        concept("InterestExpense", "USD", &[10.0; 5]),
        concept("IncomeTaxExpenseBenefit", "USD", &scaled(63.0)),
        concept("EarningsPerShareDiluted", "USD/shares", &scaled(2.0)),
        concept(
            "WeightedAverageNumberOfDilutedSharesOutstanding",
            "shares",
            &[100.0; 5],
        ),
        concept("CashAndCashEquivalentsAtCarryingValue", "USD", &[200.0; 5]),
        concept("LongTermDebtNoncurrent", "USD", &[400.0, 350.0, 300.0, 250.0, 200.0]),
        concept("StockholdersEquity", "USD", &scaled(1_200.0)),
        concept(
            "NetCashProvidedByUsedInOperatingActivities",
            "USD",
            &scaled(350.0),
        ),
        concept(
            "PaymentsToAcquirePropertyPlantAndEquipment",
            "USD",
            &scaled(150.0),
        ),
        concept("PaymentsOfDividends", "USD", &scaled(80.0)),
    ];
    format!(
        r#"{{"cik": {cik}, "entityName": "{name}", "facts": {{"us-gaap": {{{}}}}}}}"#,
        concepts.join(",")
    )
}

#[fixture]
fn store() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    let doc = XbrlDocument::parse_json(&companyfacts(21344, "COCA COLA CO")).unwrap();
    ingest_document(&store, "ko", &doc).unwrap();
    store
}

#[rstest]
fn test_ingest_registers_company(store: SqliteStore) {
    let analyzer = CompanyAnalyzer::new(&store);
    let summary = analyzer.company_summary("KO").unwrap();
    assert_eq!(summary.company.cik, "0000021344");
    assert_eq!(summary.company.name.as_deref(), Some("COCA COLA CO"));
    assert_eq!(summary.latest_income.unwrap().fiscal_year, 2023);
}

#[test]
fn test_reingest_replaces_years() {
    let store = SqliteStore::in_memory().unwrap();
    let doc = XbrlDocument::parse_json(&companyfacts(21344, "COCA COLA CO")).unwrap();
    let first = ingest_document(&store, "KO", &doc).unwrap();
    let second = ingest_document(&store, "KO", &doc).unwrap();
    assert_eq!(first.years, vec![2019, 2020, 2021, 2022, 2023]);
    assert_eq!(first, second);
    assert_eq!(store.stats().unwrap().fiscal_years, 5);
}

#[rstest]
fn test_metrics_and_four_ms(store: SqliteStore) {
    let analyzer = CompanyAnalyzer::new(&store);

    let metrics = analyzer.metrics("KO").unwrap();
    assert_abs_diff_eq!(metrics.metrics.growth.eps_cagr_5y.unwrap(), 0.10, epsilon = 1e-9);
    assert_abs_diff_eq!(metrics.metrics.latest_eps.unwrap(), 2.0 * 1.1_f64.powi(4), epsilon = 1e-9);

    let quality = analyzer.quality("KO").unwrap();
    assert_abs_diff_eq!(quality.latest_gross_margin.unwrap(), 0.6, epsilon = 1e-9);

    let ts = analyzer.timeseries("KO").unwrap();
    assert_eq!(ts.fiscal_years(), vec![2019, 2020, 2021, 2022, 2023]);

    let scores = analyzer.four_ms("KO").unwrap();
    assert!(scores.moat.score.unwrap() > 0.5);
    assert!((0.30..=0.70).contains(&scores.margin_of_safety.recommended_mos));
}

#[rstest]
fn test_scenario_uses_latest_price(store: SqliteStore) {
    store.put_price("21344", 30.0, Some("manual"), Some("USD")).unwrap();
    let analyzer = CompanyAnalyzer::new(&store);

    let scenario = analyzer.default_scenario("KO").unwrap();
    assert_eq!(scenario.growth_source, GrowthSource::EpsCagr5y);
    assert_eq!(scenario.results.current_price, Some(30.0));
    assert!(scenario.results.payback_years.is_some());

    let params = ScenarioParams {
        growth: Some(0.05),
        ..Default::default()
    };
    let slower = analyzer.scenario("KO", &params).unwrap();
    assert_eq!(slower.growth_source, GrowthSource::Override);
    assert!(slower.results.sticker < scenario.results.sticker);

    let snapshot = valuation_snapshot("0000021344", &scenario, None);
    store.put_valuation_snapshot(&snapshot).unwrap();
    let history = store.valuation_history("0000021344").unwrap();
    assert_eq!(history.len(), 1);
    assert_abs_diff_eq!(history[0].sticker, scenario.results.sticker, epsilon = 1e-9);
}

#[rstest]
fn test_alerts(store: SqliteStore) {
    let analyzer = CompanyAnalyzer::new(&store);
    let mos_price = analyzer.default_scenario("KO").unwrap().results.mos_price;

    add_rule(&store, "KO", AlertKind::PriceBelowThreshold, Some(mos_price * 10.0)).unwrap();
    add_rule(&store, "KO", AlertKind::PriceBelowMos, None).unwrap();
    assert!(matches!(
        add_rule(&store, "KO", AlertKind::PriceBelowThreshold, None),
        Err(AnalysisError::InvalidRule(_))
    ));
    assert!(matches!(
        add_rule(&store, "XYZ", AlertKind::PriceBelowMos, None),
        Err(AnalysisError::UnknownTicker(_))
    ));

    // No stored price yet
    assert!(evaluate_alerts(&analyzer).unwrap().is_empty());

    store.put_price("21344", mos_price * 2.0, None, None).unwrap();
    let triggered = evaluate_alerts(&analyzer).unwrap();
    assert_eq!(triggered.len(), 1);
    assert_eq!(triggered[0].kind, AlertKind::PriceBelowThreshold);

    store.put_price("21344", mos_price * 0.5, None, None).unwrap();
    let triggered = evaluate_alerts(&analyzer).unwrap();
    assert_eq!(triggered.len(), 2);
    assert!(triggered.iter().all(|a| a.ticker == "KO"));
}

#[test]
fn test_seed_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(seed_file(dir.path(), "KO"), companyfacts(21344, "COCA COLA CO")).unwrap();
    std::fs::write(seed_file(dir.path(), "MSFT"), companyfacts(789019, "MICROSOFT CORP")).unwrap();

    let store = SqliteStore::in_memory().unwrap();
    let universe = TickerList::parse("KO,MSFT,AAPL");
    assert_eq!(missing_tickers(&store, &universe).unwrap().len(), 3);

    let mut seen = Vec::new();
    let report = seed_directory(&store, dir.path(), &universe, |t| seen.push(t.to_string()));
    assert_eq!(seen, vec!["KO", "MSFT", "AAPL"]);
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "AAPL");

    assert_eq!(missing_tickers(&store, &universe).unwrap(), vec!["AAPL"]);
}
