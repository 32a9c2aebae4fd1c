//! Compounder CLI binary.
//!
//! Ingests downloaded SEC companyfacts documents and prints growth, quality,
//! Four Ms and valuation analysis for stored companies.

mod integration;

use clap::{Parser, Subcommand, ValueEnum};
use compounder::{
    CompanyAnalyzer, TickerList, Universe, add_rule, evaluate_alerts, ingest_file,
    missing_tickers, seed_directory, valuation_snapshot,
};
use compounder_data::{AlertKind, SqliteStore};
use compounder_metrics::{
    MetricCategory, MetricsConfig, Scenario, ScenarioParams, metrics_by_category,
};
use compounder_output::{
    ExportFormat, Exporter, MetricsExport, ReportBuilder, ScoreCard, TimeseriesExport,
    ValuationExport, metrics_table,
};
use indicatif::{ProgressBar, ProgressStyle};
use integration::logging::init_logging;
use integration::store_manager::open_store;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "compounder")]
#[command(about = "Compounder: quality and valuation analysis from SEC fundamentals", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "COMPOUNDER_DB")]
    db: Option<PathBuf>,

    /// Metrics configuration JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a downloaded companyfacts JSON file
    Ingest {
        /// Ticker symbol
        ticker: String,

        /// Path to the companyfacts JSON document
        file: PathBuf,
    },

    /// Ingest `<DIR>/<TICKER>.json` for the seed universe
    Seed {
        /// Directory holding one companyfacts file per ticker
        #[arg(long, required_unless_present = "check")]
        dir: Option<PathBuf>,

        /// Comma-separated tickers (default: built-in seed list)
        #[arg(long)]
        tickers: Option<String>,

        /// Only report which tickers are missing from the store
        #[arg(long)]
        check: bool,
    },

    /// Record a price observation
    Price {
        /// Ticker symbol
        ticker: String,

        /// Price per share
        price: f64,

        /// Where the price came from
        #[arg(long)]
        source: Option<String>,

        /// Currency code
        #[arg(long, default_value = "USD")]
        currency: String,
    },

    /// Show company identity and latest income statement
    Summary {
        /// Ticker symbol
        ticker: String,
    },

    /// Show headline growth, return and coverage metrics
    Metrics {
        /// Ticker symbol
        ticker: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the quality aggregate as JSON
    Quality {
        /// Ticker symbol
        ticker: String,
    },

    /// Show per-year revenue, EPS, owner earnings, ROIC and coverage
    Timeseries {
        /// Ticker symbol
        ticker: String,

        /// Print JSON instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Show the Four Ms scorecard
    Fourm {
        /// Ticker symbol
        ticker: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: CardFormat,
    },

    /// Run a valuation scenario
    Valuation {
        /// Ticker symbol
        ticker: String,

        /// Growth override
        #[arg(long)]
        growth: Option<f64>,

        /// Terminal P/E cap
        #[arg(long)]
        pe_cap: Option<f64>,

        /// Discount rate
        #[arg(long)]
        discount: Option<f64>,

        /// Margin of safety fraction
        #[arg(long)]
        mos: Option<f64>,

        /// Store the scenario in the valuation history
        #[arg(long)]
        save: bool,

        /// Label stored with a saved scenario
        #[arg(long)]
        strategy: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show stored valuation scenarios
    History {
        /// Ticker symbol
        ticker: String,
    },

    /// Export metrics, timeseries or a valuation
    Export {
        /// Ticker symbol
        ticker: String,

        /// What to export
        #[arg(long, value_enum)]
        what: ExportKind,

        /// csv, json or pretty
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage and evaluate price alerts
    Alerts {
        #[command(subcommand)]
        command: AlertCommands,
    },

    /// List available metrics
    ListMetrics {
        /// Only list one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show store row counts
    Stats,
}

#[derive(Subcommand)]
enum AlertCommands {
    /// Add a rule
    Add {
        /// Ticker symbol
        ticker: String,

        /// Rule kind
        #[arg(long, value_enum)]
        kind: RuleKind,

        /// Price threshold (required for `below-threshold`)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// List rules for a ticker
    List {
        /// Ticker symbol
        ticker: String,
    },

    /// Enable a rule
    Enable {
        /// Rule id
        id: i64,
    },

    /// Disable a rule
    Disable {
        /// Rule id
        id: i64,
    },

    /// Delete a rule
    Delete {
        /// Rule id
        id: i64,
    },

    /// Evaluate every enabled rule against the latest stored prices
    Eval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CardFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportKind {
    Metrics,
    Timeseries,
    Valuation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RuleKind {
    BelowThreshold,
    BelowMos,
}

impl From<RuleKind> for AlertKind {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::BelowThreshold => Self::PriceBelowThreshold,
            RuleKind::BelowMos => Self::PriceBelowMos,
        }
    }
}

const CATEGORIES: [MetricCategory; 7] = [
    MetricCategory::Growth,
    MetricCategory::Returns,
    MetricCategory::Quality,
    MetricCategory::Moat,
    MetricCategory::Management,
    MetricCategory::BalanceSheet,
    MetricCategory::Valuation,
];

fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> CliResult<MetricsConfig> {
    Ok(path.map_or_else(|| Ok(MetricsConfig::default()), MetricsConfig::from_json_file)?)
}

fn run(cli: Cli) -> CliResult {
    if let Commands::ListMetrics { category } = &cli.command {
        return list_metrics(category.as_deref());
    }

    let config = load_config(cli.config.as_deref())?;
    let store = open_store(cli.db.as_deref())?;
    let analyzer = CompanyAnalyzer::with_config(&store, config);

    match cli.command {
        Commands::Ingest { ticker, file } => {
            let summary = ingest_file(&store, &ticker, &file)?;
            println!(
                "Ingested {} (CIK {}): {} fiscal years",
                summary.ticker,
                summary.cik,
                summary.years.len()
            );
            if let (Some(first), Some(last)) = (summary.years.first(), summary.years.last()) {
                println!("  Fiscal years {}-{}", first, last);
            }
        }
        Commands::Seed {
            dir,
            tickers,
            check,
        } => {
            let universe = tickers.map_or_else(TickerList::default, |t| TickerList::parse(&t));
            if check {
                seed_check(&store, &universe)?;
            } else if let Some(dir) = dir {
                seed(&store, &dir, &universe)?;
            }
        }
        Commands::Price {
            ticker,
            price,
            source,
            currency,
        } => {
            let company = analyzer.resolve(&ticker)?;
            store.put_price(&company.cik, price, source.as_deref(), Some(&currency))?;
            info!(ticker = %company.ticker, price, "recorded price");
            println!("Recorded {} {:.2} {}", company.ticker, price, currency);
        }
        Commands::Summary { ticker } => {
            let summary = analyzer.company_summary(&ticker)?;
            let company = &summary.company;
            println!("\n{} ({})", company.ticker, company.name.as_deref().unwrap_or("-"));
            println!("CIK: {}", company.cik);
            match summary.latest_income {
                Some(latest) => println!(
                    "{}",
                    metrics_table(
                        &format!("Fiscal year {}", latest.fiscal_year),
                        [
                            ("revenue", latest.revenue),
                            ("eps_diluted", latest.eps_diluted),
                            ("ebit", latest.ebit),
                            ("net_income", latest.net_income),
                        ]
                    )
                ),
                None => println!("No income statements stored"),
            }
        }
        Commands::Metrics { ticker, json } => {
            let metrics = analyzer.metrics(&ticker)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                let title = format!("{} metrics (CIK {})", ticker.to_uppercase(), metrics.cik);
                print!("{}", metrics_table(&title, metrics.metrics.entries()));
            }
        }
        Commands::Quality { ticker } => {
            let quality = analyzer.quality(&ticker)?;
            println!("{}", serde_json::to_string_pretty(&quality)?);
        }
        Commands::Timeseries { ticker, json } => {
            let company = analyzer.resolve(&ticker)?;
            let export = TimeseriesExport::new(&company.ticker, &analyzer.timeseries(&ticker)?);
            let format = if json {
                ExportFormat::PrettyJson
            } else {
                ExportFormat::Csv
            };
            print!("{}", export.export_to_string(format)?);
        }
        Commands::Fourm { ticker, format } => {
            let company = analyzer.resolve(&ticker)?;
            let scores = analyzer.four_ms(&ticker)?;
            let card = ScoreCard::new(&company.ticker, company.name.as_deref(), &scores);
            match format {
                CardFormat::Text => print!("{card}"),
                CardFormat::Markdown => print!("{}", card.to_markdown()),
                CardFormat::Json => {
                    let report = ReportBuilder::new()
                        .ticker(&company.ticker)
                        .cik(&company.cik)
                        .kind("four_ms")
                        .contents(&scores)?
                        .build()?;
                    println!("{}", report.to_json()?);
                }
            }
        }
        Commands::Valuation {
            ticker,
            growth,
            pe_cap,
            discount,
            mos,
            save,
            strategy,
            json,
        } => {
            let company = analyzer.resolve(&ticker)?;
            let params = ScenarioParams {
                growth,
                pe_cap,
                discount,
                mos_pct: mos,
            };
            let scenario = analyzer.scenario_for(&company, &params)?;
            if json {
                let export = ValuationExport::new(&company.ticker, &company.cik, scenario);
                println!("{}", export.export_to_string(ExportFormat::PrettyJson)?);
            } else {
                print_scenario(&company.ticker, &scenario);
            }
            if save {
                let snapshot = valuation_snapshot(&company.cik, &scenario, strategy.as_deref());
                let id = store.put_valuation_snapshot(&snapshot)?;
                info!(ticker = %company.ticker, id, "saved valuation scenario");
            }
        }
        Commands::History { ticker } => {
            let company = analyzer.resolve(&ticker)?;
            print_history(&store, &company.ticker, &company.cik)?;
        }
        Commands::Export {
            ticker,
            what,
            format,
            out,
        } => {
            let format: ExportFormat = format.parse()?;
            let company = analyzer.resolve(&ticker)?;
            let exporter: Box<dyn Exporter> = match what {
                ExportKind::Metrics => Box::new(MetricsExport::from_entries(
                    &company.ticker,
                    analyzer.metrics(&ticker)?.metrics.entries(),
                )),
                ExportKind::Timeseries => Box::new(TimeseriesExport::new(
                    &company.ticker,
                    &analyzer.timeseries(&ticker)?,
                )),
                ExportKind::Valuation => Box::new(ValuationExport::new(
                    &company.ticker,
                    &company.cik,
                    analyzer.default_scenario(&ticker)?,
                )),
            };
            match out {
                Some(path) => {
                    exporter.export_to_file(&path, format)?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", exporter.export_to_string(format)?),
            }
        }
        Commands::Alerts { command } => run_alerts(&store, &analyzer, command)?,
        Commands::Stats => {
            let stats = store.stats()?;
            println!("Companies:            {}", stats.companies);
            println!("Fiscal years:         {}", stats.fiscal_years);
            println!("Price snapshots:      {}", stats.price_snapshots);
            println!("Valuation scenarios:  {}", stats.valuation_scenarios);
            println!("Alert rules:          {}", stats.alert_rules);
        }
        Commands::ListMetrics { .. } => {}
    }

    Ok(())
}

fn seed_check(store: &SqliteStore, universe: &TickerList) -> CliResult {
    let missing = missing_tickers(store, universe)?;
    if missing.is_empty() {
        println!("All {} seed tickers are present", universe.size());
    } else {
        println!(
            "Missing {}/{} seed tickers: {}",
            missing.len(),
            universe.size(),
            missing.join(", ")
        );
    }
    Ok(())
}

fn seed(store: &SqliteStore, dir: &Path, universe: &TickerList) -> CliResult {
    let pb = ProgressBar::new(universe.size() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Ingesting companyfacts...");

    let report = seed_directory(store, dir, universe, |ticker| {
        pb.set_message(ticker.to_string());
        pb.inc(1);
    });
    pb.finish_with_message("Done");

    let separator = "=".repeat(60);
    println!("\n{separator}");
    println!("  Seeding Complete");
    println!("  Success: {}/{}", report.succeeded.len(), universe.size());
    for (ticker, error) in &report.failed {
        println!("  Failed:  {ticker}: {error}");
    }
    println!("{separator}\n");
    Ok(())
}

fn fmt_money(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn print_scenario(ticker: &str, scenario: &Scenario) {
    let inputs = &scenario.inputs;
    let results = &scenario.results;

    println!("\nValuation: {ticker}");
    println!("{}", "=".repeat(48));
    println!("  EPS (latest):        {:>12.2}", inputs.eps0);
    println!(
        "  Growth:              {:>11.1}% ({})",
        inputs.g * 100.0,
        scenario.growth_source
    );
    println!("  P/E cap:             {:>12.1}", inputs.pe_cap);
    println!("  Discount rate:       {:>11.1}%", inputs.discount * 100.0);
    println!("  Margin of safety:    {:>11.1}%", inputs.mos_pct * 100.0);
    println!("{}", "-".repeat(48));
    println!("  Future EPS:          {:>12.2}", results.future_eps);
    println!("  Terminal P/E:        {:>12.1}", results.terminal_pe);
    println!("  Future price:        {:>12.2}", results.future_price);
    println!("  Sticker price:       {:>12.2}", results.sticker);
    println!("  MOS price:           {:>12.2}", results.mos_price);
    println!("  Ten-cap price:       {:>12}", fmt_money(results.ten_cap_price));
    println!(
        "  Payback (years):     {:>12}",
        results
            .payback_years
            .map_or_else(|| "n/a".to_string(), |y| y.to_string())
    );
    println!("  Current price:       {:>12}", fmt_money(results.current_price));
    println!("{}", "=".repeat(48));
}

fn print_history(store: &SqliteStore, ticker: &str, cik: &str) -> CliResult {
    let history = store.valuation_history(cik)?;
    if history.is_empty() {
        println!("No saved scenarios for {ticker}");
        return Ok(());
    }
    println!(
        "{:<6} {:<20} {:>8} {:>8} {:>10} {:>10}  {}",
        "ID", "Time", "EPS", "Growth", "Sticker", "MOS", "Strategy"
    );
    for s in &history {
        println!(
            "{:<6} {:<20} {:>8.2} {:>7.1}% {:>10.2} {:>10.2}  {}",
            s.id.unwrap_or_default(),
            s.ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.eps0,
            s.growth * 100.0,
            s.sticker,
            s.mos_price,
            s.strategy.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn run_alerts(
    store: &SqliteStore,
    analyzer: &CompanyAnalyzer<'_, SqliteStore>,
    command: AlertCommands,
) -> CliResult {
    match command {
        AlertCommands::Add {
            ticker,
            kind,
            threshold,
        } => {
            let id = add_rule(store, &ticker, kind.into(), threshold)?;
            println!("Added alert rule {id}");
        }
        AlertCommands::List { ticker } => {
            let company = analyzer.resolve(&ticker)?;
            let rules = store.alert_rules(&company.cik)?;
            if rules.is_empty() {
                println!("No alert rules for {}", company.ticker);
            }
            for rule in rules {
                println!(
                    "{:<6} {:<24} {:>10} {}",
                    rule.id,
                    rule.kind.to_db_str(),
                    fmt_money(rule.threshold),
                    if rule.enabled { "enabled" } else { "disabled" }
                );
            }
        }
        AlertCommands::Enable { id } => toggle_rule(store, id, true)?,
        AlertCommands::Disable { id } => toggle_rule(store, id, false)?,
        AlertCommands::Delete { id } => {
            if store.delete_alert_rule(id)? {
                println!("Deleted alert rule {id}");
            } else {
                println!("No alert rule {id}");
            }
        }
        AlertCommands::Eval => {
            let triggered = evaluate_alerts(analyzer)?;
            if triggered.is_empty() {
                println!("No alerts triggered");
            }
            for alert in &triggered {
                println!("{}", alert.message());
            }
        }
    }
    Ok(())
}

fn toggle_rule(store: &SqliteStore, id: i64, enabled: bool) -> CliResult {
    if store.set_alert_rule_enabled(id, enabled)? {
        println!(
            "Alert rule {id} {}",
            if enabled { "enabled" } else { "disabled" }
        );
    } else {
        println!("No alert rule {id}");
    }
    Ok(())
}

fn list_metrics(category: Option<&str>) -> CliResult {
    let selected: Vec<MetricCategory> = match category {
        Some(name) => {
            let name = name.to_lowercase().replace(['-', ' '], "_");
            let found = CATEGORIES.into_iter().find(|c| c.name() == name);
            vec![found.ok_or_else(|| format!("Unknown category: {name}"))?]
        }
        None => CATEGORIES.to_vec(),
    };

    for category in selected {
        println!("\n{}:", category.name());
        println!("{}", "-".repeat(60));
        for metric in metrics_by_category(category) {
            println!("  {:<28} {}", metric.name, metric.description);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_valuation() {
        let cli = Cli::try_parse_from([
            "compounder",
            "--db",
            "/tmp/c.db",
            "valuation",
            "ko",
            "--growth",
            "0.08",
            "--save",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/c.db")));
        match cli.command {
            Commands::Valuation {
                ticker,
                growth,
                save,
                ..
            } => {
                assert_eq!(ticker, "ko");
                assert_eq!(growth, Some(0.08));
                assert!(save);
            }
            _ => panic!("expected valuation"),
        }
    }

    #[test]
    fn test_seed_requires_dir_unless_check() {
        assert!(Cli::try_parse_from(["compounder", "seed"]).is_err());
        assert!(Cli::try_parse_from(["compounder", "seed", "--check"]).is_ok());
    }

    #[test]
    fn test_rule_kind_conversion() {
        assert_eq!(AlertKind::from(RuleKind::BelowMos), AlertKind::PriceBelowMos);
    }

    #[test]
    fn test_list_unknown_category() {
        assert!(list_metrics(Some("nope")).is_err());
        assert!(list_metrics(Some("balance-sheet")).is_ok());
    }
}
