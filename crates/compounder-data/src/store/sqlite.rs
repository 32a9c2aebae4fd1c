//! SQLite-backed fact store.

use crate::error::Result;
use crate::facts::{
    AlertKind, AlertRule, AnnualFacts, BalanceSheetFact, CashFlowFact, Company, FiscalYearFact,
    ValuationSnapshot, pad_cik,
};
use crate::store::FactStore;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::debug;

const INCOME_COLUMNS: &str = "fiscal_year, revenue, cogs, gross_profit, sga, rnd, depreciation,
     ebit, interest_expense, taxes, net_income, eps_diluted, shares_diluted";

const BALANCE_COLUMNS: &str = "fiscal_year, cash, receivables, inventory, total_assets,
     total_liabilities, total_debt, shareholder_equity";

const CASH_FLOW_COLUMNS: &str = "fiscal_year, cfo, capex, buybacks, dividends, acquisitions";

const SCENARIO_COLUMNS: &str = "id, cik, ts, eps0, growth, pe_cap, discount, sticker, mos_pct,
     mos_price, owner_earnings_ps, payback_years, ten_cap_price, strategy";

/// SQLite store for companies, annual facts, prices, scenarios and alert rules.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS companies (
                cik TEXT PRIMARY KEY,
                ticker TEXT NOT NULL UNIQUE,
                name TEXT,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS income_statements (
                cik TEXT NOT NULL,
                fiscal_year INTEGER NOT NULL,
                revenue REAL,
                cogs REAL,
                gross_profit REAL,
                sga REAL,
                rnd REAL,
                depreciation REAL,
                ebit REAL,
                interest_expense REAL,
                taxes REAL,
                net_income REAL,
                eps_diluted REAL,
                shares_diluted REAL,
                PRIMARY KEY (cik, fiscal_year)
            );

            CREATE TABLE IF NOT EXISTS balance_sheets (
                cik TEXT NOT NULL,
                fiscal_year INTEGER NOT NULL,
                cash REAL,
                receivables REAL,
                inventory REAL,
                total_assets REAL,
                total_liabilities REAL,
                total_debt REAL,
                shareholder_equity REAL,
                PRIMARY KEY (cik, fiscal_year)
            );

            CREATE TABLE IF NOT EXISTS cash_flows (
                cik TEXT NOT NULL,
                fiscal_year INTEGER NOT NULL,
                cfo REAL,
                capex REAL,
                buybacks REAL,
                dividends REAL,
                acquisitions REAL,
                PRIMARY KEY (cik, fiscal_year)
            );

            CREATE TABLE IF NOT EXISTS price_snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cik TEXT NOT NULL,
                ts TEXT NOT NULL,
                price REAL NOT NULL,
                source TEXT,
                currency TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_prices_cik_ts ON price_snapshots(cik, ts);

            CREATE TABLE IF NOT EXISTS valuation_scenarios (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cik TEXT NOT NULL,
                ts TEXT NOT NULL,
                eps0 REAL NOT NULL,
                growth REAL NOT NULL,
                pe_cap REAL NOT NULL,
                discount REAL NOT NULL,
                sticker REAL NOT NULL,
                mos_pct REAL NOT NULL,
                mos_price REAL NOT NULL,
                owner_earnings_ps REAL,
                payback_years INTEGER,
                ten_cap_price REAL,
                strategy TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_scenarios_cik ON valuation_scenarios(cik);

            CREATE TABLE IF NOT EXISTS alert_rules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cik TEXT NOT NULL,
                rule_type TEXT NOT NULL,
                threshold REAL,
                enabled INTEGER NOT NULL DEFAULT 1
            );",
        )?;

        Ok(())
    }

    /// Insert or update a company record.
    pub fn upsert_company(&self, company: &Company) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO companies (cik, ticker, name, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(cik) DO UPDATE SET
                ticker = excluded.ticker,
                name = COALESCE(excluded.name, companies.name),
                updated_at = excluded.updated_at",
            params![
                pad_cik(&company.cik),
                company.ticker.to_uppercase(),
                company.name,
                updated_at
            ],
        )?;

        Ok(())
    }

    /// All companies, ordered by ticker.
    pub fn companies(&self) -> Result<Vec<Company>> {
        let mut stmt = self
            .conn
            .prepare("SELECT cik, ticker, name FROM companies ORDER BY ticker")?;

        let companies = stmt
            .query_map([], company_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(companies)
    }

    /// Store annual facts for a company in one transaction.
    ///
    /// Rows for fiscal years already present are replaced.
    pub fn put_annual_facts(&self, cik: &str, facts: &[AnnualFacts]) -> Result<usize> {
        let cik = pad_cik(cik);
        let tx = self.conn.unchecked_transaction()?;

        for year in facts {
            let is = &year.income;
            tx.execute(
                &format!(
                    "INSERT OR REPLACE INTO income_statements (cik, {INCOME_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
                ),
                params![
                    cik,
                    is.fiscal_year,
                    is.revenue,
                    is.cogs,
                    is.gross_profit,
                    is.sga,
                    is.rnd,
                    is.depreciation,
                    is.ebit,
                    is.interest_expense,
                    is.taxes,
                    is.net_income,
                    is.eps_diluted,
                    is.shares_diluted,
                ],
            )?;

            let bs = &year.balance_sheet;
            tx.execute(
                &format!(
                    "INSERT OR REPLACE INTO balance_sheets (cik, {BALANCE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                params![
                    cik,
                    bs.fiscal_year,
                    bs.cash,
                    bs.receivables,
                    bs.inventory,
                    bs.total_assets,
                    bs.total_liabilities,
                    bs.total_debt,
                    bs.shareholder_equity,
                ],
            )?;

            let cf = &year.cash_flow;
            tx.execute(
                &format!(
                    "INSERT OR REPLACE INTO cash_flows (cik, {CASH_FLOW_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                params![
                    cik,
                    cf.fiscal_year,
                    cf.cfo,
                    cf.capex,
                    cf.buybacks,
                    cf.dividends,
                    cf.acquisitions,
                ],
            )?;
        }

        tx.commit()?;
        debug!(cik = %cik, years = facts.len(), "stored annual facts");
        Ok(facts.len())
    }

    /// Record a price observation taken now.
    pub fn put_price(
        &self,
        cik: &str,
        price: f64,
        source: Option<&str>,
        currency: Option<&str>,
    ) -> Result<()> {
        self.put_price_at(cik, Utc::now(), price, source, currency)
    }

    /// Record a price observation at a given time.
    pub fn put_price_at(
        &self,
        cik: &str,
        ts: DateTime<Utc>,
        price: f64,
        source: Option<&str>,
        currency: Option<&str>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO price_snapshots (cik, ts, price, source, currency)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![pad_cik(cik), ts.to_rfc3339(), price, source, currency],
        )?;
        Ok(())
    }

    /// Persist a valuation scenario and return its row id.
    pub fn put_valuation_snapshot(&self, snapshot: &ValuationSnapshot) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO valuation_scenarios (
                cik, ts, eps0, growth, pe_cap, discount, sticker, mos_pct,
                mos_price, owner_earnings_ps, payback_years, ten_cap_price, strategy
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                pad_cik(&snapshot.cik),
                snapshot.ts.to_rfc3339(),
                snapshot.eps0,
                snapshot.growth,
                snapshot.pe_cap,
                snapshot.discount,
                snapshot.sticker,
                snapshot.mos_pct,
                snapshot.mos_price,
                snapshot.owner_earnings_ps,
                snapshot.payback_years,
                snapshot.ten_cap_price,
                snapshot.strategy,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Stored valuation scenarios for a company, newest first.
    pub fn valuation_history(&self, cik: &str) -> Result<Vec<ValuationSnapshot>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SCENARIO_COLUMNS} FROM valuation_scenarios
             WHERE cik = ?1
             ORDER BY ts DESC, id DESC"
        ))?;

        let rows = stmt
            .query_map(params![pad_cik(cik)], snapshot_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Add an alert rule and return its id.
    pub fn add_alert_rule(&self, cik: &str, kind: AlertKind, threshold: Option<f64>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO alert_rules (cik, rule_type, threshold, enabled)
             VALUES (?1, ?2, ?3, 1)",
            params![pad_cik(cik), kind.to_db_str(), threshold],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Alert rules for a company.
    pub fn alert_rules(&self, cik: &str) -> Result<Vec<AlertRule>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, cik, rule_type, threshold, enabled FROM alert_rules
             WHERE cik = ?1 ORDER BY id",
        )?;

        let rules = stmt
            .query_map(params![pad_cik(cik)], alert_rule_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rules)
    }

    /// All enabled alert rules across companies.
    pub fn enabled_alert_rules(&self) -> Result<Vec<AlertRule>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, cik, rule_type, threshold, enabled FROM alert_rules
             WHERE enabled = 1 ORDER BY id",
        )?;

        let rules = stmt
            .query_map([], alert_rule_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rules)
    }

    /// Enable or disable a rule. Returns false if no such rule exists.
    pub fn set_alert_rule_enabled(&self, id: i64, enabled: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE alert_rules SET enabled = ?2 WHERE id = ?1",
            params![id, enabled],
        )?;
        Ok(changed > 0)
    }

    /// Delete a rule. Returns false if no such rule exists.
    pub fn delete_alert_rule(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM alert_rules WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Remove a company and everything stored for it.
    pub fn clear_company(&self, cik: &str) -> Result<()> {
        let cik = pad_cik(cik);
        let tx = self.conn.unchecked_transaction()?;
        for table in [
            "income_statements",
            "balance_sheets",
            "cash_flows",
            "price_snapshots",
            "valuation_scenarios",
            "alert_rules",
            "companies",
        ] {
            tx.execute(&format!("DELETE FROM {table} WHERE cik = ?1"), params![cik])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Row counts across the store.
    pub fn stats(&self) -> Result<StoreStats> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
            Ok(n as usize)
        };

        Ok(StoreStats {
            companies: count("companies")?,
            fiscal_years: count("income_statements")?,
            price_snapshots: count("price_snapshots")?,
            valuation_scenarios: count("valuation_scenarios")?,
            alert_rules: count("alert_rules")?,
        })
    }
}

impl FactStore for SqliteStore {
    fn company_by_ticker(&self, ticker: &str) -> Result<Option<Company>> {
        let result = self
            .conn
            .query_row(
                "SELECT cik, ticker, name FROM companies WHERE ticker = ?1",
                params![ticker.trim().to_uppercase()],
                company_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn company(&self, cik: &str) -> Result<Option<Company>> {
        let result = self
            .conn
            .query_row(
                "SELECT cik, ticker, name FROM companies WHERE cik = ?1",
                params![pad_cik(cik)],
                company_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn fiscal_year_facts(&self, cik: &str) -> Result<Vec<FiscalYearFact>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INCOME_COLUMNS} FROM income_statements
             WHERE cik = ?1 ORDER BY fiscal_year ASC"
        ))?;

        let rows = stmt
            .query_map(params![pad_cik(cik)], |row| {
                Ok(FiscalYearFact {
                    fiscal_year: row.get(0)?,
                    revenue: row.get(1)?,
                    cogs: row.get(2)?,
                    gross_profit: row.get(3)?,
                    sga: row.get(4)?,
                    rnd: row.get(5)?,
                    depreciation: row.get(6)?,
                    ebit: row.get(7)?,
                    interest_expense: row.get(8)?,
                    taxes: row.get(9)?,
                    net_income: row.get(10)?,
                    eps_diluted: row.get(11)?,
                    shares_diluted: row.get(12)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn balance_sheet_facts(&self, cik: &str) -> Result<Vec<BalanceSheetFact>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BALANCE_COLUMNS} FROM balance_sheets
             WHERE cik = ?1 ORDER BY fiscal_year ASC"
        ))?;

        let rows = stmt
            .query_map(params![pad_cik(cik)], balance_sheet_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn cash_flow_facts(&self, cik: &str) -> Result<Vec<CashFlowFact>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CASH_FLOW_COLUMNS} FROM cash_flows
             WHERE cik = ?1 ORDER BY fiscal_year ASC"
        ))?;

        let rows = stmt
            .query_map(params![pad_cik(cik)], |row| {
                Ok(CashFlowFact {
                    fiscal_year: row.get(0)?,
                    cfo: row.get(1)?,
                    capex: row.get(2)?,
                    buybacks: row.get(3)?,
                    dividends: row.get(4)?,
                    acquisitions: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn latest_balance_sheet(&self, cik: &str) -> Result<Option<BalanceSheetFact>> {
        let result = self
            .conn
            .query_row(
                &format!(
                    "SELECT {BALANCE_COLUMNS} FROM balance_sheets
                     WHERE cik = ?1 ORDER BY fiscal_year DESC LIMIT 1"
                ),
                params![pad_cik(cik)],
                balance_sheet_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn latest_price(&self, cik: &str) -> Result<Option<f64>> {
        let result = self
            .conn
            .query_row(
                "SELECT price FROM price_snapshots
                 WHERE cik = ?1 ORDER BY ts DESC, id DESC LIMIT 1",
                params![pad_cik(cik)],
                |row| row.get(0),
            )
            .optional()?;

        Ok(result)
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of companies
    pub companies: usize,
    /// Number of stored fiscal years (income-statement rows)
    pub fiscal_years: usize,
    /// Number of price snapshots
    pub price_snapshots: usize,
    /// Number of persisted valuation scenarios
    pub valuation_scenarios: usize,
    /// Number of alert rules
    pub alert_rules: usize,
}

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        cik: row.get(0)?,
        ticker: row.get(1)?,
        name: row.get(2)?,
    })
}

fn balance_sheet_from_row(row: &Row<'_>) -> rusqlite::Result<BalanceSheetFact> {
    Ok(BalanceSheetFact {
        fiscal_year: row.get(0)?,
        cash: row.get(1)?,
        receivables: row.get(2)?,
        inventory: row.get(3)?,
        total_assets: row.get(4)?,
        total_liabilities: row.get(5)?,
        total_debt: row.get(6)?,
        shareholder_equity: row.get(7)?,
    })
}

fn alert_rule_from_row(row: &Row<'_>) -> rusqlite::Result<AlertRule> {
    let kind = AlertKind::from_db_str(&row.get::<_, String>(2)?)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(AlertRule {
        id: row.get(0)?,
        cik: row.get(1)?,
        kind,
        threshold: row.get(3)?,
        enabled: row.get(4)?,
    })
}

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<ValuationSnapshot> {
    let ts = DateTime::parse_from_rfc3339(&row.get::<_, String>(2)?)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(ValuationSnapshot {
        id: row.get(0)?,
        cik: row.get(1)?,
        ts,
        eps0: row.get(3)?,
        growth: row.get(4)?,
        pe_cap: row.get(5)?,
        discount: row.get(6)?,
        sticker: row.get(7)?,
        mos_pct: row.get(8)?,
        mos_price: row.get(9)?,
        owner_earnings_ps: row.get(10)?,
        payback_years: row.get(11)?,
        ten_cap_price: row.get(12)?,
        strategy: row.get(13)?,
    })
}
