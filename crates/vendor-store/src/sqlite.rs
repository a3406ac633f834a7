//! SQLite-based store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};
use vendor_core::{
    BalanceSheetMetrics, MetricsStore, ProfitabilityMetrics, RawStatement, Result,
    StatementFields, StatementKind, Ticker, VendorError, VendorProfile,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS vendors (
    ticker TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    sector TEXT NOT NULL,
    industry TEXT NOT NULL,
    description TEXT,
    market_cap REAL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS statements (
    ticker TEXT NOT NULL,
    kind TEXT NOT NULL,
    fiscal_date_ending TEXT NOT NULL,
    reported_currency TEXT NOT NULL,
    data_json TEXT NOT NULL,
    raw_json TEXT,
    fetched_at TEXT NOT NULL,
    PRIMARY KEY (ticker, kind, fiscal_date_ending)
);

CREATE TABLE IF NOT EXISTS balance_sheet_metrics (
    ticker TEXT NOT NULL,
    fiscal_date_ending TEXT NOT NULL,
    current_ratio REAL,
    quick_ratio REAL,
    debt_to_equity REAL,
    debt_ratio REAL,
    liquidity_flag INTEGER NOT NULL,
    leverage_flag INTEGER NOT NULL,
    calculated_at TEXT NOT NULL,
    PRIMARY KEY (ticker, fiscal_date_ending)
);

CREATE TABLE IF NOT EXISTS profitability_metrics (
    ticker TEXT NOT NULL,
    fiscal_date_ending TEXT NOT NULL,
    net_margin REAL,
    operating_margin REAL,
    return_on_equity REAL,
    revenue_cagr_3y REAL,
    ocf_to_net_income REAL,
    calculated_at TEXT NOT NULL,
    PRIMARY KEY (ticker, fiscal_date_ending)
);
";

fn storage_err(e: impl std::fmt::Display) -> VendorError {
    VendorError::Storage(e.to_string())
}

/// SQLite-based store for vendor data.
///
/// This store keeps data in a SQLite database file, providing persistence
/// across runs. Statement and metric rows are written with `INSERT OR IGNORE`
/// on their primary key, so an existing record is never replaced.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(storage_err)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(storage_err)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn()?.execute_batch(SCHEMA).map_err(storage_err)?;
        debug!("SQLite store schema initialized");
        Ok(())
    }
}

fn vendor_from_row(row: &Row<'_>) -> rusqlite::Result<VendorProfile> {
    Ok(VendorProfile {
        ticker: Ticker::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        sector: row.get(2)?,
        industry: row.get(3)?,
        description: row.get(4)?,
        market_cap: row.get(5)?,
    })
}

/// Statement columns as stored, before the JSON and enum columns are decoded.
struct StatementRow {
    ticker: String,
    kind: String,
    fiscal_date_ending: String,
    reported_currency: String,
    data_json: String,
    raw_json: Option<String>,
    fetched_at: String,
}

impl StatementRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            ticker: row.get(0)?,
            kind: row.get(1)?,
            fiscal_date_ending: row.get(2)?,
            reported_currency: row.get(3)?,
            data_json: row.get(4)?,
            raw_json: row.get(5)?,
            fetched_at: row.get(6)?,
        })
    }

    fn decode(self) -> Result<RawStatement> {
        let fields: StatementFields = serde_json::from_str(&self.data_json)
            .map_err(|e| VendorError::Parse(format!("statement fields: {e}")))?;
        let fetched_at = DateTime::parse_from_rfc3339(&self.fetched_at)
            .map_err(|e| VendorError::Parse(format!("fetched_at: {e}")))?
            .with_timezone(&Utc);
        Ok(RawStatement {
            ticker: Ticker::new(self.ticker),
            kind: self.kind.parse()?,
            fiscal_date_ending: self.fiscal_date_ending,
            reported_currency: self.reported_currency,
            fields,
            raw_json: self.raw_json,
            fetched_at,
        })
    }
}

const STATEMENT_COLUMNS: &str =
    "ticker, kind, fiscal_date_ending, reported_currency, data_json, raw_json, fetched_at";

fn balance_sheet_metrics_from_row(row: &Row<'_>) -> rusqlite::Result<BalanceSheetMetrics> {
    Ok(BalanceSheetMetrics {
        ticker: Ticker::new(row.get::<_, String>(0)?),
        fiscal_date_ending: row.get(1)?,
        current_ratio: row.get(2)?,
        quick_ratio: row.get(3)?,
        debt_to_equity: row.get(4)?,
        debt_ratio: row.get(5)?,
        liquidity_flag: row.get(6)?,
        leverage_flag: row.get(7)?,
    })
}

fn profitability_metrics_from_row(row: &Row<'_>) -> rusqlite::Result<ProfitabilityMetrics> {
    Ok(ProfitabilityMetrics {
        ticker: Ticker::new(row.get::<_, String>(0)?),
        fiscal_date_ending: row.get(1)?,
        net_margin: row.get(2)?,
        operating_margin: row.get(3)?,
        return_on_equity: row.get(4)?,
        revenue_cagr_3y: row.get(5)?,
        ocf_to_net_income: row.get(6)?,
    })
}

#[async_trait]
impl MetricsStore for SqliteStore {
    #[instrument(skip(self, vendor), fields(ticker = %vendor.ticker))]
    async fn upsert_vendor(&self, vendor: &VendorProfile) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO vendors
             (ticker, name, sector, industry, description, market_cap, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                vendor.ticker.as_str(),
                vendor.name,
                vendor.sector,
                vendor.industry,
                vendor.description,
                vendor.market_cap,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(storage_err)?;
        debug!("Stored vendor profile");
        Ok(())
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn get_vendor(&self, ticker: &Ticker) -> Result<Option<VendorProfile>> {
        let conn = self.conn()?;
        let vendor = conn
            .query_row(
                "SELECT ticker, name, sector, industry, description, market_cap
                 FROM vendors WHERE ticker = ?1",
                params![ticker.as_str()],
                vendor_from_row,
            )
            .optional()
            .map_err(storage_err)?;

        if vendor.is_some() {
            debug!("Vendor found");
        } else {
            debug!("Vendor not found");
        }
        Ok(vendor)
    }

    async fn list_vendors(&self) -> Result<Vec<VendorProfile>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT ticker, name, sector, industry, description, market_cap
                 FROM vendors ORDER BY ticker",
            )
            .map_err(storage_err)?;
        let vendors = stmt
            .query_map([], vendor_from_row)
            .map_err(storage_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage_err)?;
        Ok(vendors)
    }

    #[instrument(skip(self, statement), fields(ticker = %statement.ticker, kind = %statement.kind, date = %statement.fiscal_date_ending))]
    async fn insert_statement(&self, statement: &RawStatement) -> Result<bool> {
        let data_json = serde_json::to_string(&statement.fields)
            .map_err(|e| VendorError::Parse(e.to_string()))?;

        let conn = self.conn()?;
        let changed = conn
            .execute(
                "INSERT OR IGNORE INTO statements
                 (ticker, kind, fiscal_date_ending, reported_currency, data_json, raw_json, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    statement.ticker.as_str(),
                    statement.kind.as_str(),
                    statement.fiscal_date_ending,
                    statement.reported_currency,
                    data_json,
                    statement.raw_json,
                    statement.fetched_at.to_rfc3339(),
                ],
            )
            .map_err(storage_err)?;

        debug!(inserted = changed == 1, "Statement insert");
        Ok(changed == 1)
    }

    #[instrument(skip(self), fields(ticker = %ticker, kind = %kind))]
    async fn statements(&self, ticker: &Ticker, kind: StatementKind) -> Result<Vec<RawStatement>> {
        let rows = {
            let conn = self.conn()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {STATEMENT_COLUMNS} FROM statements
                     WHERE ticker = ?1 AND kind = ?2
                     ORDER BY fiscal_date_ending DESC"
                ))
                .map_err(storage_err)?;
            stmt.query_map(params![ticker.as_str(), kind.as_str()], StatementRow::from_row)
                .map_err(storage_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(storage_err)?
        };

        debug!("Found {} stored statements", rows.len());
        rows.into_iter().map(StatementRow::decode).collect()
    }

    async fn statement(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        fiscal_date_ending: &str,
    ) -> Result<Option<RawStatement>> {
        let row = {
            let conn = self.conn()?;
            conn.query_row(
                &format!(
                    "SELECT {STATEMENT_COLUMNS} FROM statements
                     WHERE ticker = ?1 AND kind = ?2 AND fiscal_date_ending = ?3"
                ),
                params![ticker.as_str(), kind.as_str(), fiscal_date_ending],
                StatementRow::from_row,
            )
            .optional()
            .map_err(storage_err)?
        };
        row.map(StatementRow::decode).transpose()
    }

    #[instrument(skip(self, metrics), fields(ticker = %metrics.ticker, date = %metrics.fiscal_date_ending))]
    async fn insert_balance_sheet_metrics(&self, metrics: &BalanceSheetMetrics) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "INSERT OR IGNORE INTO balance_sheet_metrics
                 (ticker, fiscal_date_ending, current_ratio, quick_ratio, debt_to_equity,
                  debt_ratio, liquidity_flag, leverage_flag, calculated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    metrics.ticker.as_str(),
                    metrics.fiscal_date_ending,
                    metrics.current_ratio,
                    metrics.quick_ratio,
                    metrics.debt_to_equity,
                    metrics.debt_ratio,
                    metrics.liquidity_flag,
                    metrics.leverage_flag,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(storage_err)?;

        debug!(inserted = changed == 1, "Balance sheet metrics insert");
        Ok(changed == 1)
    }

    async fn balance_sheet_metrics(&self, ticker: &Ticker) -> Result<Vec<BalanceSheetMetrics>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT ticker, fiscal_date_ending, current_ratio, quick_ratio, debt_to_equity,
                        debt_ratio, liquidity_flag, leverage_flag
                 FROM balance_sheet_metrics
                 WHERE ticker = ?1
                 ORDER BY fiscal_date_ending DESC",
            )
            .map_err(storage_err)?;
        let records = stmt
            .query_map(params![ticker.as_str()], balance_sheet_metrics_from_row)
            .map_err(storage_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage_err)?;
        Ok(records)
    }

    async fn has_balance_sheet_metrics(
        &self,
        ticker: &Ticker,
        fiscal_date_ending: &str,
    ) -> Result<bool> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM balance_sheet_metrics
                           WHERE ticker = ?1 AND fiscal_date_ending = ?2)",
            params![ticker.as_str(), fiscal_date_ending],
            |row| row.get(0),
        )
        .map_err(storage_err)
    }

    #[instrument(skip(self, metrics), fields(ticker = %metrics.ticker, date = %metrics.fiscal_date_ending))]
    async fn insert_profitability_metrics(&self, metrics: &ProfitabilityMetrics) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "INSERT OR IGNORE INTO profitability_metrics
                 (ticker, fiscal_date_ending, net_margin, operating_margin, return_on_equity,
                  revenue_cagr_3y, ocf_to_net_income, calculated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    metrics.ticker.as_str(),
                    metrics.fiscal_date_ending,
                    metrics.net_margin,
                    metrics.operating_margin,
                    metrics.return_on_equity,
                    metrics.revenue_cagr_3y,
                    metrics.ocf_to_net_income,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(storage_err)?;

        debug!(inserted = changed == 1, "Profitability metrics insert");
        Ok(changed == 1)
    }

    async fn profitability_metrics(&self, ticker: &Ticker) -> Result<Vec<ProfitabilityMetrics>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT ticker, fiscal_date_ending, net_margin, operating_margin,
                        return_on_equity, revenue_cagr_3y, ocf_to_net_income
                 FROM profitability_metrics
                 WHERE ticker = ?1
                 ORDER BY fiscal_date_ending DESC",
            )
            .map_err(storage_err)?;
        let records = stmt
            .query_map(params![ticker.as_str()], profitability_metrics_from_row)
            .map_err(storage_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage_err)?;
        Ok(records)
    }

    async fn has_profitability_metrics(
        &self,
        ticker: &Ticker,
        fiscal_date_ending: &str,
    ) -> Result<bool> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM profitability_metrics
                           WHERE ticker = ?1 AND fiscal_date_ending = ?2)",
            params![ticker.as_str(), fiscal_date_ending],
            |row| row.get(0),
        )
        .map_err(storage_err)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            "DELETE FROM profitability_metrics;
             DELETE FROM balance_sheet_metrics;
             DELETE FROM statements;
             DELETE FROM vendors;",
        )
        .map_err(storage_err)?;
        debug!("Cleared SQLite store");
        Ok(())
    }
}
