//! In-memory store implementation.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use vendor_core::{
    BalanceSheetMetrics, MetricsStore, ProfitabilityMetrics, RawStatement, Result, StatementKind,
    Ticker, VendorProfile,
};

/// Records of one ticker keyed by fiscal date; iterating in reverse yields
/// the most recent period first.
type ByPeriod<T> = BTreeMap<String, T>;

/// Simple in-memory store for testing and one-off runs.
///
/// Data is stored in `RwLock`-protected maps and is lost when the store is
/// dropped. Insert-if-absent checks happen under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    vendors: RwLock<BTreeMap<Ticker, VendorProfile>>,
    statements: RwLock<HashMap<(Ticker, StatementKind), ByPeriod<RawStatement>>>,
    balance_sheet_metrics: RwLock<HashMap<Ticker, ByPeriod<BalanceSheetMetrics>>>,
    profitability_metrics: RwLock<HashMap<Ticker, ByPeriod<ProfitabilityMetrics>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T: Clone>(records: Option<&ByPeriod<T>>) -> Vec<T> {
    records
        .map(|by_period| by_period.values().rev().cloned().collect())
        .unwrap_or_default()
}

fn insert_absent<T>(records: &mut ByPeriod<T>, fiscal_date_ending: &str, record: T) -> bool {
    if records.contains_key(fiscal_date_ending) {
        return false;
    }
    records.insert(fiscal_date_ending.to_string(), record);
    true
}

#[async_trait]
impl MetricsStore for InMemoryStore {
    #[instrument(skip(self, vendor), fields(ticker = %vendor.ticker))]
    async fn upsert_vendor(&self, vendor: &VendorProfile) -> Result<()> {
        self.vendors
            .write()
            .await
            .insert(vendor.ticker.clone(), vendor.clone());
        debug!("Stored vendor profile");
        Ok(())
    }

    async fn get_vendor(&self, ticker: &Ticker) -> Result<Option<VendorProfile>> {
        Ok(self.vendors.read().await.get(ticker).cloned())
    }

    async fn list_vendors(&self) -> Result<Vec<VendorProfile>> {
        Ok(self.vendors.read().await.values().cloned().collect())
    }

    #[instrument(skip(self, statement), fields(ticker = %statement.ticker, kind = %statement.kind, date = %statement.fiscal_date_ending))]
    async fn insert_statement(&self, statement: &RawStatement) -> Result<bool> {
        let mut statements = self.statements.write().await;
        let inserted = insert_absent(
            statements
                .entry((statement.ticker.clone(), statement.kind))
                .or_default(),
            &statement.fiscal_date_ending,
            statement.clone(),
        );
        debug!(inserted, "Statement insert");
        Ok(inserted)
    }

    async fn statements(&self, ticker: &Ticker, kind: StatementKind) -> Result<Vec<RawStatement>> {
        let statements = self.statements.read().await;
        Ok(newest_first(statements.get(&(ticker.clone(), kind))))
    }

    async fn statement(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        fiscal_date_ending: &str,
    ) -> Result<Option<RawStatement>> {
        let statements = self.statements.read().await;
        Ok(statements
            .get(&(ticker.clone(), kind))
            .and_then(|by_period| by_period.get(fiscal_date_ending))
            .cloned())
    }

    #[instrument(skip(self, metrics), fields(ticker = %metrics.ticker, date = %metrics.fiscal_date_ending))]
    async fn insert_balance_sheet_metrics(&self, metrics: &BalanceSheetMetrics) -> Result<bool> {
        let mut records = self.balance_sheet_metrics.write().await;
        let inserted = insert_absent(
            records.entry(metrics.ticker.clone()).or_default(),
            &metrics.fiscal_date_ending,
            metrics.clone(),
        );
        debug!(inserted, "Balance sheet metrics insert");
        Ok(inserted)
    }

    async fn balance_sheet_metrics(&self, ticker: &Ticker) -> Result<Vec<BalanceSheetMetrics>> {
        Ok(newest_first(self.balance_sheet_metrics.read().await.get(ticker)))
    }

    async fn has_balance_sheet_metrics(
        &self,
        ticker: &Ticker,
        fiscal_date_ending: &str,
    ) -> Result<bool> {
        Ok(self
            .balance_sheet_metrics
            .read()
            .await
            .get(ticker)
            .is_some_and(|by_period| by_period.contains_key(fiscal_date_ending)))
    }

    #[instrument(skip(self, metrics), fields(ticker = %metrics.ticker, date = %metrics.fiscal_date_ending))]
    async fn insert_profitability_metrics(&self, metrics: &ProfitabilityMetrics) -> Result<bool> {
        let mut records = self.profitability_metrics.write().await;
        let inserted = insert_absent(
            records.entry(metrics.ticker.clone()).or_default(),
            &metrics.fiscal_date_ending,
            metrics.clone(),
        );
        debug!(inserted, "Profitability metrics insert");
        Ok(inserted)
    }

    async fn profitability_metrics(&self, ticker: &Ticker) -> Result<Vec<ProfitabilityMetrics>> {
        Ok(newest_first(self.profitability_metrics.read().await.get(ticker)))
    }

    async fn has_profitability_metrics(
        &self,
        ticker: &Ticker,
        fiscal_date_ending: &str,
    ) -> Result<bool> {
        Ok(self
            .profitability_metrics
            .read()
            .await
            .get(ticker)
            .is_some_and(|by_period| by_period.contains_key(fiscal_date_ending)))
    }

    async fn clear(&self) -> Result<()> {
        self.vendors.write().await.clear();
        self.statements.write().await.clear();
        self.balance_sheet_metrics.write().await.clear();
        self.profitability_metrics.write().await.clear();
        debug!("Cleared in-memory store");
        Ok(())
    }
}
