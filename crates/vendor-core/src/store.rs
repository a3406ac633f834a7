//! Store trait for persisting statements and computed metrics.
//!
//! This module defines the [`MetricsStore`] trait that provides a unified
//! interface over vendor profiles, raw statements, and metric records.
//!
//! Statements and metrics follow an insert-if-absent policy: a record keyed by
//! (ticker, fiscal period) is written the first time it is seen and never
//! replaced. Insert methods report whether a row was written so callers can
//! count new records without a separate existence check.

use async_trait::async_trait;

use crate::{
    error::Result,
    statement::StatementKind,
    types::{BalanceSheetMetrics, ProfitabilityMetrics, RawStatement, Ticker, VendorProfile},
};

/// Trait for persisting vendor data.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Inserts or replaces a vendor profile.
    async fn upsert_vendor(&self, vendor: &VendorProfile) -> Result<()>;

    /// Retrieves a vendor profile.
    ///
    /// Returns `Ok(None)` if the vendor is not stored.
    async fn get_vendor(&self, ticker: &Ticker) -> Result<Option<VendorProfile>>;

    /// Lists all stored vendor profiles, ordered by ticker.
    async fn list_vendors(&self) -> Result<Vec<VendorProfile>>;

    /// Stores a statement unless one already exists for its ticker, kind and
    /// fiscal period.
    ///
    /// Returns `Ok(true)` if the statement was written.
    async fn insert_statement(&self, statement: &RawStatement) -> Result<bool>;

    /// Retrieves the statements of one kind for a ticker, most recent first.
    async fn statements(&self, ticker: &Ticker, kind: StatementKind)
    -> Result<Vec<RawStatement>>;

    /// Retrieves one statement by fiscal period.
    async fn statement(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        fiscal_date_ending: &str,
    ) -> Result<Option<RawStatement>>;

    /// Stores balance sheet metrics unless a record exists for the period.
    ///
    /// Returns `Ok(true)` if the record was written.
    async fn insert_balance_sheet_metrics(&self, metrics: &BalanceSheetMetrics) -> Result<bool>;

    /// Retrieves balance sheet metrics for a ticker, most recent first.
    async fn balance_sheet_metrics(&self, ticker: &Ticker) -> Result<Vec<BalanceSheetMetrics>>;

    /// Returns true if balance sheet metrics exist for the period.
    async fn has_balance_sheet_metrics(
        &self,
        ticker: &Ticker,
        fiscal_date_ending: &str,
    ) -> Result<bool>;

    /// Stores profitability metrics unless a record exists for the period.
    ///
    /// Returns `Ok(true)` if the record was written.
    async fn insert_profitability_metrics(&self, metrics: &ProfitabilityMetrics) -> Result<bool>;

    /// Retrieves profitability metrics for a ticker, most recent first.
    async fn profitability_metrics(&self, ticker: &Ticker) -> Result<Vec<ProfitabilityMetrics>>;

    /// Returns true if profitability metrics exist for the period.
    async fn has_profitability_metrics(
        &self,
        ticker: &Ticker,
        fiscal_date_ending: &str,
    ) -> Result<bool>;

    /// Removes all stored data.
    async fn clear(&self) -> Result<()>;
}
