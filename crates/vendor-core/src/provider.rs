//! Provider traits for fetching statement data.
//!
//! This module defines the provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`StatementProvider`] - Normalized annual statements and company overviews

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    statement::StatementKind,
    types::{CompanyOverview, RawStatement, Ticker},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Alpha Vantage").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for annual financial statements.
///
/// Implementations fetch a provider's reports and normalize them into
/// [`RawStatement`]s whose fields are plain nullable numbers, most recent
/// fiscal period first.
#[async_trait]
pub trait StatementProvider: DataProvider {
    /// Fetches the annual statements of one kind for a ticker.
    ///
    /// Returns an empty vector when the provider has no reports for the ticker.
    async fn fetch_statements(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
    ) -> Result<Vec<RawStatement>>;

    /// Fetches company reference information for a ticker.
    async fn fetch_overview(&self, ticker: &Ticker) -> Result<CompanyOverview>;
}
