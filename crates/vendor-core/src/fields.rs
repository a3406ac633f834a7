//! Normalized statement fields.
//!
//! A [`StatementFields`] map is the provider-agnostic form of one statement for
//! one fiscal period: field name to nullable number. Nothing is required; a
//! missing key reads the same as an explicit null.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Balance sheet: total current assets.
pub const TOTAL_CURRENT_ASSETS: &str = "total_current_assets";
/// Balance sheet: total current liabilities.
pub const TOTAL_CURRENT_LIABILITIES: &str = "total_current_liabilities";
/// Balance sheet: inventory.
pub const INVENTORY: &str = "inventory";
/// Balance sheet: total assets.
pub const TOTAL_ASSETS: &str = "total_assets";
/// Balance sheet: total shareholder equity.
pub const TOTAL_SHAREHOLDER_EQUITY: &str = "total_shareholder_equity";
/// Balance sheet: short-term debt.
pub const SHORT_TERM_DEBT: &str = "short_term_debt";
/// Balance sheet: long-term debt.
pub const LONG_TERM_DEBT: &str = "long_term_debt";
/// Balance sheet: provider-supplied short plus long-term debt aggregate.
pub const SHORT_LONG_TERM_DEBT_TOTAL: &str = "short_long_term_debt_total";
/// Balance sheet: cash and cash equivalents.
pub const CASH_AND_CASH_EQUIVALENTS: &str = "cash_and_cash_equivalents";

/// Income statement: total revenue.
pub const TOTAL_REVENUE: &str = "total_revenue";
/// Income statement: gross profit.
pub const GROSS_PROFIT: &str = "gross_profit";
/// Income statement: operating income.
pub const OPERATING_INCOME: &str = "operating_income";
/// Income and cash flow statements: net income.
pub const NET_INCOME: &str = "net_income";

/// Cash flow statement: operating cash flow.
pub const OPERATING_CASHFLOW: &str = "operating_cashflow";

/// Flattened map of nullable numeric statement fields.
///
/// Backed by a `BTreeMap` so iteration and serialization order are stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementFields(BTreeMap<String, Option<f64>>);

impl StatementFields {
    /// Creates an empty field map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value of a field, or `None` if it is absent or null.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied().flatten()
    }

    /// Sets a field, keeping explicit nulls.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.0.insert(name.into(), value);
    }

    /// Sets a field and returns the map, for building fixtures and queries.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Option<f64>>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Returns the number of fields, including explicit nulls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map has no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over field names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<f64>)> for StatementFields {
    fn from_iter<I: IntoIterator<Item = (K, Option<f64>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
