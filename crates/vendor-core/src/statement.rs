//! Financial statement kinds.
//!
//! This module defines [`StatementKind`], the three annual reports a vendor's
//! metrics are derived from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VendorError;

/// Kind of financial statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Balance sheet (assets, liabilities, equity).
    BalanceSheet,
    /// Income statement (revenue, operating and net income).
    IncomeStatement,
    /// Cash flow statement (operating, investing and financing cash flows).
    CashFlow,
}

impl StatementKind {
    /// All statement kinds, in fetch order.
    pub const ALL: [Self; 3] = [Self::BalanceSheet, Self::IncomeStatement, Self::CashFlow];

    /// Returns the storage key of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance_sheet",
            Self::IncomeStatement => "income_statement",
            Self::CashFlow => "cash_flow",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BalanceSheet => "Balance sheet",
            Self::IncomeStatement => "Income statement",
            Self::CashFlow => "Cash flow statement",
        };
        f.write_str(label)
    }
}

impl FromStr for StatementKind {
    type Err = VendorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance_sheet" => Ok(Self::BalanceSheet),
            "income_statement" => Ok(Self::IncomeStatement),
            "cash_flow" => Ok(Self::CashFlow),
            other => Err(VendorError::Parse(format!("Invalid statement kind: {other}"))),
        }
    }
}
