//! Core data types for vendor financial health.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Ticker`] - Exchange ticker of a vendor
//! - [`RawStatement`] - One normalized statement for one fiscal period
//! - [`RevenuePoint`] - Revenue for one fiscal period, input to growth rates
//! - [`BalanceSheetMetrics`] - Liquidity and leverage ratios with risk flags
//! - [`ProfitabilityMetrics`] - Margins, return on equity, growth and cash quality
//! - [`VendorProfile`] - Vendor reference information
//! - [`CompanyOverview`] - Company information as reported by a provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::fields::StatementFields;
use crate::statement::StatementKind;

/// An exchange ticker.
///
/// Tickers are automatically uppercased and trimmed on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Creates a new ticker from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One normalized financial statement for one fiscal period.
///
/// Stored once per (ticker, kind, fiscal_date_ending).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawStatement {
    /// Vendor ticker.
    pub ticker: Ticker,
    /// Statement kind.
    pub kind: StatementKind,
    /// End date of the fiscal period (ISO `YYYY-MM-DD`).
    pub fiscal_date_ending: String,
    /// Currency the statement is reported in.
    pub reported_currency: String,
    /// Normalized numeric fields.
    pub fields: StatementFields,
    /// The provider's original report, verbatim.
    pub raw_json: Option<String>,
    /// When the statement was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl RawStatement {
    /// Creates a statement reported in USD, fetched now.
    #[must_use]
    pub fn new(
        ticker: Ticker,
        kind: StatementKind,
        fiscal_date_ending: impl Into<String>,
        fields: StatementFields,
    ) -> Self {
        Self {
            ticker,
            kind,
            fiscal_date_ending: fiscal_date_ending.into(),
            reported_currency: "USD".to_string(),
            fields,
            raw_json: None,
            fetched_at: Utc::now(),
        }
    }

    /// Sets the reporting currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.reported_currency = currency.into();
        self
    }

    /// Attaches the provider's original report.
    #[must_use]
    pub fn with_raw_json(mut self, raw_json: impl Into<String>) -> Self {
        self.raw_json = Some(raw_json.into());
        self
    }

    /// Returns the value of a normalized field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name)
    }
}

/// Revenue reported for one fiscal period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    /// End date of the fiscal period (ISO `YYYY-MM-DD`).
    pub fiscal_date_ending: String,
    /// Total revenue, if reported.
    pub total_revenue: Option<f64>,
}

impl RevenuePoint {
    /// Creates a revenue point.
    #[must_use]
    pub fn new(fiscal_date_ending: impl Into<String>, total_revenue: impl Into<Option<f64>>) -> Self {
        Self {
            fiscal_date_ending: fiscal_date_ending.into(),
            total_revenue: total_revenue.into(),
        }
    }
}

/// Balance sheet metrics for one ticker and fiscal period.
///
/// The flags are derived from `current_ratio` and `debt_to_equity` when the
/// record is assembled and are never changed afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetMetrics {
    /// Vendor ticker.
    pub ticker: Ticker,
    /// End date of the fiscal period.
    pub fiscal_date_ending: String,
    /// Current assets / current liabilities.
    pub current_ratio: Option<f64>,
    /// (Current assets - inventory) / current liabilities.
    pub quick_ratio: Option<f64>,
    /// Total debt / shareholder equity.
    pub debt_to_equity: Option<f64>,
    /// Total debt / total assets.
    pub debt_ratio: Option<f64>,
    /// Current ratio below the liquidity threshold.
    pub liquidity_flag: bool,
    /// Debt-to-equity above the leverage threshold.
    pub leverage_flag: bool,
}

/// Profitability metrics for one ticker and fiscal period, in percent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityMetrics {
    /// Vendor ticker.
    pub ticker: Ticker,
    /// End date of the fiscal period.
    pub fiscal_date_ending: String,
    /// Net income / total revenue.
    pub net_margin: Option<f64>,
    /// Operating income / total revenue.
    pub operating_margin: Option<f64>,
    /// Net income / shareholder equity.
    pub return_on_equity: Option<f64>,
    /// Three-year compound annual revenue growth.
    pub revenue_cagr_3y: Option<f64>,
    /// Operating cash flow / net income.
    pub ocf_to_net_income: Option<f64>,
}

/// Vendor reference information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    /// Vendor ticker.
    pub ticker: Ticker,
    /// Company name.
    pub name: String,
    /// Business sector.
    pub sector: String,
    /// Industry within the sector.
    pub industry: String,
    /// Business description.
    pub description: Option<String>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
}

/// Sector and industry used for vendors the provider has not described yet.
pub const UNKNOWN_CLASSIFICATION: &str = "Unknown";

impl VendorProfile {
    /// Creates a vendor profile with required fields.
    #[must_use]
    pub fn new(
        ticker: Ticker,
        name: impl Into<String>,
        sector: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        Self {
            ticker,
            name: name.into(),
            sector: sector.into(),
            industry: industry.into(),
            description: None,
            market_cap: None,
        }
    }

    /// Creates a placeholder profile for a ticker outside the target list.
    #[must_use]
    pub fn placeholder(ticker: Ticker) -> Self {
        let name = format!("{ticker} Corporation");
        Self::new(ticker, name, UNKNOWN_CLASSIFICATION, UNKNOWN_CLASSIFICATION)
    }

    /// Returns true if the profile still carries placeholder information.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.name == format!("{} Corporation", self.ticker) || self.sector == UNKNOWN_CLASSIFICATION
    }

    /// Sets the business description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the market capitalization.
    #[must_use]
    pub const fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    /// Merges provider-reported company information into this profile.
    ///
    /// Fields the provider left empty keep their current values.
    pub fn apply_overview(&mut self, overview: &CompanyOverview) {
        if let Some(name) = &overview.name {
            self.name.clone_from(name);
        }
        if let Some(sector) = &overview.sector {
            self.sector.clone_from(sector);
        }
        if let Some(industry) = &overview.industry {
            self.industry.clone_from(industry);
        }
        if overview.description.is_some() {
            self.description.clone_from(&overview.description);
        }
        if overview.market_cap.is_some() {
            self.market_cap = overview.market_cap;
        }
    }
}

/// Company information as reported by a provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    /// Ticker the overview was requested for.
    pub ticker: Ticker,
    /// Company name.
    pub name: Option<String>,
    /// Business sector.
    pub sector: Option<String>,
    /// Industry within the sector.
    pub industry: Option<String>,
    /// Business description.
    pub description: Option<String>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
}
