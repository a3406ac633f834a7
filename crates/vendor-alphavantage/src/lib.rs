#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vendor-health/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Alpha Vantage statement provider.
//!
//! This crate implements the vendor-core provider traits for the
//! [Alpha Vantage](https://www.alphavantage.co/) fundamentals API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vendor_alphavantage::AlphaVantageProvider;
//! use vendor_core::{StatementKind, StatementProvider, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = AlphaVantageProvider::new(["your_api_key"])?.with_requests_per_minute(5);
//!
//!     let ticker = Ticker::new("LYB");
//!     let balance_sheets = provider
//!         .fetch_statements(&ticker, StatementKind::BalanceSheet)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

/// API key ring with rotation and usage tracking.
pub mod keys;
/// Payload normalization into statement fields.
pub mod normalize;
/// Minimum-interval request limiter.
pub mod rate_limit;

pub use keys::{ApiKeyRing, KeyStatus, mask_key};
pub use normalize::{parse_overview, parse_statements, safe_float};
pub use rate_limit::RateLimiter;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};
use vendor_core::{
    CompanyOverview, DataProvider, RawStatement, Result, StatementKind, StatementProvider, Ticker,
    VendorError,
};

/// Default Alpha Vantage query endpoint.
pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Default number of annual reports kept per statement.
pub const DEFAULT_REPORT_LIMIT: usize = 3;

/// Free-tier request quota.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 5;

const PROVIDER_NAME: &str = "Alpha Vantage";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Alpha Vantage data provider.
///
/// Provides access to:
/// - Annual balance sheets, income statements and cash flow statements
/// - Company overviews (name, sector, industry, market capitalization)
///
/// Clones share the HTTP client, the key ring and the rate limiter.
#[derive(Clone)]
pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
    keys: Arc<ApiKeyRing>,
    rate_limiter: Arc<RateLimiter>,
    report_limit: usize,
}

impl fmt::Debug for AlphaVantageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageProvider")
            .field("base_url", &self.base_url)
            .field("api_keys", &"[REDACTED]")
            .field("key_count", &self.keys.len())
            .field("min_interval", &self.rate_limiter.min_interval())
            .field("report_limit", &self.report_limit)
            .finish()
    }
}

/// What a decoded payload says about the request.
#[derive(Debug)]
enum Reply {
    Data(Value),
    Error(String),
    Notice(String),
}

impl Reply {
    fn classify(payload: Value) -> Self {
        let message = |key: &str| {
            payload
                .get(key)
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
        };
        if let Some(message) = message("Error Message") {
            return Self::Error(message);
        }
        if let Some(message) = message("Note").or_else(|| message("Information")) {
            return Self::Notice(message);
        }
        Self::Data(payload)
    }
}

impl AlphaVantageProvider {
    /// Create a new provider with the given API keys.
    ///
    /// # Errors
    ///
    /// Fails when no non-blank key is given or the HTTP client cannot be built.
    pub fn new<I, S>(api_keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| VendorError::Config(format!("Failed to build HTTP client: {e}")))?;
        Self::with_client(client, api_keys)
    }

    /// Create a new provider with a custom HTTP client.
    ///
    /// # Errors
    ///
    /// Fails when no non-blank key is given.
    pub fn with_client<I, S>(client: Client, api_keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            client,
            base_url: ALPHA_VANTAGE_BASE_URL.to_string(),
            keys: Arc::new(ApiKeyRing::new(api_keys)?),
            rate_limiter: Arc::new(RateLimiter::per_minute(DEFAULT_REQUESTS_PER_MINUTE)),
            report_limit: DEFAULT_REPORT_LIMIT,
        })
    }

    /// Use a different query endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request quota. Zero disables rate limiting.
    #[must_use]
    pub fn with_requests_per_minute(mut self, requests_per_minute: u32) -> Self {
        self.rate_limiter = Arc::new(RateLimiter::per_minute(requests_per_minute));
        self
    }

    /// Set how many of the most recent annual reports are kept.
    #[must_use]
    pub const fn with_report_limit(mut self, report_limit: usize) -> Self {
        self.report_limit = report_limit;
        self
    }

    /// Returns the masked state of the API key ring.
    #[must_use]
    pub fn key_status(&self) -> KeyStatus {
        self.keys.status()
    }

    /// Build a query URL.
    fn url(&self, function: &str, ticker: &Ticker, api_key: &str) -> String {
        format!(
            "{}?function={function}&symbol={}&apikey={api_key}",
            self.base_url,
            ticker.as_str()
        )
    }

    /// Make a rate-limited query and return the decoded payload.
    ///
    /// Rate-limit notices rotate to the next key and retry, once per key.
    async fn get(&self, function: &str, ticker: &Ticker) -> Result<Value> {
        let attempts = self.keys.len();

        for attempt in 1..=attempts {
            self.rate_limiter.wait().await;

            let (index, api_key) = self.keys.current();
            let url = self.url(function, ticker, api_key);
            debug!(function, %ticker, key = %mask_key(api_key), attempt, "Alpha Vantage request");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| VendorError::Network(e.without_url().to_string()))?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                warn!(function, %ticker, key = %mask_key(api_key), "HTTP 429 from Alpha Vantage");
                self.keys.rotate();
                continue;
            }

            if !response.status().is_success() {
                let status = response.status();
                return Err(VendorError::Network(format!("HTTP {status} for {function}")));
            }

            let text = response
                .text()
                .await
                .map_err(|e| VendorError::Network(e.without_url().to_string()))?;
            self.keys.record_use(index);

            let payload: Value = serde_json::from_str(&text)
                .map_err(|e| VendorError::Parse(format!("{function} for {ticker}: {e}")))?;

            match Reply::classify(payload) {
                Reply::Data(payload) => return Ok(payload),
                Reply::Error(message) => {
                    error!(function, %ticker, %message, "Alpha Vantage API error");
                    return Err(VendorError::TickerNotFound(ticker.to_string()));
                }
                Reply::Notice(message) => {
                    warn!(function, %ticker, key = %mask_key(api_key), %message, "Alpha Vantage API notice");
                    self.keys.rotate();
                }
            }
        }

        error!(function, %ticker, attempts, "Failed after trying all API keys");
        Err(VendorError::RateLimited {
            provider: PROVIDER_NAME.to_string(),
            retry_after: Some(self.rate_limiter.min_interval()),
        })
    }
}

impl DataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Alpha Vantage - Annual financial statements and company overviews"
    }
}

#[async_trait]
impl StatementProvider for AlphaVantageProvider {
    async fn fetch_statements(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
    ) -> Result<Vec<RawStatement>> {
        let function = match kind {
            StatementKind::BalanceSheet => "BALANCE_SHEET",
            StatementKind::IncomeStatement => "INCOME_STATEMENT",
            StatementKind::CashFlow => "CASH_FLOW",
        };

        let payload = self.get(function, ticker).await?;
        let statements = parse_statements(ticker, kind, &payload, self.report_limit);
        debug!(%ticker, statement = %kind, count = statements.len(), "Parsed annual reports");
        Ok(statements)
    }

    async fn fetch_overview(&self, ticker: &Ticker) -> Result<CompanyOverview> {
        let payload = self.get("OVERVIEW", ticker).await?;
        parse_overview(ticker, &payload)
            .ok_or_else(|| VendorError::TickerNotFound(ticker.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn provider(server: &Server, keys: &[&str]) -> AlphaVantageProvider {
        AlphaVantageProvider::new(keys.iter().copied())
            .unwrap()
            .with_base_url(format!("{}/query", server.url()))
            .with_requests_per_minute(0)
    }

    fn query(function: &str, apikey: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("function".into(), function.into()),
            Matcher::UrlEncoded("apikey".into(), apikey.into()),
        ])
    }

    #[test]
    fn test_url_building() {
        let provider = AlphaVantageProvider::new(["test_key"]).unwrap();
        assert_eq!(
            provider.url("BALANCE_SHEET", &Ticker::new("lyb"), "test_key"),
            "https://www.alphavantage.co/query?function=BALANCE_SHEET&symbol=LYB&apikey=test_key"
        );
    }

    #[test]
    fn test_provider_metadata() {
        let provider = AlphaVantageProvider::new(["test_key"]).unwrap();
        assert_eq!(provider.name(), "Alpha Vantage");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            AlphaVantageProvider::new(Vec::<String>::new()),
            Err(VendorError::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = AlphaVantageProvider::new(["secret_key_12345"]).unwrap();
        let debug_str = format!("{provider:?}");
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_fetch_balance_sheets() {
        let mut server = Server::new_async().await;
        let body = json!({
            "symbol": "LYB",
            "annualReports": [
                {"fiscalDateEnding": "2023-12-31", "totalAssets": "20000", "inventory": "None"},
                {"fiscalDateEnding": "2022-12-31", "totalAssets": "19000"},
                {"fiscalDateEnding": "2021-12-31", "totalAssets": "18000"},
                {"fiscalDateEnding": "2020-12-31", "totalAssets": "17000"}
            ]
        });
        let mock = server
            .mock("GET", "/query")
            .match_query(query("BALANCE_SHEET", "key-a"))
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let provider = provider(&server, &["key-a"]);
        let statements = provider
            .fetch_statements(&Ticker::new("LYB"), StatementKind::BalanceSheet)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(statements.len(), DEFAULT_REPORT_LIMIT);
        assert_eq!(statements[0].fiscal_date_ending, "2023-12-31");
        assert_eq!(statements[0].field("total_assets"), Some(20_000.0));
        assert_eq!(provider.key_status().usage_counts.get("key-a..."), Some(&1));
    }

    #[tokio::test]
    async fn test_notice_rotates_to_next_key() {
        let mut server = Server::new_async().await;
        let limited = server
            .mock("GET", "/query")
            .match_query(query("INCOME_STATEMENT", "first-key-1"))
            .with_body(json!({"Note": "API call frequency is 5 calls per minute"}).to_string())
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("GET", "/query")
            .match_query(query("INCOME_STATEMENT", "second-key-2"))
            .with_body(
                json!({"annualReports": [{"fiscalDateEnding": "2023-12-31", "totalRevenue": "200"}]})
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let provider = provider(&server, &["first-key-1", "second-key-2"]);
        let statements = provider
            .fetch_statements(&Ticker::new("DD"), StatementKind::IncomeStatement)
            .await
            .unwrap();

        limited.assert_async().await;
        ok.assert_async().await;
        assert_eq!(statements[0].field("total_revenue"), Some(200.0));
        assert_eq!(provider.key_status().current_index, 1);
    }

    #[tokio::test]
    async fn test_notice_with_single_key_is_rate_limited() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_body(json!({"Information": "Thank you for using Alpha Vantage!"}).to_string())
            .create_async()
            .await;

        let provider = provider(&server, &["only-key"]);
        let err = provider
            .fetch_statements(&Ticker::new("CE"), StatementKind::CashFlow)
            .await
            .unwrap_err();

        assert!(matches!(err, VendorError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_error_message_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_body(json!({"Error Message": "Invalid API call."}).to_string())
            .create_async()
            .await;

        let provider = provider(&server, &["key-a", "key-b"]);
        let err = provider
            .fetch_statements(&Ticker::new("NOPE"), StatementKind::BalanceSheet)
            .await
            .unwrap_err();

        assert!(matches!(err, VendorError::TickerNotFound(t) if t == "NOPE"));
        assert_eq!(provider.key_status().current_index, 0);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let provider = provider(&server, &["key-a"]);
        let err = provider.fetch_overview(&Ticker::new("TEL")).await.unwrap_err();
        assert!(matches!(err, VendorError::Network(_)));
    }

    #[tokio::test]
    async fn test_fetch_overview() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/query")
            .match_query(query("OVERVIEW", "key-a"))
            .with_body(
                json!({
                    "Symbol": "ST",
                    "Name": "Sensata Technologies Holding plc",
                    "Sector": "TECHNOLOGY",
                    "Industry": "ELECTRONIC COMPONENTS",
                    "MarketCapitalization": "5200000000"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = provider(&server, &["key-a"]);
        let overview = provider.fetch_overview(&Ticker::new("ST")).await.unwrap();

        assert_eq!(overview.name.as_deref(), Some("Sensata Technologies Holding plc"));
        assert_eq!(overview.market_cap, Some(5.2e9));
    }
}
