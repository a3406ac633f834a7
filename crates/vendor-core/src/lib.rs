#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vendor-health/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and collaborator traits for vendor financial health.
//!
//! This crate provides the foundational abstractions shared by the workspace:
//!
//! - [`StatementFields`](fields::StatementFields) - Normalized field map for one statement
//! - [`BalanceSheetMetrics`](types::BalanceSheetMetrics) and
//!   [`ProfitabilityMetrics`](types::ProfitabilityMetrics) - Computed metric records
//! - [`StatementProvider`](provider::StatementProvider) - Statement source
//! - [`MetricsStore`](store::MetricsStore) - Persistence abstraction

/// Error types for vendor data operations.
pub mod error;
/// Normalized statement field maps and field names.
pub mod fields;
/// Provider traits for fetching statements.
pub mod provider;
/// Financial statement kinds.
pub mod statement;
/// Store trait for statements and metrics.
pub mod store;
/// Core data types (Ticker, statements, metric records, vendor profiles).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{Result, VendorError};
pub use fields::StatementFields;
pub use provider::{DataProvider, StatementProvider};
pub use statement::StatementKind;
pub use store::MetricsStore;
pub use types::{
    BalanceSheetMetrics, CompanyOverview, ProfitabilityMetrics, RawStatement, RevenuePoint, Ticker,
    UNKNOWN_CLASSIFICATION, VendorProfile,
};
