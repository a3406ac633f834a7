#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vendor-health/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial ratio engine for vendor statements.
//!
//! - [`RatioEngine`](ratios::RatioEngine) - Pure, null-tolerant ratio formulas
//! - [`ZeroPolicy`](policy::ZeroPolicy) - Whether a reported zero counts as missing
//! - [`MetricsAssembler`](assembler::MetricsAssembler) - Per-period metric records

/// Metric record assembly from statement fields.
pub mod assembler;
/// Compound revenue growth.
pub mod growth;
/// Operand policy for ratio inputs.
pub mod policy;
/// Liquidity, leverage, profitability and cash quality ratios.
pub mod ratios;

pub use assembler::{
    MetricsAssembler, assemble_balance_sheet_metrics, assemble_profitability_metrics,
};
pub use growth::{MIN_CAGR_PERIODS, revenue_cagr_3y};
pub use policy::ZeroPolicy;
pub use ratios::{
    CashQualityRatios, LEVERAGE_FLAG_THRESHOLD, LIQUIDITY_FLAG_THRESHOLD, LeverageRatios,
    LiquidityRatios, ProfitabilityRatios, RatioEngine, RiskFlags, cash_quality_ratios,
    leverage_ratios, liquidity_ratios, profitability_ratios, risk_flags, total_debt,
};
