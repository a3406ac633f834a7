//! Ratio engine.
//!
//! Liquidity, leverage, profitability and cash-quality ratios over nullable
//! inputs. A ratio is only computed when its operands are usable under the
//! engine's [`ZeroPolicy`] and its denominator is non-zero; otherwise it is
//! `None`. No ratio is ever infinite or NaN.

use serde::{Deserialize, Serialize};

use crate::policy::ZeroPolicy;

/// Current ratio below which a vendor is flagged for liquidity risk.
pub const LIQUIDITY_FLAG_THRESHOLD: f64 = 1.2;

/// Debt-to-equity above which a vendor is flagged for leverage risk.
pub const LEVERAGE_FLAG_THRESHOLD: f64 = 2.0;

/// Liquidity ratios from the balance sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRatios {
    /// Current assets / current liabilities.
    pub current_ratio: Option<f64>,
    /// (Current assets - inventory) / current liabilities.
    pub quick_ratio: Option<f64>,
}

/// Leverage ratios from the balance sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeverageRatios {
    /// Total debt / shareholder equity.
    pub debt_to_equity: Option<f64>,
    /// Total debt / total assets.
    pub debt_ratio: Option<f64>,
}

/// Risk flags derived from liquidity and leverage ratios.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiskFlags {
    /// Current ratio is below [`LIQUIDITY_FLAG_THRESHOLD`].
    pub liquidity_flag: bool,
    /// Debt-to-equity is above [`LEVERAGE_FLAG_THRESHOLD`].
    pub leverage_flag: bool,
}

/// Profitability ratios, in percent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityRatios {
    /// Net income / total revenue.
    pub net_margin: Option<f64>,
    /// Operating income / total revenue.
    pub operating_margin: Option<f64>,
    /// Net income / shareholder equity.
    pub return_on_equity: Option<f64>,
}

/// Cash-quality ratios, in percent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CashQualityRatios {
    /// Operating cash flow / net income.
    pub ocf_to_net_income: Option<f64>,
}

/// Stateless ratio calculator.
///
/// The engine holds only its [`ZeroPolicy`]; every method is a pure function
/// of its arguments, so one engine can be shared freely across threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RatioEngine {
    policy: ZeroPolicy,
}

impl RatioEngine {
    /// Create an engine with the default [`ZeroPolicy`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: ZeroPolicy::TreatZeroAsMissing,
        }
    }

    /// Create an engine with the given operand policy.
    #[must_use]
    pub const fn with_policy(policy: ZeroPolicy) -> Self {
        Self { policy }
    }

    /// Returns the operand policy of this engine.
    #[must_use]
    pub const fn policy(&self) -> ZeroPolicy {
        self.policy
    }

    /// `numerator / denominator`, or `None` if either operand is unusable.
    fn ratio(&self, numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
        let numerator = self.policy.operand(numerator)?;
        let denominator = self.policy.denominator(denominator)?;
        finite(numerator / denominator)
    }

    /// Same as [`Self::ratio`], scaled to percent.
    fn percentage(&self, numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
        self.ratio(numerator, denominator)
            .and_then(|ratio| finite(ratio * 100.0))
    }

    /// Computes the current and quick ratios.
    ///
    /// The quick ratio accepts an inventory of zero; it is only skipped when
    /// inventory is not reported at all.
    #[must_use]
    pub fn liquidity_ratios(
        &self,
        current_assets: Option<f64>,
        current_liabilities: Option<f64>,
        inventory: Option<f64>,
    ) -> LiquidityRatios {
        let current_ratio = self.ratio(current_assets, current_liabilities);

        let quick_ratio = inventory.and_then(|inventory| {
            let assets = self.policy.operand(current_assets)?;
            let liabilities = self.policy.denominator(current_liabilities)?;
            finite((assets - inventory) / liabilities)
        });

        LiquidityRatios {
            current_ratio,
            quick_ratio,
        }
    }

    /// Computes debt-to-equity and the debt ratio.
    #[must_use]
    pub fn leverage_ratios(
        &self,
        total_debt: Option<f64>,
        total_assets: Option<f64>,
        shareholder_equity: Option<f64>,
    ) -> LeverageRatios {
        LeverageRatios {
            debt_to_equity: self.ratio(total_debt, shareholder_equity),
            debt_ratio: self.ratio(total_debt, total_assets),
        }
    }

    /// Determines total debt.
    ///
    /// A provider-supplied aggregate takes precedence. Otherwise the reported
    /// short and long-term components are summed; with neither reported the
    /// result is `None`, never zero.
    #[must_use]
    pub fn total_debt(
        &self,
        short_term_debt: Option<f64>,
        long_term_debt: Option<f64>,
        short_long_term_debt_total: Option<f64>,
    ) -> Option<f64> {
        if let Some(total) = self.policy.operand(short_long_term_debt_total) {
            return Some(total);
        }

        [short_term_debt, long_term_debt]
            .into_iter()
            .filter_map(|component| self.policy.operand(component))
            .reduce(|acc, component| acc + component)
    }

    /// Computes net margin, operating margin and return on equity.
    #[must_use]
    pub fn profitability_ratios(
        &self,
        net_income: Option<f64>,
        total_revenue: Option<f64>,
        operating_income: Option<f64>,
        shareholder_equity: Option<f64>,
    ) -> ProfitabilityRatios {
        ProfitabilityRatios {
            net_margin: self.percentage(net_income, total_revenue),
            operating_margin: self.percentage(operating_income, total_revenue),
            return_on_equity: self.percentage(net_income, shareholder_equity),
        }
    }

    /// Computes operating cash flow relative to net income.
    #[must_use]
    pub fn cash_quality_ratios(
        &self,
        operating_cashflow: Option<f64>,
        net_income: Option<f64>,
    ) -> CashQualityRatios {
        CashQualityRatios {
            ocf_to_net_income: self.percentage(operating_cashflow, net_income),
        }
    }
}

/// Derives risk flags from the current ratio and debt-to-equity.
///
/// Both thresholds are exclusive: a current ratio of exactly 1.2 or a
/// debt-to-equity of exactly 2.0 is not flagged. Missing ratios never flag.
#[must_use]
pub fn risk_flags(current_ratio: Option<f64>, debt_to_equity: Option<f64>) -> RiskFlags {
    RiskFlags {
        liquidity_flag: current_ratio.is_some_and(|r| r < LIQUIDITY_FLAG_THRESHOLD),
        leverage_flag: debt_to_equity.is_some_and(|r| r > LEVERAGE_FLAG_THRESHOLD),
    }
}

/// Computes liquidity ratios with the default policy.
#[must_use]
pub fn liquidity_ratios(
    current_assets: Option<f64>,
    current_liabilities: Option<f64>,
    inventory: Option<f64>,
) -> LiquidityRatios {
    RatioEngine::new().liquidity_ratios(current_assets, current_liabilities, inventory)
}

/// Computes leverage ratios with the default policy.
#[must_use]
pub fn leverage_ratios(
    total_debt: Option<f64>,
    total_assets: Option<f64>,
    shareholder_equity: Option<f64>,
) -> LeverageRatios {
    RatioEngine::new().leverage_ratios(total_debt, total_assets, shareholder_equity)
}

/// Determines total debt with the default policy.
#[must_use]
pub fn total_debt(
    short_term_debt: Option<f64>,
    long_term_debt: Option<f64>,
    short_long_term_debt_total: Option<f64>,
) -> Option<f64> {
    RatioEngine::new().total_debt(short_term_debt, long_term_debt, short_long_term_debt_total)
}

/// Computes profitability ratios with the default policy.
#[must_use]
pub fn profitability_ratios(
    net_income: Option<f64>,
    total_revenue: Option<f64>,
    operating_income: Option<f64>,
    shareholder_equity: Option<f64>,
) -> ProfitabilityRatios {
    RatioEngine::new().profitability_ratios(
        net_income,
        total_revenue,
        operating_income,
        shareholder_equity,
    )
}

/// Computes cash-quality ratios with the default policy.
#[must_use]
pub fn cash_quality_ratios(
    operating_cashflow: Option<f64>,
    net_income: Option<f64>,
) -> CashQualityRatios {
    RatioEngine::new().cash_quality_ratios(operating_cashflow, net_income)
}

pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
