//! Metrics assembler.
//!
//! Packages ratio engine output into per-period [`BalanceSheetMetrics`] and
//! [`ProfitabilityMetrics`] records. The assembler reads named fields out of
//! normalized statements; missing fields are nulls, never errors.

use vendor_core::{
    BalanceSheetMetrics, ProfitabilityMetrics, RevenuePoint, StatementFields, Ticker, fields,
};

use crate::ratios::{RatioEngine, risk_flags};

/// Builds metric records from normalized statement fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsAssembler {
    engine: RatioEngine,
}

impl MetricsAssembler {
    /// Create an assembler backed by the default [`RatioEngine`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            engine: RatioEngine::new(),
        }
    }

    /// Create an assembler backed by the given engine.
    #[must_use]
    pub const fn with_engine(engine: RatioEngine) -> Self {
        Self { engine }
    }

    /// Returns the ratio engine used by this assembler.
    #[must_use]
    pub const fn engine(&self) -> &RatioEngine {
        &self.engine
    }

    /// Assembles the balance sheet metrics for one fiscal period.
    #[must_use]
    pub fn balance_sheet_metrics(
        &self,
        ticker: &Ticker,
        fiscal_date_ending: &str,
        balance_sheet: &StatementFields,
    ) -> BalanceSheetMetrics {
        let total_debt = self.engine.total_debt(
            balance_sheet.get(fields::SHORT_TERM_DEBT),
            balance_sheet.get(fields::LONG_TERM_DEBT),
            balance_sheet.get(fields::SHORT_LONG_TERM_DEBT_TOTAL),
        );

        let liquidity = self.engine.liquidity_ratios(
            balance_sheet.get(fields::TOTAL_CURRENT_ASSETS),
            balance_sheet.get(fields::TOTAL_CURRENT_LIABILITIES),
            balance_sheet.get(fields::INVENTORY),
        );

        let leverage = self.engine.leverage_ratios(
            total_debt,
            balance_sheet.get(fields::TOTAL_ASSETS),
            balance_sheet.get(fields::TOTAL_SHAREHOLDER_EQUITY),
        );

        let flags = risk_flags(liquidity.current_ratio, leverage.debt_to_equity);

        BalanceSheetMetrics {
            ticker: ticker.clone(),
            fiscal_date_ending: fiscal_date_ending.to_string(),
            current_ratio: liquidity.current_ratio,
            quick_ratio: liquidity.quick_ratio,
            debt_to_equity: leverage.debt_to_equity,
            debt_ratio: leverage.debt_ratio,
            liquidity_flag: flags.liquidity_flag,
            leverage_flag: flags.leverage_flag,
        }
    }

    /// Assembles the profitability metrics for one fiscal period.
    ///
    /// `shareholder_equity` comes from the balance sheet of the same period.
    /// The revenue CAGR is computed only when a non-empty history is given,
    /// and cash quality only when non-empty cash flow fields are given; the
    /// cash flow statement's own net income is used for it.
    #[must_use]
    pub fn profitability_metrics(
        &self,
        ticker: &Ticker,
        fiscal_date_ending: &str,
        income_statement: &StatementFields,
        shareholder_equity: Option<f64>,
        cash_flow: Option<&StatementFields>,
        historical_revenue: Option<&[RevenuePoint]>,
    ) -> ProfitabilityMetrics {
        let profitability = self.engine.profitability_ratios(
            income_statement.get(fields::NET_INCOME),
            income_statement.get(fields::TOTAL_REVENUE),
            income_statement.get(fields::OPERATING_INCOME),
            shareholder_equity,
        );

        let revenue_cagr_3y = historical_revenue
            .filter(|history| !history.is_empty())
            .and_then(|history| self.engine.revenue_cagr_3y(history));

        let ocf_to_net_income = cash_flow
            .filter(|cash_flow| !cash_flow.is_empty())
            .and_then(|cash_flow| {
                self.engine
                    .cash_quality_ratios(
                        cash_flow.get(fields::OPERATING_CASHFLOW),
                        cash_flow.get(fields::NET_INCOME),
                    )
                    .ocf_to_net_income
            });

        ProfitabilityMetrics {
            ticker: ticker.clone(),
            fiscal_date_ending: fiscal_date_ending.to_string(),
            net_margin: profitability.net_margin,
            operating_margin: profitability.operating_margin,
            return_on_equity: profitability.return_on_equity,
            revenue_cagr_3y,
            ocf_to_net_income,
        }
    }
}

/// Assembles balance sheet metrics with the default engine.
#[must_use]
pub fn assemble_balance_sheet_metrics(
    ticker: &Ticker,
    fiscal_date_ending: &str,
    balance_sheet: &StatementFields,
) -> BalanceSheetMetrics {
    MetricsAssembler::new().balance_sheet_metrics(ticker, fiscal_date_ending, balance_sheet)
}

/// Assembles profitability metrics with the default engine.
#[must_use]
pub fn assemble_profitability_metrics(
    ticker: &Ticker,
    fiscal_date_ending: &str,
    income_statement: &StatementFields,
    shareholder_equity: Option<f64>,
    cash_flow: Option<&StatementFields>,
    historical_revenue: Option<&[RevenuePoint]>,
) -> ProfitabilityMetrics {
    MetricsAssembler::new().profitability_metrics(
        ticker,
        fiscal_date_ending,
        income_statement,
        shareholder_equity,
        cash_flow,
        historical_revenue,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn balance_sheet() -> StatementFields {
        StatementFields::new()
            .with(fields::TOTAL_CURRENT_ASSETS, 5_000.0)
            .with(fields::TOTAL_CURRENT_LIABILITIES, 4_500.0)
            .with(fields::INVENTORY, 1_000.0)
            .with(fields::TOTAL_ASSETS, 20_000.0)
            .with(fields::TOTAL_SHAREHOLDER_EQUITY, 4_000.0)
            .with(fields::SHORT_TERM_DEBT, 2_000.0)
            .with(fields::LONG_TERM_DEBT, 7_000.0)
            .with(fields::SHORT_LONG_TERM_DEBT_TOTAL, None)
    }

    fn income_statement() -> StatementFields {
        StatementFields::new()
            .with(fields::NET_INCOME, 50.0)
            .with(fields::TOTAL_REVENUE, 200.0)
            .with(fields::OPERATING_INCOME, 80.0)
    }

    #[test]
    fn test_balance_sheet_metrics() {
        let ticker = Ticker::new("LYB");
        let metrics = assemble_balance_sheet_metrics(&ticker, "2023-12-31", &balance_sheet());

        assert_eq!(metrics.ticker, ticker);
        assert_eq!(metrics.fiscal_date_ending, "2023-12-31");
        assert_relative_eq!(metrics.current_ratio.unwrap(), 5_000.0 / 4_500.0);
        assert_relative_eq!(metrics.quick_ratio.unwrap(), 4_000.0 / 4_500.0);
        assert_relative_eq!(metrics.debt_to_equity.unwrap(), 2.25);
        assert_relative_eq!(metrics.debt_ratio.unwrap(), 0.45);
        assert!(metrics.liquidity_flag);
        assert!(metrics.leverage_flag);
    }

    #[test]
    fn test_balance_sheet_aggregate_debt_wins() {
        let fields = balance_sheet().with(fields::SHORT_LONG_TERM_DEBT_TOTAL, 4_000.0);
        let metrics = assemble_balance_sheet_metrics(&Ticker::new("LYB"), "2023-12-31", &fields);

        assert_relative_eq!(metrics.debt_to_equity.unwrap(), 1.0);
        assert!(!metrics.leverage_flag);
    }

    #[test]
    fn test_empty_balance_sheet() {
        let metrics =
            assemble_balance_sheet_metrics(&Ticker::new("CE"), "2023-12-31", &StatementFields::new());

        assert_eq!(
            metrics,
            BalanceSheetMetrics {
                ticker: Ticker::new("CE"),
                fiscal_date_ending: "2023-12-31".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_profitability_metrics() {
        let cash_flow = StatementFields::new()
            .with(fields::OPERATING_CASHFLOW, 75.0)
            .with(fields::NET_INCOME, 60.0);
        let history = vec![
            RevenuePoint::new("2023-12-31", 133.1),
            RevenuePoint::new("2022-12-31", 121.0),
            RevenuePoint::new("2021-12-31", 100.0),
        ];

        let metrics = assemble_profitability_metrics(
            &Ticker::new("DD"),
            "2023-12-31",
            &income_statement(),
            Some(400.0),
            Some(&cash_flow),
            Some(&history),
        );

        assert_relative_eq!(metrics.net_margin.unwrap(), 25.0);
        assert_relative_eq!(metrics.operating_margin.unwrap(), 40.0);
        assert_relative_eq!(metrics.return_on_equity.unwrap(), 12.5);
        assert_relative_eq!(metrics.revenue_cagr_3y.unwrap(), 10.0, epsilon = 1e-9);
        // cash flow's own net income, not the income statement's
        assert_relative_eq!(metrics.ocf_to_net_income.unwrap(), 125.0);
    }

    #[test]
    fn test_profitability_optional_inputs_absent() {
        let metrics = assemble_profitability_metrics(
            &Ticker::new("DD"),
            "2023-12-31",
            &income_statement(),
            None,
            Some(&StatementFields::new()),
            Some(&[]),
        );

        assert_relative_eq!(metrics.net_margin.unwrap(), 25.0);
        assert_eq!(metrics.return_on_equity, None);
        assert_eq!(metrics.revenue_cagr_3y, None);
        assert_eq!(metrics.ocf_to_net_income, None);
    }

    #[test]
    fn test_short_history_does_not_block_other_metrics() {
        let history = vec![RevenuePoint::new("2023-12-31", 133.1)];
        let metrics = assemble_profitability_metrics(
            &Ticker::new("ST"),
            "2023-12-31",
            &income_statement(),
            Some(400.0),
            None,
            Some(&history),
        );

        assert_eq!(metrics.revenue_cagr_3y, None);
        assert!(metrics.net_margin.is_some());
        assert!(metrics.return_on_equity.is_some());
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let ticker = Ticker::new("TEL");
        let first = assemble_balance_sheet_metrics(&ticker, "2024-09-27", &balance_sheet());
        let second = assemble_balance_sheet_metrics(&ticker, "2024-09-27", &balance_sheet());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );

        let first = assemble_profitability_metrics(
            &ticker,
            "2024-09-27",
            &income_statement(),
            Some(400.0),
            None,
            None,
        );
        let second = assemble_profitability_metrics(
            &ticker,
            "2024-09-27",
            &income_statement(),
            Some(400.0),
            None,
            None,
        );
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
