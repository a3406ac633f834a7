//! Alpha Vantage payload normalization.
//!
//! Alpha Vantage reports every amount as a string, using `"None"` for values
//! it does not have. Reports are mapped onto snake_case field names with
//! plain nullable numbers.

use serde_json::Value;
use tracing::warn;
use vendor_core::{
    CompanyOverview, RawStatement, StatementFields, StatementKind, Ticker, fields,
};

/// Balance sheet fields, as (provider key, normalized name).
pub const BALANCE_SHEET_FIELDS: &[(&str, &str)] = &[
    ("totalAssets", fields::TOTAL_ASSETS),
    ("totalCurrentAssets", fields::TOTAL_CURRENT_ASSETS),
    (
        "cashAndCashEquivalentsAtCarryingValue",
        fields::CASH_AND_CASH_EQUIVALENTS,
    ),
    ("cashAndShortTermInvestments", "cash_and_short_term_investments"),
    ("inventory", fields::INVENTORY),
    ("currentNetReceivables", "current_net_receivables"),
    ("totalNonCurrentAssets", "total_non_current_assets"),
    ("propertyPlantEquipment", "property_plant_equipment"),
    ("intangibleAssets", "intangible_assets"),
    ("goodwill", "goodwill"),
    ("shortTermInvestments", "short_term_investments"),
    ("otherCurrentAssets", "other_current_assets"),
    ("totalLiabilities", "total_liabilities"),
    ("totalCurrentLiabilities", fields::TOTAL_CURRENT_LIABILITIES),
    ("currentAccountsPayable", "current_accounts_payable"),
    ("currentDebt", "current_debt"),
    ("shortTermDebt", fields::SHORT_TERM_DEBT),
    ("totalNonCurrentLiabilities", "total_non_current_liabilities"),
    ("longTermDebt", fields::LONG_TERM_DEBT),
    ("currentLongTermDebt", "current_long_term_debt"),
    ("shortLongTermDebtTotal", fields::SHORT_LONG_TERM_DEBT_TOTAL),
    ("otherCurrentLiabilities", "other_current_liabilities"),
    ("otherNonCurrentLiabilities", "other_non_current_liabilities"),
    ("totalShareholderEquity", fields::TOTAL_SHAREHOLDER_EQUITY),
    ("treasuryStock", "treasury_stock"),
    ("retainedEarnings", "retained_earnings"),
    ("commonStock", "common_stock"),
    ("commonStockSharesOutstanding", "common_stock_shares_outstanding"),
];

/// Income statement fields, as (provider key, normalized name).
pub const INCOME_STATEMENT_FIELDS: &[(&str, &str)] = &[
    ("totalRevenue", fields::TOTAL_REVENUE),
    ("grossProfit", fields::GROSS_PROFIT),
    ("operatingIncome", fields::OPERATING_INCOME),
    ("netIncome", fields::NET_INCOME),
    ("ebitda", "ebitda"),
    ("costOfRevenue", "cost_of_revenue"),
    ("operatingExpenses", "operating_expenses"),
    ("incomeBeforeTax", "income_before_tax"),
    ("incomeTaxExpense", "income_tax_expense"),
];

/// Cash flow statement fields, as (provider key, normalized name).
pub const CASH_FLOW_FIELDS: &[(&str, &str)] = &[
    ("operatingCashflow", fields::OPERATING_CASHFLOW),
    ("netIncome", fields::NET_INCOME),
    ("capitalExpenditures", "capital_expenditures"),
    ("cashflowFromInvestment", "cashflow_from_investment"),
    ("cashflowFromFinancing", "cashflow_from_financing"),
    ("dividendPayout", "dividend_payout"),
    (
        "depreciationDepletionAndAmortization",
        "depreciation_depletion_amortization",
    ),
];

/// Returns the field map used for a statement kind.
#[must_use]
pub const fn field_map(kind: StatementKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        StatementKind::BalanceSheet => BALANCE_SHEET_FIELDS,
        StatementKind::IncomeStatement => INCOME_STATEMENT_FIELDS,
        StatementKind::CashFlow => CASH_FLOW_FIELDS,
    }
}

/// Converts a provider value into a number.
///
/// `null`, `"None"`, empty or non-numeric strings and non-finite numbers all
/// become `None`.
#[must_use]
pub fn safe_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "None" {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Normalizes the `annualReports` of a statement payload.
///
/// At most `limit` reports are kept, in the order the provider lists them
/// (most recent first). A payload without annual reports yields no
/// statements. Reports lacking a fiscal date are skipped.
#[must_use]
pub fn parse_statements(
    ticker: &Ticker,
    kind: StatementKind,
    payload: &Value,
    limit: usize,
) -> Vec<RawStatement> {
    let Some(reports) = payload.get("annualReports").and_then(Value::as_array) else {
        return Vec::new();
    };

    reports
        .iter()
        .take(limit)
        .filter_map(|report| {
            let Some(fiscal_date_ending) = report.get("fiscalDateEnding").and_then(Value::as_str)
            else {
                warn!(%ticker, statement = %kind, "Skipping report without fiscalDateEnding");
                return None;
            };

            let fields: StatementFields = field_map(kind)
                .iter()
                .map(|(key, name)| {
                    let value = report.get(*key).and_then(safe_float);
                    ((*name).to_string(), value)
                })
                .collect();

            let currency = report
                .get("reportedCurrency")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty() && *c != "None")
                .unwrap_or("USD");

            Some(
                RawStatement::new(ticker.clone(), kind, fiscal_date_ending, fields)
                    .with_currency(currency)
                    .with_raw_json(report.to_string()),
            )
        })
        .collect()
}

/// Normalizes a company `OVERVIEW` payload.
///
/// Returns `None` when the payload carries no company information, which is
/// how the provider answers for unknown tickers.
#[must_use]
pub fn parse_overview(ticker: &Ticker, payload: &Value) -> Option<CompanyOverview> {
    let text = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "None")
            .map(str::to_string)
    };

    let overview = CompanyOverview {
        ticker: ticker.clone(),
        name: text("Name"),
        sector: text("Sector"),
        industry: text("Industry"),
        description: text("Description"),
        market_cap: payload.get("MarketCapitalization").and_then(safe_float),
    };

    let empty = overview.name.is_none()
        && overview.sector.is_none()
        && overview.industry.is_none()
        && overview.market_cap.is_none();
    (!empty).then_some(overview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_float() {
        assert_eq!(safe_float(&json!("123.5")), Some(123.5));
        assert_eq!(safe_float(&json!("-42")), Some(-42.0));
        assert_eq!(safe_float(&json!(7)), Some(7.0));
        assert_eq!(safe_float(&json!("None")), None);
        assert_eq!(safe_float(&json!("")), None);
        assert_eq!(safe_float(&json!("abc")), None);
        assert_eq!(safe_float(&json!("NaN")), None);
        assert_eq!(safe_float(&json!("inf")), None);
        assert_eq!(safe_float(&Value::Null), None);
        assert_eq!(safe_float(&json!(true)), None);
    }

    #[test]
    fn test_parse_balance_sheet() {
        let payload = json!({
            "symbol": "LYB",
            "annualReports": [
                {
                    "fiscalDateEnding": "2023-12-31",
                    "reportedCurrency": "USD",
                    "totalAssets": "20000",
                    "totalCurrentAssets": "5000",
                    "totalCurrentLiabilities": "4500",
                    "inventory": "None",
                    "shortLongTermDebtTotal": "9000",
                    "totalShareholderEquity": "4000"
                },
                {
                    "fiscalDateEnding": "2022-12-31",
                    "reportedCurrency": "EUR",
                    "totalAssets": "18000"
                }
            ]
        });

        let statements = parse_statements(
            &Ticker::new("LYB"),
            StatementKind::BalanceSheet,
            &payload,
            3,
        );

        assert_eq!(statements.len(), 2);
        let latest = &statements[0];
        assert_eq!(latest.fiscal_date_ending, "2023-12-31");
        assert_eq!(latest.kind, StatementKind::BalanceSheet);
        assert_eq!(latest.field(fields::TOTAL_ASSETS), Some(20_000.0));
        assert_eq!(latest.field(fields::SHORT_LONG_TERM_DEBT_TOTAL), Some(9_000.0));
        assert_eq!(latest.field(fields::INVENTORY), None);
        assert_eq!(latest.field(fields::LONG_TERM_DEBT), None);
        assert_eq!(latest.fields.len(), BALANCE_SHEET_FIELDS.len());
        assert!(latest.raw_json.as_deref().unwrap().contains("\"totalAssets\":\"20000\""));

        assert_eq!(statements[1].reported_currency, "EUR");
    }

    #[test]
    fn test_report_limit() {
        let reports: Vec<Value> = (0..6)
            .map(|i| json!({"fiscalDateEnding": format!("{}-12-31", 2023 - i), "totalRevenue": "100"}))
            .collect();
        let payload = json!({ "annualReports": reports });

        let statements = parse_statements(
            &Ticker::new("DD"),
            StatementKind::IncomeStatement,
            &payload,
            3,
        );
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[2].fiscal_date_ending, "2021-12-31");
    }

    #[test]
    fn test_cash_flow_net_income() {
        let payload = json!({
            "annualReports": [
                {"fiscalDateEnding": "2023-12-31", "operatingCashflow": "75", "netIncome": "60"}
            ]
        });
        let statements =
            parse_statements(&Ticker::new("CE"), StatementKind::CashFlow, &payload, 3);

        assert_eq!(statements[0].field(fields::OPERATING_CASHFLOW), Some(75.0));
        assert_eq!(statements[0].field(fields::NET_INCOME), Some(60.0));
        assert_eq!(statements[0].reported_currency, "USD");
    }

    #[test]
    fn test_missing_reports() {
        let ticker = Ticker::new("TEL");
        assert!(parse_statements(&ticker, StatementKind::BalanceSheet, &json!({}), 3).is_empty());

        let undated = json!({"annualReports": [{"totalAssets": "1"}]});
        assert!(parse_statements(&ticker, StatementKind::BalanceSheet, &undated, 3).is_empty());
    }

    #[test]
    fn test_parse_overview() {
        let payload = json!({
            "Symbol": "ACME",
            "Name": "Acme Industries",
            "Sector": "INDUSTRIALS",
            "Industry": "None",
            "MarketCapitalization": "1500000000"
        });

        let overview = parse_overview(&Ticker::new("ACME"), &payload).unwrap();
        assert_eq!(overview.name.as_deref(), Some("Acme Industries"));
        assert_eq!(overview.sector.as_deref(), Some("INDUSTRIALS"));
        assert_eq!(overview.industry, None);
        assert_eq!(overview.market_cap, Some(1.5e9));

        assert_eq!(parse_overview(&Ticker::new("ACME"), &json!({})), None);
    }
}
