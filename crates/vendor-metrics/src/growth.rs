//! Revenue growth.

use tracing::{debug, warn};
use vendor_core::RevenuePoint;

use crate::ratios::{RatioEngine, finite};

/// Minimum number of fiscal periods needed for [`revenue_cagr_3y`].
pub const MIN_CAGR_PERIODS: usize = 3;

/// Exponent denominator of the compound growth rate.
const CAGR_YEARS: f64 = 3.0;

impl RatioEngine {
    /// Computes the three-year compound annual revenue growth rate, in percent.
    ///
    /// The series is sorted by fiscal date, most recent first. The first entry
    /// is the ending value and the third entry the starting value, regardless
    /// of gaps between the reported periods. Returns `None` when fewer than
    /// three periods are supplied, when either endpoint is unusable, when the
    /// starting revenue is not positive, or when the rate is not a real number.
    #[must_use]
    pub fn revenue_cagr_3y(&self, series: &[RevenuePoint]) -> Option<f64> {
        if series.len() < MIN_CAGR_PERIODS {
            debug!(
                periods = series.len(),
                "Not enough revenue history for 3-year CAGR"
            );
            return None;
        }

        let mut sorted: Vec<&RevenuePoint> = series.iter().collect();
        sorted.sort_by(|a, b| b.fiscal_date_ending.cmp(&a.fiscal_date_ending));

        let latest = self.policy().operand(sorted[0].total_revenue)?;
        let earliest = self.policy().operand(sorted[2].total_revenue)?;
        if earliest <= 0.0 {
            return None;
        }

        let growth = (latest / earliest).powf(1.0 / CAGR_YEARS);
        let cagr = finite((growth - 1.0) * 100.0);
        if cagr.is_none() {
            warn!(
                latest,
                earliest,
                latest_period = %sorted[0].fiscal_date_ending,
                "Revenue CAGR is undefined for these endpoints"
            );
        }
        cagr
    }
}

/// Computes the three-year revenue CAGR with the default policy.
#[must_use]
pub fn revenue_cagr_3y(series: &[RevenuePoint]) -> Option<f64> {
    RatioEngine::new().revenue_cagr_3y(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ZeroPolicy;
    use approx::assert_relative_eq;

    fn series(points: &[(&str, Option<f64>)]) -> Vec<RevenuePoint> {
        points
            .iter()
            .map(|(date, revenue)| RevenuePoint::new(*date, *revenue))
            .collect()
    }

    #[test]
    fn test_ten_percent_growth() {
        let data = series(&[
            ("2023-12-31", Some(133.1)),
            ("2022-12-31", Some(121.0)),
            ("2021-12-31", Some(100.0)),
        ]);
        assert_relative_eq!(revenue_cagr_3y(&data).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unsorted_input() {
        let data = series(&[
            ("2021-12-31", Some(100.0)),
            ("2023-12-31", Some(133.1)),
            ("2022-12-31", Some(121.0)),
        ]);
        assert_relative_eq!(revenue_cagr_3y(&data).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_uses_third_most_recent_period() {
        let data = series(&[
            ("2020-12-31", Some(50.0)),
            ("2023-12-31", Some(133.1)),
            ("2021-12-31", Some(100.0)),
            ("2022-12-31", Some(121.0)),
        ]);
        assert_relative_eq!(revenue_cagr_3y(&data).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_insufficient_history() {
        let data = series(&[("2023-12-31", Some(133.1)), ("2022-12-31", Some(121.0))]);
        assert_eq!(revenue_cagr_3y(&data), None);
        assert_eq!(revenue_cagr_3y(&[]), None);
    }

    #[test]
    fn test_unusable_endpoints() {
        let zero_start = series(&[
            ("2023-12-31", Some(133.1)),
            ("2022-12-31", Some(121.0)),
            ("2021-12-31", Some(0.0)),
        ]);
        assert_eq!(revenue_cagr_3y(&zero_start), None);

        let negative_start = series(&[
            ("2023-12-31", Some(133.1)),
            ("2022-12-31", Some(121.0)),
            ("2021-12-31", Some(-10.0)),
        ]);
        assert_eq!(revenue_cagr_3y(&negative_start), None);

        let missing_end = series(&[
            ("2023-12-31", None),
            ("2022-12-31", Some(121.0)),
            ("2021-12-31", Some(100.0)),
        ]);
        assert_eq!(revenue_cagr_3y(&missing_end), None);
    }

    #[test]
    fn test_negative_latest_revenue_is_undefined() {
        let data = series(&[
            ("2023-12-31", Some(-50.0)),
            ("2022-12-31", Some(121.0)),
            ("2021-12-31", Some(100.0)),
        ]);
        assert_eq!(revenue_cagr_3y(&data), None);
    }

    #[test]
    fn test_strict_null_allows_zero_latest_revenue() {
        let engine = RatioEngine::with_policy(ZeroPolicy::StrictNull);
        let data = series(&[
            ("2023-12-31", Some(0.0)),
            ("2022-12-31", Some(121.0)),
            ("2021-12-31", Some(100.0)),
        ]);
        assert_relative_eq!(engine.revenue_cagr_3y(&data).unwrap(), -100.0);
    }
}
