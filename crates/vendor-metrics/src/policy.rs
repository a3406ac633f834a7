//! Operand policy for ratio inputs.

use serde::{Deserialize, Serialize};

/// Decides which input values count as usable ratio operands.
///
/// Denominators of zero are rejected under every policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// A reported zero is treated like a missing value.
    ///
    /// This matches how historical metric records were produced, with one
    /// exception kept as-is: inventory in the quick ratio may be zero.
    #[default]
    TreatZeroAsMissing,
    /// Only a missing value is missing; zero is a real number.
    StrictNull,
}

impl ZeroPolicy {
    /// Returns the value if it is usable as an operand under this policy.
    #[must_use]
    pub fn operand(self, value: Option<f64>) -> Option<f64> {
        match self {
            Self::TreatZeroAsMissing => value.filter(|v| *v != 0.0),
            Self::StrictNull => value,
        }
    }

    /// Returns the value if it is usable as a denominator.
    #[must_use]
    pub fn denominator(self, value: Option<f64>) -> Option<f64> {
        self.operand(value).filter(|v| *v != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_handling() {
        assert_eq!(ZeroPolicy::TreatZeroAsMissing.operand(Some(0.0)), None);
        assert_eq!(ZeroPolicy::TreatZeroAsMissing.operand(Some(-3.0)), Some(-3.0));
        assert_eq!(ZeroPolicy::StrictNull.operand(Some(0.0)), Some(0.0));
        assert_eq!(ZeroPolicy::StrictNull.operand(None), None);
        assert_eq!(ZeroPolicy::StrictNull.denominator(Some(0.0)), None);
    }
}
