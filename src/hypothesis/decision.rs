// Threshold decision on a t-test p-value

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default significance level (alpha)
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Outcome of comparing a p-value with the significance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// p < alpha: evidence of a significant difference
    RejectNull,
    /// p >= alpha: insufficient evidence of a difference
    FailToReject,
}

impl Decision {
    /// Step function of the p-value; the boundary `p == alpha` fails to reject
    ///
    /// A NaN p-value never rejects.
    pub fn from_p_value(p_value: f64, alpha: f64) -> Self {
        if p_value < alpha {
            Decision::RejectNull
        } else {
            Decision::FailToReject
        }
    }

    pub fn rejects_null(self) -> bool {
        matches!(self, Decision::RejectNull)
    }

    /// Human-readable verdict sentence
    pub fn explanation(self, alpha: f64) -> String {
        match self {
            Decision::RejectNull => format!(
                "There are grounds to reject the null hypothesis, since the p-value is below the significance level {}",
                alpha
            ),
            Decision::FailToReject => format!(
                "There are no sufficient grounds to reject the null hypothesis, since the p-value is not below the significance level {}",
                alpha
            ),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::RejectNull => f.write_str("REJECT_NULL"),
            Decision::FailToReject => f.write_str("FAIL_TO_REJECT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_fails_to_reject() {
        assert_eq!(
            Decision::from_p_value(0.05, SIGNIFICANCE_LEVEL),
            Decision::FailToReject
        );
    }

    #[test]
    fn test_below_alpha_rejects() {
        assert_eq!(
            Decision::from_p_value(0.049_999, SIGNIFICANCE_LEVEL),
            Decision::RejectNull
        );
        assert!(Decision::from_p_value(0.0, SIGNIFICANCE_LEVEL).rejects_null());
    }

    #[test]
    fn test_nan_never_rejects() {
        assert_eq!(
            Decision::from_p_value(f64::NAN, SIGNIFICANCE_LEVEL),
            Decision::FailToReject
        );
    }

    #[test]
    fn test_display_and_serde_names() {
        assert_eq!(Decision::RejectNull.to_string(), "REJECT_NULL");
        let json = serde_json::to_string(&Decision::FailToReject).unwrap();
        assert_eq!(json, "\"FAIL_TO_REJECT\"");
    }

    #[test]
    fn test_explanation_mentions_alpha() {
        assert!(Decision::RejectNull.explanation(0.05).contains("0.05"));
        assert!(Decision::FailToReject
            .explanation(0.05)
            .contains("no sufficient grounds"));
    }
}
