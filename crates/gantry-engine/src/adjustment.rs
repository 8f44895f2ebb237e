//! Adjustment arithmetic.
//!
//! Translates a textual adjustment expression plus the current instance
//! count into a proposed new count. Clamping against policy or schedule
//! bounds is the decision engine's job, not done here.

use tracing::warn;

use crate::error::{Error, Result};

/// Computes the proposed instance count for an adjustment expression.
///
/// An expression ending in `%` is a signed percentage of the current
/// count, parsed with 32-bit float precision; the result rounds via
/// `floor(x + 0.5)`. For a negative percentage with a non-integer
/// intermediate this rounds asymmetrically; policies forbid negative
/// percentages in practice. Any other expression is a signed 32-bit
/// step added to the current count; values outside 32-bit range fail.
///
/// # Errors
///
/// Returns [`Error::BadAdjustment`] if the expression does not parse.
pub fn compute_new_instances(current: i32, adjustment: &str) -> Result<i32> {
    if let Some(prefix) = adjustment.strip_suffix('%') {
        let percentage: f32 = prefix.parse().map_err(|_| {
            warn!(adjustment, "failed to parse percentage adjustment");
            Error::BadAdjustment {
                adjustment: adjustment.to_string(),
            }
        })?;
        let proposed = f64::from(current) * (1.0 + f64::from(percentage) / 100.0);
        Ok((proposed + 0.5).floor() as i32)
    } else {
        let step: i32 = adjustment.parse().map_err(|_| {
            warn!(adjustment, "failed to parse step adjustment");
            Error::BadAdjustment {
                adjustment: adjustment.to_string(),
            }
        })?;
        Ok(current + step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_step() {
        assert_eq!(compute_new_instances(4, "+2").unwrap(), 6);
        assert_eq!(compute_new_instances(4, "2").unwrap(), 6);
    }

    #[test]
    fn negative_step() {
        assert_eq!(compute_new_instances(4, "-1").unwrap(), 3);
    }

    #[test]
    fn percentage_scale_up() {
        assert_eq!(compute_new_instances(4, "25%").unwrap(), 5);
    }

    #[test]
    fn percentage_scale_down() {
        assert_eq!(compute_new_instances(10, "-10%").unwrap(), 9);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 3 * 1.5 = 4.5 rounds to 5.
        assert_eq!(compute_new_instances(3, "50%").unwrap(), 5);
    }

    #[test]
    fn percentage_rounds_down_below_half() {
        // 3 * 1.10 = 3.3 rounds to 3.
        assert_eq!(compute_new_instances(3, "10%").unwrap(), 3);
    }

    #[test]
    fn bad_adjustment_rejected() {
        let err = compute_new_instances(4, "abc").unwrap_err();
        assert_eq!(
            err,
            Error::BadAdjustment {
                adjustment: "abc".into()
            }
        );
    }

    #[test]
    fn bad_percentage_rejected() {
        let err = compute_new_instances(4, "abc%").unwrap_err();
        assert!(matches!(err, Error::BadAdjustment { .. }));
    }

    #[test]
    fn empty_adjustment_rejected() {
        assert!(compute_new_instances(4, "").is_err());
    }

    #[test]
    fn step_outside_32_bit_range_rejected() {
        assert!(compute_new_instances(4, "9999999999").is_err());
        assert!(compute_new_instances(4, "-9999999999").is_err());
    }

    #[test]
    fn deterministic_for_same_inputs() {
        for _ in 0..3 {
            assert_eq!(compute_new_instances(7, "30%").unwrap(), 9);
        }
    }

    #[test]
    fn no_clamping_applied() {
        // Arithmetic may propose counts outside any policy bounds.
        assert_eq!(compute_new_instances(1, "-5").unwrap(), -4);
        assert_eq!(compute_new_instances(100, "100%").unwrap(), 200);
    }
}
