use crate::SfError;

/// Floating point type used throughout the model.
pub type Real = f64;

/// Absolute band around zero inside which reported values are snapped to zero.
pub const REPORT_ZERO_BAND: Real = 1e-4;

#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Tolerances used when checking a candidate solution against constraints.
    pub fn feasibility() -> Self {
        Self {
            abs: 1e-6,
            rel: 1e-6,
        }
    }
}

/// Reject NaN and infinities in model parameters before they reach a constraint.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, SfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SfError::NonFinite { what, value: v })
    }
}

/// Snap solver noise to exactly zero for reporting.
///
/// Values strictly inside `(-band, band)` become `0.0`; everything else is
/// returned unchanged. This never feeds back into the model.
pub fn clean_value(v: Real, band: Real) -> Real {
    if v < band && v > -band { 0.0 } else { v }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clean_value_is_identity_outside_band(v in prop_oneof![1e-4_f64..1e6, -1e6_f64..-1e-4]) {
            prop_assert_eq!(clean_value(v, REPORT_ZERO_BAND), v);
        }

        #[test]
        fn clean_value_zeroes_inside_band(v in -0.99e-4_f64..0.99e-4) {
            prop_assert_eq!(clean_value(v, REPORT_ZERO_BAND), 0.0);
        }
    }
}
