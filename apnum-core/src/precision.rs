//! Precision and scale propagation.
//!
//! Pure functions shared by every arithmetic operation. A value is
//! `sign · 0.d1 d2 … dn · radix^scale`, so `scale(1) = 1` and
//! `scale(0.05) = -1`. Zero has scale [`SCALE_ZERO`] (standing for −∞) and
//! infinite precision.

use crate::error::{ApnumError, Result};

/// Number of significant digits; [`INFINITE`] means every stored digit is exact.
pub type Precision = u64;

pub const INFINITE: Precision = u64::MAX;

/// Scale of zero (−∞).
pub const SCALE_ZERO: i64 = i64::MIN;

/// Largest scale magnitude a value may carry.
pub const MAX_SCALE: i64 = i64::MAX / 4;

/// Scale and precision of one operand, the only inputs the model needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub scale: i64,
    pub precision: Precision,
}

impl Extent {
    pub const ZERO: Extent = Extent { scale: SCALE_ZERO, precision: INFINITE };

    pub fn new(scale: i64, precision: Precision) -> Self {
        Self { scale, precision }
    }

    pub fn is_zero(&self) -> bool {
        self.scale == SCALE_ZERO
    }

    /// Lowest digit position that is still significant, `None` when unbounded.
    pub fn lsd_limit(&self) -> Option<i64> {
        if self.is_zero() || self.precision == INFINITE {
            None
        } else {
            let p = i64::try_from(self.precision).unwrap_or(i64::MAX);
            Some(self.scale.saturating_sub(p))
        }
    }
}

/// How an addition or subtraction must treat its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdditivePlan {
    /// Declared precision of the result.
    pub precision: Precision,
    /// Digits at positions below this limit are not significant in either
    /// operand and are dropped before the digits are combined.
    pub lsd_limit: Option<i64>,
}

pub fn validate_precision(precision: Precision) -> Result<Precision> {
    if precision == 0 {
        Err(ApnumError::invalid("Precision must be positive"))
    } else {
        Ok(precision)
    }
}

pub fn check_scale(scale: i64) -> Result<i64> {
    if scale == SCALE_ZERO || (-MAX_SCALE..=MAX_SCALE).contains(&scale) {
        Ok(scale)
    } else {
        Err(ApnumError::overflow(format!("Scale {} exceeds the representable range", scale)))
    }
}

/// Checked `a + b` on non-zero scales.
pub fn add_scales(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| ApnumError::overflow("Scale arithmetic overflow"))
        .and_then(check_scale)
}

/// Precision of `x ± y`.
///
/// # Algorithm
/// 1. A zero operand contributes nothing: the other operand's extent wins.
/// 2. The least significant usable position is the higher of the two
///    operands' LSD positions (`scale − precision`).
/// 3. The result covers the span from the larger scale down to that
///    position, plus one slot for a carry, capped at the larger of the two
///    precisions. It is infinite only when both operands are.
pub fn additive(x: Extent, y: Extent) -> AdditivePlan {
    if x.is_zero() {
        return AdditivePlan { precision: y.precision, lsd_limit: y.lsd_limit() };
    }
    if y.is_zero() {
        return AdditivePlan { precision: x.precision, lsd_limit: x.lsd_limit() };
    }

    let lsd_limit = match (x.lsd_limit(), y.lsd_limit()) {
        (None, None) => None,
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (Some(a), Some(b)) => Some(a.max(b)),
    };

    let precision = match lsd_limit {
        None => INFINITE,
        Some(limit) => {
            let top = x.scale.max(y.scale) as i128;
            let span = (top - limit as i128 + 1).max(1);
            let span = u64::try_from(span).unwrap_or(INFINITE - 1);
            span.min(x.precision.max(y.precision))
        }
    };

    AdditivePlan { precision, lsd_limit }
}

/// Precision of `x · y` and `x / y`: the smaller one, infinity never restricts.
pub fn multiplicative(px: Precision, py: Precision) -> Precision {
    px.min(py)
}

/// Widens a precision by `digits`, leaving infinity alone.
pub fn extend(precision: Precision, digits: u64) -> Precision {
    if precision == INFINITE {
        INFINITE
    } else {
        precision.saturating_add(digits).min(INFINITE - 1)
    }
}

/// Stored significant digits of a value.
pub fn size(stored_digits: u64, precision: Precision) -> u64 {
    stored_digits.min(precision)
}

/// Digits of `to_radix` carrying the same information as `precision` digits
/// of `from_radix`.
pub fn convert(precision: Precision, from_radix: u32, to_radix: u32) -> Precision {
    if precision == INFINITE || from_radix == to_radix {
        return precision;
    }
    let ratio = (from_radix as f64).ln() / (to_radix as f64).ln();
    let converted = (precision as f64 * ratio).ceil();
    if converted >= (INFINITE - 1) as f64 {
        INFINITE - 1
    } else {
        (converted as u64).max(1)
    }
}

/// Combined precision of a complex value.
///
/// Each component's precision is extended by how far its scale sits below
/// the larger scale; the combined precision is the larger of the two. A
/// zero component does not take part.
pub fn complex(re: Extent, im: Extent) -> Precision {
    match (re.is_zero(), im.is_zero()) {
        (true, true) => INFINITE,
        (true, false) => im.precision,
        (false, true) => re.precision,
        (false, false) => {
            let top = re.scale.max(im.scale);
            let re_p = extend(re.precision, (top - re.scale) as u64);
            let im_p = extend(im.precision, (top - im.scale) as u64);
            re_p.max(im_p)
        }
    }
}

/// Splits a requested complex precision between the components.
///
/// The larger-magnitude component gets `precision`; the smaller one gets
/// `max(1, precision − Δ)` where Δ is the scale difference. Zero components
/// keep infinite precision.
pub fn complex_split(precision: Precision, re_scale: i64, im_scale: i64) -> (Precision, Precision) {
    if precision == INFINITE {
        return (INFINITE, INFINITE);
    }
    match (re_scale == SCALE_ZERO, im_scale == SCALE_ZERO) {
        (true, true) => (INFINITE, INFINITE),
        (true, false) => (INFINITE, precision),
        (false, true) => (precision, INFINITE),
        (false, false) => {
            let delta = (re_scale as i128 - im_scale as i128).unsigned_abs();
            let delta = u64::try_from(delta).unwrap_or(u64::MAX);
            let smaller = precision.saturating_sub(delta).max(1);
            if re_scale >= im_scale {
                (precision, if re_scale == im_scale { precision } else { smaller })
            } else {
                (smaller, precision)
            }
        }
    }
}
