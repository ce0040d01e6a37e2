//! Explicit rounding of [`Apfloat`] values under a [`RoundingMode`].

use crate::apfloat::Apfloat;
use crate::digits::{add_magnitudes, increment, is_odd, Magnitude};
use apnum_core::precision::{validate_precision, Precision, INFINITE};
use apnum_core::{ApnumError, Remainder, Result, RoundingMode};
use apnum_exec::Context;
use apnum_mul::MultiplicationEngine;
use std::cmp::Ordering;

/// Classifies discarded digits against half a unit of the last kept digit.
///
/// `dropped` starts right below the last kept digit and has no trailing
/// zeros. For odd radixes one half is `0.hhh…` with `h = (radix − 1) / 2`
/// repeating forever, so a finite remainder is never exactly half.
fn classify(dropped: &[u8], radix: u32) -> Remainder {
    if dropped.iter().all(|&d| d == 0) {
        return Remainder::Zero;
    }
    if radix % 2 == 0 {
        let half = (radix / 2) as u8;
        return match dropped[0].cmp(&half) {
            Ordering::Less => Remainder::BelowHalf,
            Ordering::Greater => Remainder::AboveHalf,
            Ordering::Equal if dropped[1..].iter().all(|&d| d == 0) => Remainder::Half,
            Ordering::Equal => Remainder::AboveHalf,
        };
    }
    let h = ((radix - 1) / 2) as u8;
    match dropped.iter().find(|&&d| d != h) {
        Some(&d) if d > h => Remainder::AboveHalf,
        _ => Remainder::BelowHalf,
    }
}

fn rounding_necessary() -> ApnumError {
    ApnumError::arithmetic("Rounding necessary")
}

impl Apfloat {
    /// Rounds to `precision` significant digits.
    pub fn round(&self, precision: Precision, mode: RoundingMode) -> Result<Apfloat> {
        validate_precision(precision)?;
        if self.is_zero() {
            return Ok(self.clone());
        }
        let keep = usize::try_from(precision).unwrap_or(usize::MAX);
        if self.digits().len() <= keep {
            return self.with_precision(precision);
        }
        let x = self.magnitude()?;
        let rounded = round_digits(self.signum(), self.radix(), &x, keep, mode)?;
        Apfloat::from_magnitude(self.signum(), self.radix(), rounded, precision)
    }

    /// Rounds to `places` digits after the radix point (negative `places`
    /// round to a power of the radix).
    pub fn round_to_places(&self, places: i64, mode: RoundingMode) -> Result<Apfloat> {
        if self.is_zero() {
            return Ok(self.clone());
        }
        let x = self.magnitude()?;
        let limit = places.checked_neg().ok_or_else(|| ApnumError::overflow("Place count overflow"))?;
        if x.exp >= limit {
            return Ok(self.clone());
        }
        let keep = x.top() - limit;
        let rounded = if keep > 0 {
            round_digits(self.signum(), self.radix(), &x, keep as usize, mode)?
        } else {
            // everything is dropped; a negative `keep` puts zeros ahead of the digits
            let remainder = if keep < 0 { Remainder::BelowHalf } else { classify(&x.digits, self.radix()) };
            match mode.increments(self.is_negative(), false, remainder) {
                None => return Err(rounding_necessary()),
                Some(true) => Magnitude::new(vec![1], limit),
                Some(false) => return Ok(Apfloat::zero(self.radix())),
            }
        };
        let precision = if self.precision() == INFINITE {
            INFINITE
        } else {
            (rounded.digits.len() as u64).max(1)
        };
        Apfloat::from_magnitude(self.signum(), self.radix(), rounded, precision)
    }

    /// Nearest multiple of `m` under `mode`; the rounding direction follows the sign of `self / m`.
    pub fn round_to_multiple(&self, m: &Apfloat, mode: RoundingMode) -> Result<Apfloat> {
        self.check_same_radix(m)?;
        if m.is_zero() {
            return Err(ApnumError::arithmetic("Rounding to a multiple of zero"));
        }
        if self.is_zero() {
            return Ok(self.clone());
        }
        let x = self.magnitude()?;
        let y = m.magnitude()?;
        let exp = x.exp.min(y.exp);
        let divisor = y.spelled_at(exp);

        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix());
        let (q, r) = engine.div_rem_digits(&x.spelled_at(exp), &divisor)?;
        let remainder = if r.is_empty() {
            Remainder::Zero
        } else {
            let r = Magnitude::new(r, 0);
            let twice = add_magnitudes(&r, &r, self.radix()).integer_digits();
            match twice.len().cmp(&divisor.len()).then_with(|| twice.cmp(&divisor)) {
                Ordering::Less => Remainder::BelowHalf,
                Ordering::Equal => Remainder::Half,
                Ordering::Greater => Remainder::AboveHalf,
            }
        };
        let negative = self.signum() != m.signum();
        let q = match mode.increments(negative, is_odd(&q, self.radix()), remainder) {
            None => return Err(rounding_necessary()),
            Some(true) if q.is_empty() => vec![1],
            Some(true) => increment(&q, self.radix()).0,
            Some(false) => q,
        };
        let multiple = engine.multiply_digits(&q, &y.digits)?;
        Apfloat::from_magnitude(self.signum(), self.radix(), Magnitude::new(multiple, y.exp), self.precision())
    }
}

/// Keeps `keep` leading digits of `x` (which has more), rounding per `mode`.
fn round_digits(sign: i8, radix: u32, x: &Magnitude, keep: usize, mode: RoundingMode) -> Result<Magnitude> {
    let kept = &x.digits[..keep];
    let remainder = classify(&x.digits[keep..], radix);
    let exp = x.top() - keep as i64;
    match mode.increments(sign < 0, is_odd(kept, radix), remainder) {
        None => Err(rounding_necessary()),
        Some(false) => Ok(Magnitude::new(kept.to_vec(), exp)),
        Some(true) => Ok(Magnitude::new(increment(kept, radix).0, exp)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(s: &str) -> Apfloat {
        Apfloat::parse(s, 10).unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&[5], 10), Remainder::Half);
        assert_eq!(classify(&[5, 1], 10), Remainder::AboveHalf);
        assert_eq!(classify(&[4, 9], 10), Remainder::BelowHalf);
        assert_eq!(classify(&[], 10), Remainder::Zero);
        // one half in radix 3 is 0.111…
        assert_eq!(classify(&[1, 1, 1], 3), Remainder::BelowHalf);
        assert_eq!(classify(&[1, 2], 3), Remainder::AboveHalf);
    }

    #[test]
    fn test_round_modes() {
        let x = real("2.5");
        assert_eq!(x.round(1, RoundingMode::HalfUp).unwrap(), real("3"));
        assert_eq!(x.round(1, RoundingMode::HalfDown).unwrap(), real("2"));
        assert_eq!(x.round(1, RoundingMode::HalfEven).unwrap(), real("2"));
        assert_eq!(real("3.5").round(1, RoundingMode::HalfEven).unwrap(), real("4"));
        assert_eq!(real("-2.1").round(1, RoundingMode::Floor).unwrap(), real("-3"));
        assert_eq!(real("-2.1").round(1, RoundingMode::Ceiling).unwrap(), real("-2"));
        assert_eq!(real("-2.1").round(1, RoundingMode::Up).unwrap(), real("-3"));
        assert_eq!(real("9.96").round(2, RoundingMode::HalfUp).unwrap(), real("10"));
        assert_eq!(real("9.96").round(2, RoundingMode::HalfUp).unwrap().precision(), 2);
    }

    #[test]
    fn test_unnecessary() {
        assert!(matches!(real("1.25").round(2, RoundingMode::Unnecessary), Err(ApnumError::Arithmetic(_))));
        assert_eq!(real("1.2").round(2, RoundingMode::Unnecessary).unwrap(), real("1.2"));
    }

    #[test]
    fn test_round_to_places() {
        assert_eq!(real("3.14159").round_to_places(2, RoundingMode::HalfUp).unwrap(), real("3.14"));
        assert_eq!(real("1250").round_to_places(-2, RoundingMode::HalfEven).unwrap(), real("1200"));
        assert_eq!(real("0.004").round_to_places(2, RoundingMode::Up).unwrap(), real("0.01"));
        assert!(real("0.004").round_to_places(2, RoundingMode::HalfUp).unwrap().is_zero());
        assert_eq!(real("0.6").round_to_places(0, RoundingMode::HalfUp).unwrap(), real("1"));
        assert_eq!(real("2").round_to_places(3, RoundingMode::Unnecessary).unwrap(), real("2"));
    }

    #[test]
    fn test_round_to_multiple() {
        let five = real("5");
        assert_eq!(real("12").round_to_multiple(&five, RoundingMode::HalfUp).unwrap(), real("10"));
        assert_eq!(real("12.5").round_to_multiple(&five, RoundingMode::HalfUp).unwrap(), real("15"));
        assert_eq!(real("12.5").round_to_multiple(&five, RoundingMode::HalfEven).unwrap(), real("10"));
        assert_eq!(real("-12").round_to_multiple(&five, RoundingMode::Floor).unwrap(), real("-15"));
        assert_eq!(real("0.37").round_to_multiple(&real("0.25"), RoundingMode::Down).unwrap(), real("0.25"));
        assert!(matches!(real("3").round_to_multiple(&Apfloat::zero(10), RoundingMode::Up), Err(ApnumError::Arithmetic(_))));
    }
}
