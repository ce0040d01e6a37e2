use crate::digits::{add_magnitudes, cmp_magnitudes, sub_magnitudes, Magnitude};
use crate::natural;
use apnum_core::precision::{self, check_scale, Extent, Precision, INFINITE, SCALE_ZERO};
use apnum_core::{check_radix, ApnumError, Result, StorageLocation};
use apnum_exec::Context;
use apnum_mul::MultiplicationEngine;
use apnum_storage::DigitSequence;
use std::cmp::Ordering;
use tracing::trace;

/// Digits carried beyond the target precision by multiplication and division.
pub(crate) const GUARD_DIGITS: u64 = 2;

/// Arbitrary-precision real number `sign · 0.d1 d2 … dn · radix^scale`.
///
/// Digits live in a [`DigitSequence`] created through the current
/// [`Context`]'s storage backend, so large values may sit on disk. Values are
/// immutable; operations that only narrow or move the digits (negation,
/// `with_precision`, `scale_by`, `truncate`) share storage with their input.
///
/// Finite-precision results are truncated to their precision. Stored digits
/// never include trailing zeros, and zero has no digits, scale
/// [`SCALE_ZERO`] and infinite precision.
#[derive(Debug, Clone)]
pub struct Apfloat {
    sign: i8,
    radix: u32,
    scale: i64,
    precision: Precision,
    digits: DigitSequence,
}

impl Apfloat {
    pub fn zero(radix: u32) -> Self {
        Self { sign: 0, radix, scale: SCALE_ZERO, precision: INFINITE, digits: DigitSequence::empty() }
    }

    /// Exact value of `value` in `radix`.
    pub fn from_i64(value: i64, radix: u32) -> Result<Self> {
        check_radix(radix)?;
        let sign = value.signum() as i8;
        let mut n = value.unsigned_abs();
        let mut digits = Vec::new();
        while n > 0 {
            digits.push((n % radix as u64) as u8);
            n /= radix as u64;
        }
        digits.reverse();
        Self::from_magnitude(sign, radix, Magnitude::new(digits, 0), INFINITE)
    }

    pub fn one(radix: u32) -> Result<Self> {
        Self::from_i64(1, radix)
    }

    /// Normalizes `mag`, truncates it to `precision` digits and stores it.
    pub(crate) fn from_magnitude(sign: i8, radix: u32, mag: Magnitude, precision: Precision) -> Result<Self> {
        let mut mag = mag.normalize();
        if mag.digits.is_empty() || sign == 0 {
            return Ok(Self::zero(radix));
        }
        if precision != INFINITE {
            mag = mag.truncate_digits(usize::try_from(precision).unwrap_or(usize::MAX));
        }
        let scale = check_scale(mag.top())?;
        let digits = Context::current().store(mag.digits)?;
        Ok(Self { sign: sign.signum(), radix, scale, precision, digits })
    }

    /// Stored digits as `D · radix^exp`.
    pub(crate) fn magnitude(&self) -> Result<Magnitude> {
        if self.is_zero() {
            return Ok(Magnitude::zero());
        }
        let digits = self.digits.to_vec()?;
        let exp = self.scale - digits.len() as i64;
        Ok(Magnitude::new(digits, exp))
    }

    pub fn radix(&self) -> u32 {
        self.radix
    }

    /// Position of the most significant digit; [`SCALE_ZERO`] for zero.
    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Number of stored significant digits.
    pub fn size(&self) -> u64 {
        precision::size(self.digits.len() as u64, self.precision)
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.scale, self.precision)
    }

    pub fn signum(&self) -> i8 {
        self.sign
    }

    pub fn is_zero(&self) -> bool {
        self.sign == 0
    }

    pub fn is_negative(&self) -> bool {
        self.sign < 0
    }

    pub fn storage_location(&self) -> StorageLocation {
        self.digits.location()
    }

    pub fn digits(&self) -> &DigitSequence {
        &self.digits
    }

    pub(crate) fn check_same_radix(&self, other: &Apfloat) -> Result<()> {
        if self.radix == other.radix {
            Ok(())
        } else {
            Err(ApnumError::invalid(format!("Radix mismatch: {} and {}", self.radix, other.radix)))
        }
    }

    pub fn negate(&self) -> Apfloat {
        Apfloat { sign: -self.sign, ..self.clone() }
    }

    pub fn abs(&self) -> Apfloat {
        Apfloat { sign: self.sign.abs(), ..self.clone() }
    }

    /// Same digits with precision `precision`; narrowing shares storage.
    pub fn with_precision(&self, precision: Precision) -> Result<Apfloat> {
        precision::validate_precision(precision)?;
        if self.is_zero() {
            return Ok(self.clone());
        }
        let mut keep = usize::try_from(precision).unwrap_or(usize::MAX).min(self.digits.len());
        while keep > 1 && self.digits.digit(keep - 1)? == 0 {
            keep -= 1;
        }
        Ok(Apfloat { precision, digits: self.digits.prefix(keep), ..self.clone() })
    }

    /// Multiplies by `radix^delta`.
    pub fn scale_by(&self, delta: i64) -> Result<Apfloat> {
        if self.is_zero() || delta == 0 {
            return Ok(self.clone());
        }
        let scale = precision::add_scales(self.scale, delta)?;
        Ok(Apfloat { scale, ..self.clone() })
    }

    pub fn add(&self, other: &Apfloat) -> Result<Apfloat> {
        self.check_same_radix(other)?;
        if other.is_zero() {
            return Ok(self.clone());
        }
        if self.is_zero() {
            return Ok(other.clone());
        }
        let plan = precision::additive(self.extent(), other.extent());
        let mut x = self.magnitude()?;
        let mut y = other.magnitude()?;
        if let Some(limit) = plan.lsd_limit {
            x = x.truncate_below(limit);
            y = y.truncate_below(limit);
        }
        let (sign, mag) = if self.sign == other.sign {
            (self.sign, add_magnitudes(&x, &y, self.radix))
        } else {
            match cmp_magnitudes(&x, &y) {
                Ordering::Equal => return Ok(Apfloat::zero(self.radix)),
                Ordering::Greater => (self.sign, sub_magnitudes(&x, &y, self.radix)),
                Ordering::Less => (other.sign, sub_magnitudes(&y, &x, self.radix)),
            }
        };
        Self::from_magnitude(sign, self.radix, mag, plan.precision)
    }

    pub fn subtract(&self, other: &Apfloat) -> Result<Apfloat> {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &Apfloat) -> Result<Apfloat> {
        self.check_same_radix(other)?;
        if self.is_zero() || other.is_zero() {
            return Ok(Apfloat::zero(self.radix));
        }
        let precision = precision::multiplicative(self.precision, other.precision);
        let mut x = self.magnitude()?;
        let mut y = other.magnitude()?;
        if precision != INFINITE {
            let working = working_digits(precision);
            x = x.truncate_digits(working);
            y = y.truncate_digits(working);
        }
        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix);
        let product = if x == y { engine.square_digits(&x.digits)? } else { engine.multiply_digits(&x.digits, &y.digits)? };
        Self::from_magnitude(self.sign * other.sign, self.radix, Magnitude::new(product, x.exp + y.exp), precision)
    }

    /// `self / other`.
    ///
    /// With two infinite-precision operands the quotient is exact when its
    /// expansion terminates in this radix and [`ApnumError::InfiniteExpansion`]
    /// otherwise.
    pub fn divide(&self, other: &Apfloat) -> Result<Apfloat> {
        self.check_same_radix(other)?;
        if other.is_zero() {
            return Err(ApnumError::arithmetic("Division by zero"));
        }
        if self.is_zero() {
            return Ok(Apfloat::zero(self.radix));
        }
        let precision = precision::multiplicative(self.precision, other.precision);
        if precision == INFINITE {
            self.exact_quotient(other)
        } else {
            self.divide_at(other, precision)
        }
    }

    /// Quotient truncated to `precision` digits regardless of the operands' precisions.
    pub(crate) fn divide_at(&self, other: &Apfloat, precision: Precision) -> Result<Apfloat> {
        self.check_same_radix(other)?;
        if other.is_zero() {
            return Err(ApnumError::arithmetic("Division by zero"));
        }
        if self.is_zero() {
            return Ok(Apfloat::zero(self.radix));
        }
        let working = working_digits(precision);
        let x = self.magnitude()?.truncate_digits(working);
        let y = other.magnitude()?.truncate_digits(working);
        let shift = (working + y.digits.len()).saturating_sub(x.digits.len());
        let numerator = x.spelled_at(x.exp - shift as i64);

        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix);
        trace!(dividend = numerator.len(), divisor = y.digits.len(), precision, "divide");
        let (q, _) = engine.div_rem_digits(&numerator, &y.digits)?;
        let exp = x.exp - shift as i64 - y.exp;
        Self::from_magnitude(self.sign * other.sign, self.radix, Magnitude::new(q, exp), precision)
    }

    fn exact_quotient(&self, other: &Apfloat) -> Result<Apfloat> {
        let x = self.magnitude()?;
        let y = other.magnitude()?;
        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix);
        let g = natural::gcd(&engine, &x.digits, &y.digits)?;
        let (num, _) = engine.div_rem_digits(&x.digits, &g)?;
        let (den, _) = engine.div_rem_digits(&y.digits, &g)?;
        let shift = natural::terminating_shift(&engine, &den)?.ok_or_else(|| {
            ApnumError::infinite_expansion("Cannot perform inexact division to infinite precision")
        })?;
        let shift = i64::try_from(shift).map_err(|_| ApnumError::overflow("Quotient shift overflow"))?;
        let num = Magnitude::new(num, 0).spelled_at(-shift);
        let (q, _) = engine.div_rem_digits(&num, &den)?;
        let exp = x.exp - y.exp - shift;
        Self::from_magnitude(self.sign * other.sign, self.radix, Magnitude::new(q, exp), INFINITE)
    }

    /// `1 / self` at this value's precision.
    pub fn inverse(&self) -> Result<Apfloat> {
        Apfloat::one(self.radix)?.divide(self)
    }

    /// `self − truncate(self / other) · other`; the result has the dividend's sign.
    pub fn fmod(&self, other: &Apfloat) -> Result<Apfloat> {
        self.check_same_radix(other)?;
        if other.is_zero() {
            return Err(ApnumError::arithmetic("Division by zero"));
        }
        if self.is_zero() {
            return Ok(self.clone());
        }
        let precision = precision::multiplicative(self.precision, other.precision);
        if self.precision != INFINITE && self.scale.saturating_sub(other.scale) >= i64::try_from(self.precision).unwrap_or(i64::MAX) {
            // every significant digit of the dividend lies above the divisor
            return Ok(Apfloat::zero(self.radix));
        }
        let x = self.magnitude()?;
        let y = other.magnitude()?;
        if cmp_magnitudes(&x, &y) == Ordering::Less {
            return Self::from_magnitude(self.sign, self.radix, x, precision);
        }
        let exp = x.exp.min(y.exp);
        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix);
        let (_, r) = engine.div_rem_digits(&x.spelled_at(exp), &y.spelled_at(exp))?;
        Self::from_magnitude(self.sign, self.radix, Magnitude::new(r, exp), precision)
    }

    pub fn compare(&self, other: &Apfloat) -> Result<Ordering> {
        self.check_same_radix(other)?;
        if self.sign != other.sign {
            return Ok(self.sign.cmp(&other.sign));
        }
        if self.is_zero() {
            return Ok(Ordering::Equal);
        }
        let magnitude = if self.scale != other.scale {
            self.scale.cmp(&other.scale)
        } else {
            cmp_magnitudes(&self.magnitude()?, &other.magnitude()?)
        };
        Ok(if self.sign < 0 { magnitude.reverse() } else { magnitude })
    }

    /// Number of leading digits in which the two values agree.
    ///
    /// Two zeros agree to [`INFINITE`] digits; zero and a nonzero value, or
    /// values of opposite sign, to none.
    pub fn equal_digits(&self, other: &Apfloat) -> Result<Precision> {
        self.check_same_radix(other)?;
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ok(INFINITE),
            (true, false) | (false, true) => return Ok(0),
            _ => {}
        }
        if self.sign != other.sign {
            return Ok(0);
        }
        let x = self.magnitude()?;
        let y = other.magnitude()?;
        let difference = match cmp_magnitudes(&x, &y) {
            Ordering::Equal => return Ok(INFINITE),
            Ordering::Greater => sub_magnitudes(&x, &y, self.radix),
            Ordering::Less => sub_magnitudes(&y, &x, self.radix),
        };
        let top = self.scale.max(other.scale);
        Ok(top.saturating_sub(difference.top()).max(0) as u64)
    }

    /// Integer part, rounded toward zero.
    pub fn truncate(&self) -> Result<Apfloat> {
        if self.is_zero() || self.scale >= self.digits.len() as i64 {
            return Ok(self.clone());
        }
        if self.scale <= 0 {
            return Ok(Apfloat::zero(self.radix));
        }
        let mut keep = self.scale as usize;
        while keep > 1 && self.digits.digit(keep - 1)? == 0 {
            keep -= 1;
        }
        Ok(Apfloat { digits: self.digits.prefix(keep), ..self.clone() })
    }

    pub fn floor(&self) -> Result<Apfloat> {
        let t = self.truncate()?;
        if self.is_negative() && !self.is_integer() {
            t.subtract(&Apfloat::one(self.radix)?)
        } else {
            Ok(t)
        }
    }

    pub fn ceil(&self) -> Result<Apfloat> {
        let t = self.truncate()?;
        if self.sign > 0 && !self.is_integer() {
            t.add(&Apfloat::one(self.radix)?)
        } else {
            Ok(t)
        }
    }

    /// Fractional part, `self − truncate(self)`, with the sign of `self`.
    pub fn frac(&self) -> Result<Apfloat> {
        if self.is_zero() || self.scale <= 0 {
            return Ok(self.clone());
        }
        if self.is_integer() {
            return Ok(Apfloat::zero(self.radix));
        }
        let x = self.magnitude()?;
        let integer_digits = self.scale as usize;
        let fraction = Magnitude::new(x.digits[integer_digits..].to_vec(), x.exp);
        let precision = if self.precision == INFINITE {
            INFINITE
        } else {
            self.precision.saturating_sub(integer_digits as u64).max(1)
        };
        Self::from_magnitude(self.sign, self.radix, fraction, precision)
    }

    pub fn is_integer(&self) -> bool {
        self.is_zero() || self.scale >= self.digits.len() as i64
    }

    /// Square root truncated to this value's precision.
    ///
    /// An infinite-precision operand yields an exact root only when it is a
    /// perfect square.
    pub fn sqrt(&self) -> Result<Apfloat> {
        if self.is_negative() {
            return Err(ApnumError::arithmetic("Square root of negative number"));
        }
        if self.is_zero() {
            return Ok(self.clone());
        }
        let x = self.magnitude()?;
        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix);

        let mut shift = if self.precision == INFINITE {
            0
        } else {
            (2 * working_digits(self.precision)).saturating_sub(x.digits.len()) as i64
        };
        if (x.exp - shift).rem_euclid(2) != 0 {
            shift += 1;
        }
        let n = x.spelled_at(x.exp - shift);
        let root = natural::isqrt(&engine, &n)?;
        if self.precision == INFINITE && engine.square_digits(&root)? != n {
            return Err(ApnumError::infinite_expansion("Cannot compute inexact square root to infinite precision"));
        }
        let exp = (x.exp - shift) / 2;
        Self::from_magnitude(1, self.radix, Magnitude::new(root, exp), self.precision)
    }
}

/// Digits an operand keeps for a result of `precision` digits.
pub(crate) fn working_digits(precision: Precision) -> usize {
    usize::try_from(precision::extend(precision, GUARD_DIGITS)).unwrap_or(usize::MAX)
}

/// Numeric equality; precision and storage are ignored, differing radixes are unequal.
impl PartialEq for Apfloat {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for Apfloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}
