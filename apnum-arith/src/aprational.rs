use crate::apfloat::Apfloat;
use crate::apint::Apint;
use apnum_core::precision::{validate_precision, Precision};
use apnum_core::{ApnumError, Result};
use std::cmp::Ordering;

/// Exact fraction of two [`Apint`]s, kept reduced with a positive denominator.
#[derive(Debug, Clone)]
pub struct Aprational {
    numerator: Apint,
    denominator: Apint,
}

impl Aprational {
    /// `numerator / denominator`; a zero denominator is an invalid argument.
    pub fn new(numerator: Apint, denominator: Apint) -> Result<Self> {
        if denominator.is_zero() {
            return Err(ApnumError::invalid("Denominator is zero"));
        }
        numerator.as_apfloat().check_same_radix(denominator.as_apfloat())?;
        Self::reduced(numerator, denominator)
    }

    fn reduced(numerator: Apint, denominator: Apint) -> Result<Self> {
        let (numerator, denominator) = if denominator.is_negative() {
            (numerator.negate(), denominator.negate())
        } else {
            (numerator, denominator)
        };
        let g = numerator.gcd(&denominator)?;
        if g.is_zero() || g.is_one() {
            return Ok(Self { numerator, denominator });
        }
        Ok(Self { numerator: numerator.divide(&g)?, denominator: denominator.divide(&g)? })
    }

    pub fn from_integer(n: Apint) -> Result<Self> {
        let one = Apint::from_i64(1, n.radix())?;
        Ok(Self { numerator: n, denominator: one })
    }

    pub fn numerator(&self) -> &Apint {
        &self.numerator
    }

    pub fn denominator(&self) -> &Apint {
        &self.denominator
    }

    pub fn radix(&self) -> u32 {
        self.numerator.radix()
    }

    pub fn signum(&self) -> i8 {
        self.numerator.signum()
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.denominator.is_one()
    }

    pub fn negate(&self) -> Aprational {
        Self { numerator: self.numerator.negate(), denominator: self.denominator.clone() }
    }

    pub fn add(&self, other: &Aprational) -> Result<Aprational> {
        let n = self.numerator.multiply(&other.denominator)?.add(&other.numerator.multiply(&self.denominator)?)?;
        Self::reduced(n, self.denominator.multiply(&other.denominator)?)
    }

    pub fn subtract(&self, other: &Aprational) -> Result<Aprational> {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &Aprational) -> Result<Aprational> {
        let n = self.numerator.multiply(&other.numerator)?;
        Self::reduced(n, self.denominator.multiply(&other.denominator)?)
    }

    pub fn divide(&self, other: &Aprational) -> Result<Aprational> {
        if other.is_zero() {
            return Err(ApnumError::arithmetic("Division by zero"));
        }
        let n = self.numerator.multiply(&other.denominator)?;
        Self::reduced(n, self.denominator.multiply(&other.numerator)?)
    }

    /// `self − truncate(self / other) · other`; the result has the dividend's sign.
    pub fn fmod(&self, other: &Aprational) -> Result<Aprational> {
        let q = self.divide(other)?.truncate()?;
        self.subtract(&other.multiply(&Self::from_integer(q)?)?)
    }

    /// Multiplies by `radix^delta`.
    pub fn scale_by(&self, delta: i64) -> Result<Aprational> {
        if self.is_zero() || delta == 0 {
            return Ok(self.clone());
        }
        let shift = delta.checked_abs().ok_or_else(|| ApnumError::overflow("Scale overflow"))?;
        let power = Apint::from_apfloat(&Apfloat::one(self.radix())?.scale_by(shift)?)?;
        if delta > 0 {
            Self::reduced(self.numerator.multiply(&power)?, self.denominator.clone())
        } else {
            Self::reduced(self.numerator.clone(), self.denominator.multiply(&power)?)
        }
    }

    pub fn compare(&self, other: &Aprational) -> Result<Ordering> {
        let left = self.numerator.multiply(&other.denominator)?;
        let right = other.numerator.multiply(&self.denominator)?;
        left.compare(&right)
    }

    /// Integer part, rounded toward zero.
    pub fn truncate(&self) -> Result<Apint> {
        self.numerator.divide(&self.denominator)
    }

    pub fn floor(&self) -> Result<Apint> {
        let (q, r) = self.numerator.div_rem(&self.denominator)?;
        if r.is_negative() {
            q.subtract(&Apint::from_i64(1, self.radix())?)
        } else {
            Ok(q)
        }
    }

    /// Decimal expansion in this radix truncated to `precision` digits.
    pub fn to_apfloat(&self, precision: Precision) -> Result<Apfloat> {
        validate_precision(precision)?;
        self.numerator.as_apfloat().divide_at(self.denominator.as_apfloat(), precision)
    }

    /// Exact expansion; [`ApnumError::InfiniteExpansion`] unless it terminates in this radix.
    pub fn to_exact_apfloat(&self) -> Result<Apfloat> {
        self.numerator.as_apfloat().divide(self.denominator.as_apfloat())
    }

    /// Same fraction with numerator and denominator in `radix`.
    pub fn to_radix(&self, radix: u32) -> Result<Aprational> {
        let n = Apint::from_apfloat(&self.numerator.as_apfloat().to_radix(radix)?)?;
        let d = Apint::from_apfloat(&self.denominator.as_apfloat().to_radix(radix)?)?;
        Ok(Self { numerator: n, denominator: d })
    }
}

impl PartialEq for Aprational {
    fn eq(&self, other: &Self) -> bool {
        self.numerator == other.numerator && self.denominator == other.denominator
    }
}

impl PartialOrd for Aprational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}
