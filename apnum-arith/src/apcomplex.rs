use crate::apfloat::{Apfloat, GUARD_DIGITS};
use apnum_core::precision::{self, Precision, INFINITE};
use apnum_core::{ApnumError, Result};

/// Complex number with real and imaginary [`Apfloat`] parts of one radix.
///
/// The combined precision extends each part's precision by how far its
/// scale sits below the larger scale and takes the larger of the two, so
/// `(10, 1)` with parts at precisions 6 and 5 has precision 6.
#[derive(Debug, Clone)]
pub struct Apcomplex {
    re: Apfloat,
    im: Apfloat,
}

impl Apcomplex {
    pub fn new(re: Apfloat, im: Apfloat) -> Result<Self> {
        re.check_same_radix(&im)?;
        Ok(Self { re, im })
    }

    pub fn from_real(re: Apfloat) -> Self {
        let im = Apfloat::zero(re.radix());
        Self { re, im }
    }

    pub fn zero(radix: u32) -> Self {
        Self::from_real(Apfloat::zero(radix))
    }

    pub fn real(&self) -> &Apfloat {
        &self.re
    }

    pub fn imag(&self) -> &Apfloat {
        &self.im
    }

    pub fn radix(&self) -> u32 {
        self.re.radix()
    }

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    pub fn precision(&self) -> Precision {
        precision::complex(self.re.extent(), self.im.extent())
    }

    /// Gives the larger part `precision` and the smaller `max(1, precision − Δ)`,
    /// Δ being the scale difference.
    pub fn with_precision(&self, precision: Precision) -> Result<Apcomplex> {
        precision::validate_precision(precision)?;
        let (pr, pi) = precision::complex_split(precision, self.re.scale(), self.im.scale());
        Ok(Self { re: self.re.with_precision(pr)?, im: self.im.with_precision(pi)? })
    }

    /// Caps the result at the smaller operand precision, split across the parts.
    fn limited(self, left: &Apcomplex, right: &Apcomplex) -> Result<Apcomplex> {
        let target = precision::multiplicative(left.precision(), right.precision());
        if target == INFINITE || self.is_zero() || self.precision() <= target {
            return Ok(self);
        }
        self.with_precision(target)
    }

    /// Multiplies both parts by `radix^delta`.
    pub fn scale_by(&self, delta: i64) -> Result<Apcomplex> {
        Ok(Self { re: self.re.scale_by(delta)?, im: self.im.scale_by(delta)? })
    }

    pub fn negate(&self) -> Apcomplex {
        Self { re: self.re.negate(), im: self.im.negate() }
    }

    pub fn conj(&self) -> Apcomplex {
        Self { re: self.re.clone(), im: self.im.negate() }
    }

    fn check_same_radix(&self, other: &Apcomplex) -> Result<()> {
        self.re.check_same_radix(&other.re)
    }

    pub fn add(&self, other: &Apcomplex) -> Result<Apcomplex> {
        self.check_same_radix(other)?;
        let sum = Self { re: self.re.add(&other.re)?, im: self.im.add(&other.im)? };
        sum.limited(self, other)
    }

    pub fn subtract(&self, other: &Apcomplex) -> Result<Apcomplex> {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &Apcomplex) -> Result<Apcomplex> {
        self.check_same_radix(other)?;
        let (a, b, c, d) = (&self.re, &self.im, &other.re, &other.im);
        let re = a.multiply(c)?.subtract(&b.multiply(d)?)?;
        let im = a.multiply(d)?.add(&b.multiply(c)?)?;
        Self { re, im }.limited(self, other)
    }

    /// `self / other` through `self · conj(other) / |other|²`.
    ///
    /// Intermediate products run with guard digits; the quotient is then cut
    /// to the smaller operand precision.
    pub fn divide(&self, other: &Apcomplex) -> Result<Apcomplex> {
        self.check_same_radix(other)?;
        if other.is_zero() {
            return Err(ApnumError::arithmetic("Division by zero"));
        }
        let target = precision::multiplicative(self.precision(), other.precision());
        let working = precision::extend(target, GUARD_DIGITS + 1);
        let widen = |x: &Apfloat| -> Result<Apfloat> {
            if working == INFINITE || x.is_zero() {
                Ok(x.clone())
            } else {
                x.with_precision(working)
            }
        };
        let (a, b, c, d) = (widen(&self.re)?, widen(&self.im)?, widen(&other.re)?, widen(&other.im)?);

        let norm = c.multiply(&c)?.add(&d.multiply(&d)?)?;
        let re = a.multiply(&c)?.add(&b.multiply(&d)?)?.divide(&norm)?;
        let im = b.multiply(&c)?.subtract(&a.multiply(&d)?)?.divide(&norm)?;
        let quotient = Self { re, im };
        if target == INFINITE || quotient.is_zero() {
            Ok(quotient)
        } else {
            quotient.with_precision(target)
        }
    }

    /// `|z|²`.
    pub fn norm(&self) -> Result<Apfloat> {
        self.re.multiply(&self.re)?.add(&self.im.multiply(&self.im)?)
    }

    /// `|z|`, at the complex precision.
    pub fn abs(&self) -> Result<Apfloat> {
        if self.is_real() {
            return Ok(self.re.abs());
        }
        let norm = self.norm()?;
        let precision = self.precision();
        if precision == INFINITE {
            norm.sqrt()
        } else {
            norm.with_precision(precision)?.sqrt()
        }
    }

    pub fn to_radix(&self, radix: u32) -> Result<Apcomplex> {
        Ok(Self { re: self.re.to_radix(radix)?, im: self.im.to_radix(radix)? })
    }
}

impl From<Apfloat> for Apcomplex {
    fn from(re: Apfloat) -> Self {
        Apcomplex::from_real(re)
    }
}

impl PartialEq for Apcomplex {
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re && self.im == other.im
    }
}
