use crate::apfloat::Apfloat;
use crate::digits::{is_odd, Magnitude};
use crate::natural;
use apnum_core::precision::INFINITE;
use apnum_core::{ApnumError, Result};
use apnum_exec::Context;
use apnum_mul::MultiplicationEngine;
use std::cmp::Ordering;

/// Arbitrary-size integer: an infinite-precision [`Apfloat`] with no fractional digits.
#[derive(Debug, Clone)]
pub struct Apint {
    value: Apfloat,
}

impl Apint {
    pub fn zero(radix: u32) -> Self {
        Self { value: Apfloat::zero(radix) }
    }

    pub fn from_i64(value: i64, radix: u32) -> Result<Self> {
        Ok(Self { value: Apfloat::from_i64(value, radix)? })
    }

    /// Integer part of `x`, rounded toward zero, as an exact value.
    pub fn from_apfloat(x: &Apfloat) -> Result<Self> {
        let t = x.truncate()?;
        Self::from_digits(t.signum(), t.radix(), t.magnitude()?.integer_digits())
    }

    pub(crate) fn from_digits(sign: i8, radix: u32, digits: Vec<u8>) -> Result<Self> {
        Ok(Self { value: Apfloat::from_magnitude(sign, radix, Magnitude::new(digits, 0), INFINITE)? })
    }

    /// Magnitude digits, most significant first, empty for zero.
    pub(crate) fn integer_digits(&self) -> Result<Vec<u8>> {
        Ok(self.value.magnitude()?.integer_digits())
    }

    pub fn as_apfloat(&self) -> &Apfloat {
        &self.value
    }

    pub fn to_apfloat(&self) -> Apfloat {
        self.value.clone()
    }

    pub fn radix(&self) -> u32 {
        self.value.radix()
    }

    pub fn signum(&self) -> i8 {
        self.value.signum()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    pub fn is_one(&self) -> bool {
        let value = &self.value;
        value.signum() > 0 && value.scale() == 1 && value.digits().len() == 1 && matches!(value.digits().digit(0), Ok(1))
    }

    pub fn is_odd(&self) -> Result<bool> {
        Ok(is_odd(&self.integer_digits()?, self.radix()))
    }

    pub fn negate(&self) -> Apint {
        Self { value: self.value.negate() }
    }

    pub fn abs(&self) -> Apint {
        Self { value: self.value.abs() }
    }

    pub fn add(&self, other: &Apint) -> Result<Apint> {
        Ok(Self { value: self.value.add(&other.value)? })
    }

    pub fn subtract(&self, other: &Apint) -> Result<Apint> {
        Ok(Self { value: self.value.subtract(&other.value)? })
    }

    pub fn multiply(&self, other: &Apint) -> Result<Apint> {
        Ok(Self { value: self.value.multiply(&other.value)? })
    }

    pub fn compare(&self, other: &Apint) -> Result<Ordering> {
        self.value.compare(&other.value)
    }

    /// Truncating quotient and remainder; the remainder has the dividend's sign.
    pub fn div_rem(&self, other: &Apint) -> Result<(Apint, Apint)> {
        self.value.check_same_radix(&other.value)?;
        if other.is_zero() {
            return Err(ApnumError::arithmetic("Division by zero"));
        }
        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix());
        let (q, r) = engine.div_rem_digits(&self.integer_digits()?, &other.integer_digits()?)?;
        Ok((
            Self::from_digits(self.signum() * other.signum(), self.radix(), q)?,
            Self::from_digits(self.signum(), self.radix(), r)?,
        ))
    }

    pub fn divide(&self, other: &Apint) -> Result<Apint> {
        Ok(self.div_rem(other)?.0)
    }

    pub fn rem(&self, other: &Apint) -> Result<Apint> {
        Ok(self.div_rem(other)?.1)
    }

    /// Remainder in `[0, |m|)`.
    fn modulo(&self, m: &Apint) -> Result<Apint> {
        let r = self.rem(m)?;
        if r.is_negative() {
            r.add(&m.abs())
        } else {
            Ok(r)
        }
    }

    /// Non-negative greatest common divisor; `gcd(0, 0) = 0`.
    pub fn gcd(&self, other: &Apint) -> Result<Apint> {
        self.value.check_same_radix(&other.value)?;
        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix());
        let g = natural::gcd(&engine, &self.integer_digits()?, &other.integer_digits()?)?;
        Self::from_digits(1, self.radix(), g)
    }

    /// Non-negative least common multiple; zero when either operand is zero.
    pub fn lcm(&self, other: &Apint) -> Result<Apint> {
        if self.is_zero() || other.is_zero() {
            return Ok(Apint::zero(self.radix()));
        }
        let g = self.gcd(other)?;
        Ok(self.divide(&g)?.multiply(other)?.abs())
    }

    /// `self^exponent` by repeated squaring; `0^0` is an error.
    pub fn pow(&self, exponent: u64) -> Result<Apint> {
        if exponent == 0 {
            if self.is_zero() {
                return Err(ApnumError::arithmetic("Zero to power zero"));
            }
            return Apint::from_i64(1, self.radix());
        }
        let mut result: Option<Apint> = None;
        let mut base = self.clone();
        let mut e = exponent;
        loop {
            if e & 1 == 1 {
                result = Some(match result {
                    Some(r) => r.multiply(&base)?,
                    None => base.clone(),
                });
            }
            e >>= 1;
            if e == 0 {
                break;
            }
            base = base.multiply(&base)?;
        }
        result.ok_or_else(|| ApnumError::arithmetic("Empty power"))
    }

    /// `self^exponent mod m` in `[0, |m|)`. A negative exponent uses the modular inverse.
    pub fn mod_pow(&self, exponent: &Apint, m: &Apint) -> Result<Apint> {
        if m.is_zero() {
            return Err(ApnumError::arithmetic("Modulus is zero"));
        }
        if exponent.is_zero() {
            if self.is_zero() {
                return Err(ApnumError::arithmetic("Zero to power zero"));
            }
            return Apint::from_i64(1, self.radix())?.modulo(m);
        }
        let mut base = if exponent.is_negative() { self.mod_inverse(m)? } else { self.modulo(m)? };
        let two = Apint::from_i64(2, self.radix())?;
        let mut e = exponent.abs();
        let mut result = Apint::from_i64(1, self.radix())?.modulo(m)?;
        while !e.is_zero() {
            Context::current().check_cancelled()?;
            let (half, bit) = e.div_rem(&two)?;
            if !bit.is_zero() {
                result = result.multiply(&base)?.modulo(m)?;
            }
            e = half;
            if !e.is_zero() {
                base = base.multiply(&base)?.modulo(m)?;
            }
        }
        Ok(result)
    }

    /// `x` in `[0, |m|)` with `self · x ≡ 1 (mod m)`.
    pub fn mod_inverse(&self, m: &Apint) -> Result<Apint> {
        if m.is_zero() {
            return Err(ApnumError::arithmetic("Modulus is zero"));
        }
        let modulus = m.abs();
        let (mut old_r, mut r) = (self.modulo(&modulus)?, modulus.clone());
        let (mut old_s, mut s) = (Apint::from_i64(1, self.radix())?, Apint::zero(self.radix()));
        while !r.is_zero() {
            let q = old_r.divide(&r)?;
            let next_r = old_r.subtract(&q.multiply(&r)?)?;
            old_r = std::mem::replace(&mut r, next_r);
            let next_s = old_s.subtract(&q.multiply(&s)?)?;
            old_s = std::mem::replace(&mut s, next_s);
        }
        if !old_r.is_one() {
            return Err(ApnumError::arithmetic("Modular inverse does not exist"));
        }
        old_s.modulo(&modulus)
    }

    /// `⌊√self⌋`.
    pub fn isqrt(&self) -> Result<Apint> {
        if self.is_negative() {
            return Err(ApnumError::arithmetic("Square root of negative number"));
        }
        let ctx = Context::current();
        let engine = MultiplicationEngine::new(&ctx, self.radix());
        let root = natural::isqrt(&engine, &self.integer_digits()?)?;
        Self::from_digits(1, self.radix(), root)
    }

    pub fn to_i64(&self) -> Result<i64> {
        let radix = self.radix() as i128;
        let mut value: i128 = 0;
        for d in self.integer_digits()? {
            value = value * radix + d as i128;
            if value > i64::MAX as i128 + 1 {
                return Err(ApnumError::overflow("Integer does not fit in i64"));
            }
        }
        let value = if self.is_negative() { -value } else { value };
        i64::try_from(value).map_err(|_| ApnumError::overflow("Integer does not fit in i64"))
    }
}

impl PartialEq for Apint {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Apint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl TryFrom<&Apfloat> for Apint {
    type Error = ApnumError;

    /// Fails unless `x` is an integer.
    fn try_from(x: &Apfloat) -> Result<Self> {
        if !x.is_integer() {
            return Err(ApnumError::invalid(format!("{} is not an integer", x)));
        }
        Apint::from_apfloat(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Apint {
        Apint::from_i64(v, 10).unwrap()
    }

    #[test]
    fn test_gcd_cases() {
        assert_eq!(int(12).gcd(&int(18)).unwrap(), int(6));
        assert_eq!(int(0).gcd(&int(3)).unwrap(), int(3));
        assert_eq!(int(0).gcd(&int(0)).unwrap(), int(0));
        assert_eq!(int(-12).gcd(&int(18)).unwrap(), int(6));
        assert_eq!(int(4).lcm(&int(-6)).unwrap(), int(12));
    }

    #[test]
    fn test_div_rem_signs() {
        let (q, r) = int(-17).div_rem(&int(5)).unwrap();
        assert_eq!((q, r), (int(-3), int(-2)));
        let (q, r) = int(17).div_rem(&int(-5)).unwrap();
        assert_eq!((q, r), (int(-3), int(2)));
        assert!(matches!(int(1).div_rem(&int(0)), Err(ApnumError::Arithmetic(_))));
    }

    #[test]
    fn test_pow() {
        assert_eq!(int(3).pow(5).unwrap(), int(243));
        assert_eq!(int(-2).pow(3).unwrap(), int(-8));
        assert_eq!(int(7).pow(0).unwrap(), int(1));
        assert!(matches!(int(0).pow(0), Err(ApnumError::Arithmetic(_))));
        assert_eq!(int(10).pow(40).unwrap().as_apfloat().scale(), 41);
    }

    #[test]
    fn test_modular() {
        assert_eq!(int(4).mod_pow(&int(13), &int(497)).unwrap(), int(445));
        assert_eq!(int(3).mod_inverse(&int(11)).unwrap(), int(4));
        assert_eq!(int(3).mod_pow(&int(-1), &int(11)).unwrap(), int(4));
        assert!(matches!(int(6).mod_inverse(&int(9)), Err(ApnumError::Arithmetic(_))));
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(int(99).isqrt().unwrap(), int(9));
        assert_eq!(int(0).isqrt().unwrap(), int(0));
        assert!(matches!(int(-1).isqrt(), Err(ApnumError::Arithmetic(_))));
    }

    #[test]
    fn test_i64_conversions() {
        assert_eq!(int(i64::MIN).to_i64().unwrap(), i64::MIN);
        assert_eq!(int(i64::MAX).to_i64().unwrap(), i64::MAX);
        let too_big = int(i64::MAX).add(&int(1)).unwrap();
        assert!(matches!(too_big.to_i64(), Err(ApnumError::Overflow(_))));
    }

    #[test]
    fn test_from_apfloat() {
        let x = Apfloat::parse("-12.9", 10).unwrap();
        assert_eq!(Apint::from_apfloat(&x).unwrap(), int(-12));
        assert!(Apint::try_from(&x).is_err());
        let y = Apint::try_from(&Apfloat::parse("4.2e3", 10).unwrap()).unwrap();
        assert_eq!(y, int(4200));
        assert_eq!(y.as_apfloat().precision(), INFINITE);
    }
}
