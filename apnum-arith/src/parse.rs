//! Literal grammar.
//!
//! Real: `[-]digits[.digits][(e|E)[-]exponent]`. The exponent marker is only
//! recognized for radixes up to 14; above that `e` is a digit. Complex:
//! `re`, `(re)` or `(re,im)` with optional whitespace. Rational: `n/d` or `n`.

use crate::apcomplex::Apcomplex;
use crate::apfloat::Apfloat;
use crate::apint::Apint;
use crate::aprational::Aprational;
use crate::digits::Magnitude;
use apnum_core::precision::{validate_precision, Precision, INFINITE, MAX_SCALE};
use apnum_core::{check_radix, ApnumError, Result};
use apnum_exec::Context;
use std::str::FromStr;

/// Largest radix whose digit alphabet leaves `e` free as an exponent marker.
const MAX_EXPONENT_RADIX: u32 = 14;

/// A scanned real literal.
struct Literal {
    negative: bool,
    magnitude: Magnitude,
    /// Digits after leading zeros.
    significant: usize,
    /// No radix point and no exponent.
    integer: bool,
}

fn digit_value(c: char, radix: u32, literal: &str) -> Result<u8> {
    c.to_digit(radix)
        .map(|d| d as u8)
        .ok_or_else(|| ApnumError::format(format!("Invalid digit '{}' for radix {} in \"{}\"", c, radix, literal)))
}

fn scan(literal: &str, radix: u32) -> Result<Literal> {
    check_radix(radix)?;
    let s = literal.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (mantissa, exponent) = match body.find(|c| radix <= MAX_EXPONENT_RADIX && (c == 'e' || c == 'E')) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };
    let has_exponent = exponent.is_some();
    let exponent = match exponent {
        Some(e) => parse_exponent(e, literal)?,
        None => 0,
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    let frac_part = frac_part.unwrap_or("");
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ApnumError::format(format!("No digits in \"{}\"", literal)));
    }

    let mut digits = Vec::with_capacity(int_part.len() + frac_part.len());
    for c in int_part.chars().chain(frac_part.chars()) {
        digits.push(digit_value(c, radix, literal)?);
    }
    let significant = digits.len() - digits.iter().take_while(|&&d| d == 0).count();
    let exp = exponent
        .checked_sub(frac_part.chars().count() as i64)
        .ok_or_else(|| ApnumError::overflow(format!("Exponent overflow in \"{}\"", literal)))?;
    if significant > 0 {
        // position above the leading nonzero digit
        exp.checked_add(significant as i64)
            .filter(|scale| (-MAX_SCALE..=MAX_SCALE).contains(scale))
            .ok_or_else(|| ApnumError::overflow(format!("Exponent overflow in \"{}\"", literal)))?;
    }

    Ok(Literal {
        negative,
        magnitude: Magnitude::new(digits, exp),
        significant,
        integer: !mantissa.contains('.') && !has_exponent,
    })
}

fn parse_exponent(e: &str, literal: &str) -> Result<i64> {
    let digits = e.strip_prefix(['-', '+']).unwrap_or(e);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApnumError::format(format!("Invalid exponent in \"{}\"", literal)));
    }
    e.parse().map_err(|_| ApnumError::overflow(format!("Exponent overflow in \"{}\"", literal)))
}

impl Apfloat {
    /// Parses a real literal.
    ///
    /// Integer literals are exact; otherwise the precision is the number of
    /// significant digits written.
    pub fn parse(literal: &str, radix: u32) -> Result<Apfloat> {
        let lit = scan(literal, radix)?;
        let precision = if lit.integer { INFINITE } else { lit.significant.max(1) as Precision };
        Apfloat::from_magnitude(if lit.negative { -1 } else { 1 }, radix, lit.magnitude, precision)
    }

    pub fn parse_with_precision(literal: &str, radix: u32, precision: Precision) -> Result<Apfloat> {
        validate_precision(precision)?;
        let lit = scan(literal, radix)?;
        Apfloat::from_magnitude(if lit.negative { -1 } else { 1 }, radix, lit.magnitude, precision)
    }
}

/// Parses in the current context's default radix.
impl FromStr for Apfloat {
    type Err = ApnumError;

    fn from_str(s: &str) -> Result<Self> {
        Apfloat::parse(s, Context::current().radix())
    }
}

impl Apint {
    pub fn parse(literal: &str, radix: u32) -> Result<Apint> {
        check_radix(radix)?;
        let s = literal.trim();
        let body = s.strip_prefix(['-', '+']).unwrap_or(s);
        if body.is_empty() {
            return Err(ApnumError::format(format!("No digits in \"{}\"", literal)));
        }
        let digits = body.chars().map(|c| digit_value(c, radix, literal)).collect::<Result<Vec<u8>>>()?;
        Apint::from_digits(if s.starts_with('-') { -1 } else { 1 }, radix, digits)
    }
}

impl FromStr for Apint {
    type Err = ApnumError;

    fn from_str(s: &str) -> Result<Self> {
        Apint::parse(s, Context::current().radix())
    }
}

impl Aprational {
    /// Parses `n/d` or a plain integer; a zero denominator is rejected.
    pub fn parse(literal: &str, radix: u32) -> Result<Aprational> {
        match literal.split_once('/') {
            Some((n, d)) => Aprational::new(Apint::parse(n, radix)?, Apint::parse(d, radix)?),
            None => Aprational::from_integer(Apint::parse(literal, radix)?),
        }
    }
}

impl FromStr for Aprational {
    type Err = ApnumError;

    fn from_str(s: &str) -> Result<Self> {
        Aprational::parse(s, Context::current().radix())
    }
}

impl Apcomplex {
    pub fn parse(literal: &str, radix: u32) -> Result<Apcomplex> {
        let s = literal.trim();
        let Some(inner) = s.strip_prefix('(') else {
            return Ok(Apcomplex::from_real(Apfloat::parse(s, radix)?));
        };
        let inner = inner
            .strip_suffix(')')
            .ok_or_else(|| ApnumError::format(format!("Missing closing parenthesis in \"{}\"", literal)))?;
        match inner.split_once(',') {
            Some((re, im)) => Apcomplex::new(Apfloat::parse(re, radix)?, Apfloat::parse(im, radix)?),
            None => Ok(Apcomplex::from_real(Apfloat::parse(inner, radix)?)),
        }
    }
}

impl FromStr for Apcomplex {
    type Err = ApnumError;

    fn from_str(s: &str) -> Result<Self> {
        Apcomplex::parse(s, Context::current().radix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_literal_is_exact() {
        let x = Apfloat::parse("-1200", 10).unwrap();
        assert_eq!(x.precision(), INFINITE);
        assert_eq!(x.signum(), -1);
        assert_eq!(x.scale(), 4);
    }

    #[test]
    fn test_fraction_precision_counts_written_digits() {
        assert_eq!(Apfloat::parse("1.50", 10).unwrap().precision(), 3);
        assert_eq!(Apfloat::parse("0.0012", 10).unwrap().precision(), 2);
        assert_eq!(Apfloat::parse(".5", 10).unwrap(), Apfloat::parse("0.5", 10).unwrap());
        assert!(Apfloat::parse("0.000", 10).unwrap().is_zero());
    }

    #[test]
    fn test_exponent() {
        let x = Apfloat::parse("1.5e3", 10).unwrap();
        assert_eq!(x, Apfloat::parse("1500", 10).unwrap());
        assert_eq!(x.precision(), 2);
        assert_eq!(Apfloat::parse("25E-3", 10).unwrap(), Apfloat::parse("0.025", 10).unwrap());
        // in radix 16 'e' is the digit fourteen
        assert_eq!(Apfloat::parse("1e", 16).unwrap(), Apfloat::parse("30", 10).unwrap().to_radix(16).unwrap());
    }

    #[test]
    fn test_malformed_literals() {
        for bad in ["", "-", "1.2.3", "12a", "1e", "1e+-2", "."] {
            assert!(matches!(Apfloat::parse(bad, 10), Err(ApnumError::Format(_))), "{:?}", bad);
        }
        assert!(matches!(Apfloat::parse("1", 37), Err(ApnumError::Format(_))));
        assert!(matches!(Apfloat::parse("1e99999999999999999999", 10), Err(ApnumError::Overflow(_))));
        for huge in ["1e9223372036854775807", "10e9223372036854775807", "1e-9223372036854775808", "0.001e-9223372036854775800"] {
            assert!(matches!(Apfloat::parse(huge, 10), Err(ApnumError::Overflow(_))), "{:?}", huge);
        }
        assert!(Apfloat::parse("0e9223372036854775807", 10).unwrap().is_zero());
    }

    #[test]
    fn test_parse_with_precision() {
        let x = Apfloat::parse_with_precision("3.14159", 10, 3).unwrap();
        assert_eq!(x, Apfloat::parse("3.14", 10).unwrap());
        assert_eq!(x.precision(), 3);
    }

    #[test]
    fn test_complex_forms() {
        let z = Apcomplex::parse("(5,7)", 10).unwrap();
        assert_eq!(z.real(), &Apfloat::parse("5", 10).unwrap());
        assert_eq!(z.imag(), &Apfloat::parse("7", 10).unwrap());
        assert_eq!(Apcomplex::parse(" ( 5 , 7 ) ", 10).unwrap(), z);
        assert!(Apcomplex::parse("(3)", 10).unwrap().is_real());
        assert!(Apcomplex::parse("3", 10).unwrap().is_real());
        assert!(matches!(Apcomplex::parse("(5,7", 10), Err(ApnumError::Format(_))));
    }

    #[test]
    fn test_rational_forms() {
        let q = Aprational::parse("6 / -8", 10).unwrap();
        assert_eq!(q.to_string(), "-3/4");
        assert_eq!(Aprational::parse("9", 10).unwrap().to_string(), "9");
        assert!(matches!(Aprational::parse("1/0", 10), Err(ApnumError::InvalidArgument(_))));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        assert!(matches!(Apint::parse("1.5", 10), Err(ApnumError::Format(_))));
        assert_eq!(Apint::parse("-ff", 16).unwrap().to_i64().unwrap(), -255);
    }
}
