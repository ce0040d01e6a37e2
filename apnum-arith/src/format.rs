//! Textual output in two modes.
//!
//! Scientific writes the mantissa with one leading digit and an `e` exponent
//! when it is nonzero (`1.5e3`, `-5e-1`); pretty writes positional digits
//! (`1500`, `-0.5`). Radixes above 14 use `e` as a digit, so their
//! scientific form falls back to positional notation to stay parseable.

use crate::apcomplex::Apcomplex;
use crate::apfloat::Apfloat;
use crate::apint::Apint;
use crate::aprational::Aprational;
use apnum_core::Result;
use std::fmt;

fn digit_char(d: u8) -> char {
    char::from_digit(d as u32, 36).unwrap_or('?')
}

fn push_digits(out: &mut String, digits: &[u8]) {
    out.extend(digits.iter().map(|&d| digit_char(d)));
}

impl Apfloat {
    /// Renders this value; `pretty` selects positional instead of scientific notation.
    pub fn to_string_with(&self, pretty: bool) -> Result<String> {
        if self.is_zero() {
            return Ok("0".to_string());
        }
        let digits = self.digits().to_vec()?;
        let mut out = String::with_capacity(digits.len() + 8);
        if self.is_negative() {
            out.push('-');
        }
        if pretty || self.radix() > 14 {
            write_positional(&mut out, &digits, self.scale());
        } else {
            out.push(digit_char(digits[0]));
            if digits.len() > 1 {
                out.push('.');
                push_digits(&mut out, &digits[1..]);
            }
            let exponent = self.scale() - 1;
            if exponent != 0 {
                out.push('e');
                out.push_str(&exponent.to_string());
            }
        }
        Ok(out)
    }
}

fn write_positional(out: &mut String, digits: &[u8], scale: i64) {
    let len = digits.len() as i64;
    if scale <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take(scale.unsigned_abs() as usize));
        push_digits(out, digits);
    } else if scale >= len {
        push_digits(out, digits);
        out.extend(std::iter::repeat('0').take((scale - len) as usize));
    } else {
        push_digits(out, &digits[..scale as usize]);
        out.push('.');
        push_digits(out, &digits[scale as usize..]);
    }
}

/// Scientific notation; `{:#}` selects pretty notation.
impl fmt::Display for Apfloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_string_with(f.alternate()).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl fmt::Display for Apint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.as_apfloat().to_string_with(true).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl fmt::Display for Aprational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

impl Apcomplex {
    /// `(re, im)` when pretty, `(re,im)` otherwise; a real value prints alone.
    pub fn to_string_with(&self, pretty: bool) -> Result<String> {
        let re = self.real().to_string_with(pretty)?;
        if self.is_real() {
            return Ok(re);
        }
        let im = self.imag().to_string_with(pretty)?;
        let separator = if pretty { ", " } else { "," };
        Ok(format!("({}{}{})", re, separator, im))
    }
}

impl fmt::Display for Apcomplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_string_with(f.alternate()).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
