//! Conversion of [`Apfloat`] values between radixes.
//!
//! A value is its integer mantissa `M` times `from^exp`. `M` is rebuilt by
//! Horner's rule in limbs of the target radix, and `from^|exp|` is raised in
//! the target radix by repeated squaring, so the cost follows the precision
//! and the bit length of the exponent rather than the distance of the digits
//! from the radix point.

use crate::apfloat::Apfloat;
use crate::digits::{increment, Magnitude};
use apnum_core::precision::{self, Precision, INFINITE};
use apnum_core::{check_radix, Result};
use apnum_exec::Context;
use apnum_mul::limbs::{self, Limb};
use apnum_mul::LimbBase;
use tracing::debug;

/// Extra digits carried through the power ladder. Each of its at most 128
/// truncating multiplications loses under one unit in the last place.
const POWER_GUARD: u64 = 10;

impl Apfloat {
    /// Same value in `radix`, with the precision rederived from the ratio of
    /// the radixes' logarithms. Exact values stay exact when their fraction
    /// terminates in the target radix, and raise
    /// [`ApnumError::InfiniteExpansion`](apnum_core::ApnumError::InfiniteExpansion)
    /// otherwise.
    pub fn to_radix(&self, radix: u32) -> Result<Apfloat> {
        check_radix(radix)?;
        if radix == self.radix() {
            return Ok(self.clone());
        }
        if self.is_zero() {
            return Ok(Apfloat::zero(radix));
        }
        let target = precision::convert(self.precision(), self.radix(), radix);
        let working = precision::extend(target, POWER_GUARD);
        let ctx = Context::current();
        ctx.check_cancelled()?;
        let x = self.magnitude()?;
        debug!(from = self.radix(), to = radix, precision = target, exponent = x.exp, "radix conversion");

        let mantissa = Magnitude::new(convert_integer(&x.digits, self.radix(), radix), 0);
        let mut value = Apfloat::from_magnitude(1, radix, mantissa, INFINITE)?.with_precision(working)?;
        if x.exp != 0 {
            let power = radix_power(self.radix(), x.exp.unsigned_abs(), radix, working, &ctx)?;
            value = if x.exp > 0 { value.multiply(&power)? } else { value.divide(&power)? };
        }

        let mut mag = value.magnitude()?;
        if target != INFINITE {
            mag = round_half_up(mag, target, radix);
        }
        Apfloat::from_magnitude(self.signum(), radix, mag, target)
    }
}

/// Integer digits of radix `from` rewritten in radix `to`.
fn convert_integer(digits: &[u8], from: u32, to: u32) -> Vec<u8> {
    let source = LimbBase::for_radix(from);
    let target = LimbBase::for_radix(to);
    let mut acc: Vec<Limb> = Vec::new();
    for &limb in source.pack(digits).iter().rev() {
        acc = limbs::mul_small(&acc, source.base, target.base);
        acc = limbs::add_small(&acc, limb as u64, target.base);
    }
    target.unpack(&acc)
}

/// `from^n` in radix `to` at `precision`, by binary powering. `n > 0`.
fn radix_power(from: u32, n: u64, to: u32, precision: Precision, ctx: &Context) -> Result<Apfloat> {
    let mut base = Apfloat::from_i64(from as i64, to)?.with_precision(precision)?;
    let mut result = Apfloat::one(to)?.with_precision(precision)?;
    let mut n = n;
    loop {
        ctx.check_cancelled()?;
        if n & 1 == 1 {
            result = result.multiply(&base)?;
        }
        n >>= 1;
        if n == 0 {
            return Ok(result);
        }
        base = base.multiply(&base)?;
    }
}

/// Rounds `mag` to `precision` digits, half up.
fn round_half_up(mag: Magnitude, precision: Precision, radix: u32) -> Magnitude {
    let keep = usize::try_from(precision).unwrap_or(usize::MAX);
    if mag.digits.len() <= keep {
        return mag;
    }
    let exp = mag.top() - keep as i64;
    let kept = &mag.digits[..keep];
    if (mag.digits[keep] as u32) * 2 >= radix {
        let (digits, _) = increment(kept, radix);
        Magnitude::new(digits, exp).normalize()
    } else {
        Magnitude::new(kept.to_vec(), exp).normalize()
    }
}
