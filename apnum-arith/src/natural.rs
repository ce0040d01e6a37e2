//! Natural-number algorithms on most-significant-first digit strings.
//!
//! Empty digit strings stand for zero. Inputs carry no leading zeros.

use apnum_core::Result;
use apnum_mul::limbs::{self, Limb};
use apnum_mul::MultiplicationEngine;
use std::cmp::Ordering;

/// Greatest common divisor by Euclid's algorithm.
pub(crate) fn gcd(engine: &MultiplicationEngine<'_>, a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    while !b.is_empty() {
        engine.context().check_cancelled()?;
        let (_, r) = engine.div_rem_digits(&a, &b)?;
        a = std::mem::replace(&mut b, r);
    }
    Ok(a)
}

/// `⌊√n⌋` by Newton iteration from a power of the limb base above the root.
pub(crate) fn isqrt(engine: &MultiplicationEngine<'_>, n: &[u8]) -> Result<Vec<u8>> {
    let base = engine.base();
    let n = base.pack(n);
    if n.is_empty() {
        return Ok(Vec::new());
    }
    let mut x: Vec<Limb> = limbs::shift_up(&[1], (n.len() + 1) / 2);
    loop {
        engine.context().check_cancelled()?;
        let (q, _) = engine.div_rem(&n, &x)?;
        let (y, _) = limbs::div_small(&limbs::add(&x, &q, base.base), 2, base.base);
        if limbs::cmp(&y, &x) != Ordering::Less {
            break;
        }
        x = y;
    }
    Ok(base.unpack(&x))
}

/// Prime factors of `radix` with their multiplicities.
fn factor(radix: u32) -> Vec<(u64, u32)> {
    let mut n = radix as u64;
    let mut factors = Vec::new();
    let mut p = 2;
    while p * p <= n {
        let mut count = 0;
        while n % p == 0 {
            n /= p;
            count += 1;
        }
        if count > 0 {
            factors.push((p, count));
        }
        p += 1;
    }
    if n > 1 {
        factors.push((n, 1));
    }
    factors
}

/// Smallest `k` such that `d` divides `radix^k`, or `None` when `1/d` does not
/// terminate in `radix`.
pub(crate) fn terminating_shift(engine: &MultiplicationEngine<'_>, d: &[u8]) -> Result<Option<u64>> {
    let base = engine.base();
    let mut rest = base.pack(d);
    let mut shift = 0u64;
    for (p, multiplicity) in factor(base.radix) {
        let mut count = 0u64;
        loop {
            let (q, r) = limbs::div_small(&rest, p, base.base);
            if r != 0 || limbs::is_zero(&q) {
                break;
            }
            rest = q;
            count += 1;
            if count % 1024 == 0 {
                engine.context().check_cancelled()?;
            }
        }
        shift = shift.max((count + multiplicity as u64 - 1) / multiplicity as u64);
    }
    Ok((limbs::trimmed(&rest) == [1]).then_some(shift))
}
