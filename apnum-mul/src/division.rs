//! Integer division on limb vectors.
//!
//! Short divisors use schoolbook long division. Long divisors multiply by
//! a reciprocal obtained by Newton iteration, which doubles the number of
//! correct limbs per step, so division costs a constant number of
//! multiplications of the divisor's size.

use crate::engine::MultiplicationEngine;
use crate::limbs::{add, add_at, add_small, cmp, div_small, mul_small, shift_down, shift_up, sub, trim, trimmed, Limb};
use apnum_core::{ApnumError, Result};
use apnum_exec::CancellationToken;
use std::cmp::Ordering;
use tracing::trace;

/// Reciprocals of at most this many limbs are computed exactly by long division.
const RECIPROCAL_BASE_CASE: usize = 16;

/// Quotient rows between cancellation checks.
const CHECK_INTERVAL: usize = 64;

/// `(a / b, a mod b)` by schoolbook long division with normalization.
pub fn long_division(a: &[Limb], b: &[Limb], base: u64, cancel: &CancellationToken) -> Result<(Vec<Limb>, Vec<Limb>)> {
    let a = trimmed(a);
    let b = trimmed(b);
    if b.is_empty() {
        return Err(ApnumError::arithmetic("Division by zero"));
    }
    if cmp(a, b) == Ordering::Less {
        return Ok((Vec::new(), a.to_vec()));
    }
    if b.len() == 1 {
        let (q, r) = div_small(a, b[0] as u64, base);
        let mut r = vec![r as Limb];
        trim(&mut r);
        return Ok((q, r));
    }

    let n = b.len();
    let m = a.len() - n;
    let d = base / (b[n - 1] as u64 + 1);
    let mut v = mul_small(b, d, base);
    v.resize(n, 0);
    let mut u = mul_small(a, d, base);
    u.resize(a.len() + 1, 0);
    let mut q = vec![0 as Limb; m + 1];

    let v_top = v[n - 1] as u64;
    let v_next = v[n - 2] as u64;
    let b_signed = base as i64;

    for j in (0..=m).rev() {
        if (m - j) % CHECK_INTERVAL == 0 {
            cancel.check()?;
        }

        let num = u[j + n] as u64 * base + u[j + n - 1] as u64;
        let mut qhat = num / v_top;
        let mut rhat = num % v_top;
        while qhat >= base || qhat * v_next > rhat * base + u[j + n - 2] as u64 {
            qhat -= 1;
            rhat += v_top;
            if rhat >= base {
                break;
            }
        }

        let mut borrow = 0i64;
        let mut carry = 0u64;
        for i in 0..n {
            let p = qhat * v[i] as u64 + carry;
            carry = p / base;
            let t = u[i + j] as i64 - borrow - (p % base) as i64;
            if t < 0 {
                u[i + j] = (t + b_signed) as Limb;
                borrow = 1;
            } else {
                u[i + j] = t as Limb;
                borrow = 0;
            }
        }
        let t = u[j + n] as i64 - borrow - carry as i64;
        if t < 0 {
            // qhat was one too large: add the divisor back
            u[j + n] = (t + b_signed) as Limb;
            qhat -= 1;
            let mut c = 0u64;
            for i in 0..n {
                let s = u[i + j] as u64 + v[i] as u64 + c;
                u[i + j] = (s % base) as Limb;
                c = s / base;
            }
            u[j + n] = ((u[j + n] as u64 + c) % base) as Limb;
        } else {
            u[j + n] = t as Limb;
        }
        q[j] = qhat as Limb;
    }

    trim(&mut q);
    let (r, _) = div_small(&u[..n], d, base);
    Ok((q, r))
}

/// `≈ B^(2k) / v` for a normalized `v` of `k` limbs (top limb at least `B/2`),
/// off by at most a few units.
pub(crate) fn reciprocal(engine: &MultiplicationEngine<'_>, v: &[Limb]) -> Result<Vec<Limb>> {
    let base = engine.base().base;
    let k = v.len();
    let power = shift_up(&[1], 2 * k);
    if k <= RECIPROCAL_BASE_CASE {
        return Ok(long_division(&power, v, base, engine.context().cancellation())?.0);
    }
    engine.context().check_cancelled()?;

    // one guard limb above half precision keeps the error from growing
    let h = k / 2 + 1;
    let l = k - h;
    let head = reciprocal(engine, &v[l..])?;
    let y0 = shift_up(&head, l);

    let product = engine.multiply(v, &y0)?;
    let y1 = match cmp(&product, &power) {
        Ordering::Greater => {
            let e = sub(&product, &power, base);
            let correction = shift_down(&engine.multiply(&y0, &e)?, 2 * k);
            sub(&y0, &add_small(&correction, 1, base), base)
        }
        _ => {
            let e = sub(&power, &product, base);
            let correction = shift_down(&engine.multiply(&y0, &e)?, 2 * k);
            add(&y0, &correction, base)
        }
    };
    trace!(limbs = k, "newton reciprocal step");
    Ok(y1)
}

/// `(a / b, a mod b)` by multiplication with a Newton reciprocal of `b`.
pub(crate) fn newton_div_rem(engine: &MultiplicationEngine<'_>, a: &[Limb], b: &[Limb]) -> Result<(Vec<Limb>, Vec<Limb>)> {
    let base = engine.base().base;
    let a = trimmed(a);
    let b = trimmed(b);
    if b.is_empty() {
        return Err(ApnumError::arithmetic("Division by zero"));
    }

    let d = base / (b[b.len() - 1] as u64 + 1);
    let v = mul_small(b, d, base);
    let u = mul_small(a, d, base);
    let n = v.len();
    let x = reciprocal(engine, &v)?;

    // Each step divides a value below v·B^n, so its quotient fits in one chunk.
    let mut quotient = Vec::with_capacity(u.len());
    let mut rem: Vec<Limb> = Vec::new();
    let mut hi = u.len();
    while hi > 0 {
        engine.context().check_cancelled()?;
        let lo = hi.saturating_sub(n);
        let chunk_len = hi - lo;
        let mut cur = shift_up(&rem, chunk_len);
        add_at(&mut cur, &u[lo..hi], 0, base);

        let (q, r) = newton_step(engine, &cur, &v, &x, n)?;
        add_at(&mut quotient, &q, lo, base);
        rem = r;
        hi = lo;
    }
    trim(&mut quotient);
    let (r, _) = div_small(&rem, d, base);
    Ok((quotient, r))
}

fn newton_step(
    engine: &MultiplicationEngine<'_>,
    cur: &[Limb],
    v: &[Limb],
    x: &[Limb],
    n: usize,
) -> Result<(Vec<Limb>, Vec<Limb>)> {
    let base = engine.base().base;
    let mut q = shift_down(&engine.multiply(cur, x)?, 2 * n);
    let mut product = engine.multiply(&q, v)?;
    while cmp(&product, cur) == Ordering::Greater {
        q = sub(&q, &[1], base);
        product = sub(&product, v, base);
    }
    let mut r = sub(cur, &product, base);
    while cmp(&r, v) != Ordering::Less {
        q = add_small(&q, 1, base);
        r = sub(&r, v, base);
    }
    Ok((q, r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schoolbook;

    #[test]
    fn test_long_division_small() {
        let token = CancellationToken::new();
        // 12345 / 67 = 184 rem 17 in base 10
        let (q, r) = long_division(&[5, 4, 3, 2, 1], &[7, 6], 10, &token).unwrap();
        assert_eq!(q, vec![4, 8, 1]);
        assert_eq!(r, vec![7, 1]);
    }

    #[test]
    fn test_long_division_full_limb_quotient() {
        let base = 1_000_000_000u64;
        let token = CancellationToken::new();
        let b = vec![1, 0, 500_000_000];
        let q_true = vec![999_999_999, 999_999_999];
        let mut a = schoolbook::multiply(&b, &q_true, base);
        add_at(&mut a, &[7], 0, base);
        let (q, r) = long_division(&a, &b, base, &token).unwrap();
        assert_eq!(q, q_true);
        assert_eq!(r, vec![7]);
    }

    #[test]
    fn test_division_by_zero() {
        let token = CancellationToken::new();
        assert!(matches!(long_division(&[1], &[], 10, &token), Err(ApnumError::Arithmetic(_))));
    }

    #[test]
    fn test_dividend_smaller_than_divisor() {
        let token = CancellationToken::new();
        let (q, r) = long_division(&[3], &[0, 1], 10, &token).unwrap();
        assert!(q.is_empty());
        assert_eq!(r, vec![3]);
    }
}
