//! Little-endian limb vectors in base `B = radix^k`.
//!
//! Radix digits are stored most significant first, one per byte; the engine
//! packs `k` of them into each `u32` limb, where `k` is the largest exponent
//! with `radix^k ≤ 2^30`. All helpers here take and return limbs with the
//! least significant limb first.

use crate::constants::MAX_LIMB_BASE;
use std::cmp::Ordering;

pub type Limb = u32;

/// Packing parameters for one radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimbBase {
    pub radix: u32,
    /// Radix digits per limb.
    pub digits_per_limb: usize,
    /// `radix^digits_per_limb`.
    pub base: u64,
}

impl LimbBase {
    pub fn for_radix(radix: u32) -> Self {
        let radix = radix.clamp(2, 36);
        let mut base = radix as u64;
        let mut digits_per_limb = 1;
        while base * radix as u64 <= MAX_LIMB_BASE {
            base *= radix as u64;
            digits_per_limb += 1;
        }
        Self { radix, digits_per_limb, base }
    }

    /// Limbs needed for `digits` radix digits.
    pub fn limbs_for(&self, digits: usize) -> usize {
        (digits + self.digits_per_limb - 1) / self.digits_per_limb
    }

    /// Packs a most-significant-first digit string into limbs.
    pub fn pack(&self, digits: &[u8]) -> Vec<Limb> {
        let mut limbs = Vec::with_capacity(self.limbs_for(digits.len()));
        for chunk in digits.rchunks(self.digits_per_limb) {
            let limb = chunk.iter().fold(0u64, |acc, &d| acc * self.radix as u64 + d as u64);
            limbs.push(limb as Limb);
        }
        trim(&mut limbs);
        limbs
    }

    /// Unpacks limbs into a most-significant-first digit string without leading zeros.
    pub fn unpack(&self, limbs: &[Limb]) -> Vec<u8> {
        let limbs = trimmed(limbs);
        let mut digits = Vec::with_capacity(limbs.len() * self.digits_per_limb);
        for &limb in limbs.iter().rev() {
            let mut chunk = [0u8; 32];
            let mut value = limb as u64;
            for slot in chunk[..self.digits_per_limb].iter_mut().rev() {
                *slot = (value % self.radix as u64) as u8;
                value /= self.radix as u64;
            }
            digits.extend_from_slice(&chunk[..self.digits_per_limb]);
        }
        let leading = digits.iter().take_while(|&&d| d == 0).count();
        digits.drain(..leading);
        digits
    }
}

/// Drops high zero limbs.
pub fn trim(limbs: &mut Vec<Limb>) {
    while limbs.last() == Some(&0) {
        limbs.pop();
    }
}

pub fn trimmed(limbs: &[Limb]) -> &[Limb] {
    let len = limbs.iter().rposition(|&l| l != 0).map_or(0, |p| p + 1);
    &limbs[..len]
}

pub fn is_zero(limbs: &[Limb]) -> bool {
    limbs.iter().all(|&l| l == 0)
}

pub fn cmp(a: &[Limb], b: &[Limb]) -> Ordering {
    let a = trimmed(a);
    let b = trimmed(b);
    a.len().cmp(&b.len()).then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

pub fn add(a: &[Limb], b: &[Limb], base: u64) -> Vec<Limb> {
    let mut out = a.to_vec();
    add_at(&mut out, b, 0, base);
    out
}

/// `acc += x · B^offset`, growing `acc` as needed.
pub fn add_at(acc: &mut Vec<Limb>, x: &[Limb], offset: usize, base: u64) {
    let x = trimmed(x);
    if x.is_empty() {
        return;
    }
    if acc.len() < offset + x.len() {
        acc.resize(offset + x.len(), 0);
    }
    let mut carry = 0u64;
    let mut i = offset;
    for &limb in x {
        let s = acc[i] as u64 + limb as u64 + carry;
        acc[i] = (s % base) as Limb;
        carry = s / base;
        i += 1;
    }
    while carry > 0 {
        if i == acc.len() {
            acc.push(0);
        }
        let s = acc[i] as u64 + carry;
        acc[i] = (s % base) as Limb;
        carry = s / base;
        i += 1;
    }
}

/// `a − b`; requires `a ≥ b`.
pub fn sub(a: &[Limb], b: &[Limb], base: u64) -> Vec<Limb> {
    let mut out = a.to_vec();
    sub_at(&mut out, b, 0, base);
    trim(&mut out);
    out
}

/// `acc −= x · B^offset`; requires the result to be non-negative.
pub fn sub_at(acc: &mut [Limb], x: &[Limb], offset: usize, base: u64) {
    let x = trimmed(x);
    let mut borrow = 0i64;
    let mut i = offset;
    for &limb in x {
        let mut d = acc[i] as i64 - limb as i64 - borrow;
        borrow = 0;
        if d < 0 {
            d += base as i64;
            borrow = 1;
        }
        acc[i] = d as Limb;
        i += 1;
    }
    while borrow > 0 && i < acc.len() {
        let mut d = acc[i] as i64 - borrow;
        borrow = 0;
        if d < 0 {
            d += base as i64;
            borrow = 1;
        }
        acc[i] = d as Limb;
        i += 1;
    }
    debug_assert_eq!(borrow, 0, "limb subtraction underflow");
}

pub fn mul_small(a: &[Limb], m: u64, base: u64) -> Vec<Limb> {
    let mut out = Vec::with_capacity(a.len() + 2);
    let mut carry = 0u64;
    for &limb in a {
        let p = limb as u64 * m + carry;
        out.push((p % base) as Limb);
        carry = p / base;
    }
    while carry > 0 {
        out.push((carry % base) as Limb);
        carry /= base;
    }
    trim(&mut out);
    out
}

pub fn add_small(a: &[Limb], m: u64, base: u64) -> Vec<Limb> {
    let mut out = a.to_vec();
    let small = [(m % base) as Limb, (m / base) as Limb];
    add_at(&mut out, &small, 0, base);
    out
}

/// `(a / d, a mod d)` for a single-limb divisor `0 < d ≤ B`.
pub fn div_small(a: &[Limb], d: u64, base: u64) -> (Vec<Limb>, u64) {
    let mut q = vec![0; a.len()];
    let mut rem = 0u64;
    for i in (0..a.len()).rev() {
        let cur = rem * base + a[i] as u64;
        q[i] = (cur / d) as Limb;
        rem = cur % d;
    }
    trim(&mut q);
    (q, rem)
}

/// `a · B^n`.
pub fn shift_up(a: &[Limb], n: usize) -> Vec<Limb> {
    if is_zero(a) {
        return Vec::new();
    }
    let mut out = vec![0; n];
    out.extend_from_slice(trimmed(a));
    out
}

/// `floor(a / B^n)`.
pub fn shift_down(a: &[Limb], n: usize) -> Vec<Limb> {
    if n >= a.len() {
        Vec::new()
    } else {
        trimmed(&a[n..]).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limb_base_for_radix() {
        let ten = LimbBase::for_radix(10);
        assert_eq!((ten.digits_per_limb, ten.base), (9, 1_000_000_000));
        let two = LimbBase::for_radix(2);
        assert_eq!((two.digits_per_limb, two.base), (30, 1 << 30));
        let hex = LimbBase::for_radix(16);
        assert_eq!((hex.digits_per_limb, hex.base), (7, 1 << 28));
        assert_eq!(LimbBase::for_radix(36).digits_per_limb, 5);
    }

    #[test]
    fn test_pack_unpack() {
        let ten = LimbBase::for_radix(10);
        let digits = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1];
        let limbs = ten.pack(&digits);
        assert_eq!(limbs, vec![345_678_901, 12]);
        assert_eq!(ten.unpack(&limbs), digits);
        assert!(ten.pack(&[0, 0, 0]).is_empty());
        assert!(ten.unpack(&[0, 0]).is_empty());
    }

    #[test]
    fn test_add_sub_carry() {
        let base = 10;
        assert_eq!(add(&[9, 9], &[1], base), vec![0, 0, 1]);
        assert_eq!(sub(&[0, 0, 1], &[1], base), vec![9, 9]);
        assert_eq!(sub(&[5], &[5], base), Vec::<Limb>::new());
    }

    #[test]
    fn test_small_ops() {
        let base = 10;
        assert_eq!(mul_small(&[5, 2], 4, base), vec![0, 0, 1]);
        assert_eq!(add_small(&[9, 9], 3, base), vec![2, 0, 1]);
        assert_eq!(div_small(&[3, 2, 1], 7, base), (vec![7, 1], 4));
    }

    #[test]
    fn test_cmp_and_shifts() {
        assert_eq!(cmp(&[1, 2, 0], &[9, 1]), Ordering::Greater);
        assert_eq!(cmp(&[3], &[3, 0]), Ordering::Equal);
        assert_eq!(shift_up(&[1, 2], 2), vec![0, 0, 1, 2]);
        assert_eq!(shift_down(&[1, 2, 3], 1), vec![2, 3]);
        assert!(shift_down(&[1], 3).is_empty());
    }
}
