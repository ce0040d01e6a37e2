//! Digit-string arithmetic shared by the number types.
//!
//! A [`Magnitude`] is an unsigned value `D · radix^exp` where `D` is the
//! integer spelled by `digits`, most significant digit first.

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Magnitude {
    pub digits: Vec<u8>,
    pub exp: i64,
}

impl Magnitude {
    pub fn new(digits: Vec<u8>, exp: i64) -> Self {
        Self { digits, exp }
    }

    pub fn zero() -> Self {
        Self { digits: Vec::new(), exp: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.digits.iter().all(|&d| d == 0)
    }

    /// Position above the most significant digit.
    pub fn top(&self) -> i64 {
        self.exp.saturating_add(self.digits.len() as i64)
    }

    /// Strips leading and trailing zero digits, adjusting `exp`.
    pub fn normalize(mut self) -> Self {
        let leading = self.digits.iter().take_while(|&&d| d == 0).count();
        self.digits.drain(..leading);
        let trailing = self.digits.iter().rev().take_while(|&&d| d == 0).count();
        self.digits.truncate(self.digits.len() - trailing);
        self.exp = self.exp.saturating_add(trailing as i64);
        if self.digits.is_empty() {
            self.exp = 0;
        }
        self
    }

    /// Drops every digit at a position below `limit`.
    pub fn truncate_below(mut self, limit: i64) -> Self {
        if self.exp >= limit {
            return self;
        }
        let keep = (self.top() - limit).max(0) as usize;
        if keep == 0 {
            return Self::zero();
        }
        self.digits.truncate(keep);
        self.exp = limit;
        self.normalize()
    }

    /// Keeps at most `count` leading digits.
    pub fn truncate_digits(self, count: usize) -> Self {
        if self.digits.len() <= count {
            return self;
        }
        let limit = self.top() - count as i64;
        self.truncate_below(limit)
    }

    /// Digits of `self` spelled at exponent `exp ≤ self.exp`.
    pub fn spelled_at(&self, exp: i64) -> Vec<u8> {
        let pad = (self.exp - exp) as usize;
        let mut out = Vec::with_capacity(self.digits.len() + pad);
        out.extend_from_slice(&self.digits);
        out.resize(self.digits.len() + pad, 0);
        out
    }

    /// Integer digits of `self` when `exp ≥ 0`.
    pub fn integer_digits(&self) -> Vec<u8> {
        if self.is_zero() {
            Vec::new()
        } else {
            self.spelled_at(0.min(self.exp))
        }
    }
}

/// Compares two normalized magnitudes.
pub(crate) fn cmp_magnitudes(a: &Magnitude, b: &Magnitude) -> Ordering {
    match (a.digits.is_empty(), b.digits.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }
    a.top()
        .cmp(&b.top())
        .then_with(|| a.digits.iter().cmp(b.digits.iter()))
}

/// Spells both operands at their common exponent, right-aligned to equal width.
fn aligned(a: &Magnitude, b: &Magnitude) -> (Vec<u8>, Vec<u8>, i64) {
    let exp = a.exp.min(b.exp);
    let mut x = a.spelled_at(exp);
    let mut y = b.spelled_at(exp);
    let width = x.len().max(y.len());
    left_pad(&mut x, width);
    left_pad(&mut y, width);
    (x, y, exp)
}

fn left_pad(v: &mut Vec<u8>, width: usize) {
    if v.len() < width {
        let mut padded = vec![0u8; width - v.len()];
        padded.extend_from_slice(v);
        *v = padded;
    }
}

pub(crate) fn add_magnitudes(a: &Magnitude, b: &Magnitude, radix: u32) -> Magnitude {
    if a.digits.is_empty() {
        return b.clone();
    }
    if b.digits.is_empty() {
        return a.clone();
    }
    let (x, y, exp) = aligned(a, b);
    let mut out = vec![0u8; x.len() + 1];
    let mut carry = 0u32;
    for i in (0..x.len()).rev() {
        let s = x[i] as u32 + y[i] as u32 + carry;
        out[i + 1] = (s % radix) as u8;
        carry = s / radix;
    }
    out[0] = carry as u8;
    Magnitude::new(out, exp).normalize()
}

/// `a − b`; requires `a ≥ b`.
pub(crate) fn sub_magnitudes(a: &Magnitude, b: &Magnitude, radix: u32) -> Magnitude {
    if b.digits.is_empty() {
        return a.clone();
    }
    let (x, y, exp) = aligned(a, b);
    let mut out = vec![0u8; x.len()];
    let mut borrow = 0i32;
    for i in (0..x.len()).rev() {
        let mut d = x[i] as i32 - y[i] as i32 - borrow;
        borrow = 0;
        if d < 0 {
            d += radix as i32;
            borrow = 1;
        }
        out[i] = d as u8;
    }
    debug_assert_eq!(borrow, 0, "magnitude subtraction underflow");
    Magnitude::new(out, exp).normalize()
}

/// Adds one unit in the last place; returns the new digits and whether a carry
/// lengthened them.
pub(crate) fn increment(digits: &[u8], radix: u32) -> (Vec<u8>, bool) {
    let mut out = digits.to_vec();
    for d in out.iter_mut().rev() {
        if (*d as u32) + 1 < radix {
            *d += 1;
            return (out, false);
        }
        *d = 0;
    }
    out.insert(0, 1);
    (out, true)
}

/// Parity of the integer spelled by `digits`.
pub(crate) fn is_odd(digits: &[u8], radix: u32) -> bool {
    if radix % 2 == 0 {
        digits.last().map_or(false, |&d| d % 2 == 1)
    } else {
        digits.iter().map(|&d| d as u32).sum::<u32>() % 2 == 1
    }
}
