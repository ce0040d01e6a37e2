use crate::limbs::{trim, trimmed, Limb};

/// Quadratic product, carried row by row in base `base`.
pub fn multiply(a: &[Limb], b: &[Limb], base: u64) -> Vec<Limb> {
    let a = trimmed(a);
    let b = trimmed(b);
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0 as Limb; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate() {
        if x == 0 {
            continue;
        }
        let mut carry = 0u64;
        for (j, &y) in b.iter().enumerate() {
            let t = out[i + j] as u64 + x as u64 * y as u64 + carry;
            out[i + j] = (t % base) as Limb;
            carry = t / base;
        }
        let mut k = i + b.len();
        while carry > 0 {
            let t = out[k] as u64 + carry;
            out[k] = (t % base) as Limb;
            carry = t / base;
            k += 1;
        }
    }
    trim(&mut out);
    out
}

/// Quadratic square: cross terms once, doubled, then the diagonal.
pub fn square(a: &[Limb], base: u64) -> Vec<Limb> {
    let a = trimmed(a);
    if a.is_empty() {
        return Vec::new();
    }
    let n = a.len();
    let mut out = vec![0 as Limb; 2 * n];

    for i in 0..n {
        let x = a[i] as u64;
        if x == 0 {
            continue;
        }
        let mut carry = 0u64;
        for j in i + 1..n {
            let t = out[i + j] as u64 + x * a[j] as u64 + carry;
            out[i + j] = (t % base) as Limb;
            carry = t / base;
        }
        let mut k = i + n;
        while carry > 0 {
            let t = out[k] as u64 + carry;
            out[k] = (t % base) as Limb;
            carry = t / base;
            k += 1;
        }
    }

    let mut carry = 0u64;
    for limb in out.iter_mut() {
        let t = *limb as u64 * 2 + carry;
        *limb = (t % base) as Limb;
        carry = t / base;
    }

    let mut carry = 0u64;
    for (i, &x) in a.iter().enumerate() {
        let sq = x as u64 * x as u64;
        let t = out[2 * i] as u64 + sq % base + carry;
        out[2 * i] = (t % base) as Limb;
        let t = out[2 * i + 1] as u64 + sq / base + t / base;
        out[2 * i + 1] = (t % base) as Limb;
        carry = t / base;
    }
    debug_assert_eq!(carry, 0);

    trim(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_decimal_limbs() {
        // 99 · 99 = 9801 in base 10
        assert_eq!(multiply(&[9, 9], &[9, 9], 10), vec![1, 0, 8, 9]);
        assert!(multiply(&[], &[1, 2], 10).is_empty());
        assert!(multiply(&[0, 0], &[1, 2], 10).is_empty());
    }

    #[test]
    fn test_square_matches_multiply() {
        let base = 1_000_000_000;
        let a = [999_999_999, 123_456_789, 999_999_999, 1];
        assert_eq!(square(&a, base), multiply(&a, &a, base));
        assert_eq!(square(&[9, 9, 9], 10), vec![1, 0, 0, 8, 9, 9]);
    }
}
