use crate::constants::{KARATSUBA_THRESHOLD, PARALLEL_KARATSUBA_MIN};
use crate::limbs::{add, add_at, sub_at, trim, trimmed, Limb};
use crate::schoolbook;

/// Karatsuba product. Unbalanced operands are cut into slices of the
/// shorter length first. With `parallel`, the outer and inner sub-products
/// of large levels run as a `rayon::join`; the result does not depend on it.
pub fn multiply(a: &[Limb], b: &[Limb], base: u64, parallel: bool) -> Vec<Limb> {
    let (a, b) = {
        let (a, b) = (trimmed(a), trimmed(b));
        if a.len() >= b.len() {
            (a, b)
        } else {
            (b, a)
        }
    };
    if b.is_empty() {
        return Vec::new();
    }
    if b.len() < KARATSUBA_THRESHOLD {
        return schoolbook::multiply(a, b, base);
    }

    if b.len() * 2 <= a.len() {
        let mut out = Vec::with_capacity(a.len() + b.len());
        for (i, slice) in a.chunks(b.len()).enumerate() {
            let part = multiply(slice, b, base, parallel);
            add_at(&mut out, &part, i * b.len(), base);
        }
        trim(&mut out);
        return out;
    }

    let m = a.len() / 2;
    let (a0, a1) = a.split_at(m);
    let (b0, b1) = b.split_at(m.min(b.len()));

    let (z0, z2) = if parallel && b.len() >= PARALLEL_KARATSUBA_MIN {
        rayon::join(|| multiply(a0, b0, base, parallel), || multiply(a1, b1, base, parallel))
    } else {
        (multiply(a0, b0, base, parallel), multiply(a1, b1, base, parallel))
    };
    let mut z1 = multiply(&add(a0, a1, base), &add(b0, b1, base), base, parallel);
    sub_at(&mut z1, &z0, 0, base);
    sub_at(&mut z1, &z2, 0, base);

    combine(z0, z1, z2, m, base)
}

/// Karatsuba square: three half-size squares.
pub fn square(a: &[Limb], base: u64, parallel: bool) -> Vec<Limb> {
    let a = trimmed(a);
    if a.len() < KARATSUBA_THRESHOLD {
        return schoolbook::square(a, base);
    }
    let m = a.len() / 2;
    let (a0, a1) = a.split_at(m);

    let (z0, z2) = if parallel && a.len() >= PARALLEL_KARATSUBA_MIN {
        rayon::join(|| square(a0, base, parallel), || square(a1, base, parallel))
    } else {
        (square(a0, base, parallel), square(a1, base, parallel))
    };
    let mut z1 = square(&add(a0, a1, base), base, parallel);
    sub_at(&mut z1, &z0, 0, base);
    sub_at(&mut z1, &z2, 0, base);

    combine(z0, z1, z2, m, base)
}

fn combine(z0: Vec<Limb>, z1: Vec<Limb>, z2: Vec<Limb>, m: usize, base: u64) -> Vec<Limb> {
    let mut out = z0;
    out.reserve(2 * m + z2.len());
    add_at(&mut out, &z1, m, base);
    add_at(&mut out, &z2, 2 * m, base);
    trim(&mut out);
    out
}
