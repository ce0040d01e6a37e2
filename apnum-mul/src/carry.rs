use crate::limbs::{trim, Limb};

/// Normalizes unbounded convolution coefficients into limbs of base `base`.
///
/// Runs strictly in order from the least significant coefficient after all
/// transform work has finished.
pub fn propagate(coefficients: &[u128], base: u64) -> Vec<Limb> {
    let base = base as u128;
    let mut out = Vec::with_capacity(coefficients.len() + 2);
    let mut carry = 0u128;
    for &c in coefficients {
        let t = c + carry;
        out.push((t % base) as Limb);
        carry = t / base;
    }
    while carry > 0 {
        out.push((carry % base) as Limb);
        carry /= base;
    }
    trim(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propagate() {
        // 3 + 14·10 + 8·100 = 943
        assert_eq!(propagate(&[3, 14, 8, 0], 10), vec![3, 4, 9]);
        assert_eq!(propagate(&[250, 0], 10), vec![0, 5, 2]);
        assert!(propagate(&[0, 0], 10).is_empty());
    }
}
