//! Garner reconstruction of convolution coefficients from three residues.

use crate::ntt::{Prime, PRIMES};
use rayon::prelude::*;

/// Precomputed inverses for combining residues modulo [`PRIMES`].
#[derive(Debug, Clone, Copy)]
pub struct Garner {
    p1: u64,
    p2: u64,
    p3: u64,
    /// `p1^-1 mod p2`
    inv_p1_mod_p2: u32,
    /// `(p1 · p2)^-1 mod p3`
    inv_p1p2_mod_p3: u32,
}

impl Default for Garner {
    fn default() -> Self {
        Self::new(&PRIMES)
    }
}

impl Garner {
    pub fn new(primes: &[Prime; 3]) -> Self {
        let [a, b, c] = primes;
        let p1p2_mod_p3 = ((a.modulus as u64 * b.modulus as u64) % c.modulus as u64) as u32;
        Self {
            p1: a.modulus as u64,
            p2: b.modulus as u64,
            p3: c.modulus as u64,
            inv_p1_mod_p2: b.inverse(a.modulus % b.modulus),
            inv_p1p2_mod_p3: c.inverse(p1p2_mod_p3),
        }
    }

    /// The unique `x < p1·p2·p3` with the given residues.
    pub fn combine(&self, r1: u32, r2: u32, r3: u32) -> u128 {
        let (p1, p2, p3) = (self.p1, self.p2, self.p3);
        let x1 = r1 as u64;

        let x2 = ((r2 as u64 + p2 - x1 % p2) % p2) * self.inv_p1_mod_p2 as u64 % p2;

        let partial = (x1 % p3 + (x2 % p3) * (p1 % p3)) % p3;
        let x3 = ((r3 as u64 + p3 - partial) % p3) * self.inv_p1p2_mod_p3 as u64 % p3;

        x1 as u128 + x2 as u128 * p1 as u128 + x3 as u128 * (p1 as u128 * p2 as u128)
    }

    /// Combines whole residue vectors; element order is preserved.
    pub fn combine_all(&self, residues: &[Vec<u32>; 3], len: usize, parallel: bool) -> Vec<u128> {
        let [r1, r2, r3] = residues;
        if parallel {
            (0..len).into_par_iter().map(|i| self.combine(r1[i], r2[i], r3[i])).collect()
        } else {
            (0..len).map(|i| self.combine(r1[i], r2[i], r3[i])).collect()
        }
    }
}
