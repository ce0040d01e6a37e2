//! Number-theoretic transforms over three NTT-friendly primes.

use crate::constants::PARALLEL_TRANSFORM_MIN;
use crate::limbs::Limb;
use apnum_core::Result;
use apnum_exec::CancellationToken;
use rayon::prelude::*;
use tracing::trace;

/// A prime `p = c · 2^k + 1` with a primitive root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prime {
    pub modulus: u32,
    pub generator: u32,
    /// Largest supported transform length is `2^max_log`.
    pub max_log: u32,
}

pub const PRIMES: [Prime; 3] = [
    Prime { modulus: 2_013_265_921, generator: 31, max_log: 27 },
    Prime { modulus: 469_762_049, generator: 3, max_log: 26 },
    Prime { modulus: 754_974_721, generator: 11, max_log: 24 },
];

impl Prime {
    #[inline]
    pub fn mul(&self, a: u32, b: u32) -> u32 {
        ((a as u64 * b as u64) % self.modulus as u64) as u32
    }

    #[inline]
    pub fn add(&self, a: u32, b: u32) -> u32 {
        let s = a as u64 + b as u64;
        (if s >= self.modulus as u64 { s - self.modulus as u64 } else { s }) as u32
    }

    #[inline]
    pub fn sub(&self, a: u32, b: u32) -> u32 {
        if a >= b {
            a - b
        } else {
            (a as u64 + self.modulus as u64 - b as u64) as u32
        }
    }

    pub fn pow(&self, base: u32, mut exp: u64) -> u32 {
        let mut result = 1u32;
        let mut b = base % self.modulus;
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, b);
            }
            b = self.mul(b, b);
            exp >>= 1;
        }
        result
    }

    pub fn inverse(&self, a: u32) -> u32 {
        self.pow(a, self.modulus as u64 - 2)
    }

    /// `w^j` for `j < n / 2`, where `w` is a primitive `n`-th root of unity
    /// (or its inverse).
    fn twiddles(&self, n: usize, inverse: bool) -> Vec<u32> {
        let root = self.pow(self.generator, (self.modulus as u64 - 1) / n as u64);
        let w = if inverse { self.inverse(root) } else { root };
        let mut table = Vec::with_capacity(n / 2);
        let mut x = 1u32;
        for _ in 0..n / 2 {
            table.push(x);
            x = self.mul(x, w);
        }
        table
    }

    /// Reduces limbs modulo this prime, zero-padded to `n`.
    pub fn reduce(&self, limbs: &[Limb], n: usize) -> Vec<u32> {
        let mut out: Vec<u32> = limbs.iter().map(|&l| l % self.modulus).collect();
        out.resize(n, 0);
        out
    }
}

fn bit_reverse(data: &mut [u32]) {
    let n = data.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

/// In-place iterative transform of a power-of-two length sequence.
///
/// The inverse transform includes the `1/n` scaling. Cancellation is
/// checked between butterfly stages. With `parallel`, each stage is split
/// across the current rayon pool; the arithmetic is exact, so the output is
/// the same either way.
pub fn transform(
    data: &mut [u32],
    prime: &Prime,
    inverse: bool,
    parallel: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let n = data.len();
    debug_assert!(n.is_power_of_two());
    debug_assert!(n.trailing_zeros() <= prime.max_log);
    if n <= 1 {
        return Ok(());
    }

    bit_reverse(data);
    let roots = prime.twiddles(n, inverse);
    let parallel = parallel && n >= PARALLEL_TRANSFORM_MIN;
    let workers = rayon::current_num_threads().max(1);

    let mut len = 2;
    while len <= n {
        cancel.check()?;
        let half = len / 2;
        let step = n / len;
        let butterfly = |j: usize, a: &mut u32, b: &mut u32| {
            let t = prime.mul(*b, roots[j * step]);
            let u = *a;
            *a = prime.add(u, t);
            *b = prime.sub(u, t);
        };

        if !parallel {
            for block in data.chunks_mut(len) {
                let (lo, hi) = block.split_at_mut(half);
                for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                    butterfly(j, a, b);
                }
            }
        } else if n / len >= workers {
            data.par_chunks_mut(len).for_each(|block| {
                let (lo, hi) = block.split_at_mut(half);
                for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                    butterfly(j, a, b);
                }
            });
        } else {
            for block in data.chunks_mut(len) {
                let (lo, hi) = block.split_at_mut(half);
                lo.par_iter_mut()
                    .zip(hi.par_iter_mut())
                    .enumerate()
                    .for_each(|(j, (a, b))| butterfly(j, a, b));
            }
        }
        trace!(modulus = prime.modulus, len, "butterfly stage done");
        len <<= 1;
    }

    if inverse {
        let scale = prime.inverse(n as u32 % prime.modulus);
        if parallel {
            data.par_iter_mut().for_each(|x| *x = prime.mul(*x, scale));
        } else {
            data.iter_mut().for_each(|x| *x = prime.mul(*x, scale));
        }
    }
    Ok(())
}

/// Cyclic convolution of `a` and `b` modulo `prime`, `n` a power of two at
/// least `a.len() + b.len() − 1`. `b = None` squares `a` with one forward transform.
pub fn convolve(
    a: &[Limb],
    b: Option<&[Limb]>,
    n: usize,
    prime: &Prime,
    parallel: bool,
    cancel: &CancellationToken,
) -> Result<Vec<u32>> {
    let mut fa = prime.reduce(a, n);
    transform(&mut fa, prime, false, parallel, cancel)?;

    match b {
        Some(b) => {
            let mut fb = prime.reduce(b, n);
            transform(&mut fb, prime, false, parallel, cancel)?;
            if parallel {
                fa.par_iter_mut().zip(fb.par_iter()).for_each(|(x, &y)| *x = prime.mul(*x, y));
            } else {
                fa.iter_mut().zip(fb.iter()).for_each(|(x, &y)| *x = prime.mul(*x, y));
            }
        }
        None => {
            if parallel {
                fa.par_iter_mut().for_each(|x| *x = prime.mul(*x, *x));
            } else {
                fa.iter_mut().for_each(|x| *x = prime.mul(*x, *x));
            }
        }
    }

    transform(&mut fa, prime, true, parallel, cancel)?;
    Ok(fa)
}
