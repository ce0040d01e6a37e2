use crate::carry;
use crate::constants::{KARATSUBA_THRESHOLD, MAX_TRANSFORM_LENGTH, NEWTON_THRESHOLD, NTT_THRESHOLD};
use crate::crt::Garner;
use crate::division;
use crate::karatsuba;
use crate::limbs::{cmp, trimmed, Limb, LimbBase};
use crate::ntt::{self, PRIMES};
use crate::schoolbook;
use apnum_core::{ApnumError, Result};
use apnum_exec::{CancellationToken, Context};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace, warn};

/// Convolution strategy for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Schoolbook,
    Karatsuba { parallel: bool },
    /// Three-prime transform of power-of-two `length`.
    Ntt { length: usize, parallel: bool },
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Schoolbook => write!(f, "schoolbook"),
            Algorithm::Karatsuba { parallel } => write!(f, "karatsuba(parallel={})", parallel),
            Algorithm::Ntt { length, parallel } => write!(f, "ntt(length={}, parallel={})", length, parallel),
        }
    }
}

/// Picks the algorithm for a `len_a × len_b` limb product.
///
/// A pure function of the sizes and the available parallelism: work is
/// shared across the pool only when more than one processor is configured
/// and the operands together reach `parallel_limbs`.
pub fn select(len_a: usize, len_b: usize, processors: usize, parallel_limbs: usize) -> Algorithm {
    let shorter = len_a.min(len_b);
    let parallel = processors > 1 && len_a + len_b >= parallel_limbs;
    if shorter < KARATSUBA_THRESHOLD {
        return Algorithm::Schoolbook;
    }
    if shorter < NTT_THRESHOLD {
        return Algorithm::Karatsuba { parallel };
    }
    let length = (len_a + len_b - 1).next_power_of_two();
    if length > MAX_TRANSFORM_LENGTH {
        warn!(len_a, len_b, "product exceeds the maximum transform length, using karatsuba");
        return Algorithm::Karatsuba { parallel };
    }
    Algorithm::Ntt { length, parallel }
}

/// Multiplies and divides limb vectors of one radix under a [`Context`].
///
/// The context supplies the processor count, the shared-memory threshold,
/// the worker pool for parallel algorithms and the cancellation token.
/// Results never depend on the degree of parallelism.
pub struct MultiplicationEngine<'a> {
    ctx: &'a Context,
    base: LimbBase,
}

impl<'a> MultiplicationEngine<'a> {
    pub fn new(ctx: &'a Context, radix: u32) -> Self {
        Self { ctx, base: LimbBase::for_radix(radix) }
    }

    pub fn base(&self) -> LimbBase {
        self.base
    }

    pub fn context(&self) -> &'a Context {
        self.ctx
    }

    fn parallel_limbs(&self) -> usize {
        (self.ctx.config().shared_memory_threshold / self.base.digits_per_limb).max(1)
    }

    pub fn algorithm_for(&self, len_a: usize, len_b: usize) -> Algorithm {
        select(len_a, len_b, self.ctx.processors(), self.parallel_limbs())
    }

    /// Full product of two limb vectors.
    pub fn multiply(&self, a: &[Limb], b: &[Limb]) -> Result<Vec<Limb>> {
        let (a, b) = (trimmed(a), trimmed(b));
        if a.is_empty() || b.is_empty() {
            return Ok(Vec::new());
        }
        self.ctx.check_cancelled()?;
        let algorithm = self.algorithm_for(a.len(), b.len());
        trace!(len_a = a.len(), len_b = b.len(), %algorithm, "multiply");
        self.run(algorithm, a, Some(b))
    }

    /// `a²`, sharing one forward transform or the symmetric cross terms.
    pub fn square(&self, a: &[Limb]) -> Result<Vec<Limb>> {
        let a = trimmed(a);
        if a.is_empty() {
            return Ok(Vec::new());
        }
        self.ctx.check_cancelled()?;
        let algorithm = self.algorithm_for(a.len(), a.len());
        trace!(len = a.len(), %algorithm, "square");
        self.run(algorithm, a, None)
    }

    fn run(&self, algorithm: Algorithm, a: &[Limb], b: Option<&[Limb]>) -> Result<Vec<Limb>> {
        let base = self.base.base;
        match algorithm {
            Algorithm::Schoolbook => Ok(match b {
                Some(b) => schoolbook::multiply(a, b, base),
                None => schoolbook::square(a, base),
            }),
            Algorithm::Karatsuba { parallel } => {
                let work = move || match b {
                    Some(b) => karatsuba::multiply(a, b, base, parallel),
                    None => karatsuba::square(a, base, parallel),
                };
                if parallel {
                    self.ctx.install(work)
                } else {
                    Ok(work())
                }
            }
            Algorithm::Ntt { length, parallel } => {
                debug!(len_a = a.len(), len_b = b.map_or(a.len(), <[Limb]>::len), length, parallel, "transform multiply");
                let cancel = self.ctx.cancellation();
                let work = move || transform_multiply(a, b, length, base, parallel, cancel);
                if parallel {
                    self.ctx.install(work)?
                } else {
                    work()
                }
            }
        }
    }

    /// Truncating `(a / b, a mod b)`.
    ///
    /// Divisors of at least [`NEWTON_THRESHOLD`] limbs go through the Newton
    /// reciprocal, shorter ones through long division.
    pub fn div_rem(&self, a: &[Limb], b: &[Limb]) -> Result<(Vec<Limb>, Vec<Limb>)> {
        let (a, b) = (trimmed(a), trimmed(b));
        if b.is_empty() {
            return Err(ApnumError::arithmetic("Division by zero"));
        }
        if cmp(a, b) == Ordering::Less {
            return Ok((Vec::new(), a.to_vec()));
        }
        self.ctx.check_cancelled()?;
        if b.len() >= NEWTON_THRESHOLD {
            debug!(len_a = a.len(), len_b = b.len(), "newton division");
            division::newton_div_rem(self, a, b)
        } else {
            division::long_division(a, b, self.base.base, self.ctx.cancellation())
        }
    }

    /// Product of two most-significant-first digit strings.
    pub fn multiply_digits(&self, a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
        let product = self.multiply(&self.base.pack(a), &self.base.pack(b))?;
        Ok(self.base.unpack(&product))
    }

    pub fn square_digits(&self, a: &[u8]) -> Result<Vec<u8>> {
        let product = self.square(&self.base.pack(a))?;
        Ok(self.base.unpack(&product))
    }

    /// Quotient and remainder of two most-significant-first digit strings.
    pub fn div_rem_digits(&self, a: &[u8], b: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let (q, r) = self.div_rem(&self.base.pack(a), &self.base.pack(b))?;
        Ok((self.base.unpack(&q), self.base.unpack(&r)))
    }
}

fn transform_multiply(
    a: &[Limb],
    b: Option<&[Limb]>,
    length: usize,
    base: u64,
    parallel: bool,
    cancel: &CancellationToken,
) -> Result<Vec<Limb>> {
    let conv = |i: usize| ntt::convolve(a, b, length, &PRIMES[i], parallel, cancel);
    let (r1, r2, r3) = if parallel {
        let (r1, (r2, r3)) = rayon::join(|| conv(0), || rayon::join(|| conv(1), || conv(2)));
        (r1?, r2?, r3?)
    } else {
        (conv(0)?, conv(1)?, conv(2)?)
    };
    cancel.check()?;

    let coefficients = a.len() + b.map_or(a.len(), <[Limb]>::len) - 1;
    let values = Garner::default().combine_all(&[r1, r2, r3], coefficients, parallel);
    Ok(carry::propagate(&values, base))
}
