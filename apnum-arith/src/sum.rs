//! Summation of many [`Apfloat`] terms on the worker pool.

use crate::apfloat::Apfloat;
use apnum_core::Result;
use apnum_exec::Context;
use rayon::prelude::*;
use tracing::debug;

/// Term count above which the sum is split into chunks.
const PARALLEL_THRESHOLD: usize = 256;

/// Terms per chunk. Fixed so that the grouping of finite-precision
/// additions, and hence the result, does not depend on the pool size.
const CHUNK_SIZE: usize = 64;

fn fold(terms: &[Apfloat], radix: u32) -> Result<Apfloat> {
    let mut iter = terms.iter();
    let mut acc = match iter.next() {
        Some(first) => first.clone(),
        None => return Ok(Apfloat::zero(radix)),
    };
    for term in iter {
        acc = acc.add(term)?;
    }
    Ok(acc)
}

impl Apfloat {
    /// Sum of `terms`, left to right within fixed-size chunks.
    ///
    /// An empty slice sums to zero in the current context's radix.
    pub fn sum(terms: &[Apfloat]) -> Result<Apfloat> {
        let ctx = Context::current();
        let radix = match terms.first() {
            Some(first) => first.radix(),
            None => return Ok(Apfloat::zero(ctx.radix())),
        };
        for term in &terms[1..] {
            terms[0].check_same_radix(term)?;
        }
        if terms.len() <= PARALLEL_THRESHOLD {
            return fold(terms, radix);
        }

        debug!(terms = terms.len(), chunk = CHUNK_SIZE, "parallel summation");
        let partials = ctx.install(|| {
            terms
                .par_chunks(CHUNK_SIZE)
                .map(|chunk| {
                    let _guard = ctx.enter();
                    ctx.check_cancelled()?;
                    fold(chunk, radix)
                })
                .collect::<Result<Vec<_>>>()
        })??;
        fold(&partials, radix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apnum_core::precision::INFINITE;
    use apnum_core::{ApnumError, ContextConfig};
    use std::sync::Arc;

    fn with_processors(n: usize) -> Arc<Context> {
        let mut config = ContextConfig::default();
        config.number_of_processors = n;
        Arc::new(Context::new(config).unwrap())
    }

    #[test]
    fn test_empty_and_single() {
        assert!(Apfloat::sum(&[]).unwrap().is_zero());
        let x = Apfloat::parse("1.5", 10).unwrap();
        assert_eq!(Apfloat::sum(std::slice::from_ref(&x)).unwrap(), x);
    }

    #[test]
    fn test_exact_sum_of_many_terms() {
        let terms: Vec<Apfloat> = (1..=1000).map(|i| Apfloat::from_i64(i, 10).unwrap()).collect();
        let sum = Apfloat::sum(&terms).unwrap();
        assert_eq!(sum, Apfloat::from_i64(500_500, 10).unwrap());
        assert_eq!(sum.precision(), INFINITE);
    }

    #[test]
    fn test_independent_of_pool_size() {
        let terms: Vec<Apfloat> = (1..=600)
            .map(|i| Apfloat::from_i64(i, 10).unwrap().divide_at(&Apfloat::from_i64(7, 10).unwrap(), 12).unwrap())
            .collect();
        let single = {
            let ctx = with_processors(1);
            let _guard = ctx.enter();
            Apfloat::sum(&terms).unwrap()
        };
        let many = {
            let ctx = with_processors(4);
            let _guard = ctx.enter();
            Apfloat::sum(&terms).unwrap()
        };
        assert_eq!(single, many);
        assert_eq!(single.precision(), many.precision());
    }

    #[test]
    fn test_radix_mismatch() {
        let terms = vec![Apfloat::from_i64(1, 10).unwrap(), Apfloat::from_i64(1, 2).unwrap()];
        assert!(matches!(Apfloat::sum(&terms), Err(ApnumError::InvalidArgument(_))));
    }

    #[test]
    fn test_cancelled() {
        let ctx = with_processors(2);
        let _guard = ctx.enter();
        ctx.cancellation().cancel();
        let terms: Vec<Apfloat> = (0..400).map(|i| Apfloat::from_i64(i, 10).unwrap()).collect();
        assert!(matches!(Apfloat::sum(&terms), Err(ApnumError::Interrupted)));
        ctx.reset();
        assert!(Apfloat::sum(&terms).is_ok());
    }
}
