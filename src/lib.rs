//! # apnum
//!
//! Arbitrary-precision arithmetic in any radix from 2 to 36.
//!
//! This crate re-exports the workspace:
//! - [`apnum_core`]: errors, precision model, rounding modes, configuration
//! - [`apnum_storage`]: in-memory and disk-spilling digit storage
//! - [`apnum_exec`]: execution context, worker pool, cancellation
//! - [`apnum_mul`]: limb multiplication and division engine
//! - [`apnum_arith`]: [`Apfloat`], [`Apint`], [`Aprational`], [`Apcomplex`]
//!
//! ```
//! use apnum::{Apcomplex, Apfloat};
//!
//! let q = Apcomplex::parse("(-7,22)", 10)?.divide(&Apcomplex::parse("(2,3)", 10)?)?;
//! assert_eq!(q.to_string_with(true)?, "(4, 5)");
//!
//! let third = Apfloat::parse("1", 10)?.with_precision(10)?.divide(&Apfloat::parse("3", 10)?)?;
//! assert_eq!(third.to_string_with(true)?, "0.3333333333");
//! # Ok::<(), apnum::ApnumError>(())
//! ```

pub use apnum_arith::{Apcomplex, Apfloat, Apint, Aprational};
pub use apnum_core::{ApnumError, ContextConfig, Precision, Result, RoundingMode, StorageLocation, INFINITE};
pub use apnum_exec::{CancellationToken, Context, ContextGuard};

pub use apnum_arith as arith;
pub use apnum_core as core;
pub use apnum_exec as exec;
pub use apnum_mul as mul;
pub use apnum_storage as storage;
