//! # apnum-arith
//!
//! Arbitrary-precision numbers over the apnum storage and multiplication kernel.
//!
//! Key types:
//! - [`Apfloat`]: real value `±0.d1 d2 … dn · r^scale` with finite or infinite precision
//! - [`Apint`]: integer-valued [`Apfloat`] with exact integer semantics
//! - [`Aprational`]: reduced fraction of two [`Apint`]s
//! - [`Apcomplex`]: pair of [`Apfloat`]s sharing one radix
//!
//! Every operation runs against [`apnum_exec::Context::current`], which
//! supplies the storage backend, the worker pool and the cancellation token.

pub mod apcomplex;
pub mod apfloat;
pub mod apint;
pub mod aprational;
mod digits;
pub mod format;
mod natural;
pub mod parse;
pub mod radix;
pub mod rounding;
pub mod sum;

pub use apcomplex::Apcomplex;
pub use apfloat::Apfloat;
pub use apint::Apint;
pub use aprational::Aprational;
