//! # apnum-mul
//!
//! Multiplication engine of the apnum kernel.
//!
//! Digit strings are packed into little-endian limbs of base `radix^k` and
//! multiplied by schoolbook, Karatsuba, or a three-prime number-theoretic
//! transform with Chinese-remainder reconstruction, chosen by operand size.
//! Division multiplies by a Newton reciprocal for long divisors.
//!
//! Key types:
//! - [`MultiplicationEngine`]: size-driven dispatch under an execution context
//! - [`LimbBase`]: radix-to-limb packing
//! - [`Algorithm`]: the selected convolution strategy

pub mod carry;
pub mod constants;
pub mod crt;
pub mod division;
pub mod engine;
pub mod karatsuba;
pub mod limbs;
pub mod ntt;
pub mod schoolbook;

pub use engine::{select, Algorithm, MultiplicationEngine};
pub use limbs::{Limb, LimbBase};
