//! # apnum-core
//!
//! Shared vocabulary of the apnum arbitrary-precision kernel.
//!
//! This crate defines:
//! - [`ApnumError`]: the error taxonomy every layer surfaces
//! - [`precision`]: pure scale/precision propagation rules
//! - [`DigitStore`] / [`DigitBackendFactory`]: the storage backend seam
//! - [`ContextConfig`]: tunables with a string property surface
//! - [`RoundingMode`]: rounding policies

pub mod backend;
pub mod config;
pub mod error;
pub mod precision;
pub mod rounding;

pub use backend::{DigitBackendFactory, DigitStore, StorageLocation};
pub use config::ContextConfig;
pub use error::{check_radix, ApnumError, Result};
pub use precision::{Extent, Precision, INFINITE, SCALE_ZERO};
pub use rounding::{Remainder, RoundingMode};
