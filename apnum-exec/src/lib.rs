//! # apnum-exec
//!
//! Execution context of the apnum kernel.
//!
//! Key types:
//! - [`Context`]: configuration, backend factory, worker pool and cancellation token
//! - [`ContextGuard`]: thread-scoped override of the process-wide default
//! - [`CancellationToken`]: cooperative interruption of long computations

pub mod cancel;
pub mod context;

pub use cancel::CancellationToken;
pub use context::{Context, ContextGuard};
