//! Digit storage backends.
//!
//! Small sequences live in memory; once a sequence exceeds the configured
//! memory threshold the default backend spills it to a temporary file that
//! is read through a two-tier block cache. Stores are immutable and shared
//! by reference count, and a disk store deletes its file when dropped.

pub mod cache;
pub mod cleanup;
pub mod disk;
pub mod memory;
pub mod registry;
pub mod sequence;

pub use cache::BlockCache;
pub use cleanup::{cleanup, live_files};
pub use disk::DiskStore;
pub use memory::MemoryStore;
pub use registry::{lookup, names, DefaultBackend, DiskBackend, MemoryBackend};
pub use sequence::DigitSequence;
