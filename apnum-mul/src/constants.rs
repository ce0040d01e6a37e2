//! Algorithm thresholds and transform parameters.
//!
//! Sizes are counted in limbs of the working base, not in radix digits.

/// Upper bound of the limb base `B = radix^k`.
///
/// A convolution coefficient is at most `len · (B − 1)^2 < 2^23 · 2^60`,
/// which stays below the product of the three transform primes (about `2^89`).
pub const MAX_LIMB_BASE: u64 = 1 << 30;

/// Smaller operand length from which Karatsuba replaces schoolbook.
pub const KARATSUBA_THRESHOLD: usize = 32;

/// Smaller operand length from which the number-theoretic transform replaces Karatsuba.
pub const NTT_THRESHOLD: usize = 256;

/// Divisor length from which division multiplies by a Newton reciprocal
/// instead of running long division.
pub const NEWTON_THRESHOLD: usize = 64;

/// Longest transform all three primes support (`2^24`).
pub const MAX_TRANSFORM_LENGTH: usize = 1 << 24;

/// Butterfly stages below this transform length run sequentially even when
/// the multiplication is parallel.
pub const PARALLEL_TRANSFORM_MIN: usize = 1 << 12;

/// Karatsuba recursion spawns sub-products on the pool only above this length.
pub const PARALLEL_KARATSUBA_MIN: usize = 4 * KARATSUBA_THRESHOLD;
