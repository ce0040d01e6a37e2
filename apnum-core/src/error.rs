use thiserror::Error;

/// Every failure the kernel surfaces to callers.
///
/// No variant is retried inside the kernel. Higher layers may re-classify
/// an error but must not swallow it.
#[derive(Error, Debug)]
pub enum ApnumError {
    /// Malformed literal, radix outside [2, 36], unterminated complex parentheses.
    #[error("Format error: {0}")]
    Format(String),
    /// Non-positive precision, mismatched radixes, zero denominator.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Division by zero, 0^0, root of a negative value, missing modular inverse.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),
    /// Scale or exponent magnitude outside the representable range.
    #[error("Overflow: {0}")]
    Overflow(String),
    /// An exact result would need unboundedly many digits.
    #[error("Infinite expansion: {0}")]
    InfiniteExpansion(String),
    /// Cooperative cancellation was observed during a long computation.
    #[error("Computation interrupted")]
    Interrupted,
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApnumError>;

impl ApnumError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    pub fn infinite_expansion(msg: impl Into<String>) -> Self {
        Self::InfiniteExpansion(msg.into())
    }
}

/// Rejects radixes outside [2, 36].
pub fn check_radix(radix: u32) -> Result<u32> {
    if (2..=36).contains(&radix) {
        Ok(radix)
    } else {
        Err(ApnumError::format(format!("Invalid radix {}; radix must be between 2 and 36", radix)))
    }
}
