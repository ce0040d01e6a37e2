use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounding policy applied when digits are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Toward zero.
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// To nearest, ties away from zero.
    HalfUp,
    /// To nearest, ties toward zero.
    HalfDown,
    /// To nearest, ties to the even neighbour.
    HalfEven,
    /// Asserts the operation is exact; an error otherwise.
    Unnecessary,
}

/// Where the discarded digits sit relative to half a unit of the last kept digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remainder {
    Zero,
    BelowHalf,
    Half,
    AboveHalf,
}

impl RoundingMode {
    /// Decides whether the truncated magnitude must be incremented by one unit.
    ///
    /// Returns `None` for [`RoundingMode::Unnecessary`] when digits would be lost.
    pub fn increments(self, negative: bool, last_kept_odd: bool, remainder: Remainder) -> Option<bool> {
        if remainder == Remainder::Zero {
            return Some(false);
        }
        let inc = match self {
            RoundingMode::Up => true,
            RoundingMode::Down => false,
            RoundingMode::Ceiling => !negative,
            RoundingMode::Floor => negative,
            RoundingMode::HalfUp => remainder != Remainder::BelowHalf,
            RoundingMode::HalfDown => remainder == Remainder::AboveHalf,
            RoundingMode::HalfEven => match remainder {
                Remainder::AboveHalf => true,
                Remainder::Half => last_kept_odd,
                _ => false,
            },
            RoundingMode::Unnecessary => return None,
        };
        Some(inc)
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Unnecessary => "UNNECESSARY",
        };
        f.write_str(name)
    }
}
