use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures detected before any thinning work begins. No partial
/// result is ever produced alongside one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ThinError {
    /// The minimum separation distance (or a grid cell size) was not a
    /// positive number.
    InvalidDistance(f64),

    /// A negative number of decimal places was requested for the precision
    /// reducer.
    InvalidPrecision(i32),

    /// The priority vector did not match the point count, or contained
    /// non-finite values.
    InvalidPriority(String),

    /// The number of trials was zero.
    InvalidTrialCount(u32),

    /// The exact target count exceeded the number of points, or was requested
    /// with a strategy that cannot honor it.
    InvalidTargetCount(String),
}

impl Display for ThinError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ThinError::InvalidDistance(d) => {
                write!(f, "separation distance must be positive, got {}", d)
            }
            ThinError::InvalidPrecision(p) => {
                write!(f, "rounding precision must not be negative, got {}", p)
            }
            ThinError::InvalidPriority(msg) => write!(f, "invalid priority values: {}", msg),
            ThinError::InvalidTrialCount(t) => {
                write!(f, "trial count must be at least 1, got {}", t)
            }
            ThinError::InvalidTargetCount(msg) => write!(f, "invalid target count: {}", msg),
        }
    }
}

impl Error for ThinError {}
