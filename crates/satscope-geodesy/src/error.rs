//! Error types for coordinate conversions.

use std::fmt;

/// Errors that can occur when converting Cartesian coordinates to geodetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeodesyError {
    /// The position is exactly at Earth's centre, where latitude and
    /// altitude are undefined.
    DegeneratePosition,
    /// A coordinate component was NaN or infinite.
    NonFinite { axis: char },
}

impl fmt::Display for GeodesyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegeneratePosition => {
                write!(f, "degenerate position: point is at Earth's centre")
            }
            Self::NonFinite { axis } => {
                write!(f, "non-finite {axis} coordinate")
            }
        }
    }
}

impl std::error::Error for GeodesyError {}

/// Result type for coordinate conversions.
pub type GeodesyResult<T> = Result<T, GeodesyError>;
