//! Error types for geometry generation.

use af_core::AfError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid shape parameters: {0}")]
    InvalidParameters(#[from] AfError),

    #[error("Contour needs at least {min} chordwise stations, got {got}")]
    TooFewStations { min: usize, got: usize },
}

pub type GeometryResult<T> = Result<T, GeometryError>;
