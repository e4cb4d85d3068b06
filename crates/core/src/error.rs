//! Error types for the bitpave engine.

use thiserror::Error;

/// Errors that can occur during pavement operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The boundary (slice bound) is invalid or degenerate.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// The geometry is invalid (e.g., too few points, zero-length segment).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A placed bit does not cross the bound often enough to derive the
    /// next start point.
    #[error("No usable intersection: {0}")]
    NoIntersection(String),

    /// The genetic population collapsed below a workable size.
    #[error("Not enough population: {0}")]
    NotEnoughPopulation(String),

    /// Internal algorithm error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for bitpave operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an invalid boundary error.
    pub fn invalid_boundary(msg: impl Into<String>) -> Self {
        Error::InvalidBoundary(msg.into())
    }

    /// Creates an invalid geometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Error::InvalidGeometry(msg.into())
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}
