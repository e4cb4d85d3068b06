//! # Bitpave 2D
//!
//! 2D border pavement for the Bitpave slicing engine.
//!
//! This crate covers the borders of planar slices with fixed-width
//! rectangular bits, following the bound geometry bit by bit.
//!
//! ## Features
//!
//! - Slice bounds assembled from raw segment soups
//! - Deterministic placement: hull-aligned bits on convex runs, tangent
//!   bits on concave runs
//! - Genetic placement searching bit position and angle
//! - Bit trimming against the material still available
//! - Parallel pavement of independent bounds
//!
//! ## Quick Start
//!
//! ```rust
//! use bitpave_d2::{Bound, BorderPaver, PaverConfig, Slice, Vector2D};
//!
//! // A square slice with a single outer bound.
//! let bound = Bound::new(vec![
//!     Vector2D::new(0.0, 0.0),
//!     Vector2D::new(200.0, 0.0),
//!     Vector2D::new(200.0, 200.0),
//!     Vector2D::new(0.0, 200.0),
//! ]).unwrap();
//! let slice = Slice::from_bounds(vec![bound]).unwrap();
//!
//! let config = PaverConfig::new()
//!     .with_bit_length(120.0)
//!     .with_bit_width(24.0);
//!
//! let paver = BorderPaver::new(config);
//! let result = paver.pave(&slice).unwrap();
//!
//! println!("Placed {} bits in {} ms",
//!     result.placed_count(),
//!     result.computation_time_ms);
//! ```

pub mod bit;
pub mod boundary;
pub mod convex;
pub mod genetic;
pub mod geometry;
pub mod paver;
pub mod region;
pub mod section;
pub mod tangence;

// Re-exports
pub use bit::Bit2D;
pub use bitpave_core::{
    BoundPavement, Error, PaveResult, PaveStatus, PaveSummary, PaverConfig, ProgressCallback,
    ProgressInfo, Result, Strategy,
};
pub use boundary::{
    bit_contour_first_intersection, bit_contour_second_intersection, Bound, Slice,
};
pub use genetic::{Evolution, GeneticPlacer, Solution};
pub use geometry::{Segment2D, Vector2D};
pub use paver::{BitPlacer, BorderPaver, DeterministicPlacer, Placement};
pub use region::Region;
pub use section::{ConvexType, Section};
