//! # Bitpave Core
//!
//! Core abstractions for the bitpave boundary pavement engine.
//!
//! This crate provides the types shared by the planar pavement modules:
//! error handling, robust geometric predicates, paver configuration and
//! result representation.
//!
//! ## Core Components
//!
//! - **Configuration**: [`PaverConfig`] with builder-style setters
//! - **Strategy selection**: [`Strategy`] (deterministic or genetic)
//! - **Results**: [`PaveResult`], [`BoundPavement`], [`PaveStatus`]
//! - **Robust predicates**: [`robust::orient2d`] and friends
//!
//! ## Configuration
//!
//! ```rust
//! use bitpave_core::{PaverConfig, Strategy};
//!
//! let config = PaverConfig::new()
//!     .with_bit_length(120.0)
//!     .with_bit_width(24.0)
//!     .with_min_width_to_keep(5.0)
//!     .with_seed(42);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(Strategy::default(), Strategy::Deterministic);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod result;
pub mod robust;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use result::{BoundPavement, PaveResult, PaveStatus, PaveSummary};
pub use robust::{orient2d, orient2d_filtered, orient2d_raw, Orientation};
pub use solver::{PaverConfig, ProgressCallback, ProgressInfo, Strategy};
