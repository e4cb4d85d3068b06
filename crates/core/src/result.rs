//! Pavement result representation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of paving a single bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaveStatus {
    /// The pavement loop returned to its starting point.
    Complete,
    /// The per-bound bit ceiling was reached before closing the loop.
    Partial,
    /// A placement step failed; bits placed before the failure are kept.
    Failed,
}

impl PaveStatus {
    /// Returns true if the bound was fully paved.
    #[inline]
    pub fn is_complete(self) -> bool {
        matches!(self, PaveStatus::Complete)
    }
}

/// Bits placed along one bound, with the outcome of the loop.
///
/// Generic over the bit type so the core crate stays free of planar
/// geometry.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundPavement<B> {
    /// Bits placed along this bound, in placement order.
    pub bits: Vec<B>,

    /// Outcome of the pavement loop.
    pub status: PaveStatus,

    /// Error message when `status` is `Failed`.
    pub error: Option<String>,
}

impl<B> BoundPavement<B> {
    /// Creates a completed pavement.
    pub fn complete(bits: Vec<B>) -> Self {
        Self {
            bits,
            status: PaveStatus::Complete,
            error: None,
        }
    }

    /// Creates a partial pavement (bit ceiling reached).
    pub fn partial(bits: Vec<B>) -> Self {
        Self {
            bits,
            status: PaveStatus::Partial,
            error: None,
        }
    }

    /// Creates a failed pavement, keeping the bits placed so far.
    pub fn failed(bits: Vec<B>, error: impl Into<String>) -> Self {
        Self {
            bits,
            status: PaveStatus::Failed,
            error: Some(error.into()),
        }
    }
}

/// Result of paving all bounds of a slice.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaveResult<B> {
    /// One pavement per bound, in slice order.
    pub bounds: Vec<BoundPavement<B>>,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Strategy used for placement.
    pub strategy: String,

    /// Whether the run was cancelled early.
    pub cancelled: bool,
}

impl<B> PaveResult<B> {
    /// Creates a new empty result.
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            bounds: Vec::new(),
            computation_time_ms: 0,
            strategy: strategy.into(),
            cancelled: false,
        }
    }

    /// Returns true if every bound was fully paved.
    pub fn is_complete(&self) -> bool {
        self.bounds.iter().all(|b| b.status.is_complete())
    }

    /// Total number of bits placed across all bounds.
    pub fn placed_count(&self) -> usize {
        self.bounds.iter().map(|b| b.bits.len()).sum()
    }

    /// Iterates over all placed bits.
    pub fn all_bits(&self) -> impl Iterator<Item = &B> {
        self.bounds.iter().flat_map(|b| b.bits.iter())
    }
}

/// Summary statistics for a pavement result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaveSummary {
    /// Number of bounds paved.
    pub bounds_total: usize,
    /// Number of bounds fully paved.
    pub bounds_complete: usize,
    /// Total bits placed.
    pub bits_placed: usize,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Strategy used.
    pub strategy: String,
}

impl<B> From<&PaveResult<B>> for PaveSummary {
    fn from(result: &PaveResult<B>) -> Self {
        Self {
            bounds_total: result.bounds.len(),
            bounds_complete: result
                .bounds
                .iter()
                .filter(|b| b.status.is_complete())
                .count(),
            bits_placed: result.placed_count(),
            time_ms: result.computation_time_ms,
            strategy: result.strategy.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_new() {
        let result: PaveResult<u32> = PaveResult::new("deterministic");
        assert!(result.bounds.is_empty());
        assert!(result.is_complete());
        assert_eq!(result.placed_count(), 0);
    }

    #[test]
    fn test_result_statuses() {
        let mut result: PaveResult<u32> = PaveResult::new("deterministic");
        result.bounds.push(BoundPavement::complete(vec![1, 2, 3]));
        result.bounds.push(BoundPavement::partial(vec![4]));

        assert!(!result.is_complete());
        assert_eq!(result.placed_count(), 4);
        assert_eq!(result.all_bits().count(), 4);
    }

    #[test]
    fn test_failed_keeps_bits() {
        let pavement = BoundPavement::failed(vec![1, 2], "no usable intersection");
        assert_eq!(pavement.bits.len(), 2);
        assert_eq!(pavement.status, PaveStatus::Failed);
        assert!(pavement.error.is_some());
    }

    #[test]
    fn test_summary() {
        let mut result: PaveResult<u32> = PaveResult::new("genetic");
        result.bounds.push(BoundPavement::complete(vec![1, 2]));
        result.bounds.push(BoundPavement::failed(vec![3], "oops"));
        result.computation_time_ms = 42;

        let summary = PaveSummary::from(&result);
        assert_eq!(summary.bounds_total, 2);
        assert_eq!(summary.bounds_complete, 1);
        assert_eq!(summary.bits_placed, 3);
        assert_eq!(summary.time_ms, 42);
        assert_eq!(summary.strategy, "genetic");
    }
}
