//! Paver configuration and strategy selection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Bit placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Geometric placement (fast, deterministic): convex sections get a
    /// chord-aligned bit, concave sections a tangent bit.
    #[default]
    Deterministic,
    /// Genetic search over bit position and orientation (slower, handles
    /// irregular borders better).
    Genetic,
}

impl Strategy {
    /// Returns a short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Deterministic => "deterministic",
            Strategy::Genetic => "genetic",
        }
    }
}

/// Configuration for the border paver.
///
/// All lengths are expressed in the same unit as the slice coordinates
/// (millimeters for typical slicer output).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaverConfig {
    /// Cutting length of a bit.
    pub bit_length: f64,

    /// Width of a bit.
    pub bit_width: f64,

    /// Extra non-cutting holding length appended to a bit. The full bit
    /// footprint is `bit_length + holding_length`.
    pub holding_length: f64,

    /// Minimum width of material a trimmed bit must keep to be worth placing.
    pub min_width_to_keep: f64,

    /// Ceiling on the number of bits placed along a single bound.
    pub max_bits_per_bound: usize,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Seed for the genetic strategy's random generator. `None` seeds from
    /// system entropy.
    pub seed: Option<u64>,

    // Genetic strategy parameters
    /// Population size per placement.
    pub population_size: usize,

    /// Number of generations per placement.
    pub max_generations: u32,

    /// Weight (0 - 100) of covered border length versus covered area in the
    /// fitness score.
    pub length_penalty: u32,

    /// Probability for a solution to mutate each generation (0.0 - 1.0).
    pub prob_mutation: f64,

    /// Fraction of the previous generation kept by selection (0.0 - 1.0).
    pub rank_selection: f64,

    /// Fraction of the population produced by crossover (0.0 - 1.0).
    pub rank_reproduction: f64,
}

impl Default for PaverConfig {
    fn default() -> Self {
        Self {
            bit_length: 120.0,
            bit_width: 24.0,
            holding_length: 0.0,
            min_width_to_keep: 5.0,
            max_bits_per_bound: 100,
            time_limit_ms: 0,
            seed: None,
            population_size: 100,
            max_generations: 20,
            length_penalty: 50,
            prob_mutation: 0.1,
            rank_selection: 0.2,
            rank_reproduction: 0.5,
        }
    }
}

impl PaverConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full bit footprint length, cutting part plus holding part.
    #[inline]
    pub fn bit_length_full(&self) -> f64 {
        self.bit_length + self.holding_length
    }

    /// Sets the bit cutting length.
    pub fn with_bit_length(mut self, length: f64) -> Self {
        self.bit_length = length;
        self
    }

    /// Sets the bit width.
    pub fn with_bit_width(mut self, width: f64) -> Self {
        self.bit_width = width;
        self
    }

    /// Sets the holding length.
    pub fn with_holding_length(mut self, length: f64) -> Self {
        self.holding_length = length;
        self
    }

    /// Sets the minimum width of material to keep.
    pub fn with_min_width_to_keep(mut self, width: f64) -> Self {
        self.min_width_to_keep = width;
        self
    }

    /// Sets the per-bound bit ceiling.
    pub fn with_max_bits_per_bound(mut self, max: usize) -> Self {
        self.max_bits_per_bound = max;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the random seed for reproducible genetic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the genetic population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of genetic generations.
    pub fn with_max_generations(mut self, generations: u32) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the length penalty weight (clamped to 0 - 100).
    pub fn with_length_penalty(mut self, penalty: u32) -> Self {
        self.length_penalty = penalty.min(100);
        self
    }

    /// Sets the mutation probability.
    pub fn with_prob_mutation(mut self, prob: f64) -> Self {
        self.prob_mutation = prob.clamp(0.0, 1.0);
        self
    }

    /// Sets the selection fraction.
    pub fn with_rank_selection(mut self, rank: f64) -> Self {
        self.rank_selection = rank.clamp(0.0, 1.0);
        self
    }

    /// Sets the reproduction fraction.
    pub fn with_rank_reproduction(mut self, rank: f64) -> Self {
        self.rank_reproduction = rank.clamp(0.0, 1.0);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.bit_length <= 0.0 || self.bit_width <= 0.0 {
            return Err(Error::invalid_geometry(format!(
                "bit dimensions must be positive, got {} x {}",
                self.bit_length, self.bit_width
            )));
        }
        if self.holding_length < 0.0 {
            return Err(Error::invalid_geometry(
                "holding length must be non-negative",
            ));
        }
        if self.min_width_to_keep < 0.0 || self.min_width_to_keep >= self.bit_width {
            return Err(Error::invalid_geometry(format!(
                "min width to keep must be in [0, bit width), got {}",
                self.min_width_to_keep
            )));
        }
        if self.max_bits_per_bound == 0 {
            return Err(Error::invalid_geometry(
                "max bits per bound must be at least 1",
            ));
        }
        if self.population_size < 2 {
            return Err(Error::invalid_geometry(
                "population size must be at least 2",
            ));
        }
        if self.length_penalty > 100 {
            return Err(Error::invalid_geometry(format!(
                "length penalty must be in [0, 100], got {}",
                self.length_penalty
            )));
        }
        if !(0.0..=1.0).contains(&self.prob_mutation)
            || !(0.0..=1.0).contains(&self.rank_selection)
            || !(0.0..=1.0).contains(&self.rank_reproduction)
        {
            return Err(Error::invalid_geometry(
                "genetic rates must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Progress callback for long-running pavement runs.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information reported while paving.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Index of the bound currently being paved.
    pub bound_index: usize,
    /// Total number of bounds in the slice.
    pub total_bounds: usize,
    /// Bits placed on the current bound so far.
    pub bits_placed: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the paver is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a new progress info marked as running.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the bound position.
    pub fn with_bound(mut self, index: usize, total: usize) -> Self {
        self.bound_index = index;
        self.total_bounds = total;
        self
    }

    /// Sets the number of bits placed.
    pub fn with_bits_placed(mut self, placed: usize) -> Self {
        self.bits_placed = placed;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Marks the run as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PaverConfig::default();
        assert_eq!(config.bit_length, 120.0);
        assert_eq!(config.bit_width, 24.0);
        assert_eq!(config.bit_length_full(), 120.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PaverConfig::new()
            .with_bit_length(100.0)
            .with_bit_width(20.0)
            .with_holding_length(10.0)
            .with_seed(42)
            .with_length_penalty(150);

        assert_eq!(config.bit_length_full(), 110.0);
        assert_eq!(config.seed, Some(42));
        // clamped
        assert_eq!(config.length_penalty, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        assert!(PaverConfig::new().with_bit_width(0.0).validate().is_err());
        assert!(PaverConfig::new()
            .with_min_width_to_keep(30.0)
            .validate()
            .is_err());
        assert!(PaverConfig::new()
            .with_population_size(1)
            .validate()
            .is_err());

        let mut config = PaverConfig::new();
        config.max_bits_per_bound = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategy_name() {
        assert_eq!(Strategy::Deterministic.name(), "deterministic");
        assert_eq!(Strategy::Genetic.name(), "genetic");
        assert_eq!(Strategy::default(), Strategy::Deterministic);
    }
}
