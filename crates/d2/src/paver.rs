//! Border pavement orchestration.
//!
//! [`BorderPaver`] walks every bound of a slice and places bits one after
//! another along the border, each placement starting where the previous bit
//! left the bound. Bounds are paved in parallel; each gets its own placer
//! so the genetic strategy can keep per-bound state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use bitpave_core::{
    BoundPavement, Error, PaveResult, PaverConfig, ProgressCallback, ProgressInfo, Result,
    Strategy,
};

use crate::bit::Bit2D;
use crate::boundary::{bit_contour_second_intersection, Bound, Slice};
use crate::convex;
use crate::genetic::GeneticPlacer;
use crate::geometry::Vector2D;
use crate::region::Region;
use crate::section::{ConvexType, Section};
use crate::tangence;

/// A placed bit together with the point where the next placement starts.
#[derive(Debug, Clone)]
pub struct Placement {
    /// The placed, trimmed bit.
    pub bit: Bit2D,
    /// Where the next bit starts on the bound.
    pub next_start: Vector2D,
}

impl Placement {
    /// Creates a placement.
    pub fn new(bit: Bit2D, next_start: Vector2D) -> Self {
        Self { bit, next_start }
    }
}

/// Places one bit at a time along a bound.
pub trait BitPlacer {
    /// Places the next bit for the section starting at `start`.
    fn place_bit(&mut self, bound: &Bound, section: &Section, start: Vector2D)
        -> Result<Placement>;
}

/// Geometric placer: convex runs get a hull-aligned bit, concave runs a
/// tangent bit.
pub struct DeterministicPlacer {
    material: Region,
    config: PaverConfig,
}

impl DeterministicPlacer {
    /// Creates a placer working against the given material region.
    pub fn new(material: Region, config: PaverConfig) -> Self {
        Self { material, config }
    }
}

impl BitPlacer for DeterministicPlacer {
    fn place_bit(
        &mut self,
        bound: &Bound,
        section: &Section,
        start: Vector2D,
    ) -> Result<Placement> {
        let (kind, run) = section.convex_split(self.config.bit_length / 2.0);
        match kind {
            ConvexType::Convex => convex::place(section, &self.material, &self.config),
            ConvexType::Concave => {
                let mut bit = tangence::place(&run, start, kind, &self.config)?;
                if !bit.trim(&self.material) {
                    return Err(Error::invalid_geometry(
                        "tangent bit lies entirely outside the material",
                    ));
                }
                let next_start = bit_contour_second_intersection(&bit, bound, start)?;
                Ok(Placement::new(bit, next_start))
            }
        }
    }
}

/// Paves the borders of slices with bits.
pub struct BorderPaver {
    config: PaverConfig,
    strategy: Strategy,
    cancelled: Arc<AtomicBool>,
}

impl BorderPaver {
    /// Creates a paver with the given configuration and the deterministic
    /// strategy.
    pub fn new(config: PaverConfig) -> Self {
        Self {
            config,
            strategy: Strategy::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Selects the placement strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Handle to cancel a running pavement from another thread.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Paves every bound of the slice.
    pub fn pave(&self, slice: &Slice) -> Result<PaveResult<Bit2D>> {
        self.pave_with_progress(slice, None)
    }

    /// Paves every bound of the slice, reporting progress after each bound.
    pub fn pave_with_progress(
        &self,
        slice: &Slice,
        progress: Option<ProgressCallback>,
    ) -> Result<PaveResult<Bit2D>> {
        self.config.validate()?;

        let started = Instant::now();
        let deadline = (self.config.time_limit_ms > 0)
            .then(|| started + Duration::from_millis(self.config.time_limit_ms));

        let material = slice.material_region();
        let total = slice.bounds().len();
        let placed = AtomicUsize::new(0);

        let bounds: Vec<BoundPavement<Bit2D>> = slice
            .bounds()
            .par_iter()
            .enumerate()
            .map(|(index, bound)| {
                let pavement = self.pave_bound(index, bound, &material, deadline);
                let placed_total =
                    placed.fetch_add(pavement.bits.len(), Ordering::Relaxed) + pavement.bits.len();
                if let Some(cb) = &progress {
                    cb(ProgressInfo::new()
                        .with_bound(index, total)
                        .with_bits_placed(placed_total)
                        .with_elapsed(started.elapsed().as_millis() as u64));
                }
                pavement
            })
            .collect();

        let mut result = PaveResult::new(self.strategy.name());
        result.bounds = bounds;
        result.cancelled = self.cancelled.load(Ordering::Relaxed);
        result.computation_time_ms = started.elapsed().as_millis() as u64;

        if let Some(cb) = &progress {
            cb(ProgressInfo::new()
                .with_bound(total, total)
                .with_bits_placed(result.placed_count())
                .with_elapsed(result.computation_time_ms)
                .finished());
        }
        Ok(result)
    }

    fn make_placer(&self, bound_index: usize, material: &Region) -> Box<dyn BitPlacer> {
        match self.strategy {
            Strategy::Deterministic => Box::new(DeterministicPlacer::new(
                material.clone(),
                self.config.clone(),
            )),
            Strategy::Genetic => {
                // Per-bound seed so parallel bounds stay reproducible.
                let seed = self
                    .config
                    .seed
                    .map(|s| s.wrapping_add(bound_index as u64));
                Box::new(GeneticPlacer::new(
                    material.clone(),
                    self.config.clone(),
                    seed,
                ))
            }
        }
    }

    fn pave_bound(
        &self,
        index: usize,
        bound: &Bound,
        material: &Region,
        deadline: Option<Instant>,
    ) -> BoundPavement<Bit2D> {
        let mut placer = self.make_placer(index, material);
        let very_first = bound.start_point();
        let mut next_start = very_first;
        let mut bits: Vec<Bit2D> = Vec::new();

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                return BoundPavement::partial(bits);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return BoundPavement::partial(bits);
            }

            let section = match Section::from_bound(bound, next_start, self.config.bit_length) {
                Ok(section) => section,
                Err(e) => return BoundPavement::failed(bits, e.to_string()),
            };

            match placer.place_bit(bound, &section, next_start) {
                Ok(placement) => {
                    bits.push(placement.bit);
                    next_start = placement.next_start;
                }
                Err(e) => return BoundPavement::failed(bits, e.to_string()),
            }

            // The bound is covered once a section wraps back to the very
            // first start point, or the whole bound fits in one section.
            let covered = (section.contains_point_approx(very_first) && bits.len() > 1)
                || section.contains_all_approx(bound.points())
                || next_start.approx_eq(very_first);
            if covered {
                return BoundPavement::complete(bits);
            }
            if bits.len() >= self.config.max_bits_per_bound {
                return BoundPavement::partial(bits);
            }
        }
    }
}
