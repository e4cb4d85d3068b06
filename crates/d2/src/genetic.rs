//! Genetic bit placement.
//!
//! Searches over two genes per bit, the abscissa of the bit edge on the
//! start point's normal and the bit angle. Each generation keeps the top
//! scorers, breeds averaged children and fills up with fresh random
//! solutions; candidates that do not cross the bound twice are discarded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bitpave_core::{Error, PaverConfig, Result};

use crate::bit::Bit2D;
use crate::boundary::{bit_contour_second_intersection, Bound};
use crate::geometry::Vector2D;
use crate::paver::{BitPlacer, Placement};
use crate::region::Region;
use crate::section::Section;

/// Maximum shift applied to a gene by one mutation.
const MUTATION_MAX_STRENGTH: f64 = 0.2;

/// Half-spread in degrees of the random angle around the section
/// orientation when seeding a solution.
const MAX_ANGLE: f64 = 179.0;

/// One candidate bit: an edge abscissa and an angle, measured from the
/// placement start point.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Offset of the bit edge along the normal through the start point,
    /// within `[0, bit_width]`.
    pub pos: f64,
    /// Unit vector along the bit.
    pub angle: Vector2D,
    /// Last computed fitness. Kept through mutation so selection can still
    /// rank a mutated solution by its pre-mutation score.
    pub score: f64,
    evaluated: bool,
}

impl Solution {
    /// Creates an unevaluated solution.
    pub fn new(pos: f64, angle: Vector2D) -> Self {
        Self {
            pos,
            angle: angle.normalized(),
            score: 0.0,
            evaluated: false,
        }
    }

    /// Builds the bit this solution encodes, anchored at `start`.
    pub fn bit(&self, start: Vector2D, config: &PaverConfig) -> Bit2D {
        let collinear = self.angle.normalized();
        let orthogonal = collinear.cross_z();
        let origin = start + orthogonal * self.pos + collinear * (config.bit_length_full() / 2.0)
            - orthogonal * (config.bit_width / 2.0);
        Bit2D::new(origin, collinear, config.bit_length_full(), config.bit_width)
    }

    /// Scores the solution, or returns `None` for an unusable bit (off the
    /// material, or not crossing the bound twice).
    ///
    /// The fitness balances the trimmed bit area against the border length
    /// covered, weighted by `length_penalty`.
    pub fn evaluate(
        &mut self,
        start: Vector2D,
        bound: &Bound,
        available: &Region,
        config: &PaverConfig,
    ) -> Option<f64> {
        if self.evaluated {
            return Some(self.score);
        }
        let mut bit = self.bit(start, config);
        let next_start = bit_contour_second_intersection(&bit, bound, start).ok()?;
        if !bit.trim(available) {
            return None;
        }

        let ratio = config.length_penalty as f64 / 100.0;
        let max_area = config.bit_length_full() * config.bit_width;
        let area_score = (1.0 - ratio) * bit.area() / max_area;
        let length_score = ratio * start.dist(next_start) / config.bit_length_full();

        self.score = area_score + length_score;
        self.evaluated = true;
        Some(self.score)
    }

    /// Mutates either the abscissa or the angle, and invalidates the cached
    /// evaluation.
    pub fn mutate(&mut self, rng: &mut StdRng, config: &PaverConfig) {
        if rng.gen::<f64>() < 0.5 {
            self.pos += (rng.gen::<f64>() * 2.0 - 1.0) * MUTATION_MAX_STRENGTH;
            self.pos = self.pos.clamp(0.0, config.bit_width);
        } else {
            self.angle = Vector2D::new(
                self.angle.x + (rng.gen::<f64>() * 2.0 - 1.0) * MUTATION_MAX_STRENGTH,
                self.angle.y + (rng.gen::<f64>() * 2.0 - 1.0) * MUTATION_MAX_STRENGTH,
            )
            .normalized();
        }
        self.evaluated = false;
    }
}

/// Evolves solutions for one bit placement.
pub struct Evolution<'a> {
    available: &'a Region,
    bound: &'a Bound,
    section: &'a Section,
    start: Vector2D,
    config: &'a PaverConfig,
}

impl<'a> Evolution<'a> {
    /// Creates an evolution for the placement starting at `start`.
    pub fn new(
        available: &'a Region,
        bound: &'a Bound,
        section: &'a Section,
        start: Vector2D,
        config: &'a PaverConfig,
    ) -> Self {
        Self {
            available,
            bound,
            section,
            start,
            config,
        }
    }

    /// Runs the configured number of generations and returns the best
    /// solution found across all of them.
    pub fn run(&self, rng: &mut StdRng) -> Result<Solution> {
        let pop_size = self.config.population_size;
        let mut solutions: Vec<Solution> = (0..pop_size)
            .map(|_| self.random_solution(rng))
            .collect();

        // Generation zero is scored too, so the first selection round ranks
        // real fitness values.
        solutions.retain_mut(|s| {
            s.evaluate(self.start, self.bound, self.available, self.config)
                .is_some()
        });
        if solutions.is_empty() {
            return Err(Error::NotEnoughPopulation(format!(
                "no viable solution in the initial population of {pop_size}, increase the population size"
            )));
        }
        solutions.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut best: Option<Solution> = Some(solutions[0].clone());

        for _ in 0..self.config.max_generations {
            for solution in solutions.iter_mut() {
                if rng.gen::<f64>() <= self.config.prob_mutation {
                    solution.mutate(rng, self.config);
                }
            }

            let mut ranked = solutions.clone();
            ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
            let selected = (ranked.len() as f64 * self.config.rank_selection) as usize;
            ranked.truncate(selected);

            let children = (pop_size as f64 * self.config.rank_reproduction) as usize;
            for _ in 0..children {
                let p1 = &solutions[rng.gen_range(0..solutions.len())];
                let p2 = &solutions[rng.gen_range(0..solutions.len())];
                ranked.push(Solution::new(
                    (p1.pos + p2.pos) / 2.0,
                    (p1.angle + p2.angle) * 0.5,
                ));
            }
            while ranked.len() < pop_size {
                ranked.push(self.random_solution(rng));
            }

            // Evaluate and drop the solutions whose bit misses the bound.
            ranked.retain_mut(|s| {
                s.evaluate(self.start, self.bound, self.available, self.config)
                    .is_some()
            });
            if ranked.is_empty() {
                return Err(Error::NotEnoughPopulation(format!(
                    "no viable solution in a population of {pop_size}, increase the population size"
                )));
            }
            ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
            if best.as_ref().is_none_or(|b| ranked[0].score > b.score) {
                best = Some(ranked[0].clone());
            }
            solutions = ranked;
        }

        best.ok_or_else(|| {
            Error::NotEnoughPopulation("evolution produced no viable solution".into())
        })
    }

    /// Random solution seeded around the section orientation.
    fn random_solution(&self, rng: &mut StdRng) -> Solution {
        let pos = rng.gen::<f64>() * self.config.bit_width;

        let mut angle_section = self.section.orientation_angle();
        if self.section.mostly_oriented_left() {
            angle_section -= angle_section.signum() * 180.0;
        }
        let dir = if rng.gen::<f64>() > 0.5 { 1.0 } else { -1.0 };
        let rotation = angle_section + rng.gen::<f64>() * MAX_ANGLE * dir;
        Solution::new(pos, Vector2D::from_angle_degrees(rotation))
    }
}

/// Bit placer backed by the genetic search.
///
/// Keeps its own copy of the material region and subtracts each accepted
/// bit, so later placements are scored against what is actually left.
pub struct GeneticPlacer {
    available: Region,
    config: PaverConfig,
    rng: StdRng,
}

impl GeneticPlacer {
    /// Creates a placer over the given material. `seed` fixes the random
    /// generator for reproducible runs.
    pub fn new(material: Region, config: PaverConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            available: material,
            config,
            rng,
        }
    }

    /// Material still available after the bits placed so far.
    pub fn available(&self) -> &Region {
        &self.available
    }
}

impl BitPlacer for GeneticPlacer {
    fn place_bit(
        &mut self,
        bound: &Bound,
        section: &Section,
        start: Vector2D,
    ) -> Result<Placement> {
        let evolution = Evolution::new(&self.available, bound, section, start, &self.config);
        let best = evolution.run(&mut self.rng)?;

        let mut bit = best.bit(start, &self.config);
        let next_start = bit_contour_second_intersection(&bit, bound, start)?;
        if !bit.trim(&self.available) {
            return Err(Error::invalid_geometry(
                "best solution's bit lies outside the material",
            ));
        }

        self.available = self.available.subtract(&bit.region());
        Ok(Placement::new(bit, next_start))
    }
}
