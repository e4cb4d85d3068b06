//! Slice bounds and contour scanning.
//!
//! A [`Bound`] is one closed contour of a sliced layer, stored as an ordered
//! point loop. The first point is not repeated at the end; the closing
//! segment is implied and all traversals use modular indexing. Traversal
//! order keeps the material on the left side of each segment.

use std::collections::HashMap;

use bitpave_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bit::Bit2D;
use crate::geometry::{point_on_segment, segment_intersection, Segment2D, Vector2D, ACCEPTED_ERROR};
use crate::region::Region;

/// A closed, ordered contour of a slice.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bound {
    points: Vec<Vector2D>,
}

impl Bound {
    /// Creates a bound from an ordered point loop.
    ///
    /// A duplicated closing point is dropped, as are consecutive duplicate
    /// points. At least three distinct points must remain.
    pub fn new(points: Vec<Vector2D>) -> Result<Self> {
        let mut cleaned: Vec<Vector2D> = Vec::with_capacity(points.len());
        for p in points {
            if cleaned.last().is_some_and(|last| last.approx_eq(p)) {
                continue;
            }
            cleaned.push(p);
        }
        if cleaned.len() > 1 && cleaned[0].approx_eq(cleaned[cleaned.len() - 1]) {
            cleaned.pop();
        }
        if cleaned.len() < 3 {
            return Err(Error::invalid_boundary(format!(
                "bound needs at least 3 distinct points, got {}",
                cleaned.len()
            )));
        }
        Ok(Self { points: cleaned })
    }

    /// The ordered points of the bound. The closing segment back to the
    /// first point is implied.
    pub fn points(&self) -> &[Vector2D] {
        &self.points
    }

    /// Number of points (= number of segments).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed bound.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point the pavement loop starts from.
    pub fn start_point(&self) -> Vector2D {
        self.points[0]
    }

    /// Segment `i`, with the closing segment at index `len() - 1`.
    pub fn segment(&self, i: usize) -> Segment2D {
        let n = self.points.len();
        Segment2D::new(self.points[i % n], self.points[(i + 1) % n])
    }

    /// All segments of the bound in traversal order, closing segment last.
    pub fn segments(&self) -> Vec<Segment2D> {
        (0..self.points.len()).map(|i| self.segment(i)).collect()
    }

    /// Total length of the contour.
    pub fn perimeter(&self) -> f64 {
        (0..self.points.len()).map(|i| self.segment(i).length()).sum()
    }

    /// The area enclosed by this contour alone.
    pub fn region(&self) -> Region {
        Region::from_points(&self.points)
    }

    /// Re-anchors the loop so it starts at the rightmost point (largest x).
    ///
    /// Slicer output starts contours at an arbitrary vertex; anchoring at
    /// an extreme point makes pavement runs reproducible.
    pub fn rearranged_at_rightmost(mut self) -> Self {
        let mut best = 0;
        for (i, p) in self.points.iter().enumerate() {
            if p.x > self.points[best].x {
                best = i;
            }
        }
        self.points.rotate_left(best);
        self
    }
}

/// All closed contours of one sliced layer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slice {
    bounds: Vec<Bound>,
}

impl Slice {
    /// Creates a slice from already ordered bounds.
    pub fn from_bounds(bounds: Vec<Bound>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(Error::invalid_boundary("slice has no bounds"));
        }
        Ok(Self { bounds })
    }

    /// Assembles a slice from the raw, unordered segments a slicer emits.
    ///
    /// Segments are chained end to start by endpoint proximity; each closed
    /// chain becomes one bound, re-anchored at its rightmost point. Open
    /// chains mean the slicer output is broken and are rejected.
    pub fn from_segments(segments: &[Segment2D]) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::invalid_boundary("no segments to assemble"));
        }

        // Index segment start points on a tolerance grid.
        let mut by_start: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, seg) in segments.iter().enumerate() {
            by_start.entry(grid_key(seg.start)).or_default().push(i);
        }

        let mut used = vec![false; segments.len()];
        let mut bounds = Vec::new();

        for first in 0..segments.len() {
            if used[first] {
                continue;
            }
            used[first] = true;
            let mut points = vec![segments[first].start];
            let mut cursor = segments[first].end;
            let origin = segments[first].start;

            loop {
                if cursor.approx_eq(origin) {
                    bounds.push(Bound::new(points)?.rearranged_at_rightmost());
                    break;
                }
                let next = by_start
                    .get(&grid_key(cursor))
                    .and_then(|candidates| {
                        candidates
                            .iter()
                            .copied()
                            .find(|&i| !used[i] && segments[i].start.approx_eq(cursor))
                    })
                    .ok_or_else(|| {
                        Error::invalid_boundary(format!(
                            "open contour: no segment continues from ({}, {})",
                            cursor.x, cursor.y
                        ))
                    })?;
                used[next] = true;
                points.push(segments[next].start);
                cursor = segments[next].end;
            }
        }

        Self::from_bounds(bounds)
    }

    /// The bounds of this slice.
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    /// The material of the layer as one region. Inner contours carve holes
    /// under the even-odd fill rule.
    pub fn material_region(&self) -> Region {
        Region::from_contours(
            self.bounds
                .iter()
                .map(|b| b.points.iter().map(|p| p.array()).collect())
                .collect(),
        )
    }
}

fn grid_key(p: Vector2D) -> (i64, i64) {
    // Cell size one order above the point tolerance, so approx-equal points
    // land in the same cell in practice.
    let cell = ACCEPTED_ERROR * 10.0;
    ((p.x / cell).round() as i64, (p.y / cell).round() as i64)
}

/// Checks whether `a` comes before `b` when walking the bound from its
/// first point.
pub fn is_before_on_bound(a: Vector2D, b: Vector2D, bound: &Bound) -> bool {
    for seg in bound.segments() {
        let has_a = point_on_segment(a, &seg);
        let has_b = point_on_segment(b, &seg);
        if has_a && has_b {
            return seg.start.dist_squared(a) < seg.start.dist_squared(b);
        }
        if has_a {
            return true;
        }
        if has_b {
            return false;
        }
    }
    false
}

/// Finds the first crossing between a bit's sides and the bound, scanning
/// the bound in traversal order from a segment that starts outside the bit.
///
/// Starting outside the bit footprint guarantees the reported crossing is
/// where the bound enters the bit, not where it leaves.
pub fn bit_contour_first_intersection(bit: &Bit2D, bound: &Bound) -> Option<Vector2D> {
    let footprint = bit.footprint();
    let n = bound.len();

    let start_index = (0..n).find(|&i| !footprint.contains(bound.segment(i).start))?;
    let bit_sides = bit.side_segments();

    for offset in 0..n {
        let seg = bound.segment((start_index + offset) % n);
        let mut best: Option<(f64, Vector2D)> = None;
        for side in &bit_sides {
            if let Some(p) = segment_intersection(side, &seg) {
                let d2 = seg.start.dist_squared(p);
                if best.is_none_or(|(bd, _)| d2 < bd) {
                    best = Some((d2, p));
                }
            }
        }
        if let Some((_, p)) = best {
            return Some(p);
        }
    }
    None
}

/// Finds the next start point after placing a bit: the second crossing
/// between the bit's sides and the bound, in bound traversal order.
///
/// Crossing counts observed in practice:
/// - fewer than 2: the bit does not straddle the bound, placement failed
/// - exactly 2: the usual case, the second crossing is where the bound
///   leaves the bit
/// - exactly 3: a bit side is tangent to the bound; when the first crossing
///   lies before the current start point it belongs to the previous bit,
///   so the third crossing is the exit
pub fn bit_contour_second_intersection(
    bit: &Bit2D,
    bound: &Bound,
    start: Vector2D,
) -> Result<Vector2D> {
    let bit_sides = bit.side_segments();
    let mut intersections: Vec<Vector2D> = Vec::new();

    for seg in bound.segments() {
        let mut hits: Vec<Vector2D> = bit_sides
            .iter()
            .filter_map(|side| segment_intersection(side, &seg))
            .collect();
        // Several bit sides can cross one contour segment; keep them in
        // traversal order.
        hits.sort_by(|a, b| {
            seg.start
                .dist_squared(*a)
                .total_cmp(&seg.start.dist_squared(*b))
        });
        for p in hits {
            if !intersections.iter().any(|q| q.approx_eq(p)) {
                intersections.push(p);
            }
        }
    }

    if intersections.len() < 2 {
        return Err(Error::NoIntersection(format!(
            "bit crosses the bound {} time(s), need at least 2",
            intersections.len()
        )));
    }

    if intersections.len() == 3 && is_before_on_bound(intersections[0], start, bound) {
        return Ok(intersections[2]);
    }
    Ok(intersections[1])
}
