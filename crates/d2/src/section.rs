//! Sections: the part of a bound a single bit can cover.
//!
//! A section is the run of bound points reachable from a start point within
//! one bit length, plus the geometry queries the placement algorithms need:
//! convex hull, convexity classification, width reduction and resampling.

use bitpave_core::robust::orient2d_filtered;
use bitpave_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::boundary::Bound;
use crate::geometry::{
    circle_segment_intersections, distance_point_to_line, segments_intersect, Segment2D, Vector2D,
    ACCEPTED_ERROR,
};

/// Signed-cross tolerance for the convexity test, in squared slice units.
/// Slightly concave corners produced by slicing noise still count as convex.
const CONVEXITY_TOLERANCE: f64 = -4.0;

/// Convexity classification of the beginning of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConvexType {
    /// The section starts with a convex run.
    Convex,
    /// The section starts concave.
    Concave,
}

/// An ordered run of points along a bound, starting at the current
/// placement start point.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Section {
    points: Vec<Vector2D>,
}

impl Section {
    /// Creates a section from ordered points.
    pub fn new(points: Vec<Vector2D>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::invalid_geometry(format!(
                "section needs at least 2 points, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    /// Extracts the section of `bound` reachable from `start` within
    /// `bit_length`, walking the bound in traversal order.
    ///
    /// The walk pushes bound vertices until a segment leaves the circle of
    /// radius `bit_length` around `start`; the exact circle crossing becomes
    /// the last point. If the whole bound stays inside the circle the
    /// section closes on itself (last point equals `start`).
    pub fn from_bound(bound: &Bound, start: Vector2D, bit_length: f64) -> Result<Self> {
        // Rebuild the bound segments with `start` forced to be a vertex.
        let mut segments: Vec<Segment2D> = Vec::with_capacity(bound.len() + 1);
        let mut start_index = None;
        for seg in bound.segments() {
            let on_seg = seg.distance_to_point(start) < ACCEPTED_ERROR;
            if on_seg && !start.approx_eq(seg.start) && !start.approx_eq(seg.end) {
                segments.push(Segment2D::new(seg.start, start));
                start_index = Some(segments.len());
                segments.push(Segment2D::new(start, seg.end));
            } else {
                if on_seg && start.approx_eq(seg.start) {
                    start_index = Some(segments.len());
                }
                segments.push(seg);
            }
        }
        let start_index = start_index.ok_or_else(|| {
            Error::invalid_boundary(format!(
                "start point ({}, {}) does not lie on the bound",
                start.x, start.y
            ))
        })?;

        let n = segments.len();
        let mut points = vec![segments[start_index].start];
        for offset in 0..n {
            let seg = &segments[(start_index + offset) % n];
            let hits = circle_segment_intersections(seg, start, bit_length, true);
            // Walking away from the start there is at most one crossing.
            if let Some(hit) = hits.first() {
                points.push(*hit);
                break;
            }
            points.push(seg.end);
        }

        Self::new(points)
    }

    /// The points of the section.
    pub fn points(&self) -> &[Vector2D] {
        &self.points
    }

    /// The first point, where the bit placement starts.
    pub fn start_point(&self) -> Vector2D {
        self.points[0]
    }

    /// True when the section wrapped around the whole bound.
    pub fn is_closed(&self) -> bool {
        self.points[0].approx_eq(self.points[self.points.len() - 1])
    }

    /// The section as segments, duplicate points removed first.
    pub fn segments(&self) -> Vec<Segment2D> {
        let unique = dedup_points(&self.points);
        unique.windows(2).map(|w| Segment2D::new(w[0], w[1])).collect()
    }

    /// The longest segment of the section.
    pub fn longest_segment(&self) -> Option<Segment2D> {
        self.segments()
            .into_iter()
            .max_by(|a, b| a.length().total_cmp(&b.length()))
    }

    /// The point with the largest direct distance from `from`.
    pub fn furthest_point(&self, from: Vector2D) -> Vector2D {
        let mut best = self.points[0];
        let mut max = -1.0;
        for &p in &self.points {
            let d = from.dist(p);
            if d > max {
                max = d;
                best = p;
            }
        }
        best
    }

    /// The point with the largest distance from the line through `seg`.
    pub fn furthest_point_from_segment(&self, seg: &Segment2D) -> Vector2D {
        let mut best = self.points[0];
        let mut max = -1.0;
        for &p in &self.points {
            let d = distance_point_to_line(p, seg);
            if d > max {
                max = d;
                best = p;
            }
        }
        best
    }

    /// The point with the largest projection onto `dir` measured from
    /// `ref_point`. `dir` is normalized first.
    pub fn furthest_point_along(&self, ref_point: Vector2D, dir: Vector2D) -> Vector2D {
        let dir = dir.normalized();
        let mut best = self.points[0];
        let mut max = f64::NEG_INFINITY;
        for &p in &self.points {
            let d = projected_distance(ref_point, p, dir);
            if d > max {
                max = d;
                best = p;
            }
        }
        best
    }

    /// Counts crossings between `seg` and the section's segments.
    pub fn intersection_count(&self, seg: &Segment2D) -> usize {
        self.segments()
            .iter()
            .filter(|s| segments_intersect(seg, s))
            .count()
    }

    /// True if `p` matches one of the section's points within tolerance.
    pub fn contains_point_approx(&self, p: Vector2D) -> bool {
        self.points.iter().any(|q| q.approx_eq(p))
    }

    /// True if every point of `other` matches a point of this section.
    pub fn contains_all_approx(&self, other: &[Vector2D]) -> bool {
        other.iter().all(|&p| self.contains_point_approx(p))
    }

    /// True when at least half the points lie left of the start point.
    pub fn mostly_oriented_left(&self) -> bool {
        let start_x = self.start_point().x;
        let left = self.points.iter().filter(|p| p.x < start_x).count();
        left * 2 >= self.points.len()
    }

    /// Angle in degrees of the line fitted through the points, weighted
    /// heavily towards the first point so the fit hugs the placement start.
    /// Returns a value in [-90, 90].
    pub fn orientation_angle(&self) -> f64 {
        let mut sw = 0.0;
        let mut swx = 0.0;
        let mut swy = 0.0;
        let mut swxx = 0.0;
        let mut swxy = 0.0;
        for (i, p) in self.points.iter().enumerate() {
            let w = if i == 0 { 1000.0 } else { 1.0 };
            sw += w;
            swx += w * p.x;
            swy += w * p.y;
            swxx += w * p.x * p.x;
            swxy += w * p.x * p.y;
        }
        let denom = sw * swxx - swx * swx;
        if denom.abs() < 1e-12 {
            // Vertical run of points.
            return 90.0;
        }
        let slope = (sw * swxy - swx * swy) / denom;
        slope.atan().to_degrees()
    }

    /// Gift-wrapping convex hull of the section's points.
    ///
    /// Starts at the leftmost point (lowest y on ties) and wraps
    /// counter-clockwise, deciding every turn with the exact orientation
    /// predicate. Collinear candidates resolve to the furthest point, so
    /// interior points of straight runs never become hull vertices. The
    /// returned section ends with a duplicate of its first point.
    pub fn hull(&self) -> Section {
        let points = dedup_points(&self.points);

        let mut start = 0;
        for (i, p) in points.iter().enumerate() {
            let s = points[start];
            if p.x < s.x - ACCEPTED_ERROR || ((p.x - s.x).abs() < ACCEPTED_ERROR && p.y < s.y) {
                start = i;
            }
        }

        let mut hull = vec![points[start]];
        let mut pivot = points[start];

        // Bounded iteration; degenerate inputs otherwise wrap forever.
        for _ in 0..points.len() + 1 {
            let mut next: Option<Vector2D> = None;
            for &p in &points {
                if p.approx_eq(pivot) {
                    continue;
                }
                let Some(q) = next else {
                    next = Some(p);
                    continue;
                };
                let turn = orient2d_filtered(pivot.tuple(), q.tuple(), p.tuple());
                // The candidate with no point to its right closes the wrap;
                // on a straight run keep the furthest point.
                if turn.is_cw() || (turn.is_collinear() && pivot.dist(p) > pivot.dist(q)) {
                    next = Some(p);
                }
            }
            let Some(next) = next else {
                break;
            };
            if next.approx_eq(hull[0]) {
                // Reuse the exact first point so the closure survives
                // floating-point noise.
                hull.push(hull[0]);
                break;
            }
            hull.push(next);
            pivot = next;
        }

        Section { points: hull }
    }

    /// Resamples the section to `count` evenly spaced points, optionally
    /// keeping the original vertices.
    pub fn resampled(&self, count: usize, keep_old: bool) -> Section {
        let points = &self.points;
        let lengths: Vec<f64> = points.windows(2).map(|w| w[0].dist(w[1])).collect();
        let total: f64 = lengths.iter().sum();
        if total < f64::EPSILON || count < 2 {
            return self.clone();
        }
        let spacing = total / (count - 1) as f64;

        let mut new_points: Vec<Vector2D> = Vec::with_capacity(count + points.len());
        if keep_old {
            new_points.push(points[0]);
        }

        let mut base_sum = 0.0;
        let mut new_sum = 0.0;
        let mut index = 0;
        for _ in 0..count {
            while index < points.len() - 2 && base_sum + lengths[index] <= new_sum {
                base_sum += lengths[index];
                index += 1;
                if keep_old {
                    new_points.push(points[index]);
                }
            }
            let dir = (points[index + 1] - points[index]).normalized();
            let candidate = points[index] + dir * (new_sum - base_sum);
            if !keep_old || !points.iter().any(|p| p.approx_eq(candidate)) {
                new_points.push(candidate);
            }
            new_sum += spacing;
        }
        new_points.push(points[points.len() - 1]);

        Section { points: new_points }
    }

    /// Successively truncates the section until a bit can cover it.
    ///
    /// The section is first resampled to 200 points (originals kept). Each
    /// round takes the hull's longest segment as the constraint segment and
    /// the hull point furthest from it as the constraint point; while the
    /// distance between them exceeds what a bit can span (minus
    /// `min_width_to_keep` for open sections), points are dropped from the
    /// end down to the nearest constraint feature.
    pub fn reduced(&self, bit_width: f64, min_width_to_keep: f64) -> Section {
        let mut section = self.resampled(200, true);

        loop {
            let closed = section.is_closed();
            let hull = section.hull();
            let Some(constraint) = hull.longest_segment() else {
                return section;
            };
            let furthest = hull.furthest_point_from_segment(&constraint);
            let width = distance_point_to_line(furthest, &constraint);

            let too_wide = if closed {
                width > bit_width
            } else {
                width > bit_width - min_width_to_keep
            };
            if !too_wide {
                return section;
            }

            let cut_points = [constraint.start, constraint.end, furthest];
            let cut_index = section
                .points
                .iter()
                .rposition(|p| cut_points.iter().any(|c| c.approx_eq(*p)));
            match cut_index {
                Some(i) if i >= 2 => section.points.truncate(i),
                _ => return section,
            }
        }
    }

    /// Classifies the start of the section as convex or concave and returns
    /// the section to place a bit on: the maximal convex run for a convex
    /// start, the full section otherwise.
    ///
    /// Convexity is measured against the part origin: sections of a part
    /// centered at (0, 0) form a pie slice with the origin, which is convex
    /// exactly when the border arc is. `half_window` is half a bit length;
    /// points within that distance of the start seed the test.
    pub fn convex_split(&self, half_window: f64) -> (ConvexType, Section) {
        let origin = Vector2D::zero();
        let start = self.start_point();

        let mut temp: Vec<Vector2D> = self.points.clone();
        temp.push(origin);

        let mut window = 0;
        for p in &temp {
            window += 1;
            if p.dist(start) >= half_window {
                break;
            }
        }

        if !is_convex(&temp[..window]) {
            return (ConvexType::Concave, self.clone());
        }

        let mut convex_run: Vec<Vector2D> = temp[..window].to_vec();
        convex_run.push(origin);
        let mut i = window;
        // Extend point by point while the pie slice stays convex. The first
        // point breaking convexity is kept, like the seed window keeps its
        // boundary point.
        while i < temp.len() - 1 {
            convex_run.insert(convex_run.len() - 1, temp[i]);
            i += 1;
            if !is_convex(&convex_run) {
                break;
            }
        }
        convex_run.retain(|p| !p.approx_eq(origin) || self.contains_point_approx(*p));

        match Section::new(convex_run) {
            Ok(section) => (ConvexType::Convex, section),
            Err(_) => (ConvexType::Convex, self.clone()),
        }
    }
}

/// Signed projection of `point` onto the unit direction `dir`, measured
/// from `ref_point`.
#[inline]
pub fn projected_distance(ref_point: Vector2D, point: Vector2D, dir: Vector2D) -> f64 {
    (point - ref_point).dot(dir)
}

/// Checks whether a closed point loop is convex, with the tolerance of
/// [`CONVEXITY_TOLERANCE`] on each signed cross product.
pub fn is_convex(points: &[Vector2D]) -> bool {
    let n = points.len();
    if n < 3 {
        return true;
    }
    let mut sign = false;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let z = (c - b).cross(a - b);
        let positive = z > CONVEXITY_TOLERANCE;
        if i == 0 {
            sign = positive;
        } else if sign != positive {
            return false;
        }
    }
    true
}

fn dedup_points(points: &[Vector2D]) -> Vec<Vector2D> {
    let mut unique: Vec<Vector2D> = Vec::with_capacity(points.len());
    for &p in points {
        if !unique.iter().any(|q| q.approx_eq(p)) {
            unique.push(p);
        }
    }
    unique
}
