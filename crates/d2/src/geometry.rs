//! 2D geometry primitives for boundary pavement.
//!
//! Points, segments and the small set of intersection queries the pavement
//! algorithms are built on. Coordinates are `f64` in slice units.

use bitpave_core::robust::{orient2d_filtered, Orientation};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance below which two points are treated as equal.
///
/// Slicer output carries about five significant decimals, so geometric
/// comparisons share this tolerance.
pub const ACCEPTED_ERROR: f64 = 1e-5;

/// A 2D point or direction vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Vector2D {
    /// Creates a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector at the given angle in degrees, measured from the x axis.
    pub fn from_angle_degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self::new(radians.cos(), radians.sin())
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the cross product.
    #[inline]
    pub fn cross(self, other: Vector2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotates this vector by the rotation that maps (1, 0) onto `unit`
    /// (complex multiplication). `unit` is expected to be normalized.
    #[inline]
    pub fn rotate(self, unit: Vector2D) -> Self {
        Self::new(
            self.x * unit.x - self.y * unit.y,
            self.x * unit.y + self.y * unit.x,
        )
    }

    /// This vector rotated 90 degrees clockwise.
    #[inline]
    pub fn rotated_cw(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// The perpendicular obtained by crossing with the z axis, `(y, -x)`.
    #[inline]
    pub fn cross_z(self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Squared norm.
    #[inline]
    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }

    /// Unit vector in the same direction. Returns the zero vector when the
    /// norm is too small to divide by.
    pub fn normalized(self) -> Self {
        let n = self.norm();
        if n < f64::EPSILON {
            Self::zero()
        } else {
            Self::new(self.x / n, self.y / n)
        }
    }

    /// Distance to another point.
    #[inline]
    pub fn dist(self, other: Vector2D) -> f64 {
        (other - self).norm()
    }

    /// Squared distance to another point.
    #[inline]
    pub fn dist_squared(self, other: Vector2D) -> f64 {
        (other - self).norm_squared()
    }

    /// Tolerance-based point equality, see [`ACCEPTED_ERROR`].
    #[inline]
    pub fn approx_eq(self, other: Vector2D) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() < ACCEPTED_ERROR
    }

    /// Coordinates as a pair, for the robust predicates.
    #[inline]
    pub(crate) fn tuple(self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Coordinates as an array, for the overlay operations.
    #[inline]
    pub(crate) fn array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::ops::Add for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Neg for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn neg(self) -> Vector2D {
        Vector2D::new(-self.x, -self.y)
    }
}

impl std::ops::Mul<f64> for Vector2D {
    type Output = Vector2D;
    #[inline]
    fn mul(self, rhs: f64) -> Vector2D {
        Vector2D::new(self.x * rhs, self.y * rhs)
    }
}

impl From<[f64; 2]> for Vector2D {
    #[inline]
    fn from(p: [f64; 2]) -> Self {
        Vector2D::new(p[0], p[1])
    }
}

/// A directed line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment2D {
    /// Start point.
    pub start: Vector2D,
    /// End point.
    pub end: Vector2D,
}

impl Segment2D {
    /// Creates a new segment.
    #[inline]
    pub const fn new(start: Vector2D, end: Vector2D) -> Self {
        Self { start, end }
    }

    /// Segment length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.dist(self.end)
    }

    /// Point at the given ratio along the segment (0 = start, 1 = end).
    #[inline]
    pub fn point_at_ratio(&self, ratio: f64) -> Vector2D {
        self.start + (self.end - self.start) * ratio
    }

    /// Midpoint of the segment.
    #[inline]
    pub fn midpoint(&self) -> Vector2D {
        self.point_at_ratio(0.5)
    }

    /// Unit vector from start to end.
    #[inline]
    pub fn direction(&self) -> Vector2D {
        (self.end - self.start).normalized()
    }

    /// Unit normal of the segment, the direction crossed with the z axis.
    #[inline]
    pub fn normal(&self) -> Vector2D {
        (self.end - self.start).cross_z().normalized()
    }

    /// Distance from a point to this segment (clamped to the endpoints).
    pub fn distance_to_point(&self, p: Vector2D) -> f64 {
        let l2 = self.start.dist_squared(self.end);
        if l2 == 0.0 {
            return p.dist(self.start);
        }
        let t = ((p - self.start).dot(self.end - self.start) / l2).clamp(0.0, 1.0);
        p.dist(self.point_at_ratio(t))
    }
}

/// Checks whether a point lies on a segment, within [`ACCEPTED_ERROR`].
pub fn point_on_segment(p: Vector2D, seg: &Segment2D) -> bool {
    let detour = seg.start.dist(p) + p.dist(seg.end);
    (detour - seg.length()).abs() < ACCEPTED_ERROR
}

/// Distance from a point to the infinite line through a segment.
pub fn distance_point_to_line(p: Vector2D, seg: &Segment2D) -> f64 {
    let d = seg.end - seg.start;
    let len = d.norm();
    if len < f64::EPSILON {
        return p.dist(seg.start);
    }
    (d.cross(p - seg.start)).abs() / len
}

/// Checks whether two segments intersect, endpoints included.
pub fn segments_intersect(a: &Segment2D, b: &Segment2D) -> bool {
    // Touching at an endpoint counts.
    if point_on_segment(b.start, a)
        || point_on_segment(b.end, a)
        || point_on_segment(a.start, b)
        || point_on_segment(a.end, b)
    {
        return true;
    }

    let o1 = orient2d_filtered(a.start.tuple(), a.end.tuple(), b.start.tuple());
    let o2 = orient2d_filtered(a.start.tuple(), a.end.tuple(), b.end.tuple());
    let o3 = orient2d_filtered(b.start.tuple(), b.end.tuple(), a.start.tuple());
    let o4 = orient2d_filtered(b.start.tuple(), b.end.tuple(), a.end.tuple());

    o1 != o2 && o3 != o4 && !o1.is_collinear() && !o2.is_collinear()
        || collinear_overlap(a, b, o1, o2, o3, o4)
}

fn collinear_overlap(
    a: &Segment2D,
    b: &Segment2D,
    o1: Orientation,
    o2: Orientation,
    o3: Orientation,
    o4: Orientation,
) -> bool {
    (o1.is_collinear() && point_on_segment(b.start, a))
        || (o2.is_collinear() && point_on_segment(b.end, a))
        || (o3.is_collinear() && point_on_segment(a.start, b))
        || (o4.is_collinear() && point_on_segment(a.end, b))
}

/// Computes the intersection point of two segments, if any.
///
/// Endpoints lying on the other segment are returned as-is, so chained
/// bound segments report their shared vertex exactly.
pub fn segment_intersection(a: &Segment2D, b: &Segment2D) -> Option<Vector2D> {
    if point_on_segment(b.start, a) {
        return Some(b.start);
    }
    if point_on_segment(b.end, a) {
        return Some(b.end);
    }
    if point_on_segment(a.start, b) {
        return Some(a.start);
    }
    if point_on_segment(a.end, b) {
        return Some(a.end);
    }

    let r = a.end - a.start;
    let s = b.end - b.start;
    let denom = r.cross(s);
    if denom.abs() < f64::EPSILON {
        return None;
    }

    let qp = b.start - a.start;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(a.start + r * t)
}

/// Intersections of a circle with a segment, ordered along the segment.
///
/// With `bounded` set, only hits between the endpoints are returned;
/// otherwise the full line through the segment is intersected.
pub fn circle_segment_intersections(
    seg: &Segment2D,
    center: Vector2D,
    radius: f64,
    bounded: bool,
) -> Vec<Vector2D> {
    let d = seg.end - seg.start;
    let f = seg.start - center;

    let a = d.dot(d);
    if a < f64::EPSILON {
        return Vec::new();
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let sqrt_d = discriminant.sqrt();
    let mut hits = Vec::with_capacity(2);
    for t in [(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)] {
        if !bounded || (-ACCEPTED_ERROR..=1.0 + ACCEPTED_ERROR).contains(&t) {
            hits.push(seg.point_at_ratio(t));
        }
    }
    if hits.len() == 2 && hits[0].approx_eq(hits[1]) {
        hits.pop();
    }
    hits
}
