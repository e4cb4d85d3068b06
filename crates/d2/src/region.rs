//! Planar regions with boolean operations.
//!
//! A [`Region`] is the material still available on a layer, represented as a
//! set of closed contours. Boolean operations are delegated to `i_overlay`;
//! the even-odd fill rule makes containment independent of contour winding,
//! which matters once subtractions start producing holes.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Vector2D;

/// A planar region made of closed contours, interpreted with the even-odd
/// fill rule.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    contours: Vec<Vec<[f64; 2]>>,
}

impl Region {
    /// Creates an empty region.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a region from closed contours. Contours with fewer than
    /// three points are dropped.
    pub fn from_contours(contours: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            contours: contours.into_iter().filter(|c| c.len() >= 3).collect(),
        }
    }

    /// Creates a region from a single closed point loop.
    pub fn from_points(points: &[Vector2D]) -> Self {
        Self::from_contours(vec![points.iter().map(|p| p.array()).collect()])
    }

    /// Axis-aligned rectangle region.
    pub fn rectangle(min: Vector2D, max: Vector2D) -> Self {
        Self::from_contours(vec![vec![
            [min.x, min.y],
            [max.x, min.y],
            [max.x, max.y],
            [min.x, max.y],
        ]])
    }

    /// The contours making up this region.
    pub fn contours(&self) -> &[Vec<[f64; 2]>] {
        &self.contours
    }

    /// Returns true if the region holds no material.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty() || self.area() < 1e-9
    }

    /// Total enclosed area under the even-odd rule.
    ///
    /// Contour winding is not trusted: slicer output carries no winding
    /// guarantee, so each contour is signed by its nesting depth instead.
    /// A contour inside an odd number of others counts as a hole.
    pub fn area(&self) -> f64 {
        let mut total = 0.0;
        for (i, contour) in self.contours.iter().enumerate() {
            let depth = self
                .contours
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && point_in_contour(contour[0], other))
                .count();
            let area = signed_area(contour).abs();
            if depth % 2 == 0 {
                total += area;
            } else {
                total -= area;
            }
        }
        total.max(0.0)
    }

    /// Even-odd point containment over all contours.
    pub fn contains(&self, p: Vector2D) -> bool {
        self.contours
            .iter()
            .filter(|c| point_in_contour(p.array(), c))
            .count()
            % 2
            == 1
    }

    /// Intersection with another region.
    pub fn intersect(&self, other: &Region) -> Region {
        self.overlay_with(other, OverlayRule::Intersect)
    }

    /// This region minus another.
    pub fn subtract(&self, other: &Region) -> Region {
        self.overlay_with(other, OverlayRule::Difference)
    }

    /// Union with another region.
    pub fn union(&self, other: &Region) -> Region {
        self.overlay_with(other, OverlayRule::Union)
    }

    fn overlay_with(&self, other: &Region, rule: OverlayRule) -> Region {
        if self.contours.is_empty() {
            return match rule {
                OverlayRule::Union => other.clone(),
                _ => Region::empty(),
            };
        }
        if other.contours.is_empty() {
            return match rule {
                OverlayRule::Intersect => Region::empty(),
                _ => self.clone(),
            };
        }

        let shapes = self
            .contours
            .overlay(&other.contours, rule, FillRule::EvenOdd);

        let mut contours = Vec::new();
        for shape in shapes {
            for contour in shape {
                if contour.len() >= 3 {
                    contours.push(contour);
                }
            }
        }
        Region { contours }
    }
}

fn point_in_contour(p: [f64; 2], contour: &[[f64; 2]]) -> bool {
    let n = contour.len();
    let mut inside = false;
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) / (b[1] - a[1]) * (b[0] - a[0]);
            if p[0] < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn signed_area(contour: &[[f64; 2]]) -> f64 {
    let n = contour.len();
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += contour[i][0] * contour[j][1] - contour[j][0] * contour[i][1];
    }
    sum / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square(size: f64) -> Region {
        Region::rectangle(Vector2D::zero(), Vector2D::new(size, size))
    }

    #[test]
    fn test_area_and_contains() {
        let r = unit_square(10.0);
        assert_relative_eq!(r.area(), 100.0);
        assert!(r.contains(Vector2D::new(5.0, 5.0)));
        assert!(!r.contains(Vector2D::new(15.0, 5.0)));
    }

    #[test]
    fn test_empty_region() {
        let r = Region::empty();
        assert!(r.is_empty());
        assert_relative_eq!(r.area(), 0.0);
        assert!(!r.contains(Vector2D::zero()));
    }

    #[test]
    fn test_area_ignores_contour_winding() {
        // Outer square and hole wound the same way, as a slicer may emit
        // them; the nested contour still subtracts.
        let r = Region::from_contours(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
            vec![[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0]],
        ]);
        assert_relative_eq!(r.area(), 96.0, epsilon = 1e-9);
        assert!(!r.contains(Vector2D::new(5.0, 5.0)));
        assert!(r.contains(Vector2D::new(1.0, 1.0)));
        assert!(!r.is_empty());
    }

    #[test]
    fn test_intersect() {
        let a = unit_square(10.0);
        let b = Region::rectangle(Vector2D::new(5.0, 5.0), Vector2D::new(15.0, 15.0));
        let i = a.intersect(&b);
        assert_relative_eq!(i.area(), 25.0, epsilon = 1e-6);

        let far = Region::rectangle(Vector2D::new(50.0, 50.0), Vector2D::new(60.0, 60.0));
        assert!(a.intersect(&far).is_empty());
    }

    #[test]
    fn test_subtract() {
        let a = unit_square(10.0);
        let b = Region::rectangle(Vector2D::new(5.0, 0.0), Vector2D::new(10.0, 10.0));
        let d = a.subtract(&b);
        assert_relative_eq!(d.area(), 50.0, epsilon = 1e-6);
        assert!(d.contains(Vector2D::new(2.0, 5.0)));
        assert!(!d.contains(Vector2D::new(7.0, 5.0)));
    }

    #[test]
    fn test_subtract_carves_hole() {
        let a = unit_square(10.0);
        let hole = Region::rectangle(Vector2D::new(4.0, 4.0), Vector2D::new(6.0, 6.0));
        let d = a.subtract(&hole);
        assert_relative_eq!(d.area(), 96.0, epsilon = 1e-6);
        assert!(!d.contains(Vector2D::new(5.0, 5.0)));
        assert!(d.contains(Vector2D::new(1.0, 1.0)));
    }

    #[test]
    fn test_union() {
        let a = unit_square(10.0);
        let b = Region::rectangle(Vector2D::new(10.0, 0.0), Vector2D::new(20.0, 10.0));
        let u = a.union(&b);
        assert_relative_eq!(u.area(), 200.0, epsilon = 1e-6);
    }
}
