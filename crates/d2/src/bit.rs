//! The rectangular bit model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Segment2D, Vector2D};
use crate::region::Region;

/// A rectangular bit placed on a layer.
///
/// `origin` is the center of the rectangle and `orientation` the unit
/// vector along its length. `length` is the full footprint length,
/// cutting part plus holding part.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bit2D {
    /// Center of the rectangle.
    pub origin: Vector2D,
    /// Unit vector along the bit length.
    pub orientation: Vector2D,
    /// Full footprint length.
    pub length: f64,
    /// Bit width.
    pub width: f64,
    /// Shape left after trimming against the available material, when the
    /// bit only partially fits.
    trimmed: Option<Region>,
}

impl Bit2D {
    /// Creates a bit centered at `origin`. The orientation is normalized.
    pub fn new(origin: Vector2D, orientation: Vector2D, length: f64, width: f64) -> Self {
        Self {
            origin,
            orientation: orientation.normalized(),
            length,
            width,
            trimmed: None,
        }
    }

    /// The four corners in order: rear-right, front-right, front-left,
    /// rear-left, with "front" along the orientation and "right" on the
    /// clockwise side.
    pub fn corners(&self) -> [Vector2D; 4] {
        let half_len = self.orientation * (self.length / 2.0);
        let half_wid = self.orientation.rotated_cw() * (self.width / 2.0);
        [
            self.origin - half_len - half_wid,
            self.origin + half_len - half_wid,
            self.origin + half_len + half_wid,
            self.origin - half_len + half_wid,
        ]
    }

    /// The four sides as segments, following the corner order.
    pub fn side_segments(&self) -> [Segment2D; 4] {
        let c = self.corners();
        [
            Segment2D::new(c[0], c[1]),
            Segment2D::new(c[1], c[2]),
            Segment2D::new(c[2], c[3]),
            Segment2D::new(c[3], c[0]),
        ]
    }

    /// The untrimmed rectangular footprint.
    pub fn footprint(&self) -> Region {
        Region::from_points(&self.corners())
    }

    /// The effective shape: the trimmed region when set, the full
    /// footprint otherwise.
    pub fn region(&self) -> Region {
        match &self.trimmed {
            Some(r) => r.clone(),
            None => self.footprint(),
        }
    }

    /// Effective area of the bit.
    pub fn area(&self) -> f64 {
        self.region().area()
    }

    /// Trims the bit against the material still available.
    ///
    /// Stores the intersection as the bit's shape and returns false when
    /// nothing of the bit lies on the material.
    pub fn trim(&mut self, available: &Region) -> bool {
        let cut = self.footprint().intersect(available);
        let usable = !cut.is_empty();
        self.trimmed = Some(cut);
        usable
    }

    /// The trimmed shape, if [`trim`](Self::trim) has run.
    pub fn trimmed(&self) -> Option<&Region> {
        self.trimmed.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corners_axis_aligned() {
        let bit = Bit2D::new(Vector2D::zero(), Vector2D::new(1.0, 0.0), 120.0, 24.0);
        let c = bit.corners();
        assert_relative_eq!(c[0].x, -60.0);
        assert_relative_eq!(c[0].y, -12.0);
        assert_relative_eq!(c[1].x, 60.0);
        assert_relative_eq!(c[2].y, 12.0);
    }

    #[test]
    fn test_orientation_normalized() {
        let bit = Bit2D::new(Vector2D::zero(), Vector2D::new(3.0, 4.0), 10.0, 2.0);
        assert_relative_eq!(bit.orientation.norm(), 1.0);
    }

    #[test]
    fn test_footprint_area() {
        let bit = Bit2D::new(
            Vector2D::new(5.0, 5.0),
            Vector2D::from_angle_degrees(30.0),
            120.0,
            24.0,
        );
        assert_relative_eq!(bit.footprint().area(), 120.0 * 24.0, epsilon = 1e-6);
        assert_relative_eq!(bit.area(), 120.0 * 24.0, epsilon = 1e-6);
    }

    #[test]
    fn test_trim_against_material() {
        let mut bit = Bit2D::new(Vector2D::zero(), Vector2D::new(1.0, 0.0), 100.0, 20.0);
        // Material covers only the right half of the bit.
        let material = Region::rectangle(Vector2D::new(0.0, -50.0), Vector2D::new(200.0, 50.0));
        assert!(bit.trim(&material));
        assert_relative_eq!(bit.area(), 50.0 * 20.0, epsilon = 1e-6);
        assert!(bit.trimmed().is_some());

        // Material far away leaves nothing.
        let mut lost = Bit2D::new(Vector2D::zero(), Vector2D::new(1.0, 0.0), 100.0, 20.0);
        let far = Region::rectangle(Vector2D::new(500.0, 500.0), Vector2D::new(600.0, 600.0));
        assert!(!lost.trim(&far));
    }

    #[test]
    fn test_side_segments_close() {
        let bit = Bit2D::new(Vector2D::zero(), Vector2D::new(0.0, 1.0), 50.0, 10.0);
        let sides = bit.side_segments();
        for i in 0..4 {
            assert_eq!(sides[i].end, sides[(i + 1) % 4].start);
        }
    }
}
