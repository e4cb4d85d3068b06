//! Bit placement on convex border runs.
//!
//! On a convex stretch of the border a bit can hug the hull of the covered
//! section: the bit axis follows the hull's longest segment and the bit is
//! shortened to the section's extent, so the whole run is covered without
//! the bit leaving the material sideways.

use bitpave_core::{Error, PaverConfig, Result};

use crate::bit::Bit2D;
use crate::geometry::{distance_point_to_line, Segment2D, Vector2D, ACCEPTED_ERROR};
use crate::paver::Placement;
use crate::region::Region;
use crate::section::{projected_distance, Section};

/// Places a bit on a convex section run.
///
/// `section` is the convex run produced by
/// [`Section::convex_split`]; `material` is the whole material region of the
/// layer, used to orient the bit towards the inside.
pub fn place(section: &Section, material: &Region, config: &PaverConfig) -> Result<Placement> {
    let reduced = section.reduced(config.bit_width, config.min_width_to_keep);
    let start = reduced.start_point();

    let collinear = bit_collinear_vector(&reduced)?;

    // The rearmost covered point; the bit grows from here along `collinear`.
    let start_bit = reduced.furthest_point_along(start, -collinear);

    // Shorten the bit to the section extent, plus the kept margin so the
    // section end is fully covered.
    let extent = projected_distance(
        start,
        reduced.furthest_point_along(start, collinear),
        collinear,
    );
    let new_length = extent + config.min_width_to_keep;

    let position_collinear = collinear * (new_length / 2.0);
    let position_normal = position_normal(start_bit, &reduced, material, config.bit_width)?;

    let origin = start_bit + position_collinear + position_normal;
    let mut bit = Bit2D::new(origin, collinear, new_length, config.bit_width);
    if !bit.trim(material) {
        return Err(Error::invalid_geometry(
            "convex placement produced a bit outside the material",
        ));
    }

    let next_start = reduced.points()[reduced.points().len() - 1];
    Ok(Placement::new(bit, next_start))
}

/// Unit vector along the bit, oriented towards the end of the section.
fn bit_collinear_vector(reduced: &Section) -> Result<Vector2D> {
    let start = reduced.start_point();
    let hull = reduced.hull();
    let constraint = hull
        .longest_segment()
        .ok_or_else(|| Error::internal("reduced section hull has no segments"))?;

    let to_furthest = reduced.furthest_point(start) - start;
    let dir = constraint.direction();
    if to_furthest.dot(dir) < 0.0 {
        Ok(-dir)
    } else {
        Ok(dir)
    }
}

/// Offset from the rearmost covered point to the bit center, perpendicular
/// to the bit axis and oriented into the material.
///
/// Four configurations of the hull's constraint segment are told apart: the
/// hull degenerating to a straight line, a closed section a single bit can
/// overlap, the constraint segment lying inside the material, and the
/// constraint segment lying outside.
fn position_normal(
    start_bit: Vector2D,
    reduced: &Section,
    material: &Region,
    bit_width: f64,
) -> Result<Vector2D> {
    let closed = reduced.is_closed();
    let hull = reduced.hull();
    let hull_segments = hull.segments();

    let mut constraint = hull
        .longest_segment()
        .ok_or_else(|| Error::internal("reduced section hull has no segments"))?;
    let constraint_point = hull.furthest_point_from_segment(&constraint);
    let mut normal = constraint.normal();
    let mid = constraint.midpoint();
    let to_mid = mid - constraint_point;
    let probe = mid + to_mid.normalized() * 1e-5;

    if distance_point_to_line(constraint_point, &constraint) < ACCEPTED_ERROR {
        // Straight hull: every point sits on the constraint line.
        let inner = inner_normal(&constraint, material);
        return Ok(inner * (bit_width / 2.0));
    }

    if closed {
        // The section loops back on itself and one bit overlaps it whole.
        let len = bit_width / 2.0 - distance_point_to_line(start_bit, &constraint);
        return Ok(normal * len);
    }

    if material.contains(probe) {
        // Constraint segment inside the material: align on the longest hull
        // segment that is part of the border instead.
        let mut length_max = 0.0;
        for seg in &hull_segments[..hull_segments.len().saturating_sub(1)] {
            if seg.length() > length_max {
                length_max = seg.length();
                constraint = *seg;
            }
        }
        normal = constraint.normal();
        if normal.dot(to_mid) < 0.0 {
            normal = -normal;
        }
        let len = bit_width / 2.0 - projected_distance(constraint_point, start_bit, normal);
        return Ok(normal * len);
    }

    // Constraint segment outside the material.
    if normal.dot(to_mid) > 0.0 {
        normal = -normal;
    }
    let len = bit_width / 2.0 - projected_distance(mid, start_bit, normal);
    Ok(normal * len)
}

/// Normal of `segment` pointing into `material`, decided by probing just
/// off the segment midpoint.
fn inner_normal(segment: &Segment2D, material: &Region) -> Vector2D {
    let dir = segment.normal();
    let probe = segment.midpoint() + dir * 0.1;
    if material.contains(probe) {
        dir
    } else {
        -dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> PaverConfig {
        PaverConfig::default()
            .with_bit_length(120.0)
            .with_bit_width(24.0)
            .with_min_width_to_keep(5.0)
    }

    #[test]
    fn test_place_on_straight_edge() {
        // Bottom edge of a large square, walked left to right.
        let section = Section::new(vec![
            Vector2D::new(0.0, 0.0),
            Vector2D::new(50.0, 0.0),
            Vector2D::new(100.0, 0.0),
        ])
        .unwrap();
        let material = Region::rectangle(Vector2D::zero(), Vector2D::new(100.0, 100.0));

        let placement = place(&section, &material, &config()).unwrap();
        let bit = &placement.bit;

        // The bit hugs the edge from the inside, half a width above it.
        assert_relative_eq!(bit.origin.x, 52.5, epsilon = 1e-6);
        assert_relative_eq!(bit.origin.y, 12.0, epsilon = 1e-6);
        assert_relative_eq!(bit.orientation.x.abs(), 1.0, epsilon = 1e-9);
        // Shortened to the section extent plus the kept margin.
        assert_relative_eq!(bit.length, 105.0, epsilon = 1e-6);
        assert!(placement.next_start.approx_eq(Vector2D::new(100.0, 0.0)));
    }

    #[test]
    fn test_place_mid_edge_straight_section() {
        // Mid-edge run of a large square bottom edge, the second step of a
        // border walk. The bit must stay half a width inside the material.
        let section = Section::new(vec![
            Vector2D::new(120.0, 0.0),
            Vector2D::new(240.0, 0.0),
        ])
        .unwrap();
        let material = Region::rectangle(Vector2D::zero(), Vector2D::new(300.0, 300.0));

        let placement = place(&section, &material, &config()).unwrap();
        let bit = &placement.bit;

        assert_relative_eq!(bit.origin.x, 182.5, epsilon = 1e-6);
        assert_relative_eq!(bit.origin.y, 12.0, epsilon = 1e-6);
        assert!(material.contains(bit.origin));
        assert!(placement.next_start.approx_eq(Vector2D::new(240.0, 0.0)));
    }

    #[test]
    fn test_place_keeps_bit_on_material() {
        let section = Section::new(vec![
            Vector2D::new(0.0, 0.0),
            Vector2D::new(60.0, 0.0),
        ])
        .unwrap();
        let material = Region::rectangle(Vector2D::zero(), Vector2D::new(60.0, 60.0));
        let placement = place(&section, &material, &config()).unwrap();
        assert!(placement.bit.area() > 0.0);
        assert!(material.contains(placement.bit.origin));
    }

    #[test]
    fn test_collinear_vector_points_forward() {
        let section = Section::new(vec![
            Vector2D::new(100.0, 0.0),
            Vector2D::new(50.0, 0.0),
            Vector2D::new(0.0, 0.0),
        ])
        .unwrap();
        // Walking right to left, the collinear vector must point left.
        let dir = bit_collinear_vector(&section).unwrap();
        assert!(dir.x < 0.0);
    }
}
