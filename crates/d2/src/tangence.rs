//! Tangent bit placement for concave border runs.
//!
//! Where the border turns away from the material a bit cannot hug the hull;
//! instead it is laid tangent to one of the section's segments, overlapping
//! the material just enough to keep the minimum usable width.

use bitpave_core::{Error, PaverConfig, Result};

use crate::bit::Bit2D;
use crate::geometry::{Segment2D, Vector2D};
use crate::section::{ConvexType, Section};

/// Clearance kept between the bound and the bit edge so the bit never sits
/// exactly on the bound, which would break the intersection computations.
pub const MARGIN_EXT: f64 = 1.0;

/// Segments shorter than this are skipped when looking for a tangent
/// support segment.
pub const MIN_SEGMENT_LENGTH: f64 = 3.0;

/// Reach used to extend the offset probe segment on both sides.
const PROBE_EXTENT: f64 = 400.0;

/// Places a bit tangent to the last reachable segment of `section`.
///
/// The support segment is the last section segment whose orthogonal
/// projection of `start` stays within a bit width, and whose offset probe
/// crosses the section few enough times for the given convexity. The bit is
/// then laid along that segment, shifted across it so the material overlap
/// is `min_width_to_keep` on concave runs and the full width minus the
/// safety margin on convex ones.
pub fn place(
    section: &Section,
    start: Vector2D,
    convex_type: ConvexType,
    config: &PaverConfig,
) -> Result<Bit2D> {
    let segments = section.segments();
    if segments.is_empty() {
        return Err(Error::invalid_geometry(
            "section has no usable segments for tangent placement",
        ));
    }

    let mut support: Option<Segment2D> = None;
    for segment in &segments {
        if segment.length() < MIN_SEGMENT_LENGTH {
            continue;
        }
        let projected = project_onto(start, segment);
        if projected.dist(start) >= config.bit_width + MARGIN_EXT - config.min_width_to_keep {
            continue;
        }
        // Probe a long copy of the segment shifted off the border; how often
        // it crosses the section tells on which side the material lies.
        let shift = segment.normal() * MARGIN_EXT;
        let reach = segment.direction() * PROBE_EXTENT;
        let probe = Segment2D::new(segment.start + shift - reach, segment.end + shift + reach);
        let crossings = section.intersection_count(&probe);
        let keep = match convex_type {
            ConvexType::Convex => crossings == 0,
            ConvexType::Concave => crossings <= 2,
        };
        if keep {
            support = Some(*segment);
        }
    }
    let support = support.unwrap_or(segments[segments.len() - 1]);

    let projected = project_onto(start, &support);
    let along = support.direction();
    let across = along.rotated_cw();

    let mut origin = match convex_type {
        ConvexType::Concave => {
            // Overlap the material by just the minimum kept width.
            projected - across * (config.bit_width / 2.0) + across * config.min_width_to_keep
        }
        ConvexType::Convex => {
            let mut o = projected + across * (config.bit_width / 2.0) - across * MARGIN_EXT;
            if (projected - start).dot(across) > 0.0 {
                o = o - across * o.dist(projected);
            }
            o
        }
    };
    origin = origin + along * (config.bit_length_full() / 2.0);

    Ok(Bit2D::new(
        origin,
        along,
        config.bit_length_full(),
        config.bit_width,
    ))
}

/// Orthogonal projection of `point` onto the line through `segment`.
fn project_onto(point: Vector2D, segment: &Segment2D) -> Vector2D {
    let orthogonal = segment.normal();
    point + orthogonal * (segment.start - point).dot(orthogonal)
}
