//! Integration tests for bitpave-d2.

use bitpave_d2::{
    Bound, BorderPaver, PaveStatus, PaverConfig, Segment2D, Slice, Strategy, Vector2D,
};

fn square_bound(size: f64) -> Bound {
    Bound::new(vec![
        Vector2D::new(0.0, 0.0),
        Vector2D::new(size, 0.0),
        Vector2D::new(size, size),
        Vector2D::new(0.0, size),
    ])
    .unwrap()
}

mod slice_tests {
    use super::*;

    #[test]
    fn test_slice_from_segment_soup() {
        // Segments of a square, deliberately out of order.
        let p = [
            Vector2D::new(0.0, 0.0),
            Vector2D::new(100.0, 0.0),
            Vector2D::new(100.0, 100.0),
            Vector2D::new(0.0, 100.0),
        ];
        let segments = vec![
            Segment2D::new(p[2], p[3]),
            Segment2D::new(p[0], p[1]),
            Segment2D::new(p[3], p[0]),
            Segment2D::new(p[1], p[2]),
        ];
        let slice = Slice::from_segments(&segments).unwrap();
        assert_eq!(slice.bounds().len(), 1);

        // Bounds are rearranged to start at their rightmost point.
        let start = slice.bounds()[0].start_point();
        assert!((start.x - 100.0).abs() < 1e-9);

        let material = slice.material_region();
        assert!((material.area() - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_slice_rejects_open_chain() {
        let segments = vec![
            Segment2D::new(Vector2D::new(0.0, 0.0), Vector2D::new(100.0, 0.0)),
            Segment2D::new(Vector2D::new(100.0, 0.0), Vector2D::new(100.0, 100.0)),
        ];
        assert!(Slice::from_segments(&segments).is_err());
    }

    #[test]
    fn test_slice_with_hole_has_two_bounds() {
        let outer = square_bound(200.0);
        let hole = Bound::new(vec![
            Vector2D::new(80.0, 80.0),
            Vector2D::new(120.0, 80.0),
            Vector2D::new(120.0, 120.0),
            Vector2D::new(80.0, 120.0),
        ])
        .unwrap();
        let slice = Slice::from_bounds(vec![outer, hole]).unwrap();
        assert_eq!(slice.bounds().len(), 2);

        let material = slice.material_region();
        assert!((material.area() - (200.0 * 200.0 - 40.0 * 40.0)).abs() < 1e-6);
        assert!(!material.contains(Vector2D::new(100.0, 100.0)));
        assert!(material.contains(Vector2D::new(10.0, 10.0)));
    }
}

mod deterministic_tests {
    use super::*;

    #[test]
    fn test_paves_square_to_completion() {
        let slice = Slice::from_bounds(vec![square_bound(300.0)]).unwrap();
        let paver = BorderPaver::new(PaverConfig::default());
        let result = paver.pave(&slice).unwrap();

        assert_eq!(result.bounds.len(), 1);
        let pavement = &result.bounds[0];
        assert_eq!(pavement.status, PaveStatus::Complete, "{:?}", pavement.error);
        assert!(!pavement.bits.is_empty());
        assert!(pavement.bits.len() <= PaverConfig::default().max_bits_per_bound);

        // Every placed bit kept some material after trimming.
        for bit in &pavement.bits {
            assert!(bit.area() > 0.0);
        }
    }

    #[test]
    fn test_small_bound_covered_by_few_bits() {
        let slice = Slice::from_bounds(vec![square_bound(60.0)]).unwrap();
        let paver = BorderPaver::new(PaverConfig::default());
        let result = paver.pave(&slice).unwrap();
        assert!(result.is_complete(), "{:?}", result.bounds[0].error);
        assert!(result.placed_count() >= 1);
    }

    #[test]
    fn test_multiple_bounds_paved_independently() {
        let a = square_bound(150.0);
        let b = Bound::new(vec![
            Vector2D::new(400.0, 0.0),
            Vector2D::new(550.0, 0.0),
            Vector2D::new(550.0, 150.0),
            Vector2D::new(400.0, 150.0),
        ])
        .unwrap();
        let slice = Slice::from_bounds(vec![a, b]).unwrap();
        let result = BorderPaver::new(PaverConfig::default())
            .pave(&slice)
            .unwrap();

        assert_eq!(result.bounds.len(), 2);
        for pavement in &result.bounds {
            assert!(!pavement.bits.is_empty());
        }
    }

    #[test]
    fn test_bound_shorter_than_bit_length_completes() {
        // Side 100 against a 160 bit length: every section wraps the whole
        // bound, so the walk terminates well under four bits per side.
        let config = PaverConfig::default()
            .with_bit_length(160.0)
            .with_bit_width(24.0)
            .with_min_width_to_keep(5.0);
        let slice = Slice::from_bounds(vec![square_bound(100.0)]).unwrap();
        let result = BorderPaver::new(config).pave(&slice).unwrap();

        let pavement = &result.bounds[0];
        assert_eq!(pavement.status, PaveStatus::Complete, "{:?}", pavement.error);
        assert!(!pavement.bits.is_empty());
        assert!(pavement.bits.len() <= 16);
        for bit in &pavement.bits {
            assert!(bit.area() > 0.0);
            assert!(bit.length <= 160.0 + 5.0);
        }
    }

    #[test]
    fn test_inner_corner_routes_through_tangent_placement() {
        use bitpave_d2::{BitPlacer, ConvexType, DeterministicPlacer, Section};

        // L-shaped part around the origin; the step at (100, -50) turns
        // away from the material.
        let bound = Bound::new(vec![
            Vector2D::new(-150.0, -250.0),
            Vector2D::new(150.0, -250.0),
            Vector2D::new(150.0, -50.0),
            Vector2D::new(100.0, -50.0),
            Vector2D::new(100.0, 150.0),
            Vector2D::new(-150.0, 150.0),
        ])
        .unwrap();
        let slice = Slice::from_bounds(vec![bound.clone()]).unwrap();
        let config = PaverConfig::default()
            .with_bit_length(120.0)
            .with_bit_width(24.0)
            .with_min_width_to_keep(5.0);
        let mut placer = DeterministicPlacer::new(slice.material_region(), config.clone());

        // Straight run on the right edge, well before the corner.
        let convex_start = Vector2D::new(150.0, -200.0);
        let convex_section =
            Section::from_bound(&bound, convex_start, config.bit_length).unwrap();
        let (kind, _) = convex_section.convex_split(config.bit_length / 2.0);
        assert_eq!(kind, ConvexType::Convex);
        let convex_bit = placer
            .place_bit(&bound, &convex_section, convex_start)
            .unwrap()
            .bit;

        // Section reaching over the inner corner.
        let concave_start = Vector2D::new(150.0, -60.0);
        let concave_section =
            Section::from_bound(&bound, concave_start, config.bit_length).unwrap();
        let (kind, _) = concave_section.convex_split(config.bit_length / 2.0);
        assert_eq!(kind, ConvexType::Concave);
        let concave_bit = placer
            .place_bit(&bound, &concave_section, concave_start)
            .unwrap()
            .bit;
        assert!(concave_bit.area() > 0.0);

        // The tangent bit lies along the inner edge, the corner's exterior
        // angle (a right angle, within 2 degrees) away from the bit on the
        // straight run.
        assert!(concave_bit.orientation.y.abs() < 0.05);
        let cos = convex_bit.orientation.dot(concave_bit.orientation).abs();
        assert!(
            cos < 2.0_f64.to_radians().sin() + 1e-9,
            "orientations differ by {} degrees",
            cos.acos().to_degrees()
        );
    }

    #[test]
    fn test_max_bits_yields_partial_status() {
        let config = PaverConfig::default().with_max_bits_per_bound(1);
        let slice = Slice::from_bounds(vec![square_bound(500.0)]).unwrap();
        let result = BorderPaver::new(config).pave(&slice).unwrap();

        let pavement = &result.bounds[0];
        assert_eq!(pavement.bits.len(), 1);
        assert_eq!(pavement.status, PaveStatus::Partial);
        assert!(!result.is_complete());
    }
}

mod genetic_tests {
    use super::*;

    fn genetic_config() -> PaverConfig {
        PaverConfig::default()
            .with_population_size(40)
            .with_max_generations(8)
            .with_max_bits_per_bound(30)
            .with_seed(1234)
    }

    #[test]
    fn test_genetic_pave_places_bits() {
        let slice = Slice::from_bounds(vec![square_bound(250.0)]).unwrap();
        let paver = BorderPaver::new(genetic_config()).with_strategy(Strategy::Genetic);
        let result = paver.pave(&slice).unwrap();

        assert_eq!(result.strategy, "genetic");
        assert!(result.placed_count() > 0);
        for bit in result.all_bits() {
            assert!(bit.area() > 0.0);
        }
    }

    #[test]
    fn test_genetic_seeded_runs_match() {
        let slice = Slice::from_bounds(vec![square_bound(250.0)]).unwrap();
        let run = || {
            BorderPaver::new(genetic_config())
                .with_strategy(Strategy::Genetic)
                .pave(&slice)
                .unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.placed_count(), b.placed_count());
        let bits_a: Vec<_> = a.all_bits().collect();
        let bits_b: Vec<_> = b.all_bits().collect();
        for (x, y) in bits_a.iter().zip(bits_b.iter()) {
            assert_eq!(x.origin, y.origin);
            assert_eq!(x.orientation, y.orientation);
        }
    }
}

mod summary_tests {
    use super::*;
    use bitpave_d2::PaveSummary;

    #[test]
    fn test_summary_reflects_result() {
        let slice = Slice::from_bounds(vec![square_bound(200.0)]).unwrap();
        let result = BorderPaver::new(PaverConfig::default())
            .pave(&slice)
            .unwrap();

        let summary = PaveSummary::from(&result);
        assert_eq!(summary.bounds_total, 1);
        assert_eq!(summary.bits_placed, result.placed_count());
        assert_eq!(summary.strategy, "deterministic");
    }
}
