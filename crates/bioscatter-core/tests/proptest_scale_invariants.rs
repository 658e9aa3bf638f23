//! Property tests for scale and zoom invariants.

use bioscatter_core::{
    Axis, Margin, Point, PointSet, ZoomBounds, ZoomTracker, ZoomTransform, compute_scale,
};
use proptest::prelude::*;

fn finite_coord() -> impl Strategy<Value = f64> {
    (-1.0e6_f64..1.0e6).prop_filter("finite", |v| v.is_finite())
}

fn point_sets() -> impl Strategy<Value = PointSet> {
    proptest::collection::vec((finite_coord(), finite_coord(), -1i32..6), 1..64)
        .prop_map(|raw| raw.into_iter().map(|(x, y, c)| Point::new(x, y, c)).collect())
}

proptest! {
    #[test]
    fn x_extremes_land_on_margin_bounds(set in point_sets()) {
        let scale = compute_scale(&set, Axis::X, 200.0, Margin::new(8.0, 2.0)).unwrap();
        let (lo, hi) = set.extent(Axis::X).unwrap();
        if lo < hi {
            prop_assert!((scale.position(lo) - 8.0).abs() < 1e-6);
            prop_assert!((scale.position(hi) - 198.0).abs() < 1e-6);
        } else {
            // Degenerate domain collapses onto the range midpoint.
            prop_assert!((scale.position(lo) - 103.0).abs() < 1e-6);
        }
    }

    #[test]
    fn y_orientation_is_inverted(set in point_sets()) {
        let scale = compute_scale(&set, Axis::Y, 200.0, Margin::new(1.0, 3.0)).unwrap();
        let (lo, hi) = set.extent(Axis::Y).unwrap();
        if lo < hi {
            prop_assert!(scale.position(lo) > scale.position(hi));
            prop_assert!((scale.position(lo) - 197.0).abs() < 1e-6);
            prop_assert!((scale.position(hi) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn position_invert_round_trips(
        set in point_sets(),
        probe in -1.0e6_f64..1.0e6,
    ) {
        let scale = compute_scale(&set, Axis::X, 500.0, Margin::new(10.0, 10.0)).unwrap();
        let (lo, hi) = scale.domain();
        if lo < hi {
            let back = scale.invert(scale.position(probe));
            let tolerance = 1e-6 * (1.0 + probe.abs());
            prop_assert!((back - probe).abs() < tolerance);
        }
    }

    #[test]
    fn identity_rescale_matches_base(
        set in point_sets(),
        probe in -1.0e6_f64..1.0e6,
    ) {
        let scale = compute_scale(&set, Axis::X, 300.0, Margin::new(5.0, 5.0)).unwrap();
        let tracker = ZoomTracker::default();
        let eff = tracker.rescale(&scale, Axis::X);
        prop_assert_eq!(eff.position(probe), scale.position(probe));
    }

    #[test]
    fn rescale_is_affine_in_base_position(
        set in point_sets(),
        k in 0.5_f64..20.0,
        tx in -500.0_f64..500.0,
        probe in -1.0e6_f64..1.0e6,
    ) {
        let scale = compute_scale(&set, Axis::X, 300.0, Margin::new(5.0, 5.0)).unwrap();
        let mut tracker = ZoomTracker::default();
        tracker.apply_gesture(ZoomTransform::new(k, tx, 0.0));
        let eff = tracker.rescale(&scale, Axis::X);
        let expected = k * scale.position(probe) + tx;
        let tolerance = 1e-6 * (1.0 + expected.abs());
        prop_assert!((eff.position(probe) - expected).abs() < tolerance);
    }

    #[test]
    fn clamp_always_holds(k in -100.0_f64..100.0) {
        let mut tracker = ZoomTracker::new(ZoomBounds::new(0.5, 20.0));
        tracker.apply_gesture(ZoomTransform::new(k, 0.0, 0.0));
        let got = tracker.transform().k;
        prop_assert!((0.5..=20.0).contains(&got));
    }
}
