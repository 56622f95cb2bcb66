//! Algebraic laws of the core value types.
//!
//! Covers:
//! - Transform frame inverse
//! - Clone independence and assignment modes
//! - Endpoint-to-center arc conversion

use std::f64::consts::PI;

use proptest::prelude::*;
use stage_core::path::{endpoint_to_center, ArcSegment};
use stage_core::props::{self, AssignMode, DeepClone, Fields, PropertyBag, Value};
use stage_core::{PathError, Rotation2D, TransformFrame, Vector2D};

fn path(s: &str) -> Vec<String> {
    s.split('.').map(str::to_string).collect()
}

fn arc(radius: f64, large_arc: bool, sweep: bool, to: Vector2D) -> ArcSegment {
    ArcSegment {
        radii: Vector2D::new(radius, radius),
        rotation: 0.0,
        large_arc,
        sweep,
        to,
    }
}

fn scale_component() -> impl Strategy<Value = f64> {
    prop_oneof![0.1f64..10.0, -10.0f64..-0.1]
}

// ============================================================================
// Transform Frame
// ============================================================================

proptest! {
    #[test]
    fn prop_restore_inverts_apply(
        tx in -1000.0f64..1000.0,
        ty in -1000.0f64..1000.0,
        rad in -PI..PI,
        sx in scale_component(),
        sy in scale_component(),
        px in -1000.0f64..1000.0,
        py in -1000.0f64..1000.0,
    ) {
        let frame = TransformFrame::new(Vector2D::new(tx, ty), Rotation2D::new(rad), Vector2D::new(sx, sy));
        let p = Vector2D::new(px, py);

        let there_and_back = frame.restore(frame.apply(p));
        prop_assert!(there_and_back.approx_eq(p, 1e-6), "{:?} != {:?}", there_and_back, p);

        let back_and_there = frame.apply(frame.restore(p));
        prop_assert!(back_and_there.approx_eq(p, 1e-6), "{:?} != {:?}", back_and_there, p);
    }

    #[test]
    fn prop_deep_clone_is_independent(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        nudge in 1.0f64..50.0,
    ) {
        let inner = Fields::new().with("offset", Vector2D::new(x, y));
        let original = Fields::new()
            .with("pos", Vector2D::new(x, y))
            .with("style", inner)
            .with("tags", Value::List(vec![Vector2D::new(y, x).into()]));
        let copy = original.deep_clone();
        prop_assert!(props::deep_equals(&original, &copy));

        let mut pos = copy.field("pos").unwrap();
        pos.set_path(&path("x"), (x + nudge).into());
        let mut style = copy.field("style").unwrap();
        style.set_path(&path("offset.y"), (y + nudge).into());

        prop_assert_eq!(
            original.get("pos").and_then(Value::to_vector),
            Some(Vector2D::new(x, y))
        );
        prop_assert_eq!(
            original.get("style").and_then(|s| s.get_path(&path("offset.y"))),
            Some(Value::Number(y))
        );
        prop_assert!(!props::deep_equals(&original, &copy));
    }
}

#[test]
fn test_identical_mode_aliases_clone_mode_copies() {
    let shared = Value::from(Vector2D::new(1.0, 1.0));
    let overlay = Fields::new().with("pos", shared.clone());

    let mut aliased = Fields::new();
    props::initialize(&mut aliased, &overlay, &Fields::new(), AssignMode::Identical);
    let mut copied = Fields::new();
    props::initialize(&mut copied, &overlay, &Fields::new(), AssignMode::Clone);

    aliased.handle("pos.x").set(7.0);
    assert_eq!(shared.to_vector(), Some(Vector2D::new(7.0, 1.0)));
    assert_eq!(
        copied.get("pos").and_then(Value::to_vector),
        Some(Vector2D::new(1.0, 1.0))
    );
}

// ============================================================================
// Arc Conversion
// ============================================================================

#[test]
fn test_arc_center_is_radius_away_from_both_endpoints() {
    let from = Vector2D::new(0.0, 0.0);
    let to = Vector2D::new(10.0, 4.0);
    for (large_arc, sweep) in [(false, false), (false, true), (true, false), (true, true)] {
        let center = endpoint_to_center(from, &arc(8.0, large_arc, sweep, to))
            .unwrap()
            .unwrap();
        assert!((center.center.distance(from) - 8.0).abs() < 1e-9);
        assert!((center.center.distance(to) - 8.0).abs() < 1e-9);
        assert_eq!(center.delta_angle > 0.0, sweep, "large={large_arc} sweep={sweep}");
        assert_eq!(center.delta_angle.abs() > PI, large_arc);
    }
}

#[test]
fn test_arc_radii_scale_up_when_too_small() {
    let from = Vector2D::new(0.0, 0.0);
    let to = Vector2D::new(10.0, 0.0);
    let center = endpoint_to_center(from, &arc(1.0, false, true, to))
        .unwrap()
        .unwrap();
    assert!((center.radii.x - 5.0).abs() < 1e-9);
    assert!(center.center.approx_eq(Vector2D::new(5.0, 0.0), 1e-9));
}

#[test]
fn test_arc_coincident_endpoints_are_skipped() {
    let p = Vector2D::new(3.0, 3.0);
    assert!(endpoint_to_center(p, &arc(5.0, false, false, p)).unwrap().is_none());
}

#[test]
fn test_zero_radius_arc_fails_loud() {
    let result = endpoint_to_center(Vector2D::ZERO, &arc(0.0, false, false, Vector2D::new(1.0, 0.0)));
    assert!(matches!(result, Err(PathError::DegenerateArc { .. })));
}
