//! Scene Integration Tests
//!
//! Tests node behavior through the public API:
//! - Fractional layout under resize
//! - Hit-testing at the current scale
//! - State restore across switches
//! - Scheduler timing on nodes and scenes
//! - Input routing through a scene

use std::cell::RefCell;
use std::rc::Rc;

use stage_core::props::Fields;
use stage_core::{
    Button, Color, EventKind, FractionalFrame, KeyEvent, NodeKind, PathGraphic, PointerEvent,
    PropertyBag, Rect2D, Scene, SceneNode, Value, Vector2D,
};

/// A unit-square shape laid out at `fraction`.
fn cell(fraction: FractionalFrame) -> SceneNode {
    SceneNode::shape(PathGraphic::default()).with_fraction(fraction)
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_fractional_layout_follows_parent_width() {
    let mut parent = SceneNode::container();
    parent.set_size(200.0, 100.0);
    let child = parent.add(cell(FractionalFrame::new(0.25, 0.0, 0.5, 1.0)));

    let c = parent.find(child).unwrap();
    assert!((c.position().x - 50.0).abs() < 1e-9);
    assert!((c.width() - 100.0).abs() < 1e-9);

    parent.set_width(400.0);
    parent.refresh();
    let c = parent.find(child).unwrap();
    assert!((c.position().x - 100.0).abs() < 1e-9);
    assert!((c.width() - 200.0).abs() < 1e-9);
}

#[test]
fn test_stretched_parent_lays_out_in_displayed_size() {
    let mut parent = SceneNode::container();
    parent.set_stretch(Vector2D::new(2.0, 1.0));
    parent.set_size(200.0, 100.0);
    let child = parent.add(cell(FractionalFrame::new(0.5, 0.0, 0.5, 1.0)));

    assert!((parent.width() - 200.0).abs() < 1e-9);
    let c = parent.find(child).unwrap();
    assert!((c.position().x - 100.0).abs() < 1e-9);
}

// ============================================================================
// Hit Testing
// ============================================================================

#[test]
fn test_hit_test_uses_current_scale() {
    let mut node = SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 10.0, 10.0)));
    node.set_position(Vector2D::new(100.0, 100.0));
    let p = Vector2D::new(125.0, 105.0);

    assert!(!node.is_inside(p));
    node.set_width(30.0);
    assert!(node.is_inside(p));
    assert!(!node.is_inside(Vector2D::new(135.0, 105.0)));
}

#[test]
fn test_hit_test_through_rotated_container() {
    let mut group = SceneNode::container();
    group.set_position(Vector2D::new(50.0, 50.0));
    group.set_rotation(stage_core::Rotation2D::from_degrees(90.0));
    group.add(SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 20.0, 5.0))));

    // Rotated a quarter turn, the child's long side points down.
    assert!(group.is_in_group(Vector2D::new(48.0, 65.0)));
    assert!(!group.is_in_group(Vector2D::new(65.0, 48.0)));
}

// ============================================================================
// States
// ============================================================================

#[test]
fn test_restore_after_intermediate_switch() {
    let mut node = SceneNode::shape(PathGraphic::default());
    node.set_scale(Vector2D::new(10.0, 10.0));
    node.add_state("a", Fields::new().with("fill", "red"));
    node.add_state("b", Fields::new().with("scale", "20,20").with("fill", "blue"));

    node.switch_state("a");
    node.switch_state("b");
    assert_eq!(node.scale(), Vector2D::new(20.0, 20.0));

    node.restore_state();
    assert_eq!(node.scale(), Vector2D::new(10.0, 10.0));
    assert_eq!(node.style.fill, Some(Color::rgb(255, 255, 255)));
}

#[test]
fn test_refresh_reapplies_selected_state() {
    let mut node = SceneNode::shape(PathGraphic::default());
    node.add_state("lit", Fields::new().with("emissive", 8.0));
    node.toggle_state();
    node.style.emissive = 0.0;

    node.refresh();
    assert_eq!(node.style.emissive, 8.0);
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn test_repeat_law_on_node() {
    let mut node = SceneNode::shape(PathGraphic::default());
    let fired = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&fired);
    let id = node
        .scheduler
        .schedule(Some("pulse"), 10.0, 3, move |_, _| *counter.borrow_mut() += 1);

    for _ in 0..29 {
        node.update(1.0);
    }
    assert_eq!(*fired.borrow(), 2);
    node.update(1.0);
    assert_eq!(*fired.borrow(), 3);
    assert!(!node.scheduler.contains(id));
}

#[test]
fn test_callback_can_schedule_on_its_node() {
    let mut node = SceneNode::shape(PathGraphic::default());
    node.scheduler.once(1.0, |_, node: &mut SceneNode| {
        node.scheduler.once(1.0, |_, node: &mut SceneNode| node.visible = false);
    });

    node.update(1.0);
    assert!(node.visible);
    assert_eq!(node.scheduler.len(), 1);
    node.update(1.0);
    assert!(!node.visible);
}

#[test]
fn test_scene_update_reaches_children() {
    let mut scene = Scene::new(100.0, 100.0);
    let mut group = SceneNode::container();
    let child = group.add(SceneNode::shape(PathGraphic::default()));
    let group = scene.add_node(group);

    scene
        .find_mut(child)
        .unwrap()
        .animate("pos", Vector2D::new(10.0, 10.0), 2.0)
        .unwrap();
    scene.update(1.0);
    scene.update(1.0);

    let child = scene.get(group).unwrap().find(child).unwrap();
    assert_eq!(child.position(), Vector2D::new(10.0, 10.0));
}

#[test]
fn test_animate_color_leaves() {
    let mut node = SceneNode::shape(PathGraphic::default());
    node.style.fill = Some(Color::rgb(0, 0, 0));
    node.animate("fill", "white", 2.0).unwrap();
    node.update(1.0);
    assert_eq!(node.style.fill, Some(Color::rgba(128, 128, 128, 255)));
    node.update(1.0);
    assert_eq!(node.field("fill").and_then(|v| v.to_color()), Some(Color::rgb(255, 255, 255)));
    assert!(matches!(node.field("visible"), Some(Value::Bool(true))));
}

// ============================================================================
// Input Routing
// ============================================================================

#[test]
fn test_button_click_through_scene() {
    let mut scene = Scene::new(320.0, 240.0);
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&clicked);
    let id = scene.add_node(
        Button::new("Start", Rect2D::new(100.0, 100.0, 120.0, 40.0))
            .on_click(move |node| log.borrow_mut().push(node.id()))
            .build(),
    );

    scene.dispatch_pointer(&PointerEvent::moved(150.0, 120.0));
    scene.dispatch_pointer(&PointerEvent::down(150.0, 120.0));
    scene.dispatch_pointer(&PointerEvent::up(150.0, 120.0));
    scene.dispatch_pointer(&PointerEvent::down(10.0, 10.0));
    scene.dispatch_pointer(&PointerEvent::up(10.0, 10.0));

    assert_eq!(*clicked.borrow(), vec![id]);
    assert_eq!(scene.nodes_of_kind(NodeKind::Interactive).len(), 1);
}

#[test]
fn test_nested_drag_moves_only_the_inner_node() {
    let mut scene = Scene::new(320.0, 240.0);
    let mut board = SceneNode::interactive(PathGraphic::rect(Rect2D::new(0.0, 0.0, 300.0, 200.0)));
    board.set_position(Vector2D::new(10.0, 10.0));
    board.set_draggable(true);
    let mut piece = SceneNode::interactive(PathGraphic::rect(Rect2D::new(0.0, 0.0, 20.0, 20.0)));
    piece.set_position(Vector2D::new(50.0, 50.0));
    piece.set_draggable(true);
    let piece = board.add(piece);
    let board = scene.add_node(board);

    scene.dispatch_pointer(&PointerEvent::down(65.0, 65.0));
    scene.dispatch_pointer(&PointerEvent::moved(75.0, 70.0));
    scene.dispatch_pointer(&PointerEvent::up(75.0, 70.0));

    assert_eq!(scene.get(board).unwrap().position(), Vector2D::new(10.0, 10.0));
    let piece = scene.find(piece).unwrap();
    assert_eq!(piece.position(), Vector2D::new(60.0, 55.0));
    assert_eq!(piece.drag_anchor(), None);
}

#[test]
fn test_key_events_reach_every_interactive_node() {
    let mut scene = Scene::new(100.0, 100.0);
    let keys = Rc::new(RefCell::new(Vec::new()));
    for _ in 0..2 {
        let keys = Rc::clone(&keys);
        let mut node = SceneNode::interactive(PathGraphic::default());
        node.on(EventKind::KeyDown, move |_, event| {
            keys.borrow_mut().push(event.key.as_ref().map(|k| k.key.clone()));
        });
        scene.add_node(node);
    }
    scene.dispatch_key(&KeyEvent::down("ArrowUp"));
    assert_eq!(keys.borrow().len(), 2);
}
