//! Frame driving against the headless backend.

use stage_core::{
    Button, Color, PathGraphic, PointerKind, Rect2D, Scene, SceneNode, SurfaceOp, Vector2D,
};
use stage_renderer::{
    ClientRect, HeadlessBackend, InputBinder, RenderBackend, Renderer, RendererConfig,
};

fn renderer() -> Renderer<HeadlessBackend> {
    Renderer::with_backend(RendererConfig::default(), HeadlessBackend::new(200, 200)).unwrap()
}

#[test]
fn test_each_frame_is_balanced_and_fresh() {
    let mut renderer = renderer();
    let mut scene = Scene::new(200.0, 200.0);
    let mut container = SceneNode::container();
    container.set_size(200.0, 200.0);
    container.add(SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 10.0, 10.0))));
    scene.add_node(container);

    for i in 0..3 {
        renderer.frame(&mut scene, f64::from(i) * 16.0).unwrap();
        let ops = renderer.backend().last_frame();
        let saves = ops.iter().filter(|op| matches!(op, SurfaceOp::Save)).count();
        let restores = ops.iter().filter(|op| matches!(op, SurfaceOp::Restore)).count();
        assert_eq!(saves, restores);
        assert_eq!(ops.iter().filter(|op| matches!(op, SurfaceOp::Clear(_))).count(), 1);
    }
    assert_eq!(renderer.frame_count(), 3);
    assert_eq!(renderer.backend().frames(), 3);
}

#[test]
fn test_click_through_binder_then_redraw() {
    let mut renderer = renderer();
    let mut scene = Scene::new(200.0, 200.0);
    let clicks = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = clicks.clone();
    let button = Button::new("Go", Rect2D::new(20.0, 20.0, 60.0, 30.0))
        .on_click(move |_| counter.set(counter.get() + 1))
        .build();
    scene.add_node(button);

    // Canvas laid out at twice its pixel size.
    let binder = InputBinder::new(ClientRect::new(0.0, 0.0, 400.0, 400.0), 200, 200);
    binder.dispatch_pointer(&mut scene, PointerKind::Move, 100.0, 70.0);
    binder.dispatch_pointer(&mut scene, PointerKind::Down, 100.0, 70.0);
    binder.dispatch_pointer(&mut scene, PointerKind::Up, 100.0, 70.0);
    assert_eq!(clicks.get(), 1);

    renderer.redraw(&scene).unwrap();
    assert!(renderer
        .backend()
        .last_frame()
        .iter()
        .any(|op| matches!(op, SurfaceOp::FillText { text, .. } if text == "Go")));
}

#[test]
fn test_boxed_renderer_resize() {
    let mut renderer = Renderer::new(RendererConfig {
        background_color: Some(Color::rgb(10, 20, 30)),
        ..RendererConfig::default()
    })
    .unwrap();
    renderer.resize(320, 240).unwrap();
    assert_eq!(renderer.backend().size(), (320, 240));
    assert!(renderer.resize(0, 240).is_err());
}

#[test]
fn test_node_target_moves_with_scheduler() {
    let mut renderer = renderer();
    let mut node = SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 4.0, 4.0)));
    node.scheduler
        .schedule(Some("step"), 1.0, 3, |_, node: &mut SceneNode| {
            let mut pos = node.position();
            pos.add(Vector2D::new(1.0, 0.0));
            node.set_position(pos);
        });

    // 100ms apart is well past one frame, so every update is due.
    for i in 0..5 {
        renderer.frame(&mut node, f64::from(i) * 100.0).unwrap();
    }
    assert!((node.position().x - 3.0).abs() < 1e-9);
}
