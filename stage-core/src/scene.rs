//! Scene registry for top-level nodes.

use std::collections::HashMap;

use crate::event::{InputEvent, KeyEvent, PointerEvent};
use crate::node::{NodeId, NodeKind, SceneNode};
use crate::surface::DrawingSurface;
use crate::{Color, StageError, StageResult, Vector2D};

/// A scene containing every top-level node.
#[derive(Debug, Default)]
pub struct Scene {
    /// All top-level nodes, indexed by ID.
    nodes: HashMap<NodeId, SceneNode>,
    /// Draw order of the top-level nodes.
    roots: Vec<NodeId>,
    /// Next serial per node kind.
    serials: HashMap<NodeKind, u64>,
    /// Viewport width in pixels.
    pub viewport_width: f64,
    /// Viewport height in pixels.
    pub viewport_height: f64,
    /// Color a renderer clears to before drawing this scene.
    pub background: Option<Color>,
}

impl Scene {
    /// Create a new empty scene with the given viewport size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    /// Add a node on top of everything else. It gets the next serial of
    /// its kind.
    pub fn add_node(&mut self, mut node: SceneNode) -> NodeId {
        let id = node.id();
        let serial = self.serials.entry(node.kind()).or_insert(0);
        node.set_serial(*serial);
        *serial += 1;
        tracing::debug!("Scene add {:?} #{} ({id})", node.kind(), *serial - 1);
        self.roots.push(id);
        self.nodes.insert(id, node);
        id
    }

    /// Remove a top-level node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not in the scene.
    pub fn remove_node(&mut self, id: NodeId) -> StageResult<SceneNode> {
        self.roots.retain(|&root| root != id);
        self.nodes
            .remove(&id)
            .ok_or_else(|| StageError::NodeNotFound(id.to_string()))
    }

    /// Get a top-level node by ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a top-level node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Find a node anywhere in the scene, descendants included.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes
            .get(&id)
            .or_else(|| self.nodes().find_map(|node| node.find(id)))
    }

    /// Mutable [`find`](Self::find).
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        if self.nodes.contains_key(&id) {
            return self.nodes.get_mut(&id);
        }
        self.nodes.values_mut().find_map(|node| node.find_mut(id))
    }

    /// Top-level nodes in draw order.
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Top-level nodes of one kind, ordered by serial.
    #[must_use]
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&SceneNode> {
        let mut nodes: Vec<_> = self.nodes.values().filter(|n| n.kind() == kind).collect();
        nodes.sort_by_key(|n| n.serial());
        nodes
    }

    /// Move a node to the top of the draw order.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not in the scene.
    pub fn raise(&mut self, id: NodeId) -> StageResult<()> {
        let index = self
            .roots
            .iter()
            .position(|&root| root == id)
            .ok_or_else(|| StageError::NodeNotFound(id.to_string()))?;
        let id = self.roots.remove(index);
        self.roots.push(id);
        Ok(())
    }

    /// Number of top-level nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Set the viewport dimensions.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Advance every node by `delta` normalized frames.
    pub fn update(&mut self, delta: f64) {
        for id in &self.roots {
            if let Some(node) = self.nodes.get_mut(id) {
                node.update(delta);
            }
        }
    }

    /// Draw every node in order.
    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        tracing::trace!("Scene render: {} nodes", self.roots.len());
        for node in self.nodes() {
            node.render(surface);
        }
    }

    /// Feed a pointer event to every top-level node, in draw order, with
    /// the same claim rule containers apply to their children. Returns the
    /// node that claimed it.
    pub fn dispatch_pointer(&mut self, event: &PointerEvent) -> Option<NodeId> {
        let mut claimed = None;
        for id in &self.roots {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            if claimed.is_some() {
                if node.is_pointer_inside() {
                    node.track_pointer(event);
                }
            } else if node.track_pointer(event) {
                claimed = Some(*id);
            }
        }
        claimed
    }

    /// Turn bound outlines on or off for every node, descendants included.
    pub fn set_debug_bounds(&mut self, on: bool) {
        for node in self.nodes.values_mut() {
            node.set_debug_bounds(on);
        }
    }

    /// Broadcast a key event to every interactive node.
    pub fn dispatch_key(&mut self, event: &KeyEvent) {
        for id in &self.roots {
            if let Some(node) = self.nodes.get_mut(id) {
                node.dispatch_key(event);
            }
        }
    }

    /// Route any input event. Resizes update the viewport.
    pub fn dispatch(&mut self, event: &InputEvent) -> Option<NodeId> {
        match event {
            InputEvent::Pointer(pointer) => self.dispatch_pointer(pointer),
            InputEvent::Key(key) => {
                self.dispatch_key(key);
                None
            }
            InputEvent::Resize { width, height } => {
                self.set_viewport(*width, *height);
                None
            }
        }
    }

    /// The topmost node whose body or descendants contain the point.
    #[must_use]
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let point = Vector2D::new(x, y);
        self.roots
            .iter()
            .rev()
            .filter_map(|id| self.nodes.get(id))
            .find(|node| node.visible && node.hits(point))
            .map(SceneNode::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::EventKind;
    use crate::path::PathGraphic;
    use crate::surface::{RecordingSurface, SurfaceOp};
    use crate::Rect2D;

    fn square(x: f64, size: f64) -> SceneNode {
        let mut node = SceneNode::interactive(PathGraphic::rect(Rect2D::new(0.0, 0.0, size, size)));
        node.set_position(Vector2D::new(x, 0.0));
        node
    }

    #[test]
    fn test_scene_add_remove() {
        let mut scene = Scene::new(800.0, 600.0);
        assert!(scene.is_empty());

        let id = scene.add_node(square(0.0, 10.0));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(id).is_some());

        assert!(scene.remove_node(id).is_ok());
        assert!(scene.is_empty());
        assert!(matches!(scene.remove_node(id), Err(StageError::NodeNotFound(_))));
    }

    #[test]
    fn test_serials_are_per_kind() {
        let mut scene = Scene::new(100.0, 100.0);
        let a = scene.add_node(square(0.0, 1.0));
        let b = scene.add_node(SceneNode::container());
        let c = scene.add_node(square(0.0, 1.0));

        assert_eq!(scene.get(a).and_then(SceneNode::serial), Some(0));
        assert_eq!(scene.get(b).and_then(SceneNode::serial), Some(0));
        assert_eq!(scene.get(c).and_then(SceneNode::serial), Some(1));
        let ids: Vec<_> = scene
            .nodes_of_kind(NodeKind::Interactive)
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_node_at_prefers_topmost() {
        let mut scene = Scene::new(100.0, 100.0);
        let below = scene.add_node(square(0.0, 20.0));
        let above = scene.add_node(square(10.0, 20.0));

        assert_eq!(scene.node_at(15.0, 5.0), Some(above));
        assert_eq!(scene.node_at(5.0, 5.0), Some(below));
        assert_eq!(scene.node_at(50.0, 5.0), None);

        scene.raise(below).unwrap();
        assert_eq!(scene.node_at(15.0, 5.0), Some(below));
    }

    #[test]
    fn test_dispatch_pointer_claims_in_order() {
        let mut scene = Scene::new(100.0, 100.0);
        let first = scene.add_node(square(0.0, 20.0));
        let second = scene.add_node(square(10.0, 20.0));
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        {
            let hits = std::rc::Rc::clone(&hits);
            scene
                .get_mut(second)
                .unwrap()
                .on(EventKind::Down, move |_, _| hits.set(hits.get() + 1));
        }

        assert_eq!(scene.dispatch_pointer(&PointerEvent::down(15.0, 5.0)), Some(first));
        assert_eq!(hits.get(), 0);
        assert_eq!(scene.dispatch_pointer(&PointerEvent::down(25.0, 5.0)), Some(second));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_resize_event_updates_viewport() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.dispatch(&InputEvent::Resize {
            width: 640.0,
            height: 480.0,
        });
        assert_eq!(scene.viewport_width, 640.0);
        assert_eq!(scene.viewport_height, 480.0);
    }

    #[test]
    fn test_render_draws_in_order() {
        let mut scene = Scene::new(100.0, 100.0);
        let mut first = square(0.0, 10.0);
        first.style.fill = Some(Color::rgb(255, 0, 0));
        let mut second = square(20.0, 10.0);
        second.style.fill = Some(Color::rgb(0, 0, 255));
        scene.add_node(first);
        scene.add_node(second);

        let mut surface = RecordingSurface::new();
        scene.render(&mut surface);
        let fills: Vec<_> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::FillColor(color) => Some(color.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)]);
        assert!(!surface.ops().iter().any(|op| matches!(op, SurfaceOp::Clear(_))));
    }

    #[test]
    fn test_debug_bounds_reach_descendants() {
        let mut scene = Scene::new(100.0, 100.0);
        let mut group = SceneNode::container();
        let child = group.add(square(0.0, 1.0));
        scene.add_node(group);
        scene.set_debug_bounds(true);
        assert!(scene.find(child).unwrap().debug_bound);
    }
}
