//! Child lists and fractional layout.

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, SceneNode};
use crate::surface::DrawingSurface;
use crate::transform::TransformFrame;
use crate::Vector2D;

/// Position and size as fractions of the parent's width and height.
///
/// Unset components are left alone during layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FractionalFrame {
    /// Left edge as a fraction of the parent width.
    pub x: Option<f64>,
    /// Top edge as a fraction of the parent height.
    pub y: Option<f64>,
    /// Width as a fraction of the parent width.
    pub width: Option<f64>,
    /// Height as a fraction of the parent height.
    pub height: Option<f64>,
}

impl FractionalFrame {
    /// A fully specified fractional frame.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Resolve against a parent of `width` × `height`, writing onto `node`.
    fn resolve(&self, node: &mut SceneNode, width: f64, height: f64) {
        if self.x.is_some() || self.y.is_some() {
            let mut pos = node.position();
            if let Some(x) = self.x {
                pos.x = x * width;
            }
            if let Some(y) = self.y {
                pos.y = y * height;
            }
            node.set_position(pos);
        }
        if let Some(w) = self.width {
            node.set_width(w * width);
        }
        if let Some(h) = self.height {
            node.set_height(h * height);
        }
    }
}

/// Children of a node, the frame they are drawn in, and render-only extras.
#[derive(Debug, Default)]
pub struct ChildList {
    pub(crate) nodes: Vec<SceneNode>,
    pub(crate) inner: TransformFrame,
    pub(crate) extras: Vec<SceneNode>,
}

impl SceneNode {
    /// Whether the node can hold children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.children.is_some()
    }

    fn child_list(&mut self) -> &mut ChildList {
        self.children.get_or_insert_with(ChildList::default)
    }

    /// Append a child, then refresh so its fractional frame resolves.
    pub fn add(&mut self, child: SceneNode) -> NodeId {
        let id = child.id();
        tracing::debug!("Adding {:?} child {id} to {}", child.kind(), self.id());
        self.child_list().nodes.push(child);
        self.refresh();
        id
    }

    /// Builder-style [`add`](Self::add).
    #[must_use]
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.add(child);
        self
    }

    /// Append a node drawn after the children. Extras are never laid out or
    /// hit-tested.
    pub fn add_extra(&mut self, extra: SceneNode) {
        self.child_list().extras.push(extra);
    }

    /// Render-only extras.
    #[must_use]
    pub fn extras(&self) -> &[SceneNode] {
        match &self.children {
            Some(children) => &children.extras,
            None => &[],
        }
    }

    /// Mutable access to the extras.
    pub fn extras_mut(&mut self) -> &mut [SceneNode] {
        match &mut self.children {
            Some(children) => &mut children.extras,
            None => &mut [],
        }
    }

    /// Detach a direct child.
    pub fn remove_child(&mut self, id: NodeId) -> Option<SceneNode> {
        let children = self.children.as_mut()?;
        let index = children.nodes.iter().position(|c| c.id() == id)?;
        Some(children.nodes.remove(index))
    }

    /// Direct children in draw order.
    #[must_use]
    pub fn children(&self) -> &[SceneNode] {
        match &self.children {
            Some(children) => &children.nodes,
            None => &[],
        }
    }

    /// Mutable access to the direct children.
    pub fn children_mut(&mut self) -> &mut [SceneNode] {
        match &mut self.children {
            Some(children) => &mut children.nodes,
            None => &mut [],
        }
    }

    /// Find a descendant by id, depth first.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        self.children().iter().find_map(|child| {
            if child.id() == id {
                Some(child)
            } else {
                child.find(id)
            }
        })
    }

    /// Mutable [`find`](Self::find).
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        for child in self.children_mut() {
            if child.id() == id {
                return Some(child);
            }
            if let Some(found) = child.find_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// The frame children are drawn in, relative to this node's frame.
    #[must_use]
    pub fn inner_frame(&self) -> TransformFrame {
        self.children
            .as_ref()
            .map_or(TransformFrame::IDENTITY, |c| c.inner)
    }

    /// Replace the inner frame.
    pub fn set_inner_frame(&mut self, inner: TransformFrame) {
        self.child_list().inner = inner;
    }

    /// Fractional frame resolved by the parent on refresh.
    #[must_use]
    pub const fn fraction(&self) -> Option<FractionalFrame> {
        self.fraction
    }

    /// Lay this node out as a fraction of its parent's size.
    pub fn set_fraction(&mut self, fraction: FractionalFrame) {
        self.fraction = Some(fraction);
    }

    /// Builder-style [`set_fraction`](Self::set_fraction).
    #[must_use]
    pub fn with_fraction(mut self, fraction: FractionalFrame) -> Self {
        self.fraction = Some(fraction);
        self
    }

    /// Resolve children's fractional frames against this node's size, and
    /// refresh every child.
    pub(crate) fn layout_children(&mut self) {
        let (width, height) = (self.width(), self.height());
        for child in self.children_mut() {
            if let Some(fraction) = child.fraction {
                fraction.resolve(child, width, height);
            }
            child.refresh();
        }
    }

    /// Map a parent-space point into the space children live in.
    #[must_use]
    pub fn to_inner(&self, point: Vector2D) -> Vector2D {
        self.inner_frame().apply(self.to_local(point))
    }

    /// Whether the parent-space `point` hits this node's body or the body
    /// of a direct child. Grandchildren are not tested.
    #[must_use]
    pub fn is_in_group(&self, point: Vector2D) -> bool {
        if self.body && self.is_inside(point) {
            return true;
        }
        let inner = self.to_inner(point);
        self.children()
            .iter()
            .any(|child| child.body && child.is_inside(inner))
    }

    /// Whether the parent-space `point` hits this node's body or the body of
    /// any descendant.
    #[must_use]
    pub fn hits(&self, point: Vector2D) -> bool {
        if self.body && self.is_inside(point) {
            return true;
        }
        let Some(children) = &self.children else {
            return false;
        };
        let inner = self.to_inner(point);
        children.nodes.iter().any(|child| child.hits(inner))
    }

    pub(crate) fn render_children(&self, surface: &mut dyn DrawingSurface, extras: &[&SceneNode]) {
        surface.save();
        self.inner_frame().transform(surface);
        if let Some(children) = &self.children {
            for child in children.nodes.iter().chain(&children.extras) {
                child.render(surface);
            }
        }
        for extra in extras {
            extra.render(surface);
        }
        surface.restore();
    }
}
