//! Mapping raw input into scene events.
//!
//! Browsers report pointer positions in client (CSS) coordinates, while
//! scenes work in surface pixels. A canvas drawn at 400x300 but laid out at
//! 800x600 needs every coordinate halved before hit-testing.

use stage_core::{KeyEvent, NodeId, PointerEvent, PointerKind, Scene};

/// Placement of the surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Laid-out width.
    pub width: f64,
    /// Laid-out height.
    pub height: f64,
}

impl ClientRect {
    /// Create a client rect.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[cfg(feature = "wasm")]
impl From<&web_sys::DomRect> for ClientRect {
    fn from(rect: &web_sys::DomRect) -> Self {
        Self::new(rect.left(), rect.top(), rect.width(), rect.height())
    }
}

/// Converts client input into surface-space scene events.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBinder {
    rect: ClientRect,
    surface_width: f64,
    surface_height: f64,
}

impl InputBinder {
    /// Bind a surface of the given pixel size laid out at `rect`.
    #[must_use]
    pub fn new(rect: ClientRect, surface_width: u32, surface_height: u32) -> Self {
        Self {
            rect,
            surface_width: f64::from(surface_width),
            surface_height: f64::from(surface_height),
        }
    }

    /// Update after the surface moved or was resized.
    pub fn resize(&mut self, rect: ClientRect, surface_width: u32, surface_height: u32) {
        *self = Self::new(rect, surface_width, surface_height);
    }

    /// Map client coordinates to surface pixels. A collapsed layout axis
    /// maps without scaling.
    #[must_use]
    pub fn to_surface(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let axis = |offset: f64, laid_out: f64, pixels: f64| {
            if laid_out.abs() < f64::EPSILON {
                offset
            } else {
                offset * pixels / laid_out
            }
        };
        (
            axis(client_x - self.rect.left, self.rect.width, self.surface_width),
            axis(client_y - self.rect.top, self.rect.height, self.surface_height),
        )
    }

    /// Build a surface-space pointer event.
    #[must_use]
    pub fn pointer(&self, kind: PointerKind, client_x: f64, client_y: f64) -> PointerEvent {
        let (x, y) = self.to_surface(client_x, client_y);
        PointerEvent::new(kind, x, y)
    }

    /// Map and deliver a pointer event. Returns the node that claimed it.
    pub fn dispatch_pointer(
        &self,
        scene: &mut Scene,
        kind: PointerKind,
        client_x: f64,
        client_y: f64,
    ) -> Option<NodeId> {
        let event = self.pointer(kind, client_x, client_y);
        tracing::trace!("Pointer {:?} at ({:.1}, {:.1})", kind, event.x, event.y);
        scene.dispatch_pointer(&event)
    }

    /// Deliver a key event. Keys carry no position, so nothing is mapped.
    pub fn dispatch_key(&self, scene: &mut Scene, event: &KeyEvent) {
        scene.dispatch_key(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stage_core::{PathGraphic, Rect2D, SceneNode, Vector2D};

    #[test]
    fn test_scaled_layout() {
        let binder = InputBinder::new(ClientRect::new(10.0, 20.0, 800.0, 600.0), 400, 300);
        let (x, y) = binder.to_surface(410.0, 320.0);
        assert!((x - 200.0).abs() < 1e-9);
        assert!((y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_collapsed_axis_is_offset_only() {
        let binder = InputBinder::new(ClientRect::new(5.0, 0.0, 0.0, 100.0), 50, 100);
        let (x, y) = binder.to_surface(15.0, 40.0);
        assert!((x - 10.0).abs() < 1e-9);
        assert!((y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_dispatch_hits_scaled_node() {
        let mut scene = Scene::new(100.0, 100.0);
        let mut node = SceneNode::interactive(PathGraphic::rect(Rect2D::new(0.0, 0.0, 10.0, 10.0)));
        node.set_position(Vector2D::new(40.0, 40.0));
        let id = scene.add_node(node);

        let binder = InputBinder::new(ClientRect::new(0.0, 0.0, 200.0, 200.0), 100, 100);
        assert_eq!(binder.dispatch_pointer(&mut scene, PointerKind::Move, 90.0, 90.0), Some(id));
        assert_eq!(binder.dispatch_pointer(&mut scene, PointerKind::Move, 10.0, 10.0), None);
    }
}
