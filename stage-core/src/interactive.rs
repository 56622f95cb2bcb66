//! Pointer and keyboard interaction.
//!
//! An interactive node tracks whether the pointer is inside it, turns pointer
//! movement into enter/leave transitions, and routes events to its
//! listeners. Children are tracked before the node itself; the first child
//! that reports the pointer inside claims the event, and after that only
//! children already holding the pointer are told about it (so they can
//! leave). The node's own listeners still run and see whether a child
//! claimed the event.

use std::fmt;

use crate::event::{KeyEvent, KeyPhase, PointerEvent, PointerKind};
use crate::node::SceneNode;
use crate::Vector2D;

/// Kind of event delivered to a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Button pressed inside the node.
    Down,
    /// Button released inside the node.
    Up,
    /// Pointer moved inside the node.
    Move,
    /// Wheel scrolled inside the node.
    Wheel,
    /// Pointer entered the node.
    Enter,
    /// Pointer left the node.
    Leave,
    /// Key went down.
    KeyDown,
    /// Key produced a character.
    KeyPress,
    /// Key went up.
    KeyUp,
}

impl From<PointerKind> for EventKind {
    fn from(kind: PointerKind) -> Self {
        match kind {
            PointerKind::Down => Self::Down,
            PointerKind::Up => Self::Up,
            PointerKind::Move => Self::Move,
            PointerKind::Wheel => Self::Wheel,
        }
    }
}

impl From<KeyPhase> for EventKind {
    fn from(phase: KeyPhase) -> Self {
        match phase {
            KeyPhase::Down => Self::KeyDown,
            KeyPhase::Press => Self::KeyPress,
            KeyPhase::Up => Self::KeyUp,
        }
    }
}

/// An event as seen by one node's listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEvent {
    /// What happened.
    pub kind: EventKind,
    /// Pointer position in the node's parent space.
    pub point: Vector2D,
    /// Pointer position in the node's inner (children) space.
    pub local: Vector2D,
    /// Wheel delta.
    pub wheel: f64,
    /// The key, for keyboard events.
    pub key: Option<KeyEvent>,
    /// Whether a child already handled this pointer event.
    pub claimed: bool,
}

impl NodeEvent {
    fn from_key(event: &KeyEvent) -> Self {
        Self {
            kind: event.phase.into(),
            point: Vector2D::ZERO,
            local: Vector2D::ZERO,
            wheel: 0.0,
            key: Some(event.clone()),
            claimed: false,
        }
    }
}

/// Listener callback. It receives the node it is installed on.
pub type Listener = Box<dyn FnMut(&mut SceneNode, &NodeEvent)>;

/// Identifier of an installed listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    kind: EventKind,
    behavior: Option<String>,
    callback: Listener,
}

/// Pointer bookkeeping and listeners of an interactive node.
#[derive(Default)]
pub struct InteractionState {
    inside: bool,
    listeners: Vec<ListenerEntry>,
    next_listener: u64,
    drag_anchor: Option<Vector2D>,
    removed: Vec<ListenerId>,
    removed_behaviors: Vec<String>,
}

impl InteractionState {
    fn push(&mut self, kind: EventKind, behavior: Option<&str>, callback: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(ListenerEntry {
            id,
            kind,
            behavior: behavior.map(str::to_string),
            callback,
        });
        id
    }

    fn drop_behavior(&mut self, name: &str) -> usize {
        let before = self.listeners.len();
        self.listeners
            .retain(|l| l.behavior.as_deref() != Some(name));
        before - self.listeners.len()
    }
}

impl fmt::Debug for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionState")
            .field("inside", &self.inside)
            .field("listeners", &self.listeners.len())
            .field("drag_anchor", &self.drag_anchor)
            .finish_non_exhaustive()
    }
}

/// Name of the behavior installed by [`SceneNode::set_draggable`].
pub const DRAG_BEHAVIOR: &str = "drag";

impl SceneNode {
    /// Whether the node reacts to input.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        self.interaction.is_some()
    }

    fn interaction_mut(&mut self) -> &mut InteractionState {
        self.interaction
            .get_or_insert_with(InteractionState::default)
    }

    /// Whether the pointer was inside at the last tracked event.
    #[must_use]
    pub fn is_pointer_inside(&self) -> bool {
        self.interaction.as_ref().is_some_and(|i| i.inside)
    }

    /// Pointer offset captured by the drag behavior, while dragging.
    #[must_use]
    pub fn drag_anchor(&self) -> Option<Vector2D> {
        self.interaction.as_ref().and_then(|i| i.drag_anchor)
    }

    /// Install a listener, making the node interactive if it was not.
    pub fn on(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&mut SceneNode, &NodeEvent) + 'static,
    ) -> ListenerId {
        self.interaction_mut().push(kind, None, Box::new(listener))
    }

    /// Remove a listener. Removing from inside a dispatch takes effect once
    /// that dispatch finishes.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let Some(interaction) = self.interaction.as_mut() else {
            return false;
        };
        let before = interaction.listeners.len();
        interaction.listeners.retain(|l| l.id != id);
        let removed = interaction.listeners.len() != before;
        if !removed {
            interaction.removed.push(id);
        }
        removed
    }

    /// Install a named group of listeners, replacing any group of that name.
    pub fn install_behavior(&mut self, name: &str, listeners: Vec<(EventKind, Listener)>) {
        let interaction = self.interaction_mut();
        interaction.drop_behavior(name);
        interaction.removed_behaviors.retain(|b| b != name);
        for (kind, callback) in listeners {
            interaction.push(kind, Some(name), callback);
        }
        tracing::debug!("Installed behavior {name:?} on {}", self.id());
    }

    /// Remove a named group of listeners. Returns how many were removed.
    pub fn remove_behavior(&mut self, name: &str) -> usize {
        let Some(interaction) = self.interaction.as_mut() else {
            return 0;
        };
        let removed = interaction.drop_behavior(name);
        if removed == 0 {
            interaction.removed_behaviors.push(name.to_string());
        }
        removed
    }

    /// Let the pointer drag this node around its parent space.
    ///
    /// A press not claimed by a child records the offset between the press
    /// point and the node's origin; moves then keep that offset until
    /// release.
    pub fn set_draggable(&mut self, draggable: bool) {
        if !draggable {
            self.remove_behavior(DRAG_BEHAVIOR);
            if let Some(interaction) = self.interaction.as_mut() {
                interaction.drag_anchor = None;
            }
            return;
        }
        let down: Listener = Box::new(|node: &mut SceneNode, event: &NodeEvent| {
            if event.claimed {
                return;
            }
            let mut anchor = event.point;
            anchor.sub(node.position());
            node.interaction_mut().drag_anchor = Some(anchor);
        });
        let moved: Listener = Box::new(|node: &mut SceneNode, event: &NodeEvent| {
            if let Some(anchor) = node.drag_anchor() {
                let mut pos = event.point;
                pos.sub(anchor);
                node.set_position(pos);
            }
        });
        let up: Listener = Box::new(|node: &mut SceneNode, _: &NodeEvent| {
            node.interaction_mut().drag_anchor = None;
        });
        self.install_behavior(
            DRAG_BEHAVIOR,
            vec![
                (EventKind::Down, down),
                (EventKind::Move, moved),
                (EventKind::Up, up),
            ],
        );
    }

    fn emit(&mut self, event: &NodeEvent) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        if !interaction.listeners.iter().any(|l| l.kind == event.kind) {
            return;
        }
        let mut listeners = std::mem::take(&mut interaction.listeners);
        for entry in listeners.iter_mut().filter(|l| l.kind == event.kind) {
            (entry.callback)(self, event);
        }

        let interaction = self.interaction_mut();
        listeners.append(&mut interaction.listeners);
        let removed = std::mem::take(&mut interaction.removed);
        let behaviors = std::mem::take(&mut interaction.removed_behaviors);
        listeners.retain(|l| {
            !removed.contains(&l.id)
                && !l
                    .behavior
                    .as_ref()
                    .is_some_and(|b| behaviors.contains(b))
        });
        interaction.listeners = listeners;
    }

    fn set_inside(&mut self, inside: bool) -> bool {
        let interaction = self.interaction_mut();
        let changed = interaction.inside != inside;
        interaction.inside = inside;
        changed
    }

    /// Mark this node and every interactive descendant as left, firing
    /// leave listeners for those that were inside.
    pub fn force_leave(&mut self, point: Vector2D) {
        if self.is_pointer_inside() {
            self.set_inside(false);
            let local = self.to_inner(point);
            self.emit(&NodeEvent {
                kind: EventKind::Leave,
                point,
                local,
                wheel: 0.0,
                key: None,
                claimed: false,
            });
        }
        let local = self.to_inner(point);
        for child in self.children_mut() {
            child.force_leave(local);
        }
    }

    /// Feed a pointer event given in this node's parent space. Returns
    /// whether the pointer is inside the node (body or any descendant).
    pub fn track_pointer(&mut self, event: &PointerEvent) -> bool {
        let point = event.point();
        let inside = self.hits(point);
        if !self.is_interactive() {
            return inside;
        }
        let local = self.to_inner(point);
        let base = NodeEvent {
            kind: EventKind::Enter,
            point,
            local,
            wheel: event.wheel_delta,
            key: None,
            claimed: false,
        };

        if !inside {
            if self.is_pointer_inside() {
                self.force_leave(point);
            }
            return false;
        }
        if self.set_inside(true) {
            self.emit(&base);
        }

        let inner = PointerEvent {
            x: local.x,
            y: local.y,
            ..*event
        };
        let mut claimed = false;
        for child in self.children_mut() {
            if !child.is_interactive() {
                continue;
            }
            if claimed {
                if child.is_pointer_inside() {
                    child.track_pointer(&inner);
                }
            } else if child.track_pointer(&inner) {
                claimed = true;
            }
        }

        self.emit(&NodeEvent {
            kind: event.kind.into(),
            claimed,
            ..base
        });
        true
    }

    /// Broadcast a key event to this node (if interactive) and every
    /// interactive descendant.
    pub fn dispatch_key(&mut self, event: &KeyEvent) {
        if self.is_interactive() {
            self.emit(&NodeEvent::from_key(event));
        }
        for child in self.children_mut() {
            child.dispatch_key(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::path::PathGraphic;
    use crate::Rect2D;

    fn button(x: f64, y: f64, size: f64) -> SceneNode {
        let mut node = SceneNode::interactive(PathGraphic::rect(Rect2D::new(0.0, 0.0, size, size)));
        node.set_position(Vector2D::new(x, y));
        node
    }

    fn recorder(node: &mut SceneNode, kinds: &[EventKind]) -> Rc<RefCell<Vec<(EventKind, bool)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for &kind in kinds {
            let log = Rc::clone(&log);
            node.on(kind, move |_, event| log.borrow_mut().push((event.kind, event.claimed)));
        }
        log
    }

    #[test]
    fn test_enter_move_leave() {
        let mut node = button(0.0, 0.0, 10.0);
        let log = recorder(&mut node, &[EventKind::Enter, EventKind::Move, EventKind::Leave]);

        assert!(node.track_pointer(&PointerEvent::moved(5.0, 5.0)));
        assert!(node.track_pointer(&PointerEvent::moved(6.0, 5.0)));
        assert!(!node.track_pointer(&PointerEvent::moved(50.0, 5.0)));
        assert!(!node.track_pointer(&PointerEvent::moved(60.0, 5.0)));

        assert_eq!(
            *log.borrow(),
            vec![
                (EventKind::Enter, false),
                (EventKind::Move, false),
                (EventKind::Move, false),
                (EventKind::Leave, false),
            ]
        );
    }

    #[test]
    fn test_first_child_claims() {
        let mut parent = button(0.0, 0.0, 100.0);
        let mut a = button(0.0, 0.0, 20.0);
        let mut b = button(10.0, 0.0, 20.0);
        let log_a = recorder(&mut a, &[EventKind::Down]);
        let log_b = recorder(&mut b, &[EventKind::Down]);
        parent.add(a);
        parent.add(b);
        let log_parent = recorder(&mut parent, &[EventKind::Down]);

        parent.track_pointer(&PointerEvent::down(15.0, 5.0));
        assert_eq!(log_a.borrow().len(), 1);
        assert!(log_b.borrow().is_empty());
        assert_eq!(*log_parent.borrow(), vec![(EventKind::Down, true)]);
    }

    #[test]
    fn test_claimed_children_still_leave() {
        let mut parent = button(0.0, 0.0, 100.0);
        let a = button(0.0, 0.0, 20.0);
        let mut b = button(10.0, 0.0, 20.0);
        let log_b = recorder(&mut b, &[EventKind::Enter, EventKind::Leave]);
        parent.add(a);
        let b_id = parent.add(b);

        parent.track_pointer(&PointerEvent::moved(25.0, 5.0));
        assert!(parent.find(b_id).unwrap().is_pointer_inside());
        parent.track_pointer(&PointerEvent::moved(5.0, 5.0));
        assert!(!parent.find(b_id).unwrap().is_pointer_inside());
        assert_eq!(
            *log_b.borrow(),
            vec![(EventKind::Enter, false), (EventKind::Leave, false)]
        );
    }

    #[test]
    fn test_nested_child_reached_outside_parent_bodies() {
        let mut outer = button(0.0, 0.0, 10.0);
        let mut middle = button(0.0, 0.0, 10.0);
        let mut leaf = button(100.0, 100.0, 10.0);
        let log = recorder(&mut leaf, &[EventKind::Down]);
        middle.add(leaf);
        outer.add(middle);

        assert!(!outer.is_in_group(Vector2D::new(105.0, 105.0)));
        assert!(outer.track_pointer(&PointerEvent::down(105.0, 105.0)));
        assert_eq!(*log.borrow(), vec![(EventKind::Down, false)]);
    }

    #[test]
    fn test_leaving_parent_forces_descendants_out() {
        let mut parent = button(0.0, 0.0, 50.0);
        let mut child = button(0.0, 0.0, 10.0);
        let log = recorder(&mut child, &[EventKind::Leave]);
        let id = parent.add(child);

        parent.track_pointer(&PointerEvent::moved(5.0, 5.0));
        parent.track_pointer(&PointerEvent::moved(500.0, 5.0));
        assert!(!parent.is_pointer_inside());
        assert!(!parent.find(id).unwrap().is_pointer_inside());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_drag_keeps_offset() {
        let mut node = button(10.0, 10.0, 20.0);
        node.set_draggable(true);

        node.track_pointer(&PointerEvent::down(15.0, 12.0));
        assert_eq!(node.drag_anchor(), Some(Vector2D::new(5.0, 2.0)));
        node.track_pointer(&PointerEvent::moved(20.0, 15.0));
        assert_eq!(node.position(), Vector2D::new(15.0, 13.0));
        node.track_pointer(&PointerEvent::up(20.0, 15.0));
        assert_eq!(node.drag_anchor(), None);

        node.set_draggable(false);
        node.track_pointer(&PointerEvent::down(20.0, 15.0));
        assert_eq!(node.drag_anchor(), None);
    }

    #[test]
    fn test_drag_ignores_claimed_press() {
        let mut parent = button(0.0, 0.0, 100.0);
        parent.add(button(0.0, 0.0, 10.0));
        parent.set_draggable(true);

        parent.track_pointer(&PointerEvent::down(5.0, 5.0));
        assert_eq!(parent.drag_anchor(), None);
        parent.track_pointer(&PointerEvent::down(50.0, 50.0));
        assert!(parent.drag_anchor().is_some());
    }

    #[test]
    fn test_listener_removed_during_dispatch() {
        let mut node = button(0.0, 0.0, 10.0);
        let count = Rc::new(RefCell::new(0));
        let id = Rc::new(RefCell::new(None));
        {
            let count = Rc::clone(&count);
            let id_slot = Rc::clone(&id);
            let listener = node.on(EventKind::Down, move |node, _| {
                *count.borrow_mut() += 1;
                if let Some(id) = *id_slot.borrow() {
                    node.off(id);
                }
            });
            *id.borrow_mut() = Some(listener);
        }

        node.track_pointer(&PointerEvent::down(1.0, 1.0));
        node.track_pointer(&PointerEvent::down(1.0, 1.0));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_keys_broadcast_to_descendants() {
        let mut parent = SceneNode::container();
        let mut child = button(0.0, 0.0, 1.0);
        let log = recorder(&mut child, &[EventKind::KeyDown]);
        let mut wrapper = SceneNode::container();
        wrapper.add(child);
        parent.add(wrapper);

        parent.dispatch_key(&KeyEvent::down("ArrowLeft"));
        assert_eq!(log.borrow().len(), 1);
    }
}
