//! Input events delivered to a scene.
//!
//! Coordinates are surface coordinates; converting raw client coordinates
//! from an input source is the renderer's job.

use serde::{Deserialize, Serialize};

use crate::Vector2D;

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Pointer moved.
    Move,
    /// Wheel scrolled.
    Wheel,
}

/// A pointer (mouse, pen, primary touch) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerKind,
    /// X position in surface coordinates.
    pub x: f64,
    /// Y position in surface coordinates.
    pub y: f64,
    /// Button index (0 = primary).
    #[serde(default)]
    pub button: u8,
    /// Wheel delta; zero for non-wheel events.
    #[serde(default)]
    pub wheel_delta: f64,
}

impl PointerEvent {
    /// Create a pointer event with the primary button and no wheel delta.
    #[must_use]
    pub const fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            button: 0,
            wheel_delta: 0.0,
        }
    }

    /// Button press at `(x, y)`.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    /// Button release at `(x, y)`.
    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    /// Pointer movement to `(x, y)`.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    /// Wheel scroll at `(x, y)`.
    #[must_use]
    pub const fn wheel(x: f64, y: f64, delta: f64) -> Self {
        Self {
            wheel_delta: delta,
            ..Self::new(PointerKind::Wheel, x, y)
        }
    }

    /// Position as a vector.
    #[must_use]
    pub const fn point(&self) -> Vector2D {
        Vector2D::new(self.x, self.y)
    }
}

/// Phase of a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPhase {
    /// Key went down.
    Down,
    /// Key produced a character.
    Press,
    /// Key went up.
    Up,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift held.
    pub shift: bool,
    /// Control held.
    pub ctrl: bool,
    /// Alt/Option held.
    pub alt: bool,
    /// Meta/Command held.
    pub meta: bool,
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Phase of the key.
    pub phase: KeyPhase,
    /// Key identifier (`"ArrowUp"`, `"a"`, ...).
    pub key: String,
    /// Modifier state.
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub fn new(phase: KeyPhase, key: impl Into<String>) -> Self {
        Self {
            phase,
            key: key.into(),
            modifiers: KeyModifiers::default(),
        }
    }

    /// Key-down for `key`.
    #[must_use]
    pub fn down(key: impl Into<String>) -> Self {
        Self::new(KeyPhase::Down, key)
    }

    /// Key-up for `key`.
    #[must_use]
    pub fn up(key: impl Into<String>) -> Self {
        Self::new(KeyPhase::Up, key)
    }
}

/// Any input event a scene can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Pointer event.
    Pointer(PointerEvent),
    /// Keyboard event.
    Key(KeyEvent),
    /// The surface was resized.
    Resize {
        /// New width in pixels.
        width: f64,
        /// New height in pixels.
        height: f64,
    },
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}
