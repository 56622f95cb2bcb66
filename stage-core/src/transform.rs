//! Transform frames: translate, rotate and non-uniform scale.

use serde::{Deserialize, Serialize};

use crate::shared::Shared;
use crate::surface::DrawingSurface;
use crate::{Rotation2D, Vector2D};

/// A frame shared between a node and anything that aliased it.
pub type SharedFrame = Shared<TransformFrame>;

/// A translate → rotate → scale coordinate frame.
///
/// [`apply`](Self::apply) maps a parent-space point into local space and
/// [`restore`](Self::restore) maps it back. The two always use the same
/// operation order, so they are exact inverses up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformFrame {
    /// Offset of the local origin in parent space.
    pub translate: Vector2D,
    /// Rotation around the local origin.
    pub rotate: Rotation2D,
    /// Non-uniform scale applied last.
    pub scale: Vector2D,
}

impl Default for TransformFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformFrame {
    /// No translation, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translate: Vector2D::ZERO,
        rotate: Rotation2D::ZERO,
        scale: Vector2D::ONE,
    };

    /// Create a frame from its three parts.
    #[must_use]
    pub const fn new(translate: Vector2D, rotate: Rotation2D, scale: Vector2D) -> Self {
        Self {
            translate,
            rotate,
            scale,
        }
    }

    /// A pure translation.
    #[must_use]
    pub const fn at(translate: Vector2D) -> Self {
        Self {
            translate,
            ..Self::IDENTITY
        }
    }

    /// Parent space → local space: subtract translation, rotate by the
    /// negative angle, divide by scale.
    #[must_use]
    pub fn apply(&self, point: Vector2D) -> Vector2D {
        let mut p = point;
        p.sub(self.translate).rotate(-self.rotate.rad()).divide_xy(self.scale);
        p
    }

    /// Local space → parent space: multiply by scale, rotate by the angle,
    /// add translation.
    #[must_use]
    pub fn restore(&self, point: Vector2D) -> Vector2D {
        let mut p = point;
        p.scale_xy(self.scale).rotate(self.rotate.rad()).add(self.translate);
        p
    }

    /// Push this frame onto `surface`'s current matrix.
    pub fn transform(&self, surface: &mut dyn DrawingSurface) {
        surface.translate(self.translate.x, self.translate.y);
        surface.rotate(self.rotate.rad());
        surface.scale(self.scale.x, self.scale.y);
    }

    /// Accumulate `other`: translations and rotations add, scales multiply
    /// component-wise.
    ///
    /// This is not a matrix composition. A rotated frame followed by a
    /// translated one does not produce `a.restore(b.restore(p))`.
    pub fn add(&mut self, other: &Self) -> &mut Self {
        self.translate.add(other.translate);
        self.rotate.add(other.rotate);
        self.scale.scale_xy(other.scale);
        self
    }
}
