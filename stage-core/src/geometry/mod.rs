//! Geometry kernel: vectors, rotations, rectangles and colors.
//!
//! These are plain value types. The mutating arithmetic methods return
//! `&mut Self` so calls can be chained:
//!
//! ```
//! use stage_core::Vector2D;
//!
//! let mut v = Vector2D::new(3.0, 4.0);
//! v.scale(2.0).sub(Vector2D::new(6.0, 0.0));
//! assert_eq!(v, Vector2D::new(0.0, 8.0));
//! ```

mod color;
mod rect;
mod rotation;
mod vector;

pub use color::Color;
pub(crate) use color::clamp_channel;
pub use rect::Rect2D;
pub use rotation::Rotation2D;
pub use vector::Vector2D;

/// Tolerance used for approximate floating-point comparisons.
pub const EPSILON: f64 = 1e-4;
