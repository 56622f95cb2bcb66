use serde::{Deserialize, Serialize};

use super::Vector2D;

/// An axis-aligned rectangle: a position plus width and height.
///
/// The edge accessors are derived. Setting an edge keeps the opposite edge
/// where it was and adjusts the width or height instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect2D {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect2D {
    /// Create a rectangle from position and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A zero-sized rectangle sitting on `point`.
    #[must_use]
    pub const fn at(point: Vector2D) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// Smallest rectangle holding every point, or `None` for no points.
    pub fn from_points<I: IntoIterator<Item = Vector2D>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut rect = Self::at(iter.next()?);
        for p in iter {
            rect.expand(p);
        }
        Some(rect)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vector2D {
        Vector2D::new(self.x, self.y)
    }

    /// Width and height as a vector.
    #[must_use]
    pub const fn size(&self) -> Vector2D {
        Vector2D::new(self.width, self.height)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Move the left edge, keeping the right edge fixed.
    pub fn set_left(&mut self, left: f64) -> &mut Self {
        self.width = self.right() - left;
        self.x = left;
        self
    }

    /// Move the right edge, keeping the left edge fixed.
    pub fn set_right(&mut self, right: f64) -> &mut Self {
        self.width = right - self.x;
        self
    }

    /// Move the top edge, keeping the bottom edge fixed.
    pub fn set_top(&mut self, top: f64) -> &mut Self {
        self.height = self.bottom() - top;
        self.y = top;
        self
    }

    /// Move the bottom edge, keeping the top edge fixed.
    pub fn set_bottom(&mut self, bottom: f64) -> &mut Self {
        self.height = bottom - self.y;
        self
    }

    /// Grow to include `point`.
    pub fn expand(&mut self, point: Vector2D) -> &mut Self {
        self.expand_xy(point.x, point.y)
    }

    /// Grow to include `(x, y)`.
    pub fn expand_xy(&mut self, x: f64, y: f64) -> &mut Self {
        if x < self.left() {
            self.set_left(x);
        } else if x > self.right() {
            self.set_right(x);
        }
        if y < self.top() {
            self.set_top(y);
        } else if y > self.bottom() {
            self.set_bottom(y);
        }
        self
    }

    /// Grow to the union with `other` by including its four corners.
    pub fn add(&mut self, other: &Self) -> &mut Self {
        self.expand_xy(other.left(), other.top())
            .expand_xy(other.right(), other.top())
            .expand_xy(other.right(), other.bottom())
            .expand_xy(other.left(), other.bottom())
    }

    /// Whether `point` lies inside or on the border.
    #[must_use]
    pub fn contains(&self, point: Vector2D) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// The four corners, clockwise from the top-left.
    #[must_use]
    pub fn corners(&self) -> [Vector2D; 4] {
        [
            Vector2D::new(self.left(), self.top()),
            Vector2D::new(self.right(), self.top()),
            Vector2D::new(self.right(), self.bottom()),
            Vector2D::new(self.left(), self.bottom()),
        ]
    }

    /// Copy scaled component-wise around the origin.
    #[must_use]
    pub fn scaled(&self, scale: Vector2D) -> Self {
        Self::from_points(self.corners().map(|mut c| *c.scale_xy(scale)))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_setters_keep_opposite_edge() {
        let mut r = Rect2D::new(10.0, 10.0, 20.0, 20.0);
        r.set_left(5.0);
        assert_eq!(r.right(), 30.0);
        assert_eq!(r.width, 25.0);

        r.set_bottom(50.0);
        assert_eq!(r.top(), 10.0);
        assert_eq!(r.height, 40.0);
    }

    #[test]
    fn test_expand_includes_point() {
        let mut r = Rect2D::at(Vector2D::ZERO);
        r.expand(Vector2D::new(-5.0, 8.0)).expand_xy(3.0, -2.0);
        assert_eq!(r, Rect2D::new(-5.0, -2.0, 8.0, 10.0));
    }

    #[test]
    fn test_add_is_union() {
        let mut a = Rect2D::new(0.0, 0.0, 10.0, 10.0);
        a.add(&Rect2D::new(5.0, -5.0, 20.0, 5.0));
        assert_eq!(a, Rect2D::new(0.0, -5.0, 25.0, 15.0));
    }

    #[test]
    fn test_scaled_with_negative_factor() {
        let r = Rect2D::new(1.0, 1.0, 2.0, 2.0).scaled(Vector2D::new(-1.0, 2.0));
        assert_eq!(r, Rect2D::new(-3.0, 2.0, 2.0, 4.0));
    }
}
