//! Dynamic field values.

use std::collections::BTreeMap;

use crate::shared::Shared;
use crate::transform::{SharedFrame, TransformFrame};
use crate::{Color, PresetTable, Rect2D, Rotation2D, Vector2D};

use super::{DeepClone, Fields};

/// Arithmetic applied by a numeric fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOp {
    /// `a + b`; booleans OR.
    Add,
    /// `a - b`; booleans `a && !b`.
    Sub,
    /// `a * b`; booleans AND.
    Multiply,
}

/// Leaf types a fold is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// Numbers, including the numeric leaves of composites.
    Number,
    /// Booleans.
    Bool,
}

/// Leaf types folded when the caller does not say otherwise.
pub const DEFAULT_LEAF_KINDS: &[LeafKind] = &[LeafKind::Number, LeafKind::Bool];

/// A field value.
///
/// Composite values are [`Shared`]: cloning a `Value` aliases them, and
/// [`DeepClone::deep_clone`] copies them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain number.
    Number(f64),
    /// Boolean flag.
    Bool(bool),
    /// Raw text, including unresolved literals such as `"10,20"`.
    Text(String),
    /// Point or offset.
    Vector(Shared<Vector2D>),
    /// Angle.
    Rotation(Shared<Rotation2D>),
    /// Rectangle.
    Rect(Shared<Rect2D>),
    /// RGBA color.
    Color(Shared<Color>),
    /// Transform frame.
    Frame(SharedFrame),
    /// Ordered values.
    List(Vec<Value>),
    /// Nested bag.
    Bag(Shared<Fields>),
}

impl DeepClone for Value {
    fn deep_clone(&self) -> Self {
        match self {
            Self::Number(_) | Self::Bool(_) | Self::Text(_) => self.clone(),
            Self::Vector(v) => Self::Vector(v.deep_clone()),
            Self::Rotation(r) => Self::Rotation(r.deep_clone()),
            Self::Rect(r) => Self::Rect(r.deep_clone()),
            Self::Color(c) => Self::Color(c.deep_clone()),
            Self::Frame(f) => Self::Frame(f.deep_clone()),
            Self::List(items) => Self::List(items.iter().map(DeepClone::deep_clone).collect()),
            Self::Bag(bag) => Self::Bag(Shared::new(bag.borrow().deep_clone())),
        }
    }
}

impl Value {
    /// Short name of the variant, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Vector(_) => "vector",
            Self::Rotation(_) => "rotation",
            Self::Rect(_) => "rect",
            Self::Color(_) => "color",
            Self::Frame(_) => "frame",
            Self::List(_) => "list",
            Self::Bag(_) => "bag",
        }
    }

    /// Whether both values alias the same composite.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Vector(a), Self::Vector(b)) => a.ptr_eq(b),
            (Self::Rotation(a), Self::Rotation(b)) => a.ptr_eq(b),
            (Self::Rect(a), Self::Rect(b)) => a.ptr_eq(b),
            (Self::Color(a), Self::Color(b)) => a.ptr_eq(b),
            (Self::Frame(a), Self::Frame(b)) => a.ptr_eq(b),
            (Self::Bag(a), Self::Bag(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    // ---- coercion ----

    /// Read as a number. Booleans are 0/1, text is parsed.
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read as a boolean. Numbers are true when non-zero.
    #[must_use]
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read as a vector: a vector, `"x,y"` text, a pair list, or a number
    /// used for both components.
    #[must_use]
    pub fn to_vector(&self) -> Option<Vector2D> {
        match self {
            Self::Vector(v) => Some(v.get()),
            Self::Number(n) => Some(Vector2D::new(*n, *n)),
            Self::Text(s) => s.parse().ok(),
            Self::List(items) => {
                let numbers = Self::list_numbers(items)?;
                Vector2D::from_slice(&numbers)
            }
            _ => None,
        }
    }

    /// Read as a rotation: radians as a number or text, or `"<n>deg"`.
    #[must_use]
    pub fn to_rotation(&self) -> Option<Rotation2D> {
        match self {
            Self::Rotation(r) => Some(r.get()),
            Self::Number(n) => Some(Rotation2D::new(*n)),
            Self::Text(s) => {
                let s = s.trim();
                match s.strip_suffix("deg") {
                    Some(deg) => deg.trim().parse().ok().map(Rotation2D::from_degrees),
                    None => s.parse().ok().map(Rotation2D::new),
                }
            }
            _ => None,
        }
    }

    /// Read as a rectangle: a rect or a four-number list.
    #[must_use]
    pub fn to_rect(&self) -> Option<Rect2D> {
        match self {
            Self::Rect(r) => Some(r.get()),
            Self::List(items) => match Self::list_numbers(items)?.as_slice() {
                [x, y, w, h] => Some(Rect2D::new(*x, *y, *w, *h)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Read as a color, resolving names through `table`.
    #[must_use]
    pub fn to_color_in(&self, table: &PresetTable) -> Option<Color> {
        match self {
            Self::Color(c) => Some(c.get()),
            Self::Text(s) => Color::resolve(s, table).ok(),
            Self::List(items) => Color::from_numbers(&Self::list_numbers(items)?),
            _ => None,
        }
    }

    /// Read as a color using the built-in preset table.
    #[must_use]
    pub fn to_color(&self) -> Option<Color> {
        self.to_color_in(PresetTable::builtin())
    }

    /// Read as a transform frame.
    #[must_use]
    pub fn to_frame(&self) -> Option<TransformFrame> {
        match self {
            Self::Frame(f) => Some(f.get()),
            _ => None,
        }
    }

    /// Read as text.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn list_numbers(items: &[Value]) -> Option<Vec<f64>> {
        items.iter().map(Value::to_number).collect()
    }

    /// Convert into a fresh value of the same variant as `template`.
    ///
    /// This is how raw literals become typed values: `"10,20"` shaped like a
    /// vector becomes a vector.
    #[must_use]
    pub fn coerce_like(&self, template: &Value) -> Option<Value> {
        Some(match template {
            Self::Number(_) => Self::Number(self.to_number()?),
            Self::Bool(_) => Self::Bool(self.to_bool()?),
            Self::Text(_) => Self::Text(self.to_text()?),
            Self::Vector(_) => self.to_vector()?.into(),
            Self::Rotation(_) => self.to_rotation()?.into(),
            Self::Rect(_) => self.to_rect()?.into(),
            Self::Color(_) => self.to_color()?.into(),
            Self::Frame(_) => self.to_frame()?.into(),
            Self::List(_) | Self::Bag(_) => {
                if std::mem::discriminant(self) == std::mem::discriminant(template) {
                    self.clone()
                } else {
                    return None;
                }
            }
        })
    }

    // ---- numeric leaves ----

    /// The numeric leaves of a number or composite, in a fixed order.
    #[must_use]
    pub fn numbers(&self) -> Option<Vec<f64>> {
        Some(match self {
            Self::Number(n) => vec![*n],
            Self::Vector(v) => {
                let v = v.get();
                vec![v.x, v.y]
            }
            Self::Rotation(r) => vec![r.borrow().rad()],
            Self::Rect(r) => {
                let r = r.get();
                vec![r.x, r.y, r.width, r.height]
            }
            Self::Color(c) => c.borrow().bytes().iter().map(|b| f64::from(*b)).collect(),
            Self::Frame(f) => {
                let f = f.get();
                vec![
                    f.translate.x,
                    f.translate.y,
                    f.rotate.rad(),
                    f.scale.x,
                    f.scale.y,
                ]
            }
            _ => return None,
        })
    }

    /// Write numeric leaves in the order of [`Value::numbers`]. Colors clamp.
    fn write_numbers(&mut self, n: &[f64]) -> bool {
        match self {
            Self::Number(v) if n.len() == 1 => *v = n[0],
            Self::Vector(v) if n.len() == 2 => v.set(Vector2D::new(n[0], n[1])),
            Self::Rotation(r) if n.len() == 1 => r.set(Rotation2D::new(n[0])),
            Self::Rect(r) if n.len() == 4 => r.set(Rect2D::new(n[0], n[1], n[2], n[3])),
            Self::Color(c) if n.len() == 4 => {
                let mut color = c.borrow_mut();
                for (i, channel) in n.iter().enumerate() {
                    color.set_channel(i, crate::geometry::clamp_channel(*channel));
                }
            }
            Self::Frame(f) if n.len() == 5 => f.set(TransformFrame::new(
                Vector2D::new(n[0], n[1]),
                Rotation2D::new(n[2]),
                Vector2D::new(n[3], n[4]),
            )),
            _ => return false,
        }
        true
    }

    /// Fold `rhs` into this value in place.
    ///
    /// Matching numbers and booleans combine when their kind is in
    /// `allowed`. Composites fold leaf by leaf; a number on the right is
    /// broadcast over every leaf. Bags and lists recurse into matching
    /// entries. Returns whether anything changed.
    pub fn fold(&mut self, op: FoldOp, rhs: &Value, allowed: &[LeafKind]) -> bool {
        match self {
            Self::Bool(a) => {
                let Self::Bool(b) = rhs else {
                    return false;
                };
                if !allowed.contains(&LeafKind::Bool) {
                    return false;
                }
                *a = match op {
                    FoldOp::Add => *a || *b,
                    FoldOp::Sub => *a && !*b,
                    FoldOp::Multiply => *a && *b,
                };
                return true;
            }
            Self::Bag(a) => {
                let Self::Bag(b) = rhs else {
                    return false;
                };
                let rhs = b.borrow().clone();
                return a.borrow_mut().fold(op, &rhs, allowed);
            }
            Self::List(a) => {
                let Self::List(b) = rhs else {
                    return false;
                };
                let mut changed = false;
                for (x, y) in a.iter_mut().zip(b) {
                    changed |= x.fold(op, y, allowed);
                }
                return changed;
            }
            _ => {}
        }
        if !allowed.contains(&LeafKind::Number) {
            return false;
        }
        let Some(lhs) = self.numbers() else {
            return false;
        };
        let rhs = match rhs {
            Self::Number(n) => vec![*n; lhs.len()],
            other if std::mem::discriminant(other) == std::mem::discriminant(&*self) => {
                match other.numbers() {
                    Some(n) => n,
                    None => return false,
                }
            }
            _ => return false,
        };
        let folded: Vec<f64> = lhs
            .iter()
            .zip(&rhs)
            .map(|(a, b)| match op {
                FoldOp::Add => a + b,
                FoldOp::Sub => a - b,
                FoldOp::Multiply => a * b,
            })
            .collect();
        self.write_numbers(&folded)
    }

    /// Linear interpolation toward `target` at `t` in `[0, 1]`, as a fresh
    /// value of this value's variant.
    #[must_use]
    pub fn lerp(&self, target: &Value, t: f64) -> Option<Value> {
        let from = self.numbers()?;
        let to = target.coerce_like(self)?.numbers()?;
        let mixed: Vec<f64> = from.iter().zip(&to).map(|(a, b)| a + (b - a) * t).collect();
        let mut out = self.deep_clone();
        out.write_numbers(&mixed).then_some(out)
    }

    // ---- dotted paths ----

    /// Resolve a path below this value. An empty path returns the value itself.
    #[must_use]
    pub fn get_path(&self, path: &[String]) -> Option<Value> {
        let Some((head, rest)) = path.split_first() else {
            return Some(self.clone());
        };
        let child = match (self, head.as_str()) {
            (Self::Vector(v), "x") => Self::Number(v.borrow().x),
            (Self::Vector(v), "y") => Self::Number(v.borrow().y),
            (Self::Rotation(r), "rad") => Self::Number(r.borrow().rad()),
            (Self::Rotation(r), "deg") => Self::Number(r.borrow().deg()),
            (Self::Rect(r), key) => {
                let r = r.get();
                Self::Number(match key {
                    "x" | "left" => r.x,
                    "y" | "top" => r.y,
                    "width" => r.width,
                    "height" => r.height,
                    "right" => r.right(),
                    "bottom" => r.bottom(),
                    _ => return None,
                })
            }
            (Self::Color(c), key) => {
                let index = Self::channel_index(key)?;
                Self::Number(f64::from(c.borrow().bytes()[index]))
            }
            (Self::Frame(f), "translate") => f.borrow().translate.into(),
            (Self::Frame(f), "rotate") => f.borrow().rotate.into(),
            (Self::Frame(f), "scale") => f.borrow().scale.into(),
            (Self::Bag(bag), key) => bag.borrow().get(key)?.clone(),
            (Self::List(items), key) => items.get(key.parse::<usize>().ok()?)?.clone(),
            _ => return None,
        };
        child.get_path(rest)
    }

    /// Write `value` at a path below this value, coercing leaf writes to the
    /// leaf's type. Returns whether the path resolved and the write applied.
    pub fn set_path(&mut self, path: &[String], value: Value) -> bool {
        let Some((head, rest)) = path.split_first() else {
            *self = value;
            return true;
        };
        let Some(mut child) = self.get_path(std::slice::from_ref(head)) else {
            if let (Self::Bag(bag), true) = (&*self, rest.is_empty()) {
                bag.borrow_mut().insert(head.as_str(), value);
                return true;
            }
            return false;
        };
        if rest.is_empty() {
            let typed = if matches!(self, Self::Bag(_) | Self::List(_)) {
                Some(value)
            } else {
                value.coerce_like(&child)
            };
            let Some(typed) = typed else {
                return false;
            };
            child = typed;
        } else if !child.set_path(rest, value) {
            return false;
        }
        self.write_child(head, child)
    }

    fn write_child(&mut self, key: &str, child: Value) -> bool {
        match (self, key) {
            (Self::Vector(v), "x") => v.borrow_mut().x = child.to_number().unwrap_or_default(),
            (Self::Vector(v), "y") => v.borrow_mut().y = child.to_number().unwrap_or_default(),
            (Self::Rotation(r), "rad") => {
                r.borrow_mut().set_rad(child.to_number().unwrap_or_default());
            }
            (Self::Rotation(r), "deg") => {
                r.borrow_mut().set_deg(child.to_number().unwrap_or_default());
            }
            (Self::Rect(r), key) => {
                let n = child.to_number().unwrap_or_default();
                let mut r = r.borrow_mut();
                match key {
                    "x" => r.x = n,
                    "y" => r.y = n,
                    "width" => r.width = n,
                    "height" => r.height = n,
                    "left" => {
                        r.set_left(n);
                    }
                    "top" => {
                        r.set_top(n);
                    }
                    "right" => {
                        r.set_right(n);
                    }
                    "bottom" => {
                        r.set_bottom(n);
                    }
                    _ => return false,
                }
            }
            (Self::Color(c), key) => {
                let Some(index) = Self::channel_index(key) else {
                    return false;
                };
                let n = child.to_number().unwrap_or_default();
                c.borrow_mut()
                    .set_channel(index, crate::geometry::clamp_channel(n));
            }
            (Self::Frame(f), "translate") => match child.to_vector() {
                Some(v) => f.borrow_mut().translate = v,
                None => return false,
            },
            (Self::Frame(f), "rotate") => match child.to_rotation() {
                Some(r) => f.borrow_mut().rotate = r,
                None => return false,
            },
            (Self::Frame(f), "scale") => match child.to_vector() {
                Some(v) => f.borrow_mut().scale = v,
                None => return false,
            },
            (Self::Bag(bag), key) => {
                bag.borrow_mut().insert(key, child);
            }
            (Self::List(items), key) => match key.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                Some(slot) => *slot = child,
                None => return false,
            },
            _ => return false,
        }
        true
    }

    fn channel_index(key: &str) -> Option<usize> {
        match key {
            "r" => Some(0),
            "g" => Some(1),
            "b" => Some(2),
            "a" => Some(3),
            _ => None,
        }
    }

    /// Flatten into dotted leaf paths (numbers, booleans and text).
    pub fn collect_leaves(&self, prefix: &str, out: &mut BTreeMap<String, Value>) {
        let join = |key: &str| {
            if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}.{key}")
            }
        };
        match self {
            Self::Number(_) | Self::Bool(_) | Self::Text(_) => {
                out.insert(prefix.to_string(), self.clone());
            }
            Self::Vector(_) => {
                for key in ["x", "y"] {
                    self.leaf(key, &join(key), out);
                }
            }
            Self::Rotation(_) => self.leaf("rad", &join("rad"), out),
            Self::Rect(_) => {
                for key in ["x", "y", "width", "height"] {
                    self.leaf(key, &join(key), out);
                }
            }
            Self::Color(_) => {
                for key in ["r", "g", "b", "a"] {
                    self.leaf(key, &join(key), out);
                }
            }
            Self::Frame(_) => {
                for key in ["translate", "rotate", "scale"] {
                    if let Some(child) = self.get_path(&[key.to_string()]) {
                        child.collect_leaves(&join(key), out);
                    }
                }
            }
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.collect_leaves(&join(&i.to_string()), out);
                }
            }
            Self::Bag(bag) => {
                for (key, value) in bag.borrow().iter() {
                    value.collect_leaves(&join(key), out);
                }
            }
        }
    }

    fn leaf(&self, key: &str, path: &str, out: &mut BTreeMap<String, Value>) {
        if let Some(v) = self.get_path(&[key.to_string()]) {
            out.insert(path.to_string(), v);
        }
    }

    /// Structural equality over dotted leaf paths, in both directions.
    #[must_use]
    pub fn deep_eq(&self, other: &Value) -> bool {
        let mut a = BTreeMap::new();
        let mut b = BTreeMap::new();
        self.collect_leaves("", &mut a);
        other.collect_leaves("", &mut b);
        a == b
    }
}

macro_rules! shared_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(Shared::new(value))
                }
            }
        )*
    };
}

shared_from! {
    Vector2D => Vector,
    Rotation2D => Rotation,
    Rect2D => Rect,
    Color => Color,
    TransformFrame => Frame,
    Fields => Bag,
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<SharedFrame> for Value {
    fn from(value: SharedFrame) -> Self {
        Self::Frame(value)
    }
}

impl From<Shared<Vector2D>> for Value {
    fn from(value: Shared<Vector2D>) -> Self {
        Self::Vector(value)
    }
}

impl From<Option<Color>> for Value {
    fn from(value: Option<Color>) -> Self {
        value.map_or(Self::Bool(false), Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Vec<String> {
        s.split('.').map(str::to_string).collect()
    }

    #[test]
    fn test_coercion_from_literals() {
        assert_eq!(Value::from("10,20").to_vector(), Some(Vector2D::new(10.0, 20.0)));
        assert_eq!(
            Value::List(vec![2.0.into(), 3.0.into()]).to_vector(),
            Some(Vector2D::new(2.0, 3.0))
        );
        assert_eq!(Value::Number(2.0).to_vector(), Some(Vector2D::new(2.0, 2.0)));
        assert_eq!(Value::from("red").to_color(), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Value::from("90deg").to_rotation(), Some(Rotation2D::from_degrees(90.0)));
        assert!(Value::from("nope").to_vector().is_none());
    }

    #[test]
    fn test_coerce_like_template() {
        let template = Value::from(Vector2D::ZERO);
        let coerced = Value::from("1,2").coerce_like(&template).unwrap();
        assert_eq!(coerced, Value::from(Vector2D::new(1.0, 2.0)));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let original = Value::from(Fields::new().with("pos", Vector2D::new(1.0, 2.0)));
        let copy = original.deep_clone();
        assert!(!copy.ptr_eq(&original));
        assert!(copy.deep_eq(&original));

        let mut copy = copy;
        assert!(copy.set_path(&path("pos.x"), 9.0.into()));
        assert_eq!(original.get_path(&path("pos.x")), Some(Value::Number(1.0)));
        assert!(!copy.deep_eq(&original));
    }

    #[test]
    fn test_shallow_clone_aliases() {
        let v = Value::from(Vector2D::new(1.0, 1.0));
        let mut alias = v.clone();
        assert!(alias.ptr_eq(&v));
        alias.set_path(&path("y"), 5.0.into());
        assert_eq!(v.to_vector(), Some(Vector2D::new(1.0, 5.0)));
    }

    #[test]
    fn test_fold_numbers_bools_and_composites() {
        let mut n = Value::Number(2.0);
        assert!(n.fold(FoldOp::Multiply, &Value::Number(4.0), DEFAULT_LEAF_KINDS));
        assert_eq!(n, Value::Number(8.0));

        let mut b = Value::Bool(true);
        b.fold(FoldOp::Sub, &Value::Bool(true), DEFAULT_LEAF_KINDS);
        assert_eq!(b, Value::Bool(false));
        b.fold(FoldOp::Add, &Value::Bool(true), DEFAULT_LEAF_KINDS);
        assert_eq!(b, Value::Bool(true));

        let mut v = Value::from(Vector2D::new(1.0, 2.0));
        v.fold(FoldOp::Add, &Value::from(Vector2D::new(10.0, 20.0)), DEFAULT_LEAF_KINDS);
        assert_eq!(v.to_vector(), Some(Vector2D::new(11.0, 22.0)));
        v.fold(FoldOp::Multiply, &Value::Number(2.0), DEFAULT_LEAF_KINDS);
        assert_eq!(v.to_vector(), Some(Vector2D::new(22.0, 44.0)));
    }

    #[test]
    fn test_fold_respects_allowed_kinds() {
        let mut b = Value::Bool(false);
        assert!(!b.fold(FoldOp::Add, &Value::Bool(true), &[LeafKind::Number]));
        assert_eq!(b, Value::Bool(false));

        let mut n = Value::Number(1.0);
        assert!(!n.fold(FoldOp::Add, &Value::Number(1.0), &[LeafKind::Bool]));
        assert!(!n.fold(FoldOp::Add, &Value::from("1"), DEFAULT_LEAF_KINDS));
    }

    #[test]
    fn test_color_fold_clamps() {
        let mut c = Value::from(Color::rgb(250, 10, 0));
        c.fold(FoldOp::Add, &Value::Number(10.0), DEFAULT_LEAF_KINDS);
        assert_eq!(c.to_color(), Some(Color::rgba(255, 20, 10, 255)));
    }

    #[test]
    fn test_frame_paths() {
        let mut frame = Value::from(TransformFrame::IDENTITY);
        assert!(frame.set_path(&path("translate.x"), 4.0.into()));
        assert!(frame.set_path(&path("scale"), "2,3".into()));
        let f = frame.to_frame().unwrap();
        assert_eq!(f.translate, Vector2D::new(4.0, 0.0));
        assert_eq!(f.scale, Vector2D::new(2.0, 3.0));
        assert_eq!(frame.get_path(&path("rotate.rad")), Some(Value::Number(0.0)));
        assert!(frame.get_path(&path("skew")).is_none());
    }

    #[test]
    fn test_lerp_composite() {
        let from = Value::from(Vector2D::ZERO);
        let mid = from.lerp(&Value::from(Vector2D::new(10.0, -4.0)), 0.5).unwrap();
        assert_eq!(mid.to_vector(), Some(Vector2D::new(5.0, -2.0)));
        assert!(!mid.ptr_eq(&from));
    }

    #[test]
    fn test_deep_eq_is_bidirectional() {
        let a = Value::from(Fields::new().with("a", 1.0));
        let b = Value::from(Fields::new().with("a", 1.0).with("b", 2.0));
        assert!(!a.deep_eq(&b));
        assert!(!b.deep_eq(&a));
    }
}
