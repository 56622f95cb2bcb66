//! Symbolic access to a field by dotted path.

use super::{FoldOp, PropertyBag, Value, DEFAULT_LEAF_KINDS};

/// A reference to one field of a [`PropertyBag`], addressed by a dotted
/// path such as `"pos.x"` or `"frame.scale"`.
///
/// Reads return values; writes go back through the owner, so typed owners
/// (scene nodes) see every change.
pub struct AttributeHandle<'a> {
    owner: &'a mut dyn PropertyBag,
    path: Vec<String>,
}

impl<'a> AttributeHandle<'a> {
    /// Address `path` on `owner`.
    pub fn new(owner: &'a mut dyn PropertyBag, path: &str) -> Self {
        Self {
            owner,
            path: path.split('.').map(str::to_string).collect(),
        }
    }

    /// The dotted path.
    #[must_use]
    pub fn path(&self) -> String {
        self.path.join(".")
    }

    /// Resolve the current value, or `None` when the path does not exist.
    #[must_use]
    pub fn get(&self) -> Option<Value> {
        let (root, rest) = self.path.split_first()?;
        self.owner.field(root)?.get_path(rest)
    }

    /// Resolve the current value, calling `on_missing` with the path when it
    /// does not exist.
    pub fn get_or_else(&self, on_missing: impl FnOnce(&str)) -> Option<Value> {
        let value = self.get();
        if value.is_none() {
            on_missing(&self.path());
        }
        value
    }

    /// Write `value` at the path. Returns whether the owner accepted it.
    pub fn set(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        let Some((root, rest)) = self.path.split_first() else {
            return false;
        };
        if rest.is_empty() {
            return self.owner.assign(root, value);
        }
        let Some(mut current) = self.owner.field(root) else {
            return false;
        };
        current.set_path(rest, value) && self.owner.assign(root, current)
    }

    /// Mutate the referenced value through `f` and write the result back.
    pub fn call<R>(&mut self, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        let mut value = self.get()?;
        let out = f(&mut value);
        self.set(value);
        Some(out)
    }

    fn fold(&mut self, op: FoldOp, rhs: Value) -> bool {
        let Some(mut value) = self.get() else {
            return false;
        };
        value.fold(op, &rhs, DEFAULT_LEAF_KINDS) && self.set(value)
    }

    /// Add `rhs` to the referenced value (leaf-wise for composites).
    pub fn add(&mut self, rhs: impl Into<Value>) -> bool {
        self.fold(FoldOp::Add, rhs.into())
    }

    /// Subtract `rhs` from the referenced value.
    pub fn sub(&mut self, rhs: impl Into<Value>) -> bool {
        self.fold(FoldOp::Sub, rhs.into())
    }

    /// Multiply the referenced value by `rhs`.
    pub fn multiply(&mut self, rhs: impl Into<Value>) -> bool {
        self.fold(FoldOp::Multiply, rhs.into())
    }
}

impl std::fmt::Debug for AttributeHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeHandle")
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}
