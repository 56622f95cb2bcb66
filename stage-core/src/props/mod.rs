//! Property bags: the merge, clone and access layer under every
//! configurable entity.
//!
//! A [`PropertyBag`] exposes named fields as dynamic [`Value`]s. Scene nodes
//! implement it over their typed fields; [`Fields`] is the free-form bag
//! used for overlays and defaults. The free functions here merge one bag
//! into another under an [`AssignMode`]:
//!
//! | mode            | composites written as |
//! |-----------------|-----------------------|
//! | `Identical`     | the caller's value (aliased) |
//! | `Clone`         | a deep copy |
//! | `Uninitialized` | nothing; initialization is skipped |
//!
//! ```
//! use stage_core::props::{self, AssignMode, Fields, PropertyBag};
//! use stage_core::Vector2D;
//!
//! let shared = Fields::new().with("pos", Vector2D::new(1.0, 2.0));
//! let mut target = Fields::new();
//! props::update_values(&mut target, &shared, AssignMode::Identical);
//! assert!(target.field("pos").unwrap().ptr_eq(shared.get("pos").unwrap()));
//! ```

mod fields;
mod handle;
mod value;

use std::collections::{BTreeMap, HashSet};

pub use fields::Fields;
pub use handle::AttributeHandle;
pub use value::{FoldOp, LeafKind, Value, DEFAULT_LEAF_KINDS};

/// How composite values are written during a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssignMode {
    /// Alias the given value.
    Identical,
    /// Deep-copy the given value.
    #[default]
    Clone,
    /// Skip initialization entirely.
    Uninitialized,
}

/// Values that can produce an independent copy of themselves.
pub trait DeepClone {
    /// Copy, recursively, so no composite is shared with `self`.
    #[must_use]
    fn deep_clone(&self) -> Self;
}

/// A container of named fields.
pub trait PropertyBag {
    /// Names of the fields that make up this bag's defaults surface.
    fn field_names(&self) -> Vec<String>;

    /// Current value of a field.
    ///
    /// Free-form bags return aliases of stored composites. Typed bags may
    /// return copies of values they store inline, so writes must go back
    /// through [`assign`](Self::assign).
    fn field(&self, name: &str) -> Option<Value>;

    /// Write a field. Returns `false` when the bag rejects the name or the
    /// value cannot be coerced to the field's type.
    fn assign(&mut self, name: &str, value: Value) -> bool;

    /// Coerce raw literals into typed values after a merge.
    fn resolve_all(&mut self) {}

    /// Handle on a dotted path.
    fn handle(&mut self, path: &str) -> AttributeHandle<'_>
    where
        Self: Sized,
    {
        AttributeHandle::new(self, path)
    }
}

fn write(target: &mut dyn PropertyBag, name: &str, value: &Value, mode: AssignMode) -> bool {
    let value = match mode {
        AssignMode::Identical => value.clone(),
        AssignMode::Clone => value.deep_clone(),
        AssignMode::Uninitialized => return false,
    };
    if name.contains('.') {
        return AttributeHandle::new(target, name).set(value);
    }
    target.assign(name, value)
}

/// Seed `defaults` (always cloned), then write `values` under `mode`.
///
/// Does nothing in [`AssignMode::Uninitialized`]. Unknown names in `values`
/// are attempted best-effort.
pub fn initialize(target: &mut dyn PropertyBag, values: &Fields, defaults: &Fields, mode: AssignMode) {
    if mode == AssignMode::Uninitialized {
        return;
    }
    set_values(target, defaults);
    for (name, value) in values.iter() {
        if !write(target, name, value, mode) {
            tracing::trace!("Rejected initial value for {name:?} ({})", value.kind());
        }
    }
    target.resolve_all();
}

/// Write only fields that `target` does not already have.
pub fn insert_values(target: &mut dyn PropertyBag, values: &Fields, mode: AssignMode) {
    for (name, value) in values.iter() {
        if target.field(name).is_none() {
            write(target, name, value, mode);
        }
    }
}

/// Overwrite every field named in `defaults` with a deep copy.
pub fn set_values(target: &mut dyn PropertyBag, defaults: &Fields) {
    for (name, value) in defaults.iter() {
        write(target, name, value, AssignMode::Clone);
    }
}

/// Write `values` under `mode`, then run [`PropertyBag::resolve_all`].
///
/// Names on the target's defaults surface are written structurally; other
/// names (including dotted paths) are attempted best-effort and rejections
/// are logged.
pub fn update_values(target: &mut dyn PropertyBag, values: &Fields, mode: AssignMode) {
    if mode == AssignMode::Uninitialized {
        return;
    }
    let known: HashSet<String> = target.field_names().into_iter().collect();
    for (name, value) in values.iter() {
        let accepted = write(target, name, value, mode);
        if !accepted {
            if known.contains(name) {
                tracing::trace!("Could not coerce {} into field {name:?}", value.kind());
            } else {
                tracing::trace!("Best-effort write to {name:?} rejected");
            }
        }
    }
    target.resolve_all();
}

/// Every dotted leaf path of `bag` with its value.
#[must_use]
pub fn leaf_map(bag: &dyn PropertyBag) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    for name in bag.field_names() {
        if let Some(value) = bag.field(&name) {
            value.collect_leaves(&name, &mut out);
        }
    }
    out
}

/// Structural equality: every leaf of `a` exists with an equal value on `b`
/// and vice versa.
#[must_use]
pub fn deep_equals(a: &dyn PropertyBag, b: &dyn PropertyBag) -> bool {
    leaf_map(a) == leaf_map(b)
}

/// Fold `rhs` into the matching fields of `target`, writing changed fields
/// back. Returns whether anything changed.
pub fn fold(target: &mut dyn PropertyBag, op: FoldOp, rhs: &Fields, allowed: &[LeafKind]) -> bool {
    let mut changed = false;
    for (name, value) in rhs.iter() {
        let Some(mut current) = target.field(name) else {
            continue;
        };
        if current.fold(op, value, allowed) {
            changed |= target.assign(name, current);
        }
    }
    changed
}
