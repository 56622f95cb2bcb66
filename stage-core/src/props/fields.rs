//! The dynamic field bag.

use std::collections::BTreeMap;

use super::{DeepClone, FoldOp, LeafKind, PropertyBag, Value};

/// An ordered map of named [`Value`]s.
///
/// Used for overlays (state snapshots), defaults tables and ad-hoc bags.
/// Unknown names are always accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: BTreeMap<String, Value>,
}

impl Fields {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.to_string(), value.into())
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Look up a field mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries.get_mut(name)
    }

    /// Remove a field.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Whether a field exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fold every field of `rhs` into the same-named field here.
    pub fn fold(&mut self, op: FoldOp, rhs: &Fields, allowed: &[LeafKind]) -> bool {
        let mut changed = false;
        for (name, value) in rhs.iter() {
            if let Some(slot) = self.entries.get_mut(name) {
                changed |= slot.fold(op, value, allowed);
            }
        }
        changed
    }
}

impl DeepClone for Fields {
    fn deep_clone(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.deep_clone()))
                .collect(),
        }
    }
}

impl PropertyBag for Fields {
    fn field_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }

    fn assign(&mut self, name: &str, value: Value) -> bool {
        self.entries.insert(name.to_string(), value);
        true
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
