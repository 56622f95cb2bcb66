//! Named state snapshots with a restorable baseline.

use std::collections::{BTreeSet, HashMap};

use crate::props::{self, AssignMode, DeepClone, Fields, PropertyBag};

/// Selects a snapshot by registration index or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKey<'a> {
    /// Slot index; `0` is the baseline.
    Index(usize),
    /// Name given to [`StateSnapshotSet::put`].
    Name(&'a str),
}

impl From<usize> for SnapshotKey<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for SnapshotKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

/// Partial field overlays over one owner, plus a baseline in slot 0.
///
/// Switching away from the baseline first captures the owner's live value
/// of every field any overlay touches, so [`restore`](Self::restore) returns
/// to whatever was showing before. Switching between two overlays only
/// captures fields the baseline has not seen yet; the first capture wins
/// until the owner is back on the baseline.
#[derive(Debug, Clone)]
pub struct StateSnapshotSet {
    slots: Vec<Fields>,
    names: HashMap<String, usize>,
    current: usize,
}

impl Default for StateSnapshotSet {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSnapshotSet {
    /// Create a set holding only an empty baseline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Fields::new()],
            names: HashMap::new(),
            current: 0,
        }
    }

    /// Register a positional overlay. Returns its slot index.
    pub fn push(&mut self, overlay: Fields) -> usize {
        self.slots.push(overlay);
        self.slots.len() - 1
    }

    /// Register or replace a named overlay. Returns its slot index.
    pub fn put(&mut self, name: &str, overlay: Fields) -> usize {
        if let Some(&index) = self.names.get(name) {
            self.slots[index] = overlay;
            return index;
        }
        let index = self.push(overlay);
        self.names.insert(name.to_string(), index);
        index
    }

    /// Number of slots, baseline included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether only the baseline exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.len() <= 1
    }

    /// Index of the selected slot.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Name of the selected slot, if it was registered by name.
    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, &i)| i == self.current)
            .map(|(name, _)| name.as_str())
    }

    /// The captured baseline.
    #[must_use]
    pub fn baseline(&self) -> &Fields {
        &self.slots[0]
    }

    /// Overlay stored under `key`.
    #[must_use]
    pub fn get(&self, key: SnapshotKey<'_>) -> Option<&Fields> {
        self.slots.get(self.index_of(key)?)
    }

    fn index_of(&self, key: SnapshotKey<'_>) -> Option<usize> {
        match key {
            SnapshotKey::Index(i) if i < self.slots.len() => Some(i),
            SnapshotKey::Index(_) => None,
            SnapshotKey::Name(name) => self.names.get(name).copied(),
        }
    }

    fn touched(&self) -> BTreeSet<String> {
        self.slots
            .iter()
            .skip(1)
            .flat_map(|slot| slot.names().map(str::to_string))
            .collect()
    }

    fn capture(&mut self, owner: &dyn PropertyBag) {
        let rolling = self.current == 0;
        for name in self.touched() {
            if !rolling && self.slots[0].contains(&name) {
                continue;
            }
            let live = if name.contains('.') {
                let (root, rest) = name.split_once('.').unwrap_or((name.as_str(), ""));
                let rest: Vec<String> = rest.split('.').map(str::to_string).collect();
                owner.field(root).and_then(|v| v.get_path(&rest))
            } else {
                owner.field(&name)
            };
            if let Some(value) = live {
                self.slots[0].insert(&name, value.deep_clone());
            }
        }
    }

    /// Capture the baseline, then apply the overlay under `key` onto `owner`.
    ///
    /// Returns `false` (and leaves the owner untouched) for an unknown key.
    /// Selecting slot 0 is the same as [`restore`](Self::restore).
    pub fn switch_to<'k>(&mut self, owner: &mut dyn PropertyBag, key: impl Into<SnapshotKey<'k>>) -> bool {
        let key = key.into();
        let Some(index) = self.index_of(key) else {
            tracing::debug!("No state snapshot {key:?}");
            return false;
        };
        if index == 0 {
            self.restore(owner);
            return true;
        }
        self.capture(owner);
        self.current = index;
        tracing::debug!("Switching to state snapshot {index}");
        props::update_values(owner, &self.slots[index], AssignMode::Clone);
        true
    }

    /// Reapply the baseline.
    pub fn restore(&mut self, owner: &mut dyn PropertyBag) {
        self.current = 0;
        tracing::debug!("Restoring baseline state");
        props::update_values(owner, &self.slots[0], AssignMode::Clone);
    }

    /// Advance to the next slot in registration order, wrapping to the
    /// baseline.
    pub fn toggle(&mut self, owner: &mut dyn PropertyBag) -> usize {
        let next = (self.current + 1) % self.slots.len();
        self.switch_to(owner, next);
        self.current
    }

    /// Re-merge the selected slot onto `owner`, aliasing its values.
    pub fn apply_current(&self, owner: &mut dyn PropertyBag) {
        props::update_values(owner, &self.slots[self.current], AssignMode::Identical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Value;
    use crate::Color;

    fn white() -> Value {
        Color::rgb(255, 255, 255).into()
    }

    fn owner() -> Fields {
        Fields::new().with("fill", white()).with("width", 10.0)
    }

    fn set() -> StateSnapshotSet {
        let mut states = StateSnapshotSet::new();
        states.put("hover", Fields::new().with("fill", Color::rgb(0, 0, 255)));
        states.put("press", Fields::new().with("fill", Color::rgb(255, 0, 0)).with("width", 12.0));
        states
    }

    #[test]
    fn test_switch_and_restore() {
        let mut owner = owner();
        let mut states = set();
        assert!(states.switch_to(&mut owner, "hover"));
        assert_eq!(owner.get("fill").and_then(Value::to_color), Some(Color::rgb(0, 0, 255)));
        assert_eq!(states.current_name(), Some("hover"));

        states.restore(&mut owner);
        assert_eq!(owner.get("fill"), Some(&white()));
    }

    #[test]
    fn test_restore_after_second_switch() {
        let mut owner = owner();
        let mut states = set();
        states.switch_to(&mut owner, "hover");
        states.switch_to(&mut owner, "press");
        assert_eq!(owner.get("width"), Some(&Value::Number(12.0)));

        states.restore(&mut owner);
        assert_eq!(owner.get("fill"), Some(&white()));
        assert_eq!(owner.get("width"), Some(&Value::Number(10.0)));
    }

    #[test]
    fn test_baseline_rolls_forward() {
        let mut owner = owner();
        let mut states = set();
        states.switch_to(&mut owner, "hover");
        states.restore(&mut owner);

        owner.insert("width", 30.0);
        states.switch_to(&mut owner, "press");
        states.restore(&mut owner);
        assert_eq!(owner.get("width"), Some(&Value::Number(30.0)));
    }

    #[test]
    fn test_toggle_wraps_to_baseline() {
        let mut owner = owner();
        let mut states = set();
        assert_eq!(states.toggle(&mut owner), 1);
        assert_eq!(states.toggle(&mut owner), 2);
        assert_eq!(states.toggle(&mut owner), 0);
        assert_eq!(owner.get("fill"), Some(&white()));
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut owner = owner();
        let mut states = set();
        assert!(!states.switch_to(&mut owner, "missing"));
        assert!(!states.switch_to(&mut owner, 9_usize));
        assert_eq!(states.current(), 0);
    }

    #[test]
    fn test_baseline_is_a_copy() {
        let mut owner = owner();
        let mut states = set();
        states.switch_to(&mut owner, "hover");
        let captured = states.baseline().get("fill").unwrap().clone();
        owner.get("fill").unwrap().clone().set_path(&["r".into()], 0.0.into());
        assert_eq!(captured, white());
    }
}
