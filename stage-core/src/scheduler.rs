//! Per-frame tick scheduler.
//!
//! A [`TickScheduler`] is an ordered list of timed callbacks. Every
//! [`update`](TickScheduler::update) adds `delta` (normalized frame time) to
//! each event's progress; once progress reaches the interval it resets, a
//! positive repeat counter decrements, and the callback fires with its own
//! [`TickState`] and the caller's context. Events whose repeat counter is
//! exactly zero after the pass are dropped; [`REPEAT_FOREVER`] never is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Repeat count for events that run until removed.
pub const REPEAT_FOREVER: i64 = -1;

/// Identifier of a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickId(u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// The mutable bookkeeping of one event, handed to its callback.
///
/// A callback may change its own interval, or end itself by setting
/// `repeat` to zero; the event is dropped after the current pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickState {
    id: TickId,
    /// Optional name, used by [`TickScheduler::remove_named`].
    pub name: Option<String>,
    /// Accumulated time since the last firing.
    pub progress: f64,
    /// Time between firings.
    pub interval: f64,
    /// Remaining firings, or [`REPEAT_FOREVER`].
    pub repeat: i64,
}

impl TickState {
    /// This event's identifier.
    #[must_use]
    pub const fn id(&self) -> TickId {
        self.id
    }
}

/// Callback invoked when an event fires.
pub type TickCallback<C> = Box<dyn FnMut(&mut TickState, &mut C)>;

struct TickEvent<C> {
    state: TickState,
    callback: TickCallback<C>,
}

/// Ordered list of timed callbacks over a context `C`.
pub struct TickScheduler<C> {
    events: Vec<TickEvent<C>>,
    next_id: u64,
    detached: bool,
    cancelled: Vec<TickId>,
}

impl<C> Default for TickScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TickScheduler<C> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_id: 0,
            detached: false,
            cancelled: Vec::new(),
        }
    }

    /// Register a callback firing every `interval` for `repeat` times
    /// ([`REPEAT_FOREVER`] for no limit).
    ///
    /// A repeat of zero registers nothing that will ever fire; the event is
    /// dropped on the next update.
    pub fn schedule(
        &mut self,
        name: Option<&str>,
        interval: f64,
        repeat: i64,
        callback: impl FnMut(&mut TickState, &mut C) + 'static,
    ) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.events.push(TickEvent {
            state: TickState {
                id,
                name: name.map(str::to_string),
                progress: 0.0,
                interval,
                repeat,
            },
            callback: Box::new(callback),
        });
        id
    }

    /// Register a callback firing every `interval` until removed.
    pub fn every(
        &mut self,
        interval: f64,
        callback: impl FnMut(&mut TickState, &mut C) + 'static,
    ) -> TickId {
        self.schedule(None, interval, REPEAT_FOREVER, callback)
    }

    /// Register a callback firing once after `delay`.
    pub fn once(
        &mut self,
        delay: f64,
        callback: impl FnMut(&mut TickState, &mut C) + 'static,
    ) -> TickId {
        self.schedule(None, delay, 1, callback)
    }

    /// Advance every event by `delta`, firing those that are due. Returns the
    /// number of callbacks fired.
    pub fn update(&mut self, delta: f64, context: &mut C) -> usize {
        let mut fired = 0;
        for event in &mut self.events {
            if event.state.repeat == 0 {
                continue;
            }
            event.state.progress += delta;
            if event.state.progress >= event.state.interval {
                event.state.progress = 0.0;
                if event.state.repeat > 0 {
                    event.state.repeat -= 1;
                }
                (event.callback)(&mut event.state, context);
                fired += 1;
            }
        }
        self.events.retain(|e| e.state.repeat != 0);
        fired
    }

    /// Drop an event. While the events are detached, an id that is not
    /// present is remembered and dropped on [`reattach`](Self::reattach).
    pub fn remove(&mut self, id: TickId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.state.id != id);
        let removed = self.events.len() != before;
        if !removed && self.detached {
            self.cancelled.push(id);
        }
        removed
    }

    /// Drop every event with the given name. Returns how many were dropped.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.state.name.as_deref() != Some(name));
        before - self.events.len()
    }

    /// Drop every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of registered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether an event is registered.
    #[must_use]
    pub fn contains(&self, id: TickId) -> bool {
        self.events.iter().any(|e| e.state.id == id)
    }

    /// Bookkeeping of a registered event.
    #[must_use]
    pub fn state(&self, id: TickId) -> Option<&TickState> {
        self.events.iter().map(|e| &e.state).find(|s| s.id == id)
    }

    /// Take the events out, leaving an empty scheduler that keeps issuing
    /// fresh ids.
    ///
    /// Lets an owner run its scheduler with itself as the context: detach,
    /// update the detached list against the owner, then
    /// [`reattach`](Self::reattach). Events scheduled or removed on the owner
    /// in the meantime are merged back.
    #[must_use]
    pub fn detach(&mut self) -> Self {
        let placeholder = Self {
            events: Vec::new(),
            next_id: self.next_id,
            detached: true,
            cancelled: Vec::new(),
        };
        std::mem::replace(self, placeholder)
    }

    /// Put back a list taken with [`detach`](Self::detach).
    pub fn reattach(&mut self, detached: Self) {
        let placeholder = std::mem::replace(self, detached);
        self.next_id = self.next_id.max(placeholder.next_id);
        self.events.extend(placeholder.events);
        if !placeholder.cancelled.is_empty() {
            self.events
                .retain(|e| !placeholder.cancelled.contains(&e.state.id));
        }
        self.cancelled.clear();
    }
}

impl<C> fmt::Debug for TickScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.events.iter().map(|e| &e.state))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_and_repeat() {
        let mut scheduler = TickScheduler::<Vec<f64>>::new();
        let mut log = Vec::new();
        let id = scheduler.schedule(Some("t"), 10.0, 3, |tick, log: &mut Vec<f64>| {
            log.push(tick.progress);
        });

        for _ in 0..29 {
            scheduler.update(1.0, &mut log);
        }
        assert_eq!(log.len(), 2);
        assert!(scheduler.contains(id));
        assert_eq!(scheduler.state(id).map(|s| s.repeat), Some(1));

        scheduler.update(1.0, &mut log);
        assert_eq!(log, vec![0.0, 0.0, 0.0]);
        assert!(!scheduler.contains(id));
    }

    #[test]
    fn test_large_delta_fires_once_per_update() {
        let mut scheduler = TickScheduler::<u32>::new();
        let mut count = 0;
        scheduler.schedule(None, 10.0, 3, |_, n: &mut u32| *n += 1);

        assert_eq!(scheduler.update(25.0, &mut count), 1);
        scheduler.update(10.0, &mut count);
        scheduler.update(10.0, &mut count);
        assert_eq!(count, 3);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_forever_and_self_removal() {
        let mut scheduler = TickScheduler::<u32>::new();
        let mut count = 0;
        scheduler.every(1.0, |tick, n: &mut u32| {
            *n += 1;
            if *n == 5 {
                tick.repeat = 0;
            }
        });
        for _ in 0..10 {
            scheduler.update(1.0, &mut count);
        }
        assert_eq!(count, 5);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_callback_can_change_interval() {
        let mut scheduler = TickScheduler::<Vec<u32>>::new();
        let mut frames = Vec::new();
        let mut frame = 0;
        scheduler.schedule(None, 1.0, 3, move |tick, out: &mut Vec<u32>| {
            frame += 1;
            out.push(frame);
            tick.interval = 2.0;
        });
        for _ in 0..5 {
            scheduler.update(1.0, &mut frames);
        }
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn test_zero_repeat_never_fires() {
        let mut scheduler = TickScheduler::<u32>::new();
        let mut count = 0;
        scheduler.schedule(None, 0.0, 0, |_, n: &mut u32| *n += 1);
        scheduler.update(1.0, &mut count);
        assert_eq!(count, 0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_detach_reattach_merges_changes() {
        let mut scheduler = TickScheduler::<u32>::new();
        let a = scheduler.every(1.0, |_, _| {});
        let b = scheduler.every(1.0, |_, _| {});

        let mut detached = scheduler.detach();
        let c = scheduler.once(1.0, |_, _| {});
        assert!(!scheduler.remove(b));
        detached.update(1.0, &mut 0);
        scheduler.reattach(detached);

        assert!(scheduler.contains(a));
        assert!(!scheduler.contains(b));
        assert!(scheduler.contains(c));
        assert_ne!(a, c);
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_stale_removals_are_not_kept() {
        let mut scheduler = TickScheduler::<u32>::new();
        let done = scheduler.once(1.0, |_, _| {});
        scheduler.update(1.0, &mut 0);
        for _ in 0..100 {
            assert!(!scheduler.remove(done));
        }
        assert!(scheduler.cancelled.is_empty());

        for _ in 0..3 {
            let mut detached = scheduler.detach();
            assert!(!scheduler.remove(done));
            detached.update(1.0, &mut 0);
            scheduler.reattach(detached);
            assert!(scheduler.cancelled.is_empty());
        }
    }

    #[test]
    fn test_remove_named() {
        let mut scheduler = TickScheduler::<()>::new();
        scheduler.schedule(Some("blink"), 1.0, REPEAT_FOREVER, |_, _| {});
        scheduler.schedule(Some("blink"), 2.0, REPEAT_FOREVER, |_, _| {});
        scheduler.schedule(Some("move"), 1.0, REPEAT_FOREVER, |_, _| {});
        assert_eq!(scheduler.remove_named("blink"), 2);
        assert_eq!(scheduler.len(), 1);
    }
}
