//! Virtual-time timer queue.
//!
//! A single-threaded stand-in for `setTimeout`/`setInterval`. Time only moves
//! when the owner advances it: from the animation frame loop in the browser,
//! by hand in tests. Timers fire in due order, ties broken by creation order.

use crate::handle::Release;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Identifier of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// How a timer repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Fires once
    Timeout,
    /// Fires every `period_ms`
    Interval {
        /// Period between firings, at least 1 ms
        period_ms: u64,
    },
}

#[derive(Debug, Clone)]
struct Entry<T> {
    kind: TimerKind,
    task: T,
}

/// Timer queue over tasks of type `T`
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now_ms: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TimerId), Entry<T>>,
    due_by_id: HashMap<TimerId, u64>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T> TimerQueue<T> {
    /// Create a queue whose clock reads `now_ms`
    #[must_use]
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms,
            next_id: 0,
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Current virtual time
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of pending timers
    #[must_use]
    pub fn len(&self) -> usize {
        self.due_by_id.len()
    }

    /// Whether nothing is scheduled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.due_by_id.is_empty()
    }

    /// Whether the timer is still pending
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id)
    }

    /// Due time of a pending timer
    #[must_use]
    pub fn due_at(&self, id: TimerId) -> Option<u64> {
        self.due_by_id.get(&id).copied()
    }

    /// Schedule `task` to fire once after `delay_ms`
    pub fn set_timeout(&mut self, delay_ms: u64, task: T) -> TimerId {
        self.insert(self.now_ms + delay_ms, TimerKind::Timeout, task)
    }

    /// Schedule `task` to fire every `period_ms` (clamped to at least 1 ms)
    pub fn set_interval(&mut self, period_ms: u64, task: T) -> TimerId {
        let period_ms = period_ms.max(1);
        self.insert(
            self.now_ms + period_ms,
            TimerKind::Interval { period_ms },
            task,
        )
    }

    /// Cancel a timer. Unknown or already-fired ids are ignored.
    pub fn clear(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id) {
            Some(due) => {
                self.queue.remove(&(due, id));
                tracing::trace!(?id, "timer cleared");
                true
            }
            None => false,
        }
    }

    /// Cancel every timer
    pub fn clear_all(&mut self) {
        self.queue.clear();
        self.due_by_id.clear();
    }

    /// Move the clock forward to `now_ms` without firing anything.
    /// The clock never runs backwards.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn insert(&mut self, due: u64, kind: TimerKind, task: T) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.queue.insert((due, id), Entry { kind, task });
        self.due_by_id.insert(id, due);
        id
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// The clock is moved to the timer's due time, so anything scheduled
    /// while handling the task is relative to when it was meant to fire.
    /// Intervals are re-armed at `due + period`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, T)> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > until_ms {
            return None;
        }
        let entry = self.queue.remove(&(due, id))?;
        self.now_ms = self.now_ms.max(due);

        match entry.kind {
            TimerKind::Timeout => {
                self.due_by_id.remove(&id);
            }
            TimerKind::Interval { period_ms } => {
                let next = due + period_ms;
                self.queue.insert(
                    (next, id),
                    Entry {
                        kind: entry.kind,
                        task: entry.task.clone(),
                    },
                );
                self.due_by_id.insert(id, next);
            }
        }
        Some((id, entry.task))
    }

    /// Collapse intervals that missed more than one period before `now_ms`.
    ///
    /// Each such interval keeps a single pending firing at its latest missed
    /// slot and stays on its original phase, the way a throttled browser
    /// interval fires once after a background tab wakes up rather than
    /// replaying every tick. Returns how many intervals were collapsed.
    pub fn coalesce_missed(&mut self, now_ms: u64) -> usize {
        let late: Vec<(u64, TimerId, u64)> = self
            .queue
            .iter()
            .take_while(|((due, _), _)| *due <= now_ms)
            .filter_map(|(&(due, id), entry)| match entry.kind {
                TimerKind::Interval { period_ms } if due + period_ms <= now_ms => {
                    let latest = due + (now_ms - due) / period_ms * period_ms;
                    Some((due, id, latest))
                }
                _ => None,
            })
            .collect();

        for &(due, id, latest) in &late {
            if let Some(entry) = self.queue.remove(&(due, id)) {
                self.queue.insert((latest, id), entry);
                self.due_by_id.insert(id, latest);
            }
        }
        late.len()
    }

    /// Fire everything due up to `now_ms` and return the tasks in order.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<T> {
        let mut fired = Vec::new();
        while let Some((_, task)) = self.pop_due(now_ms) {
            fired.push(task);
        }
        self.advance_to(now_ms);
        fired
    }
}

impl<T> Release<TimerQueue<T>> for TimerId {
    fn release(self, ctx: &mut TimerQueue<T>) {
        ctx.clear(self);
    }
}

/// Convert a `performance.now()` style timestamp to whole milliseconds
#[must_use]
pub fn to_millis(timestamp: f64) -> u64 {
    if timestamp.is_finite() && timestamp > 0.0 {
        timestamp as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_fires_once() {
        let mut q = TimerQueue::new(0);
        let id = q.set_timeout(150, "nav");
        assert!(q.drain_due(149).is_empty());
        assert!(q.is_pending(id));
        assert_eq!(q.drain_due(150), vec!["nav"]);
        assert!(!q.is_pending(id));
        assert!(q.drain_due(10_000).is_empty());
    }

    #[test]
    fn test_interval_rearms() {
        let mut q = TimerQueue::new(0);
        let id = q.set_interval(5000, "slide");
        assert_eq!(q.drain_due(4999).len(), 0);
        assert_eq!(q.drain_due(5000).len(), 1);
        assert_eq!(q.due_at(id), Some(10_000));
        assert_eq!(q.drain_due(20_000).len(), 3);
        assert_eq!(q.due_at(id), Some(25_000));
        assert!(q.is_pending(id));
    }

    #[test]
    fn test_coalesce_missed_fires_once() {
        let mut q = TimerQueue::new(0);
        let id = q.set_interval(5000, "slide");
        let once = q.set_timeout(100, "toast");
        assert_eq!(q.drain_due(5000), vec!["toast", "slide"]);
        assert!(!q.is_pending(once));

        // an hour without frames
        assert_eq!(q.coalesce_missed(3_602_500), 1);
        assert_eq!(q.due_at(id), Some(3_600_000));
        assert_eq!(q.drain_due(3_602_500), vec!["slide"]);
        assert_eq!(q.due_at(id), Some(3_605_000));
    }

    #[test]
    fn test_coalesce_keeps_single_missed_period() {
        let mut q = TimerQueue::new(0);
        let id = q.set_interval(5000, ());
        assert_eq!(q.coalesce_missed(9999), 0);
        assert_eq!(q.due_at(id), Some(5000));
        assert_eq!(q.coalesce_missed(10_000), 1);
        assert_eq!(q.drain_due(10_000).len(), 1);
        assert_eq!(q.due_at(id), Some(15_000));
    }

    #[test]
    fn test_clear_cancels() {
        let mut q = TimerQueue::new(0);
        let id = q.set_timeout(10, 1);
        assert!(q.clear(id));
        assert!(!q.clear(id));
        assert!(q.drain_due(100).is_empty());
        assert!(q.is_empty());
    }

    #[test]
    fn test_release_handle_clears() {
        let mut q = TimerQueue::new(0);
        let id = q.set_interval(10, ());
        id.release(&mut q);
        assert!(q.is_empty());
    }

    #[test]
    fn test_due_order_and_ties() {
        let mut q = TimerQueue::new(0);
        q.set_timeout(20, "b");
        q.set_timeout(10, "a");
        q.set_timeout(20, "c");
        assert_eq!(q.drain_due(100), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_pop_due_moves_clock_to_due_time() {
        let mut q = TimerQueue::new(0);
        q.set_timeout(10, "first");
        let (_, task) = q.pop_due(1000).unwrap();
        assert_eq!(task, "first");
        assert_eq!(q.now_ms(), 10);
        // scheduled relative to the firing time, not the frame time
        q.set_timeout(5, "second");
        assert_eq!(q.pop_due(1000).map(|(_, t)| t), Some("second"));
        assert_eq!(q.now_ms(), 15);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut q: TimerQueue<()> = TimerQueue::new(500);
        q.advance_to(100);
        assert_eq!(q.now_ms(), 500);
    }

    #[test]
    fn test_zero_period_interval_clamped() {
        let mut q = TimerQueue::new(0);
        q.set_interval(0, ());
        assert_eq!(q.drain_due(3).len(), 3);
    }

    #[test]
    fn test_to_millis() {
        assert_eq!(to_millis(1234.9), 1234);
        assert_eq!(to_millis(-5.0), 0);
        assert_eq!(to_millis(f64::NAN), 0);
    }
}
