//! Virtual-time scheduler for deferred transitions.
//!
//! Timed behavior (the end of a peck, a laying pause, each hatch frame) is
//! queued here as a plain task value instead of a callback. The owner drains
//! due tasks with [`Scheduler::pop_due`] at the start of every tick. Each
//! task is released at its own due time, so a task that schedules a
//! follow-up computes that follow-up's due time from the exact moment it
//! fired rather than from the end of the tick window.
//!
//! Tasks due at the same instant fire in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    due_ms: f64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of tasks keyed by virtual due time in milliseconds.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_seq: u64,
    queue: BinaryHeap<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at virtual time zero.
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time.
    ///
    /// While draining, this is the due time of the task most recently
    /// released, which lets that task compute follow-up delays exactly.
    pub const fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Queue `task` to fire `delay_ms` after the current virtual time.
    ///
    /// Negative or non-finite delays are treated as zero.
    pub fn schedule(&mut self, delay_ms: f64, task: T) {
        let delay = if delay_ms.is_finite() && delay_ms > 0.0 {
            delay_ms
        } else {
            0.0
        };
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.push(Entry {
            due_ms: self.now_ms + delay,
            seq,
            task,
        });
    }

    /// Release the earliest task due at or before `horizon_ms`.
    ///
    /// Virtual time moves forward to the released task's due time.
    pub fn pop_due(&mut self, horizon_ms: f64) -> Option<T> {
        if self.queue.peek()?.due_ms > horizon_ms {
            return None;
        }
        let entry = self.queue.pop()?;
        if entry.due_ms > self.now_ms {
            self.now_ms = entry.due_ms;
        }
        Some(entry.task)
    }

    /// Move virtual time to `horizon_ms` once every due task is drained.
    ///
    /// Time never runs backwards.
    pub fn advance_to(&mut self, horizon_ms: f64) {
        if horizon_ms > self.now_ms {
            self.now_ms = horizon_ms;
        }
    }

    /// Due time of the earliest pending task.
    pub fn next_due_ms(&self) -> Option<f64> {
        self.queue.peek().map(|entry| entry.due_ms)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300.0, "late");
        scheduler.schedule(100.0, "first");
        scheduler.schedule(100.0, "second");

        assert_eq!(scheduler.pop_due(1_000.0), Some("first"));
        assert_eq!(scheduler.pop_due(1_000.0), Some("second"));
        assert_eq!(scheduler.pop_due(1_000.0), Some("late"));
        assert_eq!(scheduler.pop_due(1_000.0), None);
    }

    #[test]
    fn respects_horizon() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(50.0, 1);
        assert_eq!(scheduler.pop_due(49.0), None);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.pop_due(50.0), Some(1));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn chained_delays_stay_exact() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(800.0, 1);
        // A single large window: the follow-up is measured from 800, not 5000.
        let fired = scheduler.pop_due(5_000.0);
        assert_eq!(fired, Some(1));
        assert!((scheduler.now_ms() - 800.0).abs() < f64::EPSILON);
        scheduler.schedule(800.0, 2);
        assert_eq!(scheduler.next_due_ms(), Some(1_600.0));
        assert_eq!(scheduler.pop_due(5_000.0), Some(2));
        scheduler.advance_to(5_000.0);
        assert!((scheduler.now_ms() - 5_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_delays_fire_immediately() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(10.0);
        scheduler.schedule(-5.0, 'a');
        scheduler.schedule(f64::NAN, 'b');
        assert_eq!(scheduler.next_due_ms(), Some(10.0));
        assert_eq!(scheduler.pop_due(10.0), Some('a'));
        assert_eq!(scheduler.pop_due(10.0), Some('b'));
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        scheduler.advance_to(100.0);
        scheduler.advance_to(40.0);
        assert!((scheduler.now_ms() - 100.0).abs() < f64::EPSILON);
    }
}
