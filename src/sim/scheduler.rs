//! Cooperative timer scheduler on simulated time
//!
//! One logical timeline: the host feeds elapsed milliseconds and the game
//! pops due tasks one at a time, running each to completion before asking
//! for the next. A task cancelled by an earlier task in the same batch never
//! fires.

use serde::{Deserialize, Serialize};

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    due_ms: u64,
    /// Repeat interval for periodic timers
    period_ms: Option<u64>,
    task: T,
}

/// Named, cancellable one-shot and periodic timers
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            timers: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Run `task` once, `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: u64, task: T) -> TimerId {
        let id = self.allocate_id();
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            period_ms: None,
            task,
        });
        id
    }

    /// Run `task` every `period_ms`, first firing one period from now
    pub fn schedule_every(&mut self, period_ms: u64, task: T) -> TimerId {
        debug_assert!(period_ms > 0, "periodic timer needs a non-zero period");
        let id = self.allocate_id();
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms.saturating_add(period_ms),
            period_ms: Some(period_ms),
            task,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest task due at or before `until_ms`, advancing the clock
    /// to its due time. Ties fire in scheduling order. Periodic timers are
    /// re-armed before returning; one whose next due time would overflow the
    /// clock fires this last time and is dropped.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, T)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let due_ms = self.timers[idx].due_ms;
        self.now_ms = self.now_ms.max(due_ms);

        let next_due = self.timers[idx]
            .period_ms
            .and_then(|period| due_ms.checked_add(period));
        match next_due {
            Some(next) => {
                let timer = &mut self.timers[idx];
                timer.due_ms = next;
                Some((timer.id, timer.task.clone()))
            }
            None => {
                let timer = self.timers.swap_remove(idx);
                Some((timer.id, timer.task))
            }
        }
    }

    /// Move the clock forward once every due task has been popped
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
