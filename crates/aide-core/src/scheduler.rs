//! Cooperative one-shot timers
//!
//! Nothing here sleeps. The owner asks for the next deadline, waits for it on
//! its own event loop, then drains whatever is due. A cancelled timer is
//! removed outright, so its continuation can never be handed back.

use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

/// Work to resume once a timer expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Deliver the assistant reply to a submitted message
    Respond { text: String },
    /// The simulated voice capture has finished
    FinishListening,
    /// Auto-hide the visible status notification
    HideStatus,
}

/// Identifies one scheduled timer; invalid once fired or cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry {
    deadline: Instant,
    continuation: Continuation,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    entries: BTreeMap<TimerHandle, Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration, continuation: Continuation) -> TimerHandle {
        self.schedule_at(Instant::now() + delay, continuation)
    }

    pub fn schedule_at(&mut self, deadline: Instant, continuation: Continuation) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        tracing::debug!(timer = handle.0, ?continuation, "timer scheduled");
        self.entries.insert(handle, Entry { deadline, continuation });
        handle
    }

    /// Returns false if the timer already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.entries.remove(&handle).is_some();
        if removed {
            tracing::debug!(timer = handle.0, "timer cancelled");
        }
        removed
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|e| e.deadline).min()
    }

    /// Remove and return the earliest continuation due at `now`. Equal
    /// deadlines come out in scheduling order.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerHandle, Continuation)> {
        let handle = self
            .entries
            .iter()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(h, e)| (e.deadline, **h))
            .map(|(h, _)| *h)?;

        self.entries
            .remove(&handle)
            .map(|entry| (handle, entry.continuation))
    }

    pub fn pending(&self) -> impl Iterator<Item = (TimerHandle, Instant, &Continuation)> {
        self.entries.iter().map(|(h, e)| (*h, e.deadline, &e.continuation))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sleep until `deadline`, or forever when nothing is scheduled
pub async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
