//! Single-slot one-shot timer.
//!
//! Holds at most one pending deadline. Scheduling replaces whatever was
//! pending, so two steps can never be queued at once, and dropping the owner
//! drops the timer with it. The event loop asks for [`Timer::deadline`] and
//! calls [`Timer::take_due`]; nothing runs on another thread.

use std::time::Instant;

/// A pending one-shot event carrying a payload `K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled<K> {
    pub due: Instant,
    pub kind: K,
}

#[derive(Debug, Clone)]
pub struct Timer<K> {
    pending: Option<Scheduled<K>>,
}

impl<K> Default for Timer<K> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<K: Copy> Timer<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer, invalidating any pending event.
    pub fn schedule(&mut self, due: Instant, kind: K) {
        self.pending = Some(Scheduled { due, kind });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|s| s.due)
    }

    /// Disarm and return the pending event if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<Scheduled<K>> {
        match self.pending {
            Some(s) if s.due <= now => self.pending.take(),
            _ => None,
        }
    }

    /// Disarm and return the pending event regardless of time.
    pub fn take(&mut self) -> Option<Scheduled<K>> {
        self.pending.take()
    }
}
