//! Delayed one-shot tasks with session-scoped cancellation.
//!
//! Every task is tagged with the [`SessionId`] that was live when it was
//! scheduled. Ending a session cancels all of its pending tasks, so a timer
//! started on one level can never fire into the next.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

#[derive(Debug)]
struct Pending<T> {
    due_ms: f64,
    seq: u64,
    session: SessionId,
    task: T,
}

/// Clocked queue of delayed tasks. Time only moves through [`Scheduler::advance`].
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_seq: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: f64, session: SessionId, task: T) {
        let delay_ms = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms,
            seq: self.next_seq,
            session,
            task,
        });
        self.next_seq += 1;
    }

    /// Drop every pending task tagged with `session`. Returns how many were dropped.
    pub fn cancel_session(&mut self, session: SessionId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.session != session);
        let cancelled = before - self.pending.len();
        if cancelled > 0 {
            log::debug!("Cancelled {cancelled} pending task(s) for {session}");
        }
        cancelled
    }

    /// Move the clock forward and return due tasks, earliest first (ties in
    /// scheduling order).
    pub fn advance(&mut self, dt_ms: f64) -> Vec<(SessionId, T)> {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.now_ms += dt_ms;
        }
        let now = self.now_ms;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| (p.session, p.task)).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_for(&self, session: SessionId) -> impl Iterator<Item = &T> {
        self.pending
            .iter()
            .filter(move |p| p.session == session)
            .map(|p| &p.task)
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
