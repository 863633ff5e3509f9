//! Typed, frame-scoped event queue.
//!
//! Producers push during the frame; the owner drains at a fixed point so
//! handlers run in push order within the same frame step.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct EventQueue<T> {
    events: VecDeque<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    pub fn send(&mut self, event: T) {
        self.events.push_back(event);
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Take the oldest pending event. Handlers may send more events while the
    /// owner loops on this.
    pub fn pop(&mut self) -> Option<T> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
