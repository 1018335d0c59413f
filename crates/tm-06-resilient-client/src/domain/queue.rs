//! Bounded outbound queue with drop-oldest eviction.

use shared_types::WireMessage;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct OutboundQueue {
    messages: VecDeque<WireMessage>,
    capacity: usize,
    dropped: u64,
}

impl OutboundQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Enqueue `message`, returning the entry evicted to make room. With a
    /// capacity of 0 the message itself is returned.
    pub fn push(&mut self, message: WireMessage) -> Option<WireMessage> {
        if self.capacity == 0 {
            self.dropped += 1;
            return Some(message);
        }
        let evicted = if self.messages.len() >= self.capacity {
            self.dropped += 1;
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }

    pub fn pop(&mut self) -> Option<WireMessage> {
        self.messages.pop_front()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total evictions since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
