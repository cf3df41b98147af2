//! Ignition event queue
//!
//! Min-priority queue over settled ignition times. Events with equal times
//! come out in the order they were pushed, which keeps runs reproducible.

use crate::core_types::units::Seconds;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Pending expansion of a settled point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnitionEvent {
    /// Settled ignition time of the point
    pub time: Seconds,
    /// Index of the point in the point set
    pub index: usize,
    sequence: u64,
}

impl Ord for IgnitionEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for IgnitionEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary-heap event queue, earliest ignition first
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<IgnitionEvent>>,
    next_sequence: u64,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule expansion of point `index` at `time`
    pub fn push(&mut self, index: usize, time: Seconds) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(IgnitionEvent {
            time,
            index,
            sequence,
        }));
    }

    /// Remove and return the earliest event
    pub fn pop(&mut self) -> Option<IgnitionEvent> {
        self.heap.pop().map(|Reverse(event)| event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut queue = EventQueue::new();
        queue.push(0, Seconds::new(900.0));
        queue.push(1, Seconds::new(0.0));
        queue.push(2, Seconds::new(450.5));

        let order: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|e| e.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_ties_are_first_in_first_out() {
        let mut queue = EventQueue::new();
        for index in [7, 3, 9, 1] {
            queue.push(index, Seconds::new(720.0));
        }
        queue.push(5, Seconds::new(100.0));

        let order: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|e| e.index).collect();
        assert_eq!(order, vec![5, 7, 3, 9, 1]);
    }
}
