// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pending-work priority queue.
//!
//! Items pop in order of priority (lower first), then submission time,
//! then sequence number. Sequence numbers are unique per scheduler, so the
//! order is total and ties never fall through to the payload.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::types::SubcircuitDescriptor;

/// A queued subcircuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub priority: u32,
    /// Logical time at submission
    pub submitted_at: f64,
    pub sequence: u64,
    pub subcircuit: SubcircuitDescriptor,
}

impl WorkItem {
    /// The same item with its priority decayed by one step.
    pub fn requeued(mut self) -> Self {
        self.priority = self.priority.saturating_add(1);
        self
    }

    fn key(&self) -> (u32, f64, u64) {
        (self.priority, self.submitted_at, self.sequence)
    }
}

impl PartialEq for WorkItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WorkItem {}

impl PartialOrd for WorkItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WorkItem {
    fn cmp(&self, other: &Self) -> Ordering {
        let (pa, ta, sa) = self.key();
        let (pb, tb, sb) = other.key();
        pa.cmp(&pb)
            .then_with(|| ta.total_cmp(&tb))
            .then_with(|| sa.cmp(&sb))
    }
}

/// Min-ordered queue of [`WorkItem`]s.
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    heap: BinaryHeap<Reverse<WorkItem>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: WorkItem) {
        self.heap.push(Reverse(item));
    }

    /// Remove the item that should run next.
    pub fn pop(&mut self) -> Option<WorkItem> {
        self.heap.pop().map(|Reverse(item)| item)
    }

    pub fn peek(&self) -> Option<&WorkItem> {
        self.heap.peek().map(|Reverse(item)| item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Items in pop order, without draining.
    pub fn to_sorted_vec(&self) -> Vec<WorkItem> {
        let mut items: Vec<WorkItem> = self.heap.iter().map(|Reverse(item)| item.clone()).collect();
        items.sort();
        items
    }
}
