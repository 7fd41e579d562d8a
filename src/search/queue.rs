// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone, Copy)]
pub(super) struct QueueItem {
    pub(super) at: i64,
    pub(super) cost: f64,
    pub(super) score: f64,
    seq: u64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores (and earlier insertions) are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of search states.
///
/// Items with equal scores are popped in insertion order, which makes
/// the choice between multiple equally short routes reproducible.
/// Multiple items for the same node may be present at once; stale ones
/// must be skipped by the caller.
#[derive(Debug, Default)]
pub(super) struct Queue {
    heap: BinaryHeap<QueueItem>,
    pushed: u64,
}

impl Queue {
    pub(super) fn push(&mut self, at: i64, cost: f64, score: f64) {
        let seq = self.pushed;
        self.pushed += 1;
        self.heap.push(QueueItem {
            at,
            cost,
            score,
            seq,
        });
    }

    pub(super) fn pop(&mut self) -> Option<QueueItem> {
        self.heap.pop()
    }
}

pub(super) fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    return path;
}
