//! Array-backed binary min-heap of [`Task`]s keyed by scheduled time.
//!
//! Heap order: every non-root element is scheduled no earlier than its parent.
//! Ties are resolved by position and carry no ordering guarantee. The heap is
//! not synchronized; the scheduler only touches it under its own lock.

use chrono::{DateTime, Utc};

use crate::error::SchedulerError;
use crate::task::Task;

#[derive(Debug, Default)]
pub struct TimeHeap {
    items: Vec<Task>,
}

impl TimeHeap {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Append a task and sift it up. O(log n).
    pub fn insert(&mut self, task: Task) {
        self.items.push(task);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the earliest task. O(log n).
    pub fn extract_min(&mut self) -> Result<Task, SchedulerError> {
        if self.items.is_empty() {
            return Err(SchedulerError::EmptyQueue);
        }
        // swap_remove moves the last slot into the root.
        let min = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// The earliest task, if any.
    pub fn peek_min(&self) -> Option<&Task> {
        self.items.first()
    }

    /// Scheduled time of the earliest task, if any.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.peek_min().map(Task::scheduled_at)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn key(&self, index: usize) -> DateTime<Utc> {
        self.items[index].scheduled_at()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.key(index) >= self.key(parent) {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.key(left) < self.key(smallest) {
                smallest = left;
            }
            if right < len && self.key(right) < self.key(smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.items.swap(index, smallest);
            index = smallest;
        }
    }

    #[cfg(test)]
    fn is_heap_ordered(&self) -> bool {
        (1..self.items.len()).all(|i| self.key(i) >= self.key((i - 1) / 2))
    }
}
