use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::model::TopEntry;

/// Bounded tracker for the K largest files seen so far.
///
/// Holds at most `capacity` entries in a min-heap keyed by the `TopEntry`
/// ordering, so a full tree of any size costs O(K) memory and each `offer` is
/// O(log K). A capacity of zero is legal and keeps the tracker permanently
/// empty, which lets callers disable largest-file reporting without a special
/// case.
#[derive(Debug, Clone)]
pub struct TopFileTracker {
    capacity: usize,
    heap: BinaryHeap<Reverse<TopEntry>>,
}

impl TopFileTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Consider a candidate. Below capacity it is always kept; at capacity it
    /// replaces the weakest kept entry only when it ranks strictly higher
    /// (bigger, or equal-sized with a lexicographically smaller path).
    pub fn offer(&mut self, entry: TopEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(entry));
            return;
        }
        let replaces_weakest = self.heap.peek().is_some_and(|weakest| entry > weakest.0);
        if replaces_weakest {
            self.heap.pop();
            self.heap.push(Reverse(entry));
        }
    }

    /// Kept entries sorted descending by size, ties ascending by path.
    pub fn snapshot(&self) -> Vec<TopEntry> {
        let mut entries = self
            .heap
            .iter()
            .map(|Reverse(entry)| entry.clone())
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.cmp(a));
        entries
    }

    pub fn into_sorted_entries(self) -> Vec<TopEntry> {
        let mut entries = self
            .heap
            .into_iter()
            .map(|Reverse(entry)| entry)
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.cmp(a));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::TopFileTracker;
    use crate::model::TopEntry;

    fn entry(size_bytes: u64, path: &str) -> TopEntry {
        TopEntry {
            size_bytes,
            path: path.to_string(),
        }
    }

    #[test]
    fn keeps_everything_below_capacity() {
        let mut tracker = TopFileTracker::new(5);
        tracker.offer(entry(10, "a"));
        tracker.offer(entry(20, "b"));
        assert_eq!(tracker.capacity(), 5);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.snapshot(), vec![entry(20, "b"), entry(10, "a")]);
    }

    #[test]
    fn evicts_the_smallest_at_capacity() {
        let mut tracker = TopFileTracker::new(2);
        tracker.offer(entry(10, "a"));
        tracker.offer(entry(30, "b"));
        tracker.offer(entry(20, "c"));
        assert_eq!(tracker.snapshot(), vec![entry(30, "b"), entry(20, "c")]);

        tracker.offer(entry(5, "d"));
        assert_eq!(tracker.snapshot(), vec![entry(30, "b"), entry(20, "c")]);
    }

    #[test]
    fn equal_sizes_break_ties_by_ascending_path() {
        let mut tracker = TopFileTracker::new(2);
        tracker.offer(entry(10, "c"));
        tracker.offer(entry(10, "a"));
        tracker.offer(entry(10, "b"));
        assert_eq!(tracker.snapshot(), vec![entry(10, "a"), entry(10, "b")]);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut tracker = TopFileTracker::new(0);
        tracker.offer(entry(100, "a"));
        tracker.offer(entry(200, "b"));
        assert!(tracker.is_empty());
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn matches_a_brute_force_sort() {
        let sizes = [5_u64, 3, 9, 9, 1, 7, 9, 2, 8, 4];
        let mut tracker = TopFileTracker::new(4);
        let mut all = Vec::new();
        for (index, size) in sizes.iter().enumerate() {
            let candidate = entry(*size, &format!("file{index:02}"));
            tracker.offer(candidate.clone());
            all.push(candidate);
        }
        all.sort_by(|a, b| b.cmp(a));
        all.truncate(4);
        assert_eq!(tracker.into_sorted_entries(), all);
    }

    #[test]
    fn insertion_order_does_not_change_the_result() {
        let mut forward = TopFileTracker::new(3);
        let mut backward = TopFileTracker::new(3);
        let entries = [
            entry(4, "d"),
            entry(8, "a"),
            entry(8, "b"),
            entry(2, "e"),
            entry(6, "c"),
        ];
        for item in entries.iter() {
            forward.offer(item.clone());
        }
        for item in entries.iter().rev() {
            backward.offer(item.clone());
        }
        assert_eq!(forward.snapshot(), backward.snapshot());
    }
}
