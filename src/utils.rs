//! Shared utility types

use std::collections::VecDeque;

/// A newest-first sequence with a fixed capacity.
///
/// New entries are pushed to the front; once the log is full the oldest
/// entry (at the back) is evicted. Used for the key history and the
/// typing results log.
///
/// # Example
///
/// ```
/// use keydeck::utils::BoundedLog;
///
/// let mut log = BoundedLog::new(2);
/// log.push(1);
/// log.push(2);
/// log.push(3);
///
/// // Newest first, oldest evicted
/// assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![3, 2]);
/// assert_eq!(log.latest(), Some(&3));
/// ```
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// Create an empty log holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, evicting the oldest one when over capacity.
    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Most recently pushed entry
    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Iterate newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_newest_first() {
        let mut log = BoundedLog::new(5);
        for value in 1..=3 {
            log.push(value);
        }
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn push_evicts_oldest_at_capacity() {
        let mut log = BoundedLog::new(3);
        for value in 1..=10 {
            log.push(value);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![10, 9, 8]);
    }

    #[test]
    fn latest_on_empty_is_none() {
        let log: BoundedLog<u8> = BoundedLog::new(4);
        assert!(log.latest().is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut log = BoundedLog::new(0);
        log.push("ignored");
        assert!(log.is_empty());
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut log = BoundedLog::new(2);
        log.push('a');
        log.push('b');
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 2);
    }
}
