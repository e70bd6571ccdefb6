//! Compact set of task positions
//!
//! Tasks are addressed by their position in the graph's stable order, so a set
//! of tasks is a fixed-width bitset. Two sets over the same graph compare and
//! hash by membership only, independent of insertion order.

use std::fmt;

const WORD_BITS: usize = 64;

/// Order-independent set of task positions
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskSet {
    words: Vec<u64>,
    universe: usize,
}

impl TaskSet {
    /// Creates an empty set able to hold positions `0..universe`
    pub fn empty(universe: usize) -> Self {
        Self {
            words: vec![0; universe.div_ceil(WORD_BITS)],
            universe,
        }
    }

    /// Adds a position; returns false if it was already present
    pub fn insert(&mut self, pos: usize) -> bool {
        let (word, bit) = Self::locate(pos);
        let was_set = self.words[word] & bit != 0;
        self.words[word] |= bit;
        !was_set
    }

    /// Removes a position; returns false if it was absent
    pub fn remove(&mut self, pos: usize) -> bool {
        let (word, bit) = Self::locate(pos);
        let was_set = self.words[word] & bit != 0;
        self.words[word] &= !bit;
        was_set
    }

    pub fn contains(&self, pos: usize) -> bool {
        if pos >= self.universe {
            return false;
        }
        let (word, bit) = Self::locate(pos);
        self.words[word] & bit != 0
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// True when every addressable position is a member
    pub fn is_full(&self) -> bool {
        self.len() == self.universe
    }

    /// Members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.universe).filter(move |pos| self.contains(*pos))
    }

    fn locate(pos: usize) -> (usize, u64) {
        (pos / WORD_BITS, 1u64 << (pos % WORD_BITS))
    }
}

impl fmt::Debug for TaskSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove() {
        let mut set = TaskSet::empty(70);
        assert!(set.is_empty());
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.insert(65));
        assert_eq!(set.len(), 2);
        assert!(set.contains(65));
        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![65]);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = TaskSet::empty(10);
        let mut b = TaskSet::empty(10);
        a.insert(1);
        a.insert(7);
        b.insert(7);
        b.insert(1);
        assert_eq!(a, b);
    }

    #[test]
    fn full_once_every_position_is_in() {
        let mut set = TaskSet::empty(5);
        for pos in 0..5 {
            assert!(!set.is_full());
            set.insert(pos);
        }
        assert!(set.is_full());
        assert_eq!(set.len(), 5);
        assert!(!set.contains(5));
    }

    #[test]
    fn empty_universe_is_full() {
        let set = TaskSet::empty(0);
        assert!(set.is_full());
        assert!(set.is_empty());
    }
}
