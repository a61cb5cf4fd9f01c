//! Age-based population.
//!
//! A fixed-capacity ring of the `k` most recently constructed individuals.
//! Once full, every insertion evicts the oldest member regardless of its
//! quality (FIFO by insertion order).

/// Fixed-capacity FIFO of individuals.
#[derive(Debug, Clone)]
pub struct Population<T> {
    members: Vec<T>,
    capacity: usize,
    /// Slot of the oldest member once full.
    cursor: usize,
}

impl<T> Population<T> {
    /// Creates an empty population holding at most `capacity` members.
    pub fn new(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Inserts `member`, returning the evicted oldest member once full.
    pub fn push(&mut self, member: T) -> Option<T> {
        if self.members.len() < self.capacity {
            self.members.push(member);
            return None;
        }
        let evicted = std::mem::replace(&mut self.members[self.cursor], member);
        self.cursor = (self.cursor + 1) % self.capacity;
        Some(evicted)
    }

    /// The member the next [`push`](Self::push) would evict.
    pub fn next_evicted(&self) -> Option<&T> {
        if self.is_full() {
            self.members.get(self.cursor)
        } else {
            None
        }
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.members.clear();
        self.cursor = 0;
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the population holds `capacity` members.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.members.len() == self.capacity
    }

    /// Maximum number of members.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Members from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.members.split_at(self.cursor);
        older.iter().chain(newer.iter())
    }
}
