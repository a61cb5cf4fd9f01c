//! Bounded integer candidate set.
//!
//! Tracks which of the values `0..n` are still selectable during one
//! construction walk.
//!
//! # Algorithm
//!
//! Two parallel arrays: `values` holds the active values in slots
//! `0..len`, `positions[v]` is the slot currently holding `v`. A value is
//! present iff its slot is below `len`. Deleting swaps the value's slot with
//! the last active slot and shrinks `len`; adding does the reverse. Every
//! operation is O(1) and nothing is reallocated after construction.

use rand::Rng;

use crate::error::{PacoError, Result};

/// A subset of `0..capacity` with O(1) membership, insertion, deletion and
/// indexed access.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    values: Vec<usize>,
    positions: Vec<usize>,
    len: usize,
}

impl CandidateSet {
    /// Creates an empty set over `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: (0..capacity).collect(),
            positions: (0..capacity).collect(),
            len: 0,
        }
    }

    /// Resets to the full set `{0, .., capacity - 1}`.
    pub fn fill(&mut self) {
        for (i, (v, p)) in self.values.iter_mut().zip(self.positions.iter_mut()).enumerate() {
            *v = i;
            *p = i;
        }
        self.len = self.values.len();
    }

    /// Empties the set.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Randomly permutes the order of the active values (Fisher-Yates).
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        for i in (1..self.len).rev() {
            let j = rng.random_range(0..=i);
            self.swap_slots(i, j);
        }
    }

    /// Inserts `value`.
    ///
    /// # Errors
    /// `InvalidState` if `value` is already present, `InvalidArgument` if it
    /// is outside `0..capacity`.
    pub fn add(&mut self, value: usize) -> Result<()> {
        if value >= self.values.len() {
            return Err(PacoError::invalid_argument(format!(
                "value {value} outside candidate range 0..{}",
                self.values.len()
            )));
        }
        if self.has(value) {
            return Err(PacoError::invalid_state(format!(
                "value {value} already in candidate set"
            )));
        }
        let slot = self.positions[value];
        self.swap_slots(slot, self.len);
        self.len += 1;
        Ok(())
    }

    /// Removes `value`.
    ///
    /// # Errors
    /// `InvalidState` if `value` is absent.
    pub fn delete(&mut self, value: usize) -> Result<()> {
        if !self.has(value) {
            return Err(PacoError::invalid_state(format!(
                "value {value} not in candidate set"
            )));
        }
        self.remove_slot(self.positions[value]);
        Ok(())
    }

    /// Removes and returns a uniformly random value, or `None` if empty.
    pub fn delete_random<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let slot = rng.random_range(0..self.len);
        Some(self.remove_slot(slot))
    }

    /// Removes and returns the value in the last active slot, or `None` if
    /// empty.
    pub fn delete_last(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.values[self.len])
    }

    /// Whether `value` is present.
    #[inline]
    pub fn has(&self, value: usize) -> bool {
        self.positions.get(value).is_some_and(|&slot| slot < self.len)
    }

    /// Value in slot `index`. Only meaningful for `index < size()`.
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        debug_assert!(index < self.len);
        self.values[index]
    }

    /// Number of present values.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Whether no value is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the value range.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Active values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.values[..self.len].iter().copied()
    }

    fn remove_slot(&mut self, slot: usize) -> usize {
        self.len -= 1;
        self.swap_slots(slot, self.len);
        self.values[self.len]
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        let va = self.values[a];
        let vb = self.values[b];
        self.values[a] = vb;
        self.values[b] = va;
        self.positions[vb] = a;
        self.positions[va] = b;
    }
}
