//! Matched-point bookkeeping
//!
//! Flag array sized to the reference path, indexed directly by point index.

/// Set of reference indices touched by at least one user sample
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracedSet {
    flags: Vec<bool>,
    count: usize,
}

impl TracedSet {
    pub fn with_capacity(len: usize) -> Self {
        Self {
            flags: vec![false; len],
            count: 0,
        }
    }

    /// Mark an index; returns `true` if it was not yet traced.
    /// Out-of-range indices are ignored.
    pub fn insert(&mut self, index: usize) -> bool {
        match self.flags.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Number of traced indices
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Size of the reference path this set covers
    pub fn capacity(&self) -> usize {
        self.flags.len()
    }

    pub fn is_full(&self) -> bool {
        self.count == self.flags.len()
    }

    /// Indices not traced yet, ascending
    pub fn unmatched(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, &traced)| !traced)
            .map(|(i, _)| i)
    }

    pub fn as_flags(&self) -> &[bool] {
        &self.flags
    }

    /// Untrace everything, keeping the capacity
    pub fn clear(&mut self) {
        self.flags.iter_mut().for_each(|f| *f = false);
        self.count = 0;
    }
}
