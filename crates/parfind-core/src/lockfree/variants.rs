//! Deltas on the lock-free engine.
//!
//! [`PlainWriteSet`] swaps the path-compaction CAS for a plain relaxed
//! store: cheaper when contention is low, at worst some wasted stores when
//! it is high. Linking still confirms root words by CAS, so safety does not
//! depend on how compaction writes land.
//!
//! [`IpcSet`] keeps CAS compaction and prepends the immediate-parent check
//! to UNION and SAME-SET: when both operands already hold the same non-root
//! parent word, they are provably in one tree and the walk is skipped
//! entirely. On workloads that hammer one hot pair this answers most calls
//! from two relaxed loads.

use crate::engine::DisjointSet;
use crate::error::{SetError, check_index};

use super::{AtomicForest, Compaction};

// ---------------------------------------------------------------------------
// PlainWriteSet (variant A)
// ---------------------------------------------------------------------------

/// Lock-free engine with plain-store path compaction.
#[derive(Debug)]
pub struct PlainWriteSet {
    forest: AtomicForest,
}

impl PlainWriteSet {
    /// Creates `n` singleton sets.
    ///
    /// # Panics
    ///
    /// Panics when `n` exceeds [`crate::slot::MAX_UNIVERSE`].
    pub fn new(n: usize) -> Self {
        Self {
            forest: AtomicForest::new(n, Compaction::Store),
        }
    }
}

impl DisjointSet for PlainWriteSet {
    fn len(&self) -> usize {
        self.forest.len()
    }

    fn find(&self, a: usize) -> Result<usize, SetError> {
        self.forest.find(a)
    }

    fn union(&self, a: usize, b: usize) -> Result<bool, SetError> {
        self.forest.union(a, b)
    }

    fn same_set(&self, a: usize, b: usize) -> Result<bool, SetError> {
        self.forest.same_set(a, b)
    }
}

// ---------------------------------------------------------------------------
// IpcSet (variant B)
// ---------------------------------------------------------------------------

/// Lock-free engine with the immediate-parent-check fast path.
#[derive(Debug)]
pub struct IpcSet {
    forest: AtomicForest,
}

impl IpcSet {
    /// Creates `n` singleton sets.
    ///
    /// # Panics
    ///
    /// Panics when `n` exceeds [`crate::slot::MAX_UNIVERSE`].
    pub fn new(n: usize) -> Self {
        Self {
            forest: AtomicForest::new(n, Compaction::Cas),
        }
    }
}

impl DisjointSet for IpcSet {
    fn len(&self) -> usize {
        self.forest.len()
    }

    fn find(&self, a: usize) -> Result<usize, SetError> {
        self.forest.find(a)
    }

    fn union(&self, a: usize, b: usize) -> Result<bool, SetError> {
        check_index(a, self.len())?;
        check_index(b, self.len())?;
        // A shared non-root parent proves "already same set" without a walk.
        if self.forest.same_immediate_parent(a, b) {
            return Ok(false);
        }
        self.forest.union(a, b)
    }

    fn same_set(&self, a: usize, b: usize) -> Result<bool, SetError> {
        check_index(a, self.len())?;
        check_index(b, self.len())?;
        if a == b || self.forest.same_immediate_parent(a, b) {
            return Ok(true);
        }
        self.forest.same_set(a, b)
    }
}
