//! Serial disjoint-set engine: the single-threaded reference semantics.
//!
//! FIND walks to the root and then points every visited element directly at
//! it (full path compression). UNION is union-by-rank; when ranks tie the
//! **lower index** becomes the root and its rank grows by one, so the
//! representative for a given merge history is deterministic regardless of
//! operation order.
//!
//! Every other engine in this crate is measured against this one: after any
//! operation list has fully drained, their partition must equal the
//! partition this engine produces for the same list.

use crate::error::{SetError, check_index};
use crate::executor::result_slot_sequential;
use crate::ops::Operation;

/// A serial union-find over a fixed universe `[0, n)`.
#[derive(Debug, Clone)]
pub struct SerialSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl SerialSet {
    /// Creates `n` singleton sets.
    ///
    /// Each element `i` starts as its own representative (`parent[i] == i`,
    /// rank 0).
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0u8; n],
        }
    }

    /// Returns the universe size `n`.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` for the empty universe (`n == 0`).
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of the set containing `a`, compressing
    /// the whole walked path onto the root.
    ///
    /// # Errors
    ///
    /// [`SetError::IndexOutOfRange`] when `a >= n`; the structure is not
    /// touched in that case.
    pub fn find(&mut self, a: usize) -> Result<usize, SetError> {
        check_index(a, self.len())?;

        // First pass: locate the root.
        let mut root = a;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Second pass: point every element on the path at the root.
        let mut x = a;
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }

        Ok(root)
    }

    /// Merges the sets containing `a` and `b` by rank.
    ///
    /// Returns `true` iff this call linked two previously distinct sets.
    /// `union(a, a)` is always `false`.
    ///
    /// # Errors
    ///
    /// [`SetError::IndexOutOfRange`] when either operand is `>= n`; no
    /// mutation happens on that path, including no path compression.
    pub fn union(&mut self, a: usize, b: usize) -> Result<bool, SetError> {
        check_index(a, self.len())?;
        check_index(b, self.len())?;

        let ra = self.find(a)?;
        let rb = self.find(b)?;

        if ra == rb {
            return Ok(false);
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => {
                self.parent[ra] = rb;
            }
            std::cmp::Ordering::Greater => {
                self.parent[rb] = ra;
            }
            std::cmp::Ordering::Equal => {
                // Lower index wins the tie and its rank grows by one.
                if ra < rb {
                    self.parent[rb] = ra;
                    self.rank[ra] += 1;
                } else {
                    self.parent[ra] = rb;
                    self.rank[rb] += 1;
                }
            }
        }
        Ok(true)
    }

    /// Returns `true` when `a` and `b` share a representative.
    ///
    /// # Errors
    ///
    /// [`SetError::IndexOutOfRange`] when either operand is `>= n`.
    pub fn same_set(&mut self, a: usize, b: usize) -> Result<bool, SetError> {
        check_index(a, self.len())?;
        check_index(b, self.len())?;
        Ok(self.find(a)? == self.find(b)?)
    }

    /// Applies `ops` in order, filling `results` under the batch result
    /// conventions (see [`crate::executor`]).
    ///
    /// The serial engine is not shared between threads, so the batch is
    /// sequential; the result conventions are identical to the concurrent
    /// executor's so drivers can treat every engine's output uniformly.
    pub fn process_operations(&mut self, ops: &[Operation], results: &mut Vec<i64>) {
        results.clear();
        results.resize(ops.len(), 0);
        for (op, slot) in ops.iter().zip(results.iter_mut()) {
            *slot = result_slot_sequential(self, op);
        }
    }

    /// Returns the quiescent root of every element, compressing as it goes.
    ///
    /// The canonical partition signature for correctness comparison.
    pub fn roots(&mut self) -> Vec<usize> {
        (0..self.len())
            .map(|i| self.find(i).unwrap_or(i))
            .collect()
    }

    /// Rank of the tree rooted at `a`'s representative.
    ///
    /// Only meaningful for white-box assertions about union-by-rank; rank
    /// is an upper bound on tree height, not an exact measurement.
    pub fn rank_of(&mut self, a: usize) -> Result<u8, SetError> {
        let root = self.find(a)?;
        Ok(self.rank[root])
    }
}
