//! Coarse-lock engine: the serial logic behind one global mutex.
//!
//! Every operation takes the lock once on entry, so each call is atomic
//! with respect to every other and the semantics are exactly the serial
//! engine's. FIND-from-UNION runs on the already-locked inner value — no
//! reentrant acquisition is needed. Suspension happens only at the lock;
//! nothing else blocks.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::engine::DisjointSet;
use crate::error::SetError;
use crate::serial::SerialSet;

/// A [`SerialSet`] serialized behind a single mutex.
#[derive(Debug)]
pub struct CoarseSet {
    inner: Mutex<SerialSet>,
}

impl CoarseSet {
    /// Creates `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            inner: Mutex::new(SerialSet::new(n)),
        }
    }

    /// Acquires the global lock, absorbing poison.
    ///
    /// A poisoned lock means some worker panicked mid-operation; the serial
    /// engine's mutating paths cannot panic between state writes that would
    /// leave the forest inconsistent, so the inner value is still usable.
    fn lock(&self) -> MutexGuard<'_, SerialSet> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisjointSet for CoarseSet {
    fn len(&self) -> usize {
        self.lock().len()
    }

    fn find(&self, a: usize) -> Result<usize, SetError> {
        self.lock().find(a)
    }

    fn union(&self, a: usize, b: usize) -> Result<bool, SetError> {
        self.lock().union(a, b)
    }

    fn same_set(&self, a: usize, b: usize) -> Result<bool, SetError> {
        self.lock().same_set(a, b)
    }
}
