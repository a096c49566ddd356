//! Lock-free engine: one atomic word per element, CAS for every mutation.
//!
//! Each slot packs "parent index XOR root rank" into a single `AtomicIsize`
//! (see [`crate::slot`]), so linking one root under another and publishing
//! its loss of root status is a single one-word CAS. A slot's life is
//! monotone — root(r) may become child(p), a child may be retargeted at
//! ancestors, but no slot ever becomes a root again — which is what makes
//! the plain-width CAS ABA-safe without a version counter.
//!
//! Memory ordering:
//!
//! | Access | Order |
//! |---|---|
//! | walk / root re-confirmation loads | `Acquire` |
//! | path-compaction or linking CAS success | `Release` |
//! | CAS failure reload | `Relaxed` |
//! | rank-bump CAS (failure benign) | `Release` / `Relaxed` |
//! | initialization stores | `Relaxed` |
//!
//! No operation blocks; every lost race is a bounded retry. Individual
//! callers can be starved under persistent contention but some thread
//! always completes, and rank stays an upper bound on tree height even
//! when a rank-bump CAS is lost.

pub mod variants;

pub use variants::{IpcSet, PlainWriteSet};

use std::sync::atomic::{AtomicIsize, Ordering};

use crate::engine::DisjointSet;
use crate::error::{SetError, check_index};
use crate::slot::{self, child_value, is_root, rank_of_root, root_value};

// ---------------------------------------------------------------------------
// AtomicForest
// ---------------------------------------------------------------------------

/// How FIND publishes the shortcuts it discovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compaction {
    /// Compare-and-swap, losing gracefully to concurrent writers.
    Cas,
    /// Plain relaxed store; trades CAS traffic for possibly wasted writes.
    Store,
}

/// The packed-slot forest shared by the lock-free engine and its variants.
#[derive(Debug)]
struct AtomicForest {
    slots: Box<[AtomicIsize]>,
    compaction: Compaction,
}

impl AtomicForest {
    /// Creates `n` singleton roots of rank 0.
    ///
    /// # Panics
    ///
    /// Panics when `n` exceeds [`slot::MAX_UNIVERSE`], the largest universe
    /// the packed encoding can address.
    fn new(n: usize, compaction: Compaction) -> Self {
        assert!(
            n <= slot::MAX_UNIVERSE,
            "universe of {n} exceeds the packed-slot maximum {}",
            slot::MAX_UNIVERSE
        );
        Self {
            slots: (0..n).map(|_| AtomicIsize::new(root_value(0))).collect(),
            compaction,
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    /// Resolves the root of `u`, compacting the walked path.
    ///
    /// Returns `(root_index, root_value)` where the value is the root's
    /// packed word as observed during the walk. Recursion depth is bounded
    /// by tree height, which union-by-rank keeps logarithmic.
    fn find_internal(&self, u: usize) -> (usize, isize) {
        let v = self.slots[u].load(Ordering::Acquire);
        if is_root(v) {
            return (u, v);
        }

        let p = slot::parent_of(v);
        let (root, root_val) = self.find_internal(p);

        // Point u straight at the root it resolved to. A lost race here is
        // harmless: the return value is already fixed and the next walk
        // re-compacts.
        if p != root {
            match self.compaction {
                Compaction::Cas => {
                    let _ = self.slots[u].compare_exchange_weak(
                        v,
                        child_value(root),
                        Ordering::Release,
                        Ordering::Relaxed,
                    );
                }
                Compaction::Store => {
                    self.slots[u].store(child_value(root), Ordering::Relaxed);
                }
            }
        }
        (root, root_val)
    }

    fn find(&self, a: usize) -> Result<usize, SetError> {
        check_index(a, self.len())?;
        Ok(self.find_internal(a).0)
    }

    fn union(&self, a: usize, b: usize) -> Result<bool, SetError> {
        check_index(a, self.len())?;
        check_index(b, self.len())?;

        loop {
            let (ra, _) = self.find_internal(a);
            let (rb, _) = self.find_internal(b);

            // Reload both root words; either may have been linked away
            // between its walk and now.
            let va = self.slots[ra].load(Ordering::Acquire);
            let vb = self.slots[rb].load(Ordering::Acquire);
            if !is_root(va) || !is_root(vb) {
                continue;
            }

            if ra == rb {
                return Ok(false);
            }

            let rank_a = rank_of_root(va);
            let rank_b = rank_of_root(vb);

            // Deterministic linking decision: on rank ties the lower index
            // becomes the child.
            let (child, child_val, parent, parent_val) = if rank_a < rank_b {
                (ra, va, rb, vb)
            } else if rank_a > rank_b {
                (rb, vb, ra, va)
            } else if ra < rb {
                (ra, va, rb, vb)
            } else {
                (rb, vb, ra, va)
            };

            if self.slots[child]
                .compare_exchange(
                    child_val,
                    child_value(parent),
                    Ordering::Release,
                    Ordering::Relaxed,
                )
                .is_err()
            {
                continue;
            }

            // Equal ranks: opportunistically bump the survivor. Rank is an
            // upper bound, not an exact height, so losing this CAS is fine.
            if rank_a == rank_b {
                let _ = self.slots[parent].compare_exchange_weak(
                    parent_val,
                    root_value(rank_a + 1),
                    Ordering::Release,
                    Ordering::Relaxed,
                );
            }
            return Ok(true);
        }
    }

    fn same_set(&self, a: usize, b: usize) -> Result<bool, SetError> {
        check_index(a, self.len())?;
        check_index(b, self.len())?;

        loop {
            let (ra, _) = self.find_internal(a);
            let (rb, _) = self.find_internal(b);
            if ra == rb {
                return Ok(true);
            }
            // Distinct roots are conclusive only if `ra` was still a root
            // after `rb` resolved; otherwise the snapshot raced a union.
            if is_root(self.slots[ra].load(Ordering::Acquire)) {
                return Ok(false);
            }
        }
    }

    /// The immediate-parent check: two elements sharing the same non-root
    /// parent word are already in the same tree.
    fn same_immediate_parent(&self, a: usize, b: usize) -> bool {
        let pa = self.slots[a].load(Ordering::Relaxed);
        let pb = self.slots[b].load(Ordering::Relaxed);
        !is_root(pa) && pa == pb
    }
}

// ---------------------------------------------------------------------------
// LockFreeSet
// ---------------------------------------------------------------------------

/// The single-word CAS engine.
#[derive(Debug)]
pub struct LockFreeSet {
    forest: AtomicForest,
}

impl LockFreeSet {
    /// Creates `n` singleton sets.
    ///
    /// # Panics
    ///
    /// Panics when `n` exceeds [`slot::MAX_UNIVERSE`].
    pub fn new(n: usize) -> Self {
        Self {
            forest: AtomicForest::new(n, Compaction::Cas),
        }
    }
}

impl DisjointSet for LockFreeSet {
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

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use super::*;

    #[test]
    fn fresh_slots_are_rank_zero_roots() {
        let uf = LockFreeSet::new(3);
        for i in 0..3 {
            assert_eq!(uf.forest.slots[i].load(Ordering::Relaxed), -1);
            assert_eq!(uf.find(i).expect("in range"), i);
        }
    }

    #[test]
    fn basic_union_and_queries() {
        let uf = LockFreeSet::new(4);
        assert!(uf.union(0, 1).expect("in range"));
        assert!(!uf.union(0, 1).expect("in range"));
        assert!(uf.same_set(0, 1).expect("in range"));
        assert!(!uf.same_set(0, 2).expect("in range"));
        assert!(!uf.union(1, 1).expect("in range"));
    }

    #[test]
    fn equal_rank_tie_keeps_higher_index_as_root() {
        let uf = LockFreeSet::new(3);
        uf.union(0, 1).expect("in range");
        // Both were rank-0 roots; 0 < 1, so 0 became the child.
        assert_eq!(uf.find(0).expect("in range"), 1);
        assert_eq!(uf.find(1).expect("in range"), 1);
    }

    #[test]
    fn equal_rank_link_bumps_survivor_rank() {
        let uf = LockFreeSet::new(2);
        uf.union(0, 1).expect("in range");
        let root_word = uf.forest.slots[1].load(Ordering::Relaxed);
        assert!(crate::slot::is_root(root_word));
        assert_eq!(crate::slot::rank_of_root(root_word), 1);
    }

    #[test]
    fn unequal_ranks_attach_shallow_under_deep() {
        let uf = LockFreeSet::new(4);
        uf.union(0, 1).expect("in range"); // root 1, rank 1
        uf.union(2, 1).expect("in range"); // rank 0 under rank 1
        assert_eq!(uf.find(2).expect("in range"), 1);
        let root_word = uf.forest.slots[1].load(Ordering::Relaxed);
        assert_eq!(crate::slot::rank_of_root(root_word), 1, "no bump on unequal ranks");
    }

    #[test]
    fn find_compacts_the_walked_path() {
        let uf = LockFreeSet::new(8);
        // Build some depth, then check that a find from a leaf leaves its
        // whole path pointing at the root.
        for (a, b) in [(0, 1), (2, 3), (0, 2), (4, 5), (6, 7), (4, 6), (0, 4)] {
            uf.union(a, b).expect("in range");
        }
        let root = uf.find(0).expect("in range");
        let w = uf.forest.slots[0].load(Ordering::Relaxed);
        assert!(!crate::slot::is_root(w));
        assert_eq!(crate::slot::parent_of(w), root, "0 should point at the root");
    }

    #[test]
    fn out_of_range_is_rejected_before_mutation() {
        let uf = LockFreeSet::new(2);
        assert!(uf.union(0, 2).is_err());
        assert!(uf.find(2).is_err());
        assert!(uf.same_set(2, 0).is_err());
        assert!(!uf.same_set(0, 1).expect("in range"));
    }

    #[test]
    fn empty_universe_constructs() {
        let uf = LockFreeSet::new(0);
        assert!(uf.is_empty());
        assert!(uf.find(0).is_err());
    }

    #[test]
    fn concurrent_ring_collapses_to_one_set() {
        let n = 256;
        let uf = Arc::new(LockFreeSet::new(n));
        let handles: Vec<_> = (0..n)
            .map(|i| {
                let uf = Arc::clone(&uf);
                std::thread::spawn(move || {
                    uf.union(i, (i + 1) % n).expect("in range");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker should not panic");
        }
        let root = uf.find(0).expect("in range");
        for i in 0..n {
            assert_eq!(uf.find(i).expect("in range"), root);
        }
    }

    #[test]
    fn hot_pair_hammer_has_exactly_one_winner() {
        for _ in 0..50 {
            let uf = Arc::new(LockFreeSet::new(2));
            let winners: usize = (0..8)
                .map(|_| {
                    let uf = Arc::clone(&uf);
                    std::thread::spawn(move || uf.union(0, 1).expect("in range"))
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|h| usize::from(h.join().expect("worker should not panic")))
                .sum();
            assert_eq!(winners, 1);
        }
    }

    #[test]
    fn parent_chains_stay_acyclic_at_quiescence() {
        let n = 200;
        let uf = Arc::new(LockFreeSet::new(n));
        std::thread::scope(|scope| {
            for t in 0..4usize {
                let uf = &uf;
                scope.spawn(move || {
                    let mut x = t * 2654435761 % n;
                    for i in 0..n {
                        x = (x * 1103515245 + 12345) % n;
                        uf.union(x, (x + i) % n).expect("in range");
                    }
                });
            }
        });
        // Every walk must terminate within n hops.
        for start in 0..n {
            let mut x = start;
            for _ in 0..=n {
                let w = uf.forest.slots[x].load(Ordering::Relaxed);
                if crate::slot::is_root(w) {
                    break;
                }
                x = crate::slot::parent_of(w);
            }
            let w = uf.forest.slots[x].load(Ordering::Relaxed);
            assert!(
                crate::slot::is_root(w),
                "walk from {start} did not reach a root within {n} hops"
            );
        }
    }
}
