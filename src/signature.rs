// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Signature storage
//!
//! A signature records, as one bit per node, which nodes are currently
//! marked reachable on one seed's plane. Bits are monotone: once set they
//! are never cleared for the lifetime of a run. Every hop reads a frozen
//! snapshot of the previous hop and writes the current signature, which
//! reproduces synchronous BFS layering.
//!
//! Two layouts are provided. [`SeedSignature`] is a single plane owned by
//! one worker, used by the sequential and seed-parallel schedulings.
//! [`SignatureMatrix`] packs all planes as a flattened `[node][seed-word]`
//! matrix of atomic words, shared by the node-parallel workers: each worker
//! writes only the rows of its node range, and snapshot reads are safe
//! because the snapshot is immutable for the duration of a hop.

use std::sync::atomic::{AtomicU64, Ordering};

use bitvec::prelude::*;

use crate::graph::NodeId;

/// One seed's signature plane, with its previous-hop snapshot.
pub struct SeedSignature {
    current: BitVec<u64, Lsb0>,
    snapshot: BitVec<u64, Lsb0>,
}

impl SeedSignature {
    /// Creates an all-zero plane over `num_nodes` nodes, then sets the seed
    /// node's own bit (hop 0).
    pub fn new(num_nodes: usize, seed_node: NodeId) -> SeedSignature {
        let mut current = BitVec::repeat(false, num_nodes);
        current.set(seed_node, true);
        SeedSignature {
            current,
            snapshot: BitVec::repeat(false, num_nodes),
        }
    }

    /// Freezes the current signature as the snapshot the next hop reads.
    pub fn freeze(&mut self) {
        self.snapshot.copy_from_bitslice(&self.current);
    }

    /// Bit of `node` in the previous-hop snapshot.
    #[inline(always)]
    pub fn snapshot_bit(&self, node: NodeId) -> bool {
        self.snapshot[node]
    }

    /// Marks `node` reachable in the current hop.
    #[inline(always)]
    pub fn set(&mut self, node: NodeId) {
        self.current.set(node, true);
    }

    /// Popcount of the current signature.
    pub fn collisions(&self) -> u64 {
        self.current.count_ones() as u64
    }
}

const WORD_BITS: usize = u64::BITS as usize;

/// All planes at once, flattened as `[node][seed-word]` atomic words.
///
/// Writes use relaxed atomic OR: the node-parallel scheduling partitions
/// writes by node range, and no worker reads another worker's current rows
/// within a hop, so no ordering beyond the barrier's is needed.
pub struct SignatureMatrix {
    num_seeds: usize,
    words_per_node: usize,
    current: Vec<AtomicU64>,
    snapshot: Vec<AtomicU64>,
}

impl SignatureMatrix {
    pub fn new(num_nodes: usize, num_seeds: usize) -> SignatureMatrix {
        let words_per_node = num_seeds.div_ceil(WORD_BITS);
        let num_words = num_nodes * words_per_node;
        SignatureMatrix {
            num_seeds,
            words_per_node,
            current: (0..num_words).map(|_| AtomicU64::new(0)).collect(),
            snapshot: (0..num_words).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub fn words_per_node(&self) -> usize {
        self.words_per_node
    }

    #[inline(always)]
    fn word_index(&self, node: NodeId, word: usize) -> usize {
        node * self.words_per_node + word
    }

    /// Sets seed `s`'s bit at its seed node, in both the current signature
    /// and the snapshot (hop-0 initialization, before workers start).
    pub fn init_seed(&self, seed_node: NodeId, s: usize) {
        let index = self.word_index(seed_node, s / WORD_BITS);
        let mask = 1u64 << (s % WORD_BITS);
        self.current[index].fetch_or(mask, Ordering::Relaxed);
        self.snapshot[index].fetch_or(mask, Ordering::Relaxed);
    }

    /// Word `word` of `node`'s row in the previous-hop snapshot.
    #[inline(always)]
    pub fn snapshot_word(&self, node: NodeId, word: usize) -> u64 {
        self.snapshot[self.word_index(node, word)].load(Ordering::Relaxed)
    }

    /// Word `word` of `node`'s current row.
    ///
    /// Only meaningful to the worker owning `node`'s range; other workers'
    /// current rows are mid-write.
    #[inline(always)]
    pub fn current_word(&self, node: NodeId, word: usize) -> u64 {
        self.current[self.word_index(node, word)].load(Ordering::Relaxed)
    }

    /// ORs `mask` into word `word` of `node`'s current row.
    #[inline(always)]
    pub fn or_current(&self, node: NodeId, word: usize, mask: u64) {
        self.current[self.word_index(node, word)].fetch_or(mask, Ordering::Relaxed);
    }

    /// Copies the current signature over the snapshot and popcounts every
    /// plane, adding each plane's count to `counts[s]`.
    ///
    /// Barrier-owned: must only run while no propagation work is in flight.
    pub fn freeze_and_count(&self, counts: &mut [u64]) {
        debug_assert_eq!(counts.len(), self.num_seeds);
        for (index, word) in self.current.iter().enumerate() {
            let mut value = word.load(Ordering::Relaxed);
            self.snapshot[index].store(value, Ordering::Relaxed);
            let first_seed = (index % self.words_per_node) * WORD_BITS;
            while value != 0 {
                let bit = value.trailing_zeros() as usize;
                counts[first_seed + bit] += 1;
                value &= value - 1;
            }
        }
    }
}

/// One bit per node, set when the node's signature row changed last hop.
///
/// Rescanning only arcs whose target changed is a pure prune: a bit that
/// became visible at hop `h` is in the tracker snapshot for hop `h + 1`, so
/// every propagation the unpruned scan would do still happens.
pub struct DirtyTracker {
    current: Vec<AtomicU64>,
    snapshot: Vec<AtomicU64>,
}

impl DirtyTracker {
    pub fn new(num_nodes: usize) -> DirtyTracker {
        let num_words = num_nodes.div_ceil(WORD_BITS);
        DirtyTracker {
            current: (0..num_words).map(|_| AtomicU64::new(0)).collect(),
            snapshot: (0..num_words).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Marks `node` changed in the current hop.
    #[inline(always)]
    pub fn mark(&self, node: NodeId) {
        self.current[node / WORD_BITS].fetch_or(1 << (node % WORD_BITS), Ordering::Relaxed);
    }

    /// Marks `node` changed in the snapshot (hop-0 initialization).
    pub fn mark_snapshot(&self, node: NodeId) {
        self.snapshot[node / WORD_BITS].fetch_or(1 << (node % WORD_BITS), Ordering::Relaxed);
    }

    /// Whether `node` changed during the previous hop.
    #[inline(always)]
    pub fn changed_last_hop(&self, node: NodeId) -> bool {
        self.snapshot[node / WORD_BITS].load(Ordering::Relaxed) >> (node % WORD_BITS) & 1 == 1
    }

    /// Promotes the current hop's marks to the snapshot and clears them.
    ///
    /// Barrier-owned, like [`SignatureMatrix::freeze_and_count`].
    pub fn advance(&self) {
        for (index, word) in self.current.iter().enumerate() {
            self.snapshot[index].store(word.load(Ordering::Relaxed), Ordering::Relaxed);
            word.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_signature_snapshot_discipline() {
        let mut sig = SeedSignature::new(10, 3);
        assert_eq!(sig.collisions(), 1);
        // Writes are not visible to snapshot reads until freeze().
        assert!(!sig.snapshot_bit(3));
        sig.freeze();
        assert!(sig.snapshot_bit(3));
        sig.set(7);
        assert!(!sig.snapshot_bit(7));
        assert_eq!(sig.collisions(), 2);
    }

    #[test]
    fn test_matrix_init_and_count() {
        let matrix = SignatureMatrix::new(100, 70); // two words per node
        matrix.init_seed(5, 0);
        matrix.init_seed(5, 69); // same node on a plane in the second word
        matrix.init_seed(99, 1);
        let mut counts = vec![0u64; 70];
        matrix.freeze_and_count(&mut counts);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[69], 1);
        assert_eq!(counts.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_tracker_advance() {
        let tracker = DirtyTracker::new(100);
        tracker.mark(64);
        assert!(!tracker.changed_last_hop(64));
        tracker.advance();
        assert!(tracker.changed_last_hop(64));
        tracker.advance();
        assert!(!tracker.changed_last_hop(64));
    }
}
