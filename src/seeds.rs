// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Seed-node selection
//!
//! Picking a node uniformly at random is equivalent to taking the minimum of
//! a random hash over all nodes, so a seed set is just a list of distinct
//! node ids, one per independent hash function. Seed sets can also be
//! supplied explicitly, which makes runs replayable.

use itertools::Itertools;
use rand::prelude::*;

use crate::error::{Error, Result};
use crate::graph::NodeId;

/// An ordered set of distinct seed nodes; index `s` identifies one
/// independent signature plane.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedSet {
    nodes: Vec<NodeId>,
}

impl SeedSet {
    /// Draws `num_seeds` distinct nodes uniformly from `0..num_nodes`.
    pub fn random(num_seeds: usize, num_nodes: usize) -> Result<SeedSet> {
        SeedSet::random_with(num_seeds, num_nodes, &mut rand::thread_rng())
    }

    /// Like [`SeedSet::random`], with a caller-supplied generator so tests
    /// can fix the outcome.
    pub fn random_with<R: Rng>(
        num_seeds: usize,
        num_nodes: usize,
        rng: &mut R,
    ) -> Result<SeedSet> {
        if num_seeds > num_nodes {
            return Err(Error::NotEnoughNodes {
                num_seeds,
                num_nodes,
            });
        }
        let mut nodes: Vec<NodeId> = Vec::with_capacity(num_seeds);
        while nodes.len() < num_seeds {
            let node = rng.gen_range(0..num_nodes);
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }
        Ok(SeedSet { nodes })
    }

    /// Wraps an externally supplied seed-node list.
    ///
    /// Fails if the list's length differs from the configured `num_seeds`,
    /// or if it contains duplicates.
    pub fn from_nodes(nodes: Vec<NodeId>, num_seeds: usize) -> Result<SeedSet> {
        if nodes.len() != num_seeds {
            return Err(Error::SeedCountMismatch {
                expected: num_seeds,
                actual: nodes.len(),
            });
        }
        if let Some(&node) = nodes.iter().duplicates().next() {
            return Err(Error::DuplicateSeedNode(node));
        }
        Ok(SeedSet { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Checks every seed is a node of a graph with `num_nodes` nodes.
    pub(crate) fn check_in_range(&self, num_nodes: usize) -> Result<()> {
        for &node in &self.nodes {
            if node >= num_nodes {
                return Err(Error::SeedNodeOutOfRange { node, num_nodes });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_seeds_are_distinct_and_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let seeds = SeedSet::random_with(32, 100, &mut rng).unwrap();
        assert_eq!(seeds.len(), 32);
        for (i, &node) in seeds.nodes().iter().enumerate() {
            assert!(node < 100);
            assert!(!seeds.nodes()[..i].contains(&node), "duplicate seed {}", node);
        }
    }

    #[test]
    fn test_random_needs_enough_nodes() {
        assert!(matches!(
            SeedSet::random(10, 5),
            Err(Error::NotEnoughNodes { .. })
        ));
        // Saturating the id space is fine.
        assert_eq!(SeedSet::random(5, 5).unwrap().len(), 5);
    }

    #[test]
    fn test_from_nodes_checks_count() {
        assert!(matches!(
            SeedSet::from_nodes(vec![1, 2, 3], 4),
            Err(Error::SeedCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_from_nodes_rejects_duplicates() {
        assert!(matches!(
            SeedSet::from_nodes(vec![1, 2, 1], 3),
            Err(Error::DuplicateSeedNode(1))
        ));
    }
}
