// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Access to the graph being measured
//!
//! The estimator only needs forward access to the graph: the number of nodes
//! and, for every node, its successors. Graph storage is someone else's
//! problem; implement [`ForwardGraph`] on whatever representation holds your
//! arcs. [`VecGraph`] is a plain adjacency-list implementation for tests and
//! for graphs small enough to sit in memory uncompressed.

/// Alias for [`usize`], which may become a newtype in a future version.
pub type NodeId = usize;

/// A directed graph traversable in the forward direction.
///
/// Implementations must be [`Sync`]: a single instance is shared by all
/// workers of the parallel schedulings, which only ever read from it.
///
/// Propagation pulls signature bits from successors, so bits travel
/// *against* the arcs: the estimate counts, for every node, the nodes it can
/// reach along arcs. To measure the opposite direction, pass a transposed
/// graph.
pub trait ForwardGraph: Sync {
    type Successors<'succ>: IntoIterator<Item = NodeId>
    where
        Self: 'succ;

    /// Return the number of nodes in the graph.
    fn num_nodes(&self) -> usize;

    /// Return the number of arcs in the graph.
    fn num_arcs(&self) -> u64;

    /// Return the number of successors of a node.
    fn outdegree(&self, node: NodeId) -> usize;

    /// Return an [`IntoIterator`] over the successors of a node.
    fn successors(&self, node: NodeId) -> Self::Successors<'_>;
}

/// An in-memory adjacency-list graph.
///
/// # Examples
///
/// ```
/// use graph_minhash::graph::{ForwardGraph, VecGraph};
///
/// let graph = VecGraph::from_arcs([(2, 0), (2, 1), (0, 1)]);
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_arcs(), 3);
/// assert_eq!(graph.successors(2).collect::<Vec<_>>(), vec![0, 1]);
/// assert_eq!(graph.outdegree(1), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct VecGraph {
    successors: Vec<Vec<NodeId>>,
    num_arcs: u64,
}

impl VecGraph {
    /// Creates a graph with `num_nodes` nodes and no arcs.
    pub fn new(num_nodes: usize) -> VecGraph {
        VecGraph {
            successors: vec![Vec::new(); num_nodes],
            num_arcs: 0,
        }
    }

    /// Creates a graph from an arc list.
    ///
    /// The number of nodes is the largest node id occurring in the list,
    /// plus one. Use [`VecGraph::new`] followed by [`VecGraph::add_arc`] to
    /// keep trailing isolated nodes.
    pub fn from_arcs(arcs: impl IntoIterator<Item = (NodeId, NodeId)>) -> VecGraph {
        let mut graph = VecGraph::default();
        for (src, dst) in arcs {
            let min_len = usize::max(src, dst) + 1;
            if graph.successors.len() < min_len {
                graph.successors.resize_with(min_len, Vec::new);
            }
            graph.add_arc(src, dst);
        }
        graph
    }

    /// Adds an arc from `src` to `dst`.
    ///
    /// # Panics
    ///
    /// If either endpoint is not a node of the graph.
    pub fn add_arc(&mut self, src: NodeId, dst: NodeId) {
        assert!(
            src < self.successors.len() && dst < self.successors.len(),
            "arc ({}, {}) out of range for graph with {} nodes",
            src,
            dst,
            self.successors.len()
        );
        self.successors[src].push(dst);
        self.num_arcs += 1;
    }

    /// Return the number of nodes in the graph.
    pub fn num_nodes(&self) -> usize {
        self.successors.len()
    }

    /// Return the number of arcs in the graph.
    pub fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    /// Return an iterator over the successors of a node.
    pub fn successors(&self, node: NodeId) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.successors[node].iter().copied()
    }

    /// Return the number of successors of a node.
    pub fn outdegree(&self, node: NodeId) -> usize {
        self.successors[node].len()
    }
}

impl ForwardGraph for VecGraph {
    type Successors<'succ> = std::iter::Copied<std::slice::Iter<'succ, NodeId>>;

    fn num_nodes(&self) -> usize {
        VecGraph::num_nodes(self)
    }

    fn num_arcs(&self) -> u64 {
        VecGraph::num_arcs(self)
    }

    fn outdegree(&self, node: NodeId) -> usize {
        VecGraph::outdegree(self, node)
    }

    fn successors(&self, node: NodeId) -> Self::Successors<'_> {
        VecGraph::successors(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arcs_sizes_from_max_id() {
        let graph = VecGraph::from_arcs([(0, 3)]);
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_arcs(), 1);
        assert_eq!(graph.outdegree(3), 0);
    }

    #[test]
    fn test_isolated_nodes_survive_new() {
        let graph = VecGraph::new(5);
        assert_eq!(graph.num_nodes(), 5);
        assert_eq!(graph.num_arcs(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_add_arc_out_of_range() {
        let mut graph = VecGraph::new(2);
        graph.add_arc(0, 2);
    }
}
