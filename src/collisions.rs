// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Per-seed, per-hop collision counts and the hop table derived from them

use crate::error::{Error, Result};

/// Collision counts, one row per seed, one entry per hop.
///
/// Row `s` holds the popcount of seed `s`'s signature after every hop that
/// changed it, so rows are non-decreasing and, before normalization, ragged:
/// each seed's fixpoint may be reached at a different hop depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionsMatrix {
    rows: Vec<Vec<u64>>,
}

impl CollisionsMatrix {
    pub fn from_rows(rows: Vec<Vec<u64>>) -> CollisionsMatrix {
        CollisionsMatrix { rows }
    }

    pub fn num_seeds(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Last hop at which any seed's signature changed: the longest row
    /// decides, since a row only gains an entry when its signature changes.
    pub fn lower_bound_diameter(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.len().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }

    /// Last hop at which each seed's own signature changed.
    ///
    /// Derived from the counts rather than the row lengths so it gives the
    /// same answer on already-normalized (rectangular) rows: monotone bits
    /// mean a changed signature always has a strictly larger popcount.
    pub fn last_hops(&self) -> Vec<usize> {
        self.rows
            .iter()
            .map(|row| {
                (1..row.len())
                    .rev()
                    .find(|&h| row[h] > row[h - 1])
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Rectangularizes the matrix.
    ///
    /// A seed converged before the lower-bound diameter keeps its final
    /// collision count for every later hop: the reachable set of a converged
    /// plane cannot shrink, so rows are extended by repetition, never by
    /// zero-padding. Normalizing an already-rectangular matrix is a no-op.
    pub fn normalize(&mut self) {
        let lower_bound = self.lower_bound_diameter();
        for row in &mut self.rows {
            debug_assert!(!row.is_empty(), "seed row with no hop 0");
            if let Some(&converged) = row.last() {
                row.resize(lower_bound + 1, converged);
            }
        }
    }

    /// Estimated reachable pairs within `h` hops, for every hop:
    /// `hop_table[h] = (Σ_seed rows[seed][h]) * num_nodes / num_seeds`.
    ///
    /// The matrix must have been normalized first.
    pub fn hop_table(&self, num_nodes: usize) -> Result<Vec<f64>> {
        let num_seeds = self.rows.len();
        if num_seeds == 0 {
            return Err(Error::AllSeedsExcluded(0));
        }
        let width = self.lower_bound_diameter() + 1;
        debug_assert!(
            self.rows.iter().all(|row| row.len() == width),
            "hop_table called on a ragged matrix"
        );
        Ok((0..width)
            .map(|hop| {
                let sum: u64 = self.rows.iter().map(|row| row[hop]).sum();
                (sum as f64) * (num_nodes as f64) / (num_seeds as f64)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_carries_final_value_forward() {
        // Two seeds converged at hops 2 and 5, final counts 10 and 4.
        let mut matrix = CollisionsMatrix::from_rows(vec![
            vec![1, 6, 10],
            vec![1, 2, 2, 3, 3, 4],
        ]);
        assert_eq!(matrix.lower_bound_diameter(), 5);
        assert_eq!(matrix.last_hops(), vec![2, 5]);
        matrix.normalize();
        assert_eq!(matrix.rows()[0], vec![1, 6, 10, 10, 10, 10]);
        assert_eq!(matrix.rows()[1], vec![1, 2, 2, 3, 3, 4]);
        // Last-changed hops are unaffected by normalization.
        assert_eq!(matrix.last_hops(), vec![2, 5]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut matrix = CollisionsMatrix::from_rows(vec![vec![1, 3], vec![1, 2, 4]]);
        matrix.normalize();
        let once = matrix.clone();
        matrix.normalize();
        assert_eq!(matrix, once);
    }

    #[test]
    fn test_hop_table_scales_by_seeds_and_nodes() {
        let mut matrix = CollisionsMatrix::from_rows(vec![vec![1, 4], vec![1, 2]]);
        matrix.normalize();
        // (1+1)*8/2, (4+2)*8/2
        assert_eq!(matrix.hop_table(8).unwrap(), vec![8.0, 24.0]);
    }

    #[test]
    fn test_hop_table_without_rows_is_an_error() {
        let matrix = CollisionsMatrix::from_rows(vec![]);
        assert!(matrix.hop_table(8).is_err());
    }

    #[test]
    fn test_single_row_single_hop() {
        let mut matrix = CollisionsMatrix::from_rows(vec![vec![1]]);
        assert_eq!(matrix.lower_bound_diameter(), 0);
        assert_eq!(matrix.last_hops(), vec![0]);
        matrix.normalize();
        assert_eq!(matrix.hop_table(1).unwrap(), vec![1.0]);
    }
}
