// Copyright (C) 2026  The graph-minhash developers
// See the AUTHORS file at the top-level directory of this distribution
// License: GNU General Public License version 3, or any later version
// See top-level LICENSE file for more information

//! Distance statistics derived from a hop table
//!
//! A hop table maps every hop `h` to the estimated number of ordered node
//! pairs within distance `h`; it is dense, non-decreasing and its last entry
//! is at the lower-bound diameter. Degenerate tables (empty, or too short
//! for a distance to exist) yield `0` rather than a division by zero.

/// Total number of reachable pairs: the last (maximum) entry.
pub fn total_couples_reachable(hop_table: &[f64]) -> f64 {
    match hop_table.last() {
        Some(&last) => last,
        None => 0.,
    }
}

/// Number of reachable pairs counted by the effective diameter:
/// `total * threshold`.
pub fn total_couples_percentage(hop_table: &[f64], threshold: f64) -> f64 {
    total_couples_reachable(hop_table) * threshold
}

/// Position of `y` between `y0` and `y1`, as a fraction of their gap.
pub fn interpolate(y0: f64, y1: f64, y: f64) -> f64 {
    // (y1 - y0) is the delta neighbourhood
    (y - y0) / (y1 - y0)
}

/// Per-hop increments of the hop table: entry `h` is the number of pairs at
/// distance exactly `h`.
pub fn distance_function(hop_table: &[f64]) -> Vec<f64> {
    let mut distance = hop_table.to_vec();
    for i in (1..distance.len()).rev() {
        distance[i] -= distance[i - 1];
    }
    distance
}

/// Average distance between reachable pairs:
/// `Σ_{h≥1} h * (hop_table[h] - hop_table[h-1]) / total`.
///
/// Tables of length 0 or 1 have no pair at positive distance and yield `0`.
pub fn average_distance(hop_table: &[f64]) -> f64 {
    if hop_table.len() <= 1 {
        return 0.;
    }
    let distance = distance_function(hop_table);
    let mut sum = 0.;
    for (i, &pairs) in distance.iter().enumerate().skip(1) {
        sum += pairs * (i as f64);
    }
    sum / hop_table[hop_table.len() - 1]
}

/// Effective diameter at `threshold`: the interpolated hop count connecting
/// the `threshold`-th fraction of all reachable pairs.
///
/// With `d` the smallest hop such that `hop_table[d] / total >= threshold`,
/// the result is `(d - 1) + (threshold * total - hop_table[d - 1]) /
/// (hop_table[d] - hop_table[d - 1])`; there is no interpolation below hop
/// 0, so `d == 0` (and the empty table) yield `0`.
pub fn effective_diameter(hop_table: &[f64], threshold: f64) -> f64 {
    if hop_table.is_empty() {
        return 0.;
    }
    let total = total_couples_reachable(hop_table);
    let mut d = 0;
    while hop_table[d] / total < threshold {
        d += 1;
    }
    if d == 0 {
        0.
    } else {
        (d - 1) as f64 + interpolate(hop_table[d - 1], hop_table[d], threshold * total)
    }
}
