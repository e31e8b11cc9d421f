//! Label-free view of a grouping.
//!
//! Genomes are indexed vectors (`genome[i]` = group of attendee `i`), which is what
//! the genetic operators need. Two genomes that differ only by a renaming of group
//! labels describe the same real-world grouping, so every comparison between
//! groupings goes through this module instead of comparing genomes directly.

use crate::core_types::{Genome, GroupId};

/// A grouping as a set of sets of attendee positions.
///
/// Canonical form: members sorted within each group, empty groups dropped,
/// groups ordered by their smallest member. Equal canonical forms mean equal groupings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partition {
    groups: Vec<Vec<usize>>,
}

impl Partition {
    pub fn from_genome(genome: &[GroupId]) -> Self {
        let label_count = genome.iter().map(|&g| g as usize + 1).max().unwrap_or(0);
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); label_count];
        for (pos, &g) in genome.iter().enumerate() {
            groups[g as usize].push(pos);
        }
        groups.retain(|g| !g.is_empty());
        // Members are pushed in ascending order, so each group is already sorted.
        groups.sort_by_key(|g| g[0]);
        Self { groups }
    }

    /// Relabels groups `0..k` in canonical order.
    pub fn to_genome(&self) -> Genome {
        let mut genome = vec![0; self.attendee_count()];
        for (label, members) in self.groups.iter().enumerate() {
            for &pos in members {
                genome[pos] = label as GroupId;
            }
        }
        genome
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn attendee_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn distance(&self, other: &Partition) -> usize {
        permutation_invariant_distance(&self.to_genome(), &other.to_genome())
    }
}

/// Minimum Hamming distance between `a` and any relabeling of `b`.
///
/// Equivalent to trying every label permutation, computed as `n - best overlap`
/// where the best overlap comes from a maximum-weight assignment between the
/// label sets (Hungarian method, O(k^3) in the number of labels).
pub fn permutation_invariant_distance(a: &[GroupId], b: &[GroupId]) -> usize {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len().min(b.len());
    if n == 0 {
        return 0;
    }

    let k = a
        .iter()
        .chain(b.iter())
        .map(|&g| g as usize + 1)
        .max()
        .unwrap_or(1);

    // overlap[x * k + y] = positions labelled x in `a` and y in `b`
    let mut overlap = vec![0i64; k * k];
    for (&x, &y) in a.iter().zip(b.iter()) {
        overlap[x as usize * k + y as usize] += 1;
    }

    let best = max_weight_assignment(&overlap, k);
    n - best as usize
}

/// Maximum total weight of a perfect matching in a square `k x k` weight matrix.
fn max_weight_assignment(weights: &[i64], k: usize) -> i64 {
    const INF: i64 = i64::MAX / 4;
    // Minimize negated weights; rows and columns are 1-based, 0 is the sentinel.
    let cost = |i: usize, j: usize| -weights[(i - 1) * k + (j - 1)];

    let mut u = vec![0i64; k + 1];
    let mut v = vec![0i64; k + 1];
    let mut p = vec![0usize; k + 1];
    let mut way = vec![0usize; k + 1];

    for i in 1..=k {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![INF; k + 1];
        let mut used = vec![false; k + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = INF;
            let mut j1 = 0usize;
            for j in 1..=k {
                if !used[j] {
                    let cur = cost(i0, j) - u[i0] - v[j];
                    if cur < minv[j] {
                        minv[j] = cur;
                        way[j] = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1 = j;
                    }
                }
            }
            for j in 0..=k {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    (1..=k)
        .filter(|&j| p[j] != 0)
        .map(|j| weights[(p[j] - 1) * k + (j - 1)])
        .sum()
}
