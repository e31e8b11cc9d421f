use crate::optimizer::ArchiveEntry;
use crate::partition::permutation_invariant_distance;

/// Minimum distance two reported groupings must keep: `floor(n * fraction)`.
pub fn min_distance(attendee_count: usize, fraction: f32) -> usize {
    (attendee_count as f32 * fraction.max(0.0)).floor() as usize
}

/// Greedy walk down a best-first list: the top entry is always taken, later
/// entries only if they sit at least `min_distance` away from everything taken.
/// Infeasible entries are never returned.
pub fn select_diverse(ranked: &[ArchiveEntry], k: usize, min_distance: usize) -> Vec<&ArchiveEntry> {
    let mut chosen: Vec<&ArchiveEntry> = Vec::with_capacity(k);
    if k == 0 {
        return chosen;
    }

    for entry in ranked.iter().filter(|e| e.fitness.is_feasible()) {
        if chosen.len() >= k {
            break;
        }
        let distinct = chosen
            .iter()
            .all(|c| permutation_invariant_distance(&c.genome, &entry.genome) >= min_distance);
        if chosen.is_empty() || distinct {
            chosen.push(entry);
        }
    }
    chosen
}
