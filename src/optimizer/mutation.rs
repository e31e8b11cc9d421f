use crate::core_types::GroupId;
use crate::optimizer::GenomeContext;
use fastrand::Rng;

/// Resamples each gene with probability `indpb`. Returns true if any gene changed value.
pub fn mutate_uniform(genome: &mut [GroupId], group_count: usize, indpb: f32, rng: &mut Rng) -> bool {
    let gc = group_count as GroupId;
    let mut changed = false;
    for gene in genome.iter_mut() {
        if rng.f32() < indpb {
            let next = rng.u16(0..gc);
            changed |= next != *gene;
            *gene = next;
        }
    }
    changed
}

/// Swaps a random attendee with a same-gender attendee from another group.
/// Guests and their hosts are never chosen.
pub fn mutate_swap(genome: &mut [GroupId], ctx: &GenomeContext, rng: &mut Rng) -> bool {
    let movable: Vec<usize> = (0..genome.len()).filter(|&i| !ctx.pinned[i]).collect();
    if movable.len() < 2 {
        return false;
    }

    let first = movable[rng.usize(0..movable.len())];
    let partners: Vec<usize> = movable
        .iter()
        .copied()
        .filter(|&j| genome[j] != genome[first] && ctx.genders[j] == ctx.genders[first])
        .collect();
    if partners.is_empty() {
        return false;
    }

    let second = partners[rng.usize(0..partners.len())];
    genome.swap(first, second);
    true
}

/// Picks one operator per call (`swap_share` chance of swap), then re-ties guests.
pub fn mutate(
    genome: &mut [GroupId],
    ctx: &GenomeContext,
    indpb: f32,
    swap_share: f32,
    rng: &mut Rng,
) -> bool {
    let changed = if swap_share > 0.0 && rng.f32() < swap_share {
        mutate_swap(genome, ctx, rng)
    } else {
        mutate_uniform(genome, ctx.group_count, indpb, rng)
    };
    ctx.repair(genome) || changed
}
