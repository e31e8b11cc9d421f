use crate::core_types::{Genome, GroupId};
use crate::optimizer::GenomeContext;
use fastrand::Rng;

/// Uniformly random group per attendee.
pub fn random_genome(ctx: &GenomeContext, rng: &mut Rng) -> Genome {
    let gc = ctx.group_count as GroupId;
    let mut genome: Genome = (0..ctx.len()).map(|_| rng.u16(0..gc)).collect();
    ctx.repair(&mut genome);
    genome
}

/// Size-balanced starting point: facilitators dealt round-robin into distinct
/// groups, everyone else dealt into whichever group is currently smallest.
pub fn balanced_genome(ctx: &GenomeContext, rng: &mut Rng) -> Genome {
    let n = ctx.len();
    let gc = ctx.group_count;
    let mut genome: Genome = vec![0; n];
    let mut sizes = vec![0usize; gc];

    let mut facilitators: Vec<usize> = (0..n).filter(|&i| ctx.is_facilitator[i]).collect();
    let mut others: Vec<usize> = (0..n).filter(|&i| !ctx.is_facilitator[i]).collect();
    rng.shuffle(&mut facilitators);
    rng.shuffle(&mut others);

    let offset = rng.usize(0..gc);
    for (k, &pos) in facilitators.iter().enumerate() {
        let g = (offset + k) % gc;
        genome[pos] = g as GroupId;
        sizes[g] += 1;
    }

    for &pos in &others {
        // Random starting label breaks ties between equally small groups
        let start = rng.usize(0..gc);
        let g = (0..gc)
            .map(|k| (start + k) % gc)
            .min_by_key(|&g| sizes[g])
            .unwrap_or(0);
        genome[pos] = g as GroupId;
        sizes[g] += 1;
    }

    ctx.repair(&mut genome);
    genome
}
