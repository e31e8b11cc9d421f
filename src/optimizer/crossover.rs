use crate::core_types::GroupId;
use fastrand::Rng;

/// Two-point crossover: swaps the segment `[cx1, cx2)` between the parents in place.
/// Returns true if either genome actually changed.
pub fn crossover_two_point(a: &mut [GroupId], b: &mut [GroupId], rng: &mut Rng) -> bool {
    let size = a.len().min(b.len());
    if size < 2 {
        return false;
    }

    let mut cx1 = rng.usize(1..=size);
    let mut cx2 = rng.usize(1..size);
    if cx2 >= cx1 {
        cx2 += 1;
    } else {
        std::mem::swap(&mut cx1, &mut cx2);
    }

    let changed = a[cx1..cx2] != b[cx1..cx2];
    a[cx1..cx2].swap_with_slice(&mut b[cx1..cx2]);
    changed
}
