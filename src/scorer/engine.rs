use crate::core_types::{GroupId, FACILITATOR_SPREAD_MAX};
use crate::roster::Gender;
use crate::scorer::{EvaluationDetails, Evaluator, FitnessVector};

const PREFERRED_BONUS: f32 = 1.0;
const AVOIDED_PENALTY: f32 = 1.5;

/// Fast path used inside the generation loop.
#[inline]
pub fn evaluate(ev: &Evaluator, genome: &[GroupId]) -> FitnessVector {
    evaluate_details(ev, genome).fitness
}

pub fn evaluate_details(ev: &Evaluator, genome: &[GroupId]) -> EvaluationDetails {
    let group_count = ev.sizing.group_count;

    // 1. Materialize groups
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); group_count];
    for (pos, &g) in genome.iter().enumerate() {
        groups[g as usize].push(pos);
    }
    let group_sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    let facilitators_per_group: Vec<usize> = groups
        .iter()
        .map(|g| g.iter().filter(|&&p| ev.is_facilitator[p]).count())
        .collect();

    // 2. Feasibility gate
    let violations = group_sizes
        .iter()
        .filter(|&&s| ev.sizing.violates(s))
        .count() as u32;
    if violations > 0 {
        return EvaluationDetails {
            fitness: FitnessVector::infeasible(violations),
            group_sizes,
            facilitators_per_group,
            raw_preference: 0.0,
            pairs_examined: 0,
        };
    }

    // 3. Rewards
    let mut gender_sum = 0.0;
    let mut non_empty = 0usize;
    let mut novelty_sum = 0.0;
    let mut preference = 0.0;
    let mut total_pairs = 0usize;

    for members in groups.iter().filter(|g| !g.is_empty()) {
        non_empty += 1;

        let males = members
            .iter()
            .filter(|&&p| ev.genders[p] == Gender::Male)
            .count();
        let females = members.len() - males;
        if males > 0 && females > 0 {
            gender_sum += males.min(females) as f32 / males.max(females) as f32;
        }

        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                total_pairs += 1;
                let met = ev.meet_count(a, b);
                novelty_sum += 1.0 / (met as f32 + 1.0);

                let fresh = met < ev.recent_meeting_threshold;
                if fresh && ev.preferred[a] == Some(b) {
                    preference += PREFERRED_BONUS;
                }
                if fresh && ev.preferred[b] == Some(a) {
                    preference += PREFERRED_BONUS;
                }
                if ev.avoided[a] == Some(b) {
                    preference -= AVOIDED_PENALTY;
                }
                if ev.avoided[b] == Some(a) {
                    preference -= AVOIDED_PENALTY;
                }
            }
        }
    }

    let gender_balance = if non_empty > 0 {
        gender_sum / non_empty as f32
    } else {
        0.0
    };
    let novelty = if total_pairs > 0 {
        novelty_sum / total_pairs as f32
    } else {
        0.0
    };

    let max_pref = 2.0 * ev.attendee_count as f32;
    let preference_norm = if max_pref > 0.0 {
        ((preference + max_pref) / (2.0 * max_pref)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    EvaluationDetails {
        fitness: FitnessVector {
            gender_balance,
            novelty,
            facilitator_spread: facilitator_spread(&facilitators_per_group),
            preference: preference_norm,
            size_violation: 0,
        },
        group_sizes,
        facilitators_per_group,
        raw_preference: preference,
        pairs_examined: total_pairs,
    }
}

/// `1 / (variance + 0.1)` over per-group facilitator counts, empty groups included.
pub fn facilitator_spread(per_group: &[usize]) -> f32 {
    if per_group.len() <= 1 {
        return FACILITATOR_SPREAD_MAX;
    }
    let n = per_group.len() as f32;
    let mean = per_group.iter().sum::<usize>() as f32 / n;
    let variance = per_group
        .iter()
        .map(|&c| {
            let d = c as f32 - mean;
            d * d
        })
        .sum::<f32>()
        / n;
    if variance <= f32::EPSILON {
        FACILITATOR_SPREAD_MAX
    } else {
        1.0 / (variance + 0.1)
    }
}
