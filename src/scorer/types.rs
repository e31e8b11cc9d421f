use crate::config::ObjectiveWeights;
use serde::{Deserialize, Serialize};

/// Objective values of one partition. Rewards are zero whenever `size_violation > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessVector {
    pub gender_balance: f32,
    pub novelty: f32,
    pub facilitator_spread: f32,
    pub preference: f32,
    pub size_violation: u32,
}

impl FitnessVector {
    pub fn infeasible(violations: u32) -> Self {
        Self {
            size_violation: violations,
            ..Default::default()
        }
    }

    #[inline(always)]
    pub fn is_feasible(&self) -> bool {
        self.size_violation == 0
    }

    pub fn as_array(&self) -> [f32; 5] {
        [
            self.gender_balance,
            self.novelty,
            self.facilitator_spread,
            self.preference,
            self.size_violation as f32,
        ]
    }

    /// The four reward components, in display order.
    pub fn objectives(&self) -> [f32; 4] {
        [
            self.gender_balance,
            self.novelty,
            self.facilitator_spread,
            self.preference,
        ]
    }
}

#[inline(always)]
pub fn weighted_score(fitness: &FitnessVector, weights: &ObjectiveWeights) -> f32 {
    fitness
        .as_array()
        .iter()
        .zip(weights.0.iter())
        .map(|(v, w)| v * w)
        .sum()
}

/// Everything the fast path computes, kept for reports and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDetails {
    pub fitness: FitnessVector,
    pub group_sizes: Vec<usize>,
    pub facilitators_per_group: Vec<usize>,
    /// Preference sum before normalization; negative when avoidances dominate.
    pub raw_preference: f32,
    pub pairs_examined: usize,
}
