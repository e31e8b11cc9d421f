pub mod builder;
pub mod engine;
pub mod types;

pub use self::builder::EvaluatorBuildParams;
pub use self::types::{weighted_score, EvaluationDetails, FitnessVector};
use crate::config::GroupConstraints;
use crate::core_types::GroupId;
use crate::roster::Gender;
use serde::{Deserialize, Serialize};

/// Group count plus the size band partitions are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSizing {
    pub group_count: usize,
    pub min_size: usize,
    /// Configured maximum, raised to `ceil(n / group_count)` when it admits no partition.
    pub max_size: usize,
}

impl GroupSizing {
    pub fn resolve(
        attendee_count: usize,
        group_count_override: Option<usize>,
        constraints: &GroupConstraints,
    ) -> Self {
        let group_count = group_count_override
            .filter(|&g| g > 0)
            .unwrap_or_else(|| {
                let target = attendee_count as f32 / constraints.target_group_size;
                (target.round() as usize).max(1)
            })
            .min(GroupId::MAX as usize);

        let mut max_size = constraints.max_group_size;
        if max_size * group_count < attendee_count {
            max_size = attendee_count.div_ceil(group_count);
        }

        Self {
            group_count,
            min_size: constraints.min_group_size,
            max_size,
        }
    }

    /// Minimum sizes are never relaxed: too few people for the group count is infeasible.
    pub fn admits_feasible(&self, attendee_count: usize) -> bool {
        self.min_size * self.group_count <= attendee_count
            && attendee_count <= self.max_size * self.group_count
    }

    #[inline(always)]
    pub fn violates(&self, size: usize) -> bool {
        size > 0 && (size < self.min_size || size > self.max_size)
    }
}

/// Pure fitness function over genomes for one resolved session.
/// Immutable after construction, so it is shared freely across rayon workers.
#[derive(Debug, Clone)]
pub struct Evaluator {
    pub sizing: GroupSizing,
    pub recent_meeting_threshold: u32,
    pub attendee_count: usize,

    // Per-attendee tables (index = attendee position)
    pub genders: Vec<Gender>,
    pub is_facilitator: Vec<bool>,
    pub preferred: Vec<Option<usize>>,
    pub avoided: Vec<Option<usize>>,

    // Access: meet_counts[a * attendee_count + b]
    pub meet_counts: Vec<u32>,
}

impl Evaluator {
    #[inline(always)]
    pub fn meet_count(&self, a: usize, b: usize) -> u32 {
        self.meet_counts[a * self.attendee_count + b]
    }

    pub fn evaluate(&self, genome: &[GroupId]) -> FitnessVector {
        engine::evaluate(self, genome)
    }

    pub fn evaluate_details(&self, genome: &[GroupId]) -> EvaluationDetails {
        engine::evaluate_details(self, genome)
    }
}
