use crate::config::GroupConstraints;
use crate::history::HistoryIndex;
use crate::roster::{PersonId, Session};
use crate::scorer::{Evaluator, GroupSizing};
use std::collections::HashMap;
use tracing::debug;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct EvaluatorBuildParams<'a> {
    pub session: &'a Session,
    pub history: &'a HistoryIndex,
    #[builder(default)]
    pub constraints: GroupConstraints,
}

impl EvaluatorBuildParams<'_> {
    pub fn build_evaluator(self) -> Evaluator {
        let session = self.session;
        let n = session.len();
        let sizing = GroupSizing::resolve(n, session.group_count_override, &self.constraints);

        let position: HashMap<PersonId, usize> = session
            .attendees
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id, i))
            .collect();

        // Partners who are not attending have no effect
        let lookup = |id: Option<PersonId>| id.and_then(|p| position.get(&p).copied());

        let genders = session.attendees.iter().map(|a| a.gender).collect();
        let is_facilitator = session.attendees.iter().map(|a| a.is_facilitator).collect();
        let preferred = session
            .attendees
            .iter()
            .map(|a| lookup(a.preferred_partner))
            .collect();
        let avoided = session
            .attendees
            .iter()
            .map(|a| lookup(a.avoided_partner))
            .collect();

        let mut meet_counts = vec![0u32; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let c = self
                    .history
                    .meet_count(session.attendees[i].id, session.attendees[j].id);
                meet_counts[i * n + j] = c;
                meet_counts[j * n + i] = c;
            }
        }

        debug!(
            "Evaluator ready: {} attendees, {} groups, sizes [{}, {}]",
            n, sizing.group_count, sizing.min_size, sizing.max_size
        );

        Evaluator {
            sizing,
            recent_meeting_threshold: self.constraints.recent_meeting_threshold,
            attendee_count: n,
            genders,
            is_facilitator,
            preferred,
            avoided,
            meet_counts,
        }
    }
}
