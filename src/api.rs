use crate::config::{Config, ObjectiveWeights};
use crate::core_types::MIN_ATTENDEES;
use crate::error::TfResult;
use crate::history::{HistoryIndex, HistoryRecord};
use crate::optimizer::diversity::{min_distance, select_diverse};
use crate::optimizer::{
    ArchiveEntry, Engine, EvolutionOptions, GenomeContext, ProgressCallback, RunOutcome,
};
use crate::roster::{AttendanceRequest, PersonId, Roster, Session};
use crate::scorer::{Evaluator, EvaluatorBuildParams};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use strum_macros::{Display, EnumString};
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum OutcomeStatus {
    Complete,
    /// Stopped early on request; candidates are best-so-far.
    Partial,
    InsufficientAttendees,
    InfeasibleRequest,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultCandidate {
    pub score: String,
    /// gender balance, novelty, facilitator spread, preference
    pub objective_breakdown: [String; 4],
    pub groups: Vec<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GroupingOutcome {
    pub status: OutcomeStatus,
    pub group_count: usize,
    pub balance_first: Vec<ResultCandidate>,
    pub novelty_first: Vec<ResultCandidate>,
    /// "a-b" -> times met, restricted to pairs of attendees
    pub pair_counts: BTreeMap<String, u32>,
    pub warnings: Vec<String>,
    /// Base seed of the search; the novelty-first run uses `seed + 1`. `None` when no search ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GroupingOutcome {
    fn empty(status: OutcomeStatus, group_count: usize, pair_counts: BTreeMap<String, u32>, warnings: Vec<String>) -> Self {
        Self {
            status,
            group_count,
            balance_first: Vec::new(),
            novelty_first: Vec::new(),
            pair_counts,
            warnings,
            seed: None,
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.balance_first.len() + self.novelty_first.len()
    }
}

/// Stream events for consumers that forward progress (e.g. `plan --json`).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ProgressEvent {
    Progress(u8),
    Result(Box<GroupingOutcome>),
    Error(String),
}

/// Folds the progress of the two concurrent runs into one non-decreasing stream.
struct ProgressMerger<'a, CB: ProgressCallback + ?Sized> {
    inner: &'a CB,
    cancel: Arc<AtomicBool>,
    state: Mutex<MergeState>,
}

#[derive(Default)]
struct MergeState {
    percents: [u8; 2],
    emitted: Option<u8>,
}

impl<'a, CB: ProgressCallback + ?Sized> ProgressMerger<'a, CB> {
    fn new(inner: &'a CB, cancel: Arc<AtomicBool>) -> Self {
        Self {
            inner,
            cancel,
            state: Mutex::new(MergeState::default()),
        }
    }

    fn report(&self, slot: usize, percent: u8) -> bool {
        if self.cancel.load(Ordering::Relaxed) {
            return false;
        }

        // The lock is held across the callback so emissions stay ordered
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.percents[slot] = state.percents[slot].max(percent);
        let merged = ((state.percents[0] as u16 + state.percents[1] as u16) / 2) as u8;
        if state.emitted.is_some_and(|last| merged <= last) {
            return true;
        }
        state.emitted = Some(merged);

        let keep_going = self.inner.on_progress(merged);
        if !keep_going {
            self.cancel.store(true, Ordering::Relaxed);
        }
        keep_going
    }
}

struct ProfileProgress<'m, 'a, CB: ProgressCallback + ?Sized> {
    slot: usize,
    merger: &'m ProgressMerger<'a, CB>,
}

impl<CB: ProgressCallback + ?Sized> ProgressCallback for ProfileProgress<'_, '_, CB> {
    fn on_progress(&self, percent: u8) -> bool {
        self.merger.report(self.slot, percent)
    }
}

/// Service: split the requested attendees into groups under both weighting
/// profiles and return the diversity-filtered candidates of each.
///
/// Contract violations in the request are the only errors; every other
/// outcome (too few people, infeasible sizing, cancellation) is reported
/// through [`OutcomeStatus`].
pub fn plan_groups<CB: ProgressCallback + ?Sized>(
    roster: &Roster,
    history_records: &[HistoryRecord],
    request: &AttendanceRequest,
    config: &Config,
    seed: Option<u64>,
    callback: &CB,
) -> TfResult<GroupingOutcome> {
    config.validate()?;
    let balance_weights = config.weights.get_balance_first()?;
    let novelty_weights = config.weights.get_novelty_first()?;

    let session = request.resolve(roster)?;
    let mut warnings = session.warnings.clone();

    let history = HistoryIndex::build(history_records, roster);
    let attendee_ids: HashSet<PersonId> = session.attendees.iter().map(|a| a.id).collect();
    let pair_counts = history.pair_table(roster, Some(&attendee_ids));

    if session.len() < MIN_ATTENDEES {
        let msg = format!(
            "Only {} valid attendee(s); at least {} are needed",
            session.len(),
            MIN_ATTENDEES
        );
        warn!("{}", msg);
        warnings.push(msg);
        return Ok(GroupingOutcome::empty(
            OutcomeStatus::InsufficientAttendees,
            0,
            pair_counts,
            warnings,
        ));
    }

    let evaluator = EvaluatorBuildParams::builder()
        .session(&session)
        .history(&history)
        .constraints(config.constraints.clone())
        .build()
        .build_evaluator();
    let sizing = evaluator.sizing;

    info!(
        attendees = session.len(),
        facilitators = session.facilitator_count(),
        groups = sizing.group_count,
        min = sizing.min_size,
        max = sizing.max_size,
        "planning session"
    );

    if !sizing.admits_feasible(session.len()) {
        let msg = format!(
            "{} attendees cannot fill {} groups of {}..={} people",
            session.len(),
            sizing.group_count,
            sizing.min_size,
            sizing.max_size
        );
        warn!("{}", msg);
        warnings.push(msg);
        return Ok(GroupingOutcome::empty(
            OutcomeStatus::InfeasibleRequest,
            sizing.group_count,
            pair_counts,
            warnings,
        ));
    }

    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    info!(seed, "searching");

    let context = GenomeContext::from_session(&session, sizing.group_count);
    let options = EvolutionOptions::from(config);
    let cancel = Arc::new(AtomicBool::new(false));
    let merger = ProgressMerger::new(callback, cancel.clone());

    let run_profile = |slot: usize, weights: ObjectiveWeights| -> RunOutcome {
        let progress = ProfileProgress {
            slot,
            merger: &merger,
        };
        Engine::new(&evaluator, context.clone(), weights, options.clone())
            .with_cancel_flag(cancel.clone())
            .run(Some(seed.wrapping_add(slot as u64)), &progress)
    };

    let (balance_run, novelty_run) = rayon::join(
        || run_profile(0, balance_weights),
        || run_profile(1, novelty_weights),
    );

    let k = config.search.results_per_profile;
    let threshold = min_distance(session.len(), config.search.diversity_threshold);
    let balance_first = candidates(&balance_run, &session, k, threshold);
    let novelty_first = candidates(&novelty_run, &session, k, threshold);

    let cancelled = balance_run.cancelled || novelty_run.cancelled;
    let status = if cancelled {
        warnings.push("Search stopped early; results are partial".to_string());
        OutcomeStatus::Partial
    } else if balance_first.is_empty() && novelty_first.is_empty() {
        warnings.push("No grouping satisfied the group size limits".to_string());
        OutcomeStatus::InfeasibleRequest
    } else {
        OutcomeStatus::Complete
    };

    info!(
        %status,
        balance_first = balance_first.len(),
        novelty_first = novelty_first.len(),
        "planning finished"
    );

    Ok(GroupingOutcome {
        status,
        group_count: sizing.group_count,
        balance_first,
        novelty_first,
        pair_counts,
        warnings,
        seed: Some(seed),
    })
}

fn candidates(run: &RunOutcome, session: &Session, k: usize, threshold: usize) -> Vec<ResultCandidate> {
    select_diverse(run.archive.entries(), k, threshold)
        .into_iter()
        .map(|entry| to_candidate(entry, session))
        .collect()
}

pub fn to_candidate(entry: &ArchiveEntry, session: &Session) -> ResultCandidate {
    let groups = entry
        .partition
        .groups()
        .iter()
        .map(|members| {
            members
                .iter()
                .map(|&pos| session.attendees[pos].name.clone())
                .collect()
        })
        .collect();

    ResultCandidate {
        score: format!("{:.2}", entry.score),
        objective_breakdown: entry.fitness.objectives().map(|v| format!("{:.2}", v)),
        groups,
    }
}

/// Service: evaluate a caller-supplied genome for the given request without searching.
pub fn build_evaluator(
    roster: &Roster,
    history_records: &[HistoryRecord],
    request: &AttendanceRequest,
    config: &Config,
) -> TfResult<(Session, Evaluator)> {
    config.validate()?;
    let session = request.resolve(roster)?;
    let history = HistoryIndex::build(history_records, roster);
    let evaluator = EvaluatorBuildParams::builder()
        .session(&session)
        .history(&history)
        .constraints(config.constraints.clone())
        .build()
        .build_evaluator();
    Ok((session, evaluator))
}
