mod common;

use common::*;
use proptest::prelude::*;
use teamforge::config::GroupConstraints;
use teamforge::core_types::FACILITATOR_SPREAD_MAX;
use teamforge::history::HistoryIndex;
use teamforge::roster::{Gender, Roster};
use teamforge::scorer::{Evaluator, EvaluatorBuildParams};

fn evaluator_for(roster: &Roster, history: &HistoryIndex, attendees: &[usize], facilitators: &[usize], groups: Option<usize>) -> Evaluator {
    let mut req = request(attendees, facilitators);
    req.group_count_override = groups;
    let session = req.resolve(roster).expect("request resolves");
    EvaluatorBuildParams::builder()
        .session(&session)
        .history(history)
        .build()
        .build_evaluator()
}

#[test]
fn test_four_strangers_one_group() {
    let roster = roster(4);
    let ev = evaluator_for(&roster, &HistoryIndex::default(), &[1, 2, 3, 4], &[1], Some(1));
    assert_eq!(ev.sizing.group_count, 1);

    let f = ev.evaluate(&[0, 0, 0, 0]);
    assert!(f.is_feasible());
    assert_eq!(f.novelty, 1.0);
    assert_eq!(f.gender_balance, 1.0);
    assert_eq!(f.facilitator_spread, FACILITATOR_SPREAD_MAX);
}

#[test]
fn test_twelve_attendees_three_groups() {
    let roster = roster(12);
    let attendees: Vec<usize> = (1..=12).collect();
    let ev = evaluator_for(&roster, &HistoryIndex::default(), &attendees, &[1, 2, 3], None);
    assert_eq!(ev.sizing.group_count, 3);
    assert_eq!((ev.sizing.min_size, ev.sizing.max_size), (3, 5));
}

#[test]
fn test_avoided_pair_costs_preference() {
    let mut people = people(6);
    people[0].avoided_partner = Some(2);
    let roster = Roster::new(people).unwrap();
    let ev = evaluator_for(&roster, &HistoryIndex::default(), &[1, 2, 3, 4, 5, 6], &[], Some(2));

    // P01 and P02 together
    let together = ev.evaluate_details(&[0, 0, 0, 1, 1, 1]);
    assert!(together.fitness.is_feasible());
    assert_eq!(together.raw_preference, -1.5);
    // (-1.5 + 12) / 24
    assert!((together.fitness.preference - 0.4375).abs() < 1e-6);

    // Recompute directly: apart means no contribution
    let apart = ev.evaluate_details(&[0, 1, 0, 1, 0, 1]);
    assert_eq!(apart.raw_preference, 0.0);
    assert!(together.fitness.preference < apart.fitness.preference);
}

#[test]
fn test_too_few_for_group_count() {
    let roster = roster(5);
    let ev = evaluator_for(&roster, &HistoryIndex::default(), &[1, 2, 3, 4, 5], &[], Some(2));
    assert!(!ev.sizing.admits_feasible(5));

    // Every way of filling both groups breaks the minimum
    for genome in [[0, 0, 0, 1, 1], [0, 0, 1, 1, 1], [0, 1, 0, 1, 0]] {
        let f = ev.evaluate(&genome);
        assert!(!f.is_feasible());
        assert_eq!(f.objectives(), [0.0; 4]);
    }
}

#[test]
fn test_single_gender_group_scores_zero_balance() {
    let people = vec![
        person(1, Gender::Male),
        person(2, Gender::Male),
        person(3, Gender::Male),
    ];
    let roster = Roster::new(people).unwrap();
    let ev = evaluator_for(&roster, &HistoryIndex::default(), &[1, 2, 3], &[], Some(1));
    assert_eq!(ev.evaluate(&[0, 0, 0]).gender_balance, 0.0);
}

#[test]
fn test_history_lowers_novelty() {
    let roster = roster(4);
    let history = HistoryIndex::build(&[record("2024-01-01", &[&[1, 2]])], &roster);
    let ev = evaluator_for(&roster, &history, &[1, 2, 3, 4], &[], Some(1));

    // six pairs, one met once: (5 + 0.5) / 6
    let f = ev.evaluate(&[0, 0, 0, 0]);
    assert!((f.novelty - 5.5 / 6.0).abs() < 1e-6);
}

#[test]
fn test_preference_bonus_voided_after_recent_meetings() {
    let mut people = people(6);
    people[0].preferred_partner = Some(2);
    let roster = Roster::new(people).unwrap();
    let genome = [0, 0, 0, 1, 1, 1];

    let fresh = evaluator_for(&roster, &HistoryIndex::default(), &[1, 2, 3, 4, 5, 6], &[], Some(2));
    assert_eq!(fresh.evaluate_details(&genome).raw_preference, 1.0);

    let records = [
        record("2024-01-01", &[&[1, 2, 3]]),
        record("2024-01-08", &[&[1, 2, 4]]),
    ];
    let history = HistoryIndex::build(&records, &roster);
    let stale = evaluator_for(&roster, &history, &[1, 2, 3, 4, 5, 6], &[], Some(2));
    assert_eq!(stale.evaluate_details(&genome).raw_preference, 0.0);
}

#[test]
fn test_uneven_facilitators_score_lower() {
    let roster = roster(6);
    let ev = evaluator_for(&roster, &HistoryIndex::default(), &[1, 2, 3, 4, 5, 6], &[1, 2], Some(2));
    let spread = ev.evaluate(&[0, 1, 0, 1, 0, 1]).facilitator_spread;
    let stacked = ev.evaluate(&[0, 0, 0, 1, 1, 1]).facilitator_spread;
    assert_eq!(spread, FACILITATOR_SPREAD_MAX);
    assert!(stacked < spread);
}

proptest! {
    #[test]
    fn prop_partition_invariants(
        (n, gc, genome) in (3usize..24, 1usize..6).prop_flat_map(|(n, gc)| {
            (Just(n), Just(gc), prop::collection::vec(0u16..gc as u16, n))
        })
    ) {
        let roster = roster(n);
        let attendees: Vec<usize> = (1..=n).collect();
        let ev = evaluator_for(&roster, &HistoryIndex::default(), &attendees, &[1], Some(gc));
        let d = ev.evaluate_details(&genome);

        prop_assert_eq!(d.group_sizes.iter().sum::<usize>(), n);

        let f = d.fitness;
        prop_assert!((0.0..=1.0).contains(&f.gender_balance));
        prop_assert!((0.0..=1.0).contains(&f.novelty));
        prop_assert!((0.0..=1.0).contains(&f.preference));

        let c = GroupConstraints::default();
        if f.is_feasible() {
            for &s in d.group_sizes.iter().filter(|&&s| s > 0) {
                prop_assert!(s >= c.min_group_size && s <= ev.sizing.max_size);
            }
        } else {
            prop_assert_eq!(f.objectives(), [0.0; 4]);
        }
    }
}
