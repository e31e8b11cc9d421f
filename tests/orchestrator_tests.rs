mod common;

use common::*;
use std::collections::HashMap;
use std::sync::Mutex;
use teamforge::api::{plan_groups, GroupingOutcome, OutcomeStatus, ProgressEvent, ResultCandidate};
use teamforge::error::TeamForgeError;
use teamforge::optimizer::NoProgress;
use teamforge::partition::permutation_invariant_distance;
use teamforge::roster::{Gender, Guest};

fn genome_of(candidate: &ResultCandidate, order: &HashMap<String, usize>) -> Vec<u16> {
    let mut genome = vec![u16::MAX; order.len()];
    for (g, members) in candidate.groups.iter().enumerate() {
        for name in members {
            genome[order[name]] = g as u16;
        }
    }
    genome
}

fn assert_covers_everyone(outcome: &GroupingOutcome, expected: &[String]) {
    for c in outcome.balance_first.iter().chain(&outcome.novelty_first) {
        let mut seen: Vec<String> = c.groups.iter().flatten().cloned().collect();
        seen.sort();
        let mut want = expected.to_vec();
        want.sort();
        assert_eq!(seen, want);
    }
}

#[test]
fn test_only_one_grouping_possible() {
    let roster = roster(4);
    let mut req = request(&[1, 2, 3, 4], &[1]);
    req.group_count_override = Some(1);

    let out = plan_groups(&roster, &[], &req, &fast_config(), Some(3), &NoProgress).unwrap();
    assert_eq!(out.status, OutcomeStatus::Complete);
    // only one distinct grouping exists
    assert_eq!(out.balance_first.len(), 1);
    assert_eq!(out.novelty_first.len(), 1);
    assert_eq!(out.balance_first[0].groups.len(), 1);
    assert_eq!(out.balance_first[0].objective_breakdown[1], "1.00");
}

#[test]
fn test_twelve_attendees_full_run() {
    let roster = roster(14);
    let attendees: Vec<usize> = (1..=12).collect();
    let req = request(&attendees, &[1, 2, 3]);
    let history = vec![
        record("2024-01-01", &[&[1, 2, 3, 4], &[5, 6, 7, 13]]),
        record("2024-01-08", &[&[1, 2, 14]]),
    ];

    let out = plan_groups(&roster, &history, &req, &fast_config(), Some(11), &NoProgress).unwrap();
    assert_eq!(out.status, OutcomeStatus::Complete);
    assert_eq!(out.group_count, 3);
    assert!(!out.balance_first.is_empty() && out.balance_first.len() <= 3);
    assert!(!out.novelty_first.is_empty() && out.novelty_first.len() <= 3);

    let names: Vec<String> = attendees.iter().map(|&i| name(i)).collect();
    assert_covers_everyone(&out, &names);

    for c in out.balance_first.iter().chain(&out.novelty_first) {
        assert!(c.groups.iter().all(|g| (3..=5).contains(&g.len())));
    }

    // best first
    let scores: Vec<f32> = out.balance_first.iter().map(|c| c.score.parse().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // only pairs of attendees are listed
    assert_eq!(out.pair_counts.get("P01-P02"), Some(&2));
    assert_eq!(out.pair_counts.get("P05-P06"), Some(&1));
    assert!(out.pair_counts.keys().all(|k| !k.contains("P13") && !k.contains("P14")));
}

#[test]
fn test_candidates_are_mutually_distant() {
    let roster = roster(16);
    let attendees: Vec<usize> = (1..=16).collect();
    let req = request(&attendees, &[1, 5, 9]);
    let mut cfg = fast_config();
    cfg.search.diversity_threshold = 0.25;
    cfg.search.results_per_profile = 4;

    let out = plan_groups(&roster, &[], &req, &cfg, Some(5), &NoProgress).unwrap();
    let order: HashMap<String, usize> = attendees.iter().enumerate().map(|(i, &p)| (name(p), i)).collect();
    let min = (16.0f32 * 0.25).floor() as usize;

    for list in [&out.balance_first, &out.novelty_first] {
        let genomes: Vec<Vec<u16>> = list.iter().map(|c| genome_of(c, &order)).collect();
        for i in 0..genomes.len() {
            for j in i + 1..genomes.len() {
                assert!(permutation_invariant_distance(&genomes[i], &genomes[j]) >= min);
            }
        }
    }
}

#[test]
fn test_same_seed_same_outcome() {
    let roster = roster(13);
    let attendees: Vec<usize> = (1..=13).collect();
    let req = request(&attendees, &[2, 4]);
    let cfg = fast_config();

    let a = plan_groups(&roster, &[], &req, &cfg, Some(99), &NoProgress).unwrap();
    let b = plan_groups(&roster, &[], &req, &cfg, Some(99), &NoProgress).unwrap();
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn test_unseeded_run_reports_a_reusable_seed() {
    let roster = roster(12);
    let req = request(&(1..=12).collect::<Vec<_>>(), &[1, 2]);
    let cfg = fast_config();

    let first = plan_groups(&roster, &[], &req, &cfg, None, &NoProgress).unwrap();
    let seed = first.seed.expect("a search ran");
    let again = plan_groups(&roster, &[], &req, &cfg, Some(seed), &NoProgress).unwrap();
    assert_eq!(again.seed, Some(seed));
    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&again).unwrap());
}

#[test]
fn test_progress_is_monotonic_and_finishes() {
    let roster = roster(12);
    let attendees: Vec<usize> = (1..=12).collect();
    let req = request(&attendees, &[1]);
    let seen = Mutex::new(Vec::new());
    let cb = |p: u8| {
        seen.lock().unwrap().push(p);
        true
    };

    plan_groups(&roster, &[], &req, &fast_config(), Some(1), &cb).unwrap();
    let seen = seen.into_inner().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seen.last(), Some(&100));
}

#[test]
fn test_cancellation_returns_partial() {
    let roster = roster(12);
    let attendees: Vec<usize> = (1..=12).collect();
    let req = request(&attendees, &[1]);
    let cb = |_: u8| false;

    let out = plan_groups(&roster, &[], &req, &fast_config(), Some(1), &cb).unwrap();
    assert_eq!(out.status, OutcomeStatus::Partial);
    assert!(out.warnings.iter().any(|w| w.contains("partial")));
}

#[test]
fn test_group_count_too_high_is_infeasible() {
    let roster = roster(5);
    let mut req = request(&[1, 2, 3, 4, 5], &[]);
    req.group_count_override = Some(2);

    let out = plan_groups(&roster, &[], &req, &fast_config(), Some(1), &NoProgress).unwrap();
    assert_eq!(out.status, OutcomeStatus::InfeasibleRequest);
    assert_eq!(out.group_count, 2);
    assert_eq!(out.candidate_count(), 0);
    assert_eq!(out.seed, None);
}

#[test]
fn test_search_without_feasible_grouping_is_infeasible() {
    // 13 people in 4 groups of 3..=5 is satisfiable, but two random genomes
    // per profile and no generations rarely hit it
    let roster = roster(13);
    let mut req = request(&(1..=13).collect::<Vec<_>>(), &[]);
    req.group_count_override = Some(4);
    let mut cfg = fast_config();
    cfg.search.population_size = 2;
    cfg.search.generations = 0;

    let infeasible = (0..200u64)
        .map(|seed| plan_groups(&roster, &[], &req, &cfg, Some(seed), &NoProgress).unwrap())
        .find(|out| out.status == OutcomeStatus::InfeasibleRequest)
        .expect("some seed leaves every archived genome infeasible");

    assert_eq!(infeasible.group_count, 4);
    assert!(infeasible.balance_first.is_empty());
    assert!(infeasible.novelty_first.is_empty());
    assert!(infeasible.warnings.iter().any(|w| w.contains("group size limits")));
}

#[test]
fn test_too_few_known_attendees() {
    let roster = roster(4);
    let mut req = request(&[1, 2], &[]);
    req.attendees.push("Ghost".to_string());

    let out = plan_groups(&roster, &[], &req, &fast_config(), None, &NoProgress).unwrap();
    assert_eq!(out.status, OutcomeStatus::InsufficientAttendees);
    assert!(out.warnings.iter().any(|w| w.contains("Unknown attendee 'Ghost'")));
}

#[test]
fn test_facilitator_outside_attendees_is_rejected() {
    let roster = roster(6);
    let req = request(&[1, 2, 3, 4], &[5]);
    let err = plan_groups(&roster, &[], &req, &fast_config(), None, &NoProgress).unwrap_err();
    assert!(matches!(err, TeamForgeError::Contract(_)));
}

#[test]
fn test_bad_weights_are_rejected() {
    let roster = roster(6);
    let req = request(&[1, 2, 3, 4, 5, 6], &[]);
    let mut cfg = fast_config();
    cfg.weights.novelty_first = "1,2,3".to_string();
    let err = plan_groups(&roster, &[], &req, &cfg, None, &NoProgress).unwrap_err();
    assert!(matches!(err, TeamForgeError::Config(_)));
}

#[test]
fn test_guest_sits_with_host() {
    let roster = roster(10);
    let mut req = request(&(1..=10).collect::<Vec<_>>(), &[1, 2]);
    req.guests.push(Guest {
        name: "Visitor".to_string(),
        gender: Gender::Female,
        host: name(3),
    });

    let out = plan_groups(&roster, &[], &req, &fast_config(), Some(8), &NoProgress).unwrap();
    assert_eq!(out.status, OutcomeStatus::Complete);
    for c in out.balance_first.iter().chain(&out.novelty_first) {
        let group = c.groups.iter().find(|g| g.contains(&"Visitor".to_string())).unwrap();
        assert!(group.contains(&name(3)));
    }
}

#[test]
fn test_progress_event_wire_format() {
    let json = serde_json::to_string(&ProgressEvent::Progress(40)).unwrap();
    assert_eq!(json, r#"{"type":"progress","data":40}"#);

    let err = serde_json::to_string(&ProgressEvent::Error("boom".to_string())).unwrap();
    assert_eq!(err, r#"{"type":"error","data":"boom"}"#);
}
