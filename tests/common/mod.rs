#![allow(dead_code)]

use teamforge::config::Config;
use teamforge::history::HistoryRecord;
use teamforge::roster::{AttendanceRequest, Gender, Person, PersonId, Roster};

pub fn name(i: usize) -> String {
    format!("P{:02}", i)
}

pub fn person(id: PersonId, gender: Gender) -> Person {
    Person {
        id,
        name: name(id as usize),
        gender,
        preferred_partner: None,
        avoided_partner: None,
    }
}

/// `n` people with ids `1..=n`, alternating M/F starting with M.
pub fn people(n: usize) -> Vec<Person> {
    (1..=n)
        .map(|i| {
            let g = if i % 2 == 1 { Gender::Male } else { Gender::Female };
            person(i as PersonId, g)
        })
        .collect()
}

pub fn roster(n: usize) -> Roster {
    Roster::new(people(n)).expect("valid roster")
}

pub fn request(attendees: &[usize], facilitators: &[usize]) -> AttendanceRequest {
    AttendanceRequest {
        attendees: attendees.iter().map(|&i| name(i)).collect(),
        facilitators: facilitators.iter().map(|&i| name(i)).collect(),
        ..Default::default()
    }
}

pub fn record(date: &str, groups: &[&[usize]]) -> HistoryRecord {
    HistoryRecord {
        date: date.to_string(),
        groups: groups
            .iter()
            .map(|g| g.iter().map(|&i| name(i)).collect())
            .collect(),
        facilitators: Vec::new(),
    }
}

/// Small search budget so integration tests stay quick.
pub fn fast_config() -> Config {
    let mut cfg = Config::default();
    cfg.search.population_size = 120;
    cfg.search.generations = 30;
    cfg.search.archive_size = 20;
    cfg
}
