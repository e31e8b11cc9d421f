use crate::roster::{PersonId, Roster};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// One past meeting as stored by the surrounding system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// ISO date (`YYYY-MM-DD`), so lexical order is chronological.
    pub date: String,
    pub groups: Vec<Vec<String>>,
    #[serde(default)]
    pub facilitators: Vec<String>,
}

/// Unordered pair of people; the smaller id is always first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(PersonId, PersonId);

impl PairKey {
    pub fn new(a: PersonId, b: PersonId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn members(&self) -> (PersonId, PersonId) {
        (self.0, self.1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStat {
    pub count: u32,
    pub last_met: Option<String>,
}

/// Pair -> meeting tally, rebuilt from scratch on every optimizer invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryIndex {
    pairs: HashMap<PairKey, PairStat>,
}

impl HistoryIndex {
    pub fn build(records: &[HistoryRecord], roster: &Roster) -> Self {
        let mut index = Self::default();
        let mut unresolved: HashSet<&str> = HashSet::new();

        for record in records {
            let groups: Vec<Vec<PersonId>> = record
                .groups
                .iter()
                .map(|g| {
                    g.iter()
                        .filter_map(|name| {
                            let id = roster.id_of(name);
                            if id.is_none() {
                                unresolved.insert(name.as_str());
                            }
                            id
                        })
                        .collect()
                })
                .collect();
            index.record_session(&record.date, &groups);
        }

        if !unresolved.is_empty() {
            warn!(
                "History mentions {} name(s) missing from the roster; those entries were ignored",
                unresolved.len()
            );
        }
        debug!(
            "History index built: {} records, {} pairs",
            records.len(),
            index.len()
        );
        index
    }

    /// Folds one more meeting into the tally.
    pub fn record_session(&mut self, date: &str, groups: &[Vec<PersonId>]) {
        for group in groups {
            for (&a, &b) in group.iter().tuple_combinations() {
                if a == b {
                    continue;
                }
                let stat = self.pairs.entry(PairKey::new(a, b)).or_default();
                stat.count += 1;
                let newer = match &stat.last_met {
                    Some(prev) => date > prev.as_str(),
                    None => true,
                };
                if newer {
                    stat.last_met = Some(date.to_string());
                }
            }
        }
    }

    #[inline]
    pub fn meet_count(&self, a: PersonId, b: PersonId) -> u32 {
        self.pairs
            .get(&PairKey::new(a, b))
            .map(|s| s.count)
            .unwrap_or(0)
    }

    pub fn get(&self, a: PersonId, b: PersonId) -> Option<&PairStat> {
        self.pairs.get(&PairKey::new(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &PairStat)> {
        self.pairs.iter()
    }

    /// Flattened `"name_a-name_b" -> count` table (names sorted), optionally
    /// restricted to pairs where both people are in `only`.
    pub fn pair_table(&self, roster: &Roster, only: Option<&HashSet<PersonId>>) -> BTreeMap<String, u32> {
        let mut table = BTreeMap::new();
        for (key, stat) in &self.pairs {
            let (a, b) = key.members();
            if let Some(filter) = only {
                if !filter.contains(&a) || !filter.contains(&b) {
                    continue;
                }
            }
            if let (Some(pa), Some(pb)) = (roster.get(a), roster.get(b)) {
                table.insert(pair_label(&pa.name, &pb.name), stat.count);
            }
        }
        table
    }
}

pub fn pair_label(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}
