use crate::core_types::GroupId;
use crate::error::{TeamForgeError, TfResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum_macros::{Display, EnumString};
use tracing::warn;

pub type PersonId = u32;

/// Guests get synthetic ids counted down from here so they never collide with roster ids.
pub const GUEST_ID_BASE: PersonId = u32::MAX;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    #[serde(rename = "M", alias = "m", alias = "Male", alias = "male")]
    #[strum(to_string = "M", serialize = "Male")]
    Male,
    #[serde(rename = "F", alias = "f", alias = "Female", alias = "female")]
    #[strum(to_string = "F", serialize = "Female")]
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub gender: Gender,
    #[serde(default, alias = "preferred_member_id")]
    pub preferred_partner: Option<PersonId>,
    #[serde(default, alias = "avoided_member_id")]
    pub avoided_partner: Option<PersonId>,
}

/// Read-only snapshot of everyone known at invocation time.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    people: Vec<Person>,
    by_id: HashMap<PersonId, usize>,
    by_name: HashMap<String, usize>,
}

impl Roster {
    pub fn new(people: Vec<Person>) -> TfResult<Self> {
        let mut by_id = HashMap::with_capacity(people.len());
        let mut by_name = HashMap::with_capacity(people.len());

        for (idx, p) in people.iter().enumerate() {
            if by_id.insert(p.id, idx).is_some() {
                return Err(TeamForgeError::Validation(format!(
                    "Duplicate person id {} in roster",
                    p.id
                )));
            }
            if by_name.insert(p.name.clone(), idx).is_some() {
                return Err(TeamForgeError::Validation(format!(
                    "Duplicate person name '{}' in roster",
                    p.name
                )));
            }
        }

        Ok(Self {
            people,
            by_id,
            by_name,
        })
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.by_id.get(&id).map(|&i| &self.people[i])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Person> {
        self.by_name.get(name).map(|&i| &self.people[i])
    }

    pub fn id_of(&self, name: &str) -> Option<PersonId> {
        self.find_by_name(name).map(|p| p.id)
    }
}

/// A visitor brought along by a member; always seated with the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub gender: Gender,
    pub host: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceRequest {
    pub attendees: Vec<String>,
    pub facilitators: Vec<String>,
    pub group_count_override: Option<usize>,
    pub guests: Vec<Guest>,
}

#[derive(Debug, Clone)]
pub struct Attendee {
    pub id: PersonId,
    pub name: String,
    pub gender: Gender,
    pub preferred_partner: Option<PersonId>,
    pub avoided_partner: Option<PersonId>,
    pub is_facilitator: bool,
    /// Position of the host in the attendee ordering, for guests.
    pub host: Option<usize>,
}

/// An attendance request resolved against the roster, in fixed attendee order.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub attendees: Vec<Attendee>,
    pub group_count_override: Option<usize>,
    pub warnings: Vec<String>,
}

impl Session {
    pub fn len(&self) -> usize {
        self.attendees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attendees.is_empty()
    }

    pub fn facilitator_count(&self) -> usize {
        self.attendees.iter().filter(|a| a.is_facilitator).count()
    }

    /// (guest position, host position) pairs.
    pub fn guest_links(&self) -> Vec<(usize, usize)> {
        self.attendees
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.host.map(|h| (i, h)))
            .collect()
    }
}

impl AttendanceRequest {
    /// Resolves names against the roster. Unknown names are dropped with a warning;
    /// contract violations are rejected.
    pub fn resolve(&self, roster: &Roster) -> TfResult<Session> {
        match self.group_count_override {
            Some(0) => {
                return Err(TeamForgeError::Contract(
                    "group_count_override must be positive".to_string(),
                ));
            }
            Some(g) if g > GroupId::MAX as usize => {
                return Err(TeamForgeError::Contract(format!(
                    "group_count_override {} exceeds the limit of {} groups",
                    g,
                    GroupId::MAX
                )));
            }
            _ => {}
        }

        let requested: HashSet<&str> = self.attendees.iter().map(String::as_str).collect();
        if let Some(stray) = self
            .facilitators
            .iter()
            .find(|f| !requested.contains(f.as_str()))
        {
            return Err(TeamForgeError::Contract(format!(
                "Facilitator '{}' is not among the attendees",
                stray
            )));
        }
        let facilitators: HashSet<&str> = self.facilitators.iter().map(String::as_str).collect();

        let mut warnings = Vec::new();
        let mut attendees: Vec<Attendee> = Vec::with_capacity(self.attendees.len());
        let mut seen = HashSet::new();

        for name in &self.attendees {
            if !seen.insert(name.as_str()) {
                let msg = format!("Attendee '{}' listed twice; keeping one entry", name);
                warn!("{}", msg);
                warnings.push(msg);
                continue;
            }
            match roster.find_by_name(name) {
                Some(p) => attendees.push(Attendee {
                    id: p.id,
                    name: p.name.clone(),
                    gender: p.gender,
                    preferred_partner: p.preferred_partner,
                    avoided_partner: p.avoided_partner,
                    is_facilitator: facilitators.contains(name.as_str()),
                    host: None,
                }),
                None => {
                    let role = if facilitators.contains(name.as_str()) {
                        "facilitator"
                    } else {
                        "attendee"
                    };
                    let msg = format!("Unknown {} '{}' dropped", role, name);
                    warn!("{}", msg);
                    warnings.push(msg);
                }
            }
        }

        let member_count = attendees.len();
        let mut next_guest_id = GUEST_ID_BASE;
        for guest in &self.guests {
            if roster.find_by_name(&guest.name).is_some() || !seen.insert(guest.name.as_str()) {
                return Err(TeamForgeError::Contract(format!(
                    "Guest name '{}' collides with a member",
                    guest.name
                )));
            }
            let host = attendees[..member_count]
                .iter()
                .position(|a| a.name == guest.host);
            if host.is_none() {
                let msg = format!(
                    "Host '{}' of guest '{}' is not attending; guest placed freely",
                    guest.host, guest.name
                );
                warn!("{}", msg);
                warnings.push(msg);
            }
            while roster.get(next_guest_id).is_some() {
                next_guest_id -= 1;
            }
            let id = next_guest_id;
            next_guest_id -= 1;
            attendees.push(Attendee {
                id,
                name: guest.name.clone(),
                gender: guest.gender,
                preferred_partner: None,
                avoided_partner: None,
                is_facilitator: false,
                host,
            });
        }

        Ok(Session {
            attendees,
            group_count_override: self.group_count_override,
            warnings,
        })
    }
}
