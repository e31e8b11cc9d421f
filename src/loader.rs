use crate::error::{TeamForgeError, TfResult};
use crate::history::HistoryRecord;
use crate::roster::{AttendanceRequest, Gender, Person, PersonId, Roster};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct RosterRow {
    id: PersonId,
    name: String,
    gender: Gender,
    #[serde(default, alias = "preferred_partner")]
    preferred_member_id: Option<PersonId>,
    #[serde(default, alias = "avoided_partner")]
    avoided_member_id: Option<PersonId>,
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    date: String,
    groups: String,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Loads a roster from `.json` (array of people) or CSV
/// (`id,name,gender,preferred_member_id,avoided_member_id`; extra columns ignored).
pub fn load_roster<P: AsRef<Path>>(path: P) -> TfResult<Roster> {
    let path = path.as_ref();
    if is_json(path) {
        let content = fs::read_to_string(path)?;
        let people: Vec<Person> = serde_json::from_str(&content)?;
        return Roster::new(people);
    }
    let file = File::open(path).map_err(|e| {
        TeamForgeError::Validation(format!(
            "Could not open roster at '{}': {}",
            path.display(),
            e
        ))
    })?;
    read_roster_csv(file)
}

pub fn read_roster_csv<R: Read>(reader: R) -> TfResult<Roster> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut people = Vec::new();
    for (row_idx, result) in rdr.deserialize::<RosterRow>().enumerate() {
        let row = result.map_err(|e| {
            TeamForgeError::Validation(format!("Roster row {}: {}", row_idx + 1, e))
        })?;
        people.push(Person {
            id: row.id,
            name: row.name,
            gender: row.gender,
            preferred_partner: row.preferred_member_id,
            avoided_partner: row.avoided_member_id,
        });
    }
    debug!("Loaded {} people from roster CSV", people.len());
    Roster::new(people)
}

/// Loads meeting history from `.json` (array of records) or CSV (`date,groups`
/// where `groups` holds a JSON array of name arrays). Unparseable CSV rows are skipped.
pub fn load_history<P: AsRef<Path>>(path: P) -> TfResult<Vec<HistoryRecord>> {
    let path = path.as_ref();
    if is_json(path) {
        let content = fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }
    let file = File::open(path).map_err(|e| {
        TeamForgeError::Validation(format!(
            "Could not open history at '{}': {}",
            path.display(),
            e
        ))
    })?;
    read_history_csv(file)
}

pub fn read_history_csv<R: Read>(reader: R) -> TfResult<Vec<HistoryRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped_count = 0;

    for result in rdr.deserialize::<HistoryRow>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("History CSV parse error: {}", e);
                skipped_count += 1;
                continue;
            }
        };
        match serde_json::from_str::<Vec<Vec<String>>>(&row.groups) {
            Ok(groups) => records.push(HistoryRecord {
                date: row.date.trim().to_string(),
                groups,
                facilitators: Vec::new(),
            }),
            Err(_) => skipped_count += 1,
        }
    }

    if skipped_count > 0 {
        warn!("Skipped {} invalid rows in history CSV.", skipped_count);
    }
    Ok(records)
}

pub fn load_request<P: AsRef<Path>>(path: P) -> TfResult<AttendanceRequest> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
