use std::fs::File;
use std::io::Write;
use tempfile::TempDir;
use teamforge::error::TeamForgeError;
use teamforge::loader;
use teamforge::roster::Gender;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_roster_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "roster.csv",
        "id,name,gender,preferred_member_id,avoided_member_id\n\
         1,Ann,F,2,\n\
         2,Bob,M,,3\n\
         3,Cy,male,,\n",
    );

    let roster = loader::load_roster(&path).unwrap();
    assert_eq!(roster.len(), 3);
    let ann = roster.find_by_name("Ann").unwrap();
    assert_eq!(ann.gender, Gender::Female);
    assert_eq!(ann.preferred_partner, Some(2));
    assert_eq!(roster.get(2).unwrap().avoided_partner, Some(3));
    assert_eq!(roster.get(3).unwrap().gender, Gender::Male);
}

#[test]
fn test_roster_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "roster.json",
        r#"[{"id": 7, "name": "Dee", "gender": "F", "preferred_member_id": 8},
            {"id": 8, "name": "Eli", "gender": "M"}]"#,
    );
    let roster = loader::load_roster(&path).unwrap();
    assert_eq!(roster.id_of("Eli"), Some(8));
    assert_eq!(roster.get(7).unwrap().preferred_partner, Some(8));
}

#[test]
fn test_duplicate_roster_names_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "dup.csv", "id,name,gender\n1,Ann,F\n2,Ann,F\n");
    assert!(matches!(
        loader::load_roster(&path),
        Err(TeamForgeError::Validation(_))
    ));
}

#[test]
fn test_missing_roster_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader::load_roster(dir.path().join("nope.csv")).unwrap_err();
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn test_history_csv_skips_bad_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "history.csv",
        "date,groups\n\
         2024-01-01,\"[[\"\"Ann\"\",\"\"Bob\"\"],[\"\"Cy\"\"]]\"\n\
         2024-01-08,not json\n\
         2024-01-15,\"[[\"\"Ann\"\",\"\"Cy\"\"]]\"\n",
    );
    let records = loader::load_history(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].groups, vec![vec!["Ann", "Bob"], vec!["Cy"]]);
    assert_eq!(records[1].date, "2024-01-15");
}

#[test]
fn test_history_and_request_json() {
    let dir = tempfile::tempdir().unwrap();
    let history = write(
        &dir,
        "history.json",
        r#"[{"date": "2024-05-01", "groups": [["Ann", "Bob"]], "facilitators": ["Ann"]}]"#,
    );
    let records = loader::load_history(&history).unwrap();
    assert_eq!(records[0].facilitators, vec!["Ann"]);

    let request = write(
        &dir,
        "request.json",
        r#"{"attendees": ["Ann", "Bob", "Cy"], "facilitators": ["Ann"], "group_count_override": 1,
            "guests": [{"name": "Gus", "gender": "M", "host": "Bob"}]}"#,
    );
    let req = loader::load_request(&request).unwrap();
    assert_eq!(req.attendees.len(), 3);
    assert_eq!(req.group_count_override, Some(1));
    assert_eq!(req.guests[0].host, "Bob");
}
