use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use itertools::Itertools;
use std::collections::BTreeMap;
use teamforge::api::{GroupingOutcome, ResultCandidate};

pub fn outcome(o: &GroupingOutcome) {
    if o.candidate_count() == 0 {
        println!("\nNo groupings to show ({}).", o.status);
        return;
    }
    profile("BALANCE FIRST", &o.balance_first);
    profile("NOVELTY FIRST", &o.novelty_first);
}

fn profile(title: &str, candidates: &[ResultCandidate]) {
    println!("\n=== {} ===", title);
    if candidates.is_empty() {
        println!("(no feasible grouping)");
        return;
    }

    let mut summary = Table::new();
    summary
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    summary.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Gender"),
        Cell::new("Novelty").fg(Color::Green),
        Cell::new("Spread"),
        Cell::new("Pref"),
    ]);
    for i in 1..=5 {
        if let Some(col) = summary.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (rank, c) in candidates.iter().enumerate() {
        let [gender, novelty, spread, pref] = &c.objective_breakdown;
        summary.add_row(vec![
            Cell::new(rank + 1).add_attribute(Attribute::Bold),
            Cell::new(&c.score).fg(Color::Cyan),
            Cell::new(gender),
            Cell::new(novelty).fg(Color::Green),
            Cell::new(spread),
            Cell::new(pref),
        ]);
    }
    println!("{}", summary);

    for (rank, c) in candidates.iter().enumerate() {
        let mut groups = Table::new();
        groups
            .load_preset(ASCII_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new(format!("Option {}", rank + 1)).add_attribute(Attribute::Bold),
                Cell::new("Members"),
            ]);
        for (g, members) in c.groups.iter().enumerate() {
            groups.add_row(vec![
                Cell::new(format!("Group {}", g + 1)),
                Cell::new(members.join(", ")),
            ]);
        }
        println!("{}", groups);
    }
}

pub fn pairs(table: &BTreeMap<String, u32>, min_count: u32) {
    let rows: Vec<(&String, &u32)> = table
        .iter()
        .filter(|&(_, &count)| count >= min_count)
        .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
        .collect();

    if rows.is_empty() {
        println!("\nNo pairs have met {} or more times.", min_count);
        return;
    }

    let mut t = Table::new();
    t.load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Pair").add_attribute(Attribute::Bold),
            Cell::new("Met").fg(Color::Yellow),
        ]);
    if let Some(col) = t.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }
    for (pair, count) in rows {
        t.add_row(vec![Cell::new(pair), Cell::new(count)]);
    }
    println!("\n{}", t);
}
