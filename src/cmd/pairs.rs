use crate::cmd::RequestArgs;
use crate::reports;
use clap::Args;
use std::collections::HashSet;
use teamforge::error::TfResult;
use teamforge::history::{HistoryIndex, HistoryRecord};
use teamforge::roster::{PersonId, Roster};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct PairsArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Hide pairs that met fewer times than this
    #[arg(short = 'm', long, default_value_t = 1)]
    pub min_count: u32,
}

pub fn run(args: PairsArgs, roster: &Roster, history: &[HistoryRecord]) -> TfResult<()> {
    let request = args.request.load()?;
    let index = HistoryIndex::build(history, roster);
    info!("📊 {} pairs recorded across {} sessions", index.len(), history.len());

    // Without an attendee list, show the whole roster
    let table = if request.attendees.is_empty() {
        index.pair_table(roster, None)
    } else {
        let session = request.resolve(roster)?;
        let ids: HashSet<PersonId> = session.attendees.iter().map(|a| a.id).collect();
        index.pair_table(roster, Some(&ids))
    };

    reports::print_pair_table(&table, args.min_count);
    Ok(())
}
