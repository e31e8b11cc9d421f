use crate::cmd::RequestArgs;
use crate::reports;
use clap::Args;
use teamforge::api::{self, ProgressEvent};
use teamforge::config::Config;
use teamforge::error::TfResult;
use teamforge::history::HistoryRecord;
use teamforge::optimizer::ProgressCallback;
use teamforge::roster::Roster;
use tracing::{error, info, warn};

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub request: RequestArgs,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Stream progress and the final result as JSON lines on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

struct CliLogger;
impl ProgressCallback for CliLogger {
    fn on_progress(&self, percent: u8) -> bool {
        info!("⏳ {:>3}%", percent);
        true
    }
}

struct JsonStream;
impl ProgressCallback for JsonStream {
    fn on_progress(&self, percent: u8) -> bool {
        emit(&ProgressEvent::Progress(percent));
        true
    }
}

fn emit(event: &ProgressEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("Failed to encode event: {}", e),
    }
}

pub fn run(args: PlanArgs, config: Config, roster: &Roster, history: &[HistoryRecord]) -> TfResult<()> {
    let request = args.request.load()?;

    if args.json {
        return match api::plan_groups(roster, history, &request, &config, args.seed, &JsonStream) {
            Ok(outcome) => {
                emit(&ProgressEvent::Result(Box::new(outcome)));
                Ok(())
            }
            Err(e) => {
                emit(&ProgressEvent::Error(e.to_string()));
                Err(e)
            }
        };
    }

    info!(
        "🧬 Evolving {} x {} generations per profile",
        config.search.population_size, config.search.generations
    );
    let outcome = api::plan_groups(roster, history, &request, &config, args.seed, &CliLogger)?;

    for w in &outcome.warnings {
        warn!("⚠️  {}", w);
    }

    info!("=== 🏆 RESULT: {} ===", outcome.status);
    reports::print_outcome(&outcome);
    Ok(())
}
