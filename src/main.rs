use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use teamforge::config::Config;
use teamforge::error::TfResult;
use teamforge::history::HistoryRecord;
use teamforge::loader;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value = "data/roster.csv")]
    roster: String,

    #[arg(global = true, long)]
    history: Option<String>,

    /// JSON run options; explicit flags still take precedence
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Plan(cmd::plan::PlanArgs),
    Pairs(cmd::pairs::PairsArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Logs go to stderr so `plan --json` keeps stdout machine-readable
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, matches: &clap::ArgMatches) -> TfResult<()> {
    info!("🚀 Initializing TeamForge...");

    info!("📂 Loading Roster: {}", cli.roster);
    let roster = loader::load_roster(&cli.roster)?;

    let history: Vec<HistoryRecord> = match &cli.history {
        Some(path) => {
            info!("📜 Loading History: {}", path);
            loader::load_history(path)?
        }
        None => {
            warn!("⚠️  No history file given. Every pair counts as unseen.");
            Vec::new()
        }
    };

    match &cli.command {
        Commands::Plan(args) => {
            let config = match (&cli.config, matches.subcommand_matches("plan")) {
                (Some(path), Some(sub)) => {
                    info!("⚖️  Loading Config from: {}", path);
                    let mut file_config = Config::load_from_file(path)?;
                    file_config.merge_from_cli(&args.config, sub);
                    file_config
                }
                _ => args.config.clone(),
            };
            cmd::plan::run(args.clone(), config, &roster, &history)
        }
        Commands::Pairs(args) => cmd::pairs::run(args.clone(), &roster, &history),
    }
}
