mod analyze;
mod cli;
mod config;
mod inspect;
mod logging;
mod modes;
mod prompts;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::resolve_verbosity(cli.verbose));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    match cli.command {
        Command::Analyze {
            query,
            mode,
            canon,
            paste_file,
            top_k,
            show_context,
        } => analyze::run(query, mode, canon, paste_file, top_k, show_context),
        Command::Modes => modes::run(),
        Command::Inspect { canon } => inspect::run(canon),
    }
}
