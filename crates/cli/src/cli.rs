use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "canon", about = "Canon reasoning engine CLI")]
pub struct Cli {
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the two-stage opinion/critique analysis for a query.
    Analyze {
        query: String,
        #[arg(long, default_value = "work")]
        mode: String,
        /// Canon JSONL path; overrides CANON_PATH.
        #[arg(long)]
        canon: Option<String>,
        /// File whose contents are treated as pasted article text.
        #[arg(long)]
        paste_file: Option<String>,
        /// Override the mode's retrieval depth.
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long, default_value_t = false)]
        show_context: bool,
    },
    /// List the built-in analysis modes and their pack biases.
    Modes,
    /// Load a canon file and print corpus statistics.
    Inspect {
        canon: String,
    },
}
