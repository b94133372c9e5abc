//! CLI frontend for the Branchwork story player.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bw",
    about = "Branchwork: play, debug and check branching stories",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a story file for broken links and other problems
    Check {
        /// Story JSON file
        file: PathBuf,
    },

    /// Play a story interactively
    Play {
        /// Story JSON file
        file: PathBuf,

        /// Passage to start at (default: the story's start passage)
        #[arg(short, long)]
        start: Option<String>,

        /// Pause whenever this passage is entered (repeatable)
        #[arg(short, long = "breakpoint")]
        breakpoints: Vec<String>,

        /// Show variables after every step
        #[arg(short, long)]
        debug: bool,
    },

    /// Run a scripted playthrough and export it
    Record {
        /// Story JSON file
        file: PathBuf,

        /// Choice ids to follow, in order
        #[arg(short, long, value_delimiter = ',')]
        choices: Vec<String>,

        /// Passage to start at (default: the story's start passage)
        #[arg(short, long)]
        start: Option<String>,

        /// Output format: json, markdown
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check { file } => commands::check::run(&file),
        Commands::Play {
            file,
            start,
            breakpoints,
            debug,
        } => commands::play::run(&file, start.as_deref(), &breakpoints, debug),
        Commands::Record {
            file,
            choices,
            start,
            format,
            output,
        } => commands::record::run(
            &file,
            &choices,
            start.as_deref(),
            &format,
            output.as_deref(),
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
