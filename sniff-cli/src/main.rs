//! stacksniff - Sniff out a project's stack.
//!
//! Detects the languages, third-party services, CI and hosting a project
//! uses, and keeps them in a plain YAML stack file.
//!
//! # Commands
//!
//! - `stacksniff init` - Write an example stack file
//! - `stacksniff sniff` - Detect the stack and merge it into the stack file
//!
//! # Usage
//!
//! ```bash
//! # Detect the stack of the current directory
//! stacksniff sniff
//!
//! # JSON for scripts, without writing the stack file
//! stacksniff sniff --json --no-write
//! ```

use clap::{ArgAction, Parser, Subcommand};
use sniff_cli::commands::{self, InitOptions, SniffOptions};
use sniff_cli::{SniffError, logging, output};

/// stacksniff - Sniff out a project's stack
#[derive(Parser)]
#[command(name = "stacksniff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show more detail (-v for info, -vv for debug logs)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example stacksniff.yml
    Init {
        /// Output path for the stack file
        #[arg(long, short)]
        output: Option<String>,

        /// Overwrite an existing stack file
        #[arg(long, short)]
        force: bool,
    },

    /// Detect the project's stack and merge it into the stack file
    Sniff {
        /// Project directory to analyze
        #[arg(long, short)]
        path: Option<String>,

        /// Directory with languages.yml, services.yml and technologies.yml
        #[arg(long, short)]
        catalog: Option<String>,

        /// Stack file to write (default: <project>/stacksniff.yml)
        #[arg(long, short)]
        output: Option<String>,

        /// Print results without writing the stack file
        #[arg(long)]
        no_write: bool,

        /// Print a JSON report instead of console output
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    output::set_quiet(cli.quiet);
    output::set_verbosity(cli.verbose);
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Init { output, force } => {
            commands::run_init(InitOptions { output, force }).map_err(SniffError::from)
        }
        Commands::Sniff {
            path,
            catalog,
            output,
            no_write,
            json,
        } => commands::run_sniff(SniffOptions {
            path,
            catalog,
            output,
            no_write,
            json,
        }),
    };

    if let Err(e) = result {
        output::error(&e.format_for_cli());
        std::process::exit(1);
    }
}
