//! Depscope CLI - dependency graph analysis from the command line.
//!
//! Reads a scan (JSON), analyzes it once, and prints the requested view.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Depscope: file-level dependency graph analysis.
#[derive(Parser)]
#[command(name = "depscope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Scan file produced by the upstream scanner (JSON)
    #[arg(short, long, global = true)]
    scan: Option<PathBuf>,

    /// Analysis configuration (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show graph statistics, circular dependencies and rankings
    Summary {
        /// Ranking length (defaults to the configured top-n)
        #[arg(short, long)]
        top: Option<usize>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the direct imports and importers of one file
    Ego {
        /// Project-relative file path
        file: String,

        /// Print the ego graph as JSON
        #[arg(long)]
        json: bool,
    },

    /// List files with their import counts
    Files {
        /// Case-insensitive substring of the path or module name
        #[arg(long)]
        search: Option<String>,

        /// Exact language tag
        #[arg(short, long)]
        language: Option<String>,

        /// Number of matching files to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Maximum number of files to show
        #[arg(long)]
        limit: Option<usize>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// List circular dependencies
    Cycles {
        /// Print the cycles as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let Some(scan) = cli.scan else {
        eprintln!(
            "{}: no scan file given (use --scan <scan.json>)",
            "error".red().bold()
        );
        return ExitCode::FAILURE;
    };

    let result = cli::load_snapshot(&scan, cli.config.as_deref()).and_then(|snapshot| {
        match cli.command {
            Commands::Summary { top, json } => cli::summary::run(&snapshot, top, json),
            Commands::Ego { file, json } => cli::ego::run(&snapshot, &file, json),
            Commands::Files {
                search,
                language,
                offset,
                limit,
                json,
            } => {
                let query = depscope::FileListQuery {
                    search,
                    language,
                    offset,
                    limit,
                };
                cli::files::run(&snapshot, &query, json)
            }
            Commands::Cycles { json } => cli::cycles::run(&snapshot, json),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over `-v`. Extra verbosity only opens up depscope's own
/// events until `-vvv`.
fn init_logging(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,depscope=info",
        2 => "warn,depscope=debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::quiet(0, "warn")]
    #[case::info(1, "warn,depscope=info")]
    #[case::debug(2, "warn,depscope=debug")]
    #[case::trace(3, "trace")]
    #[case::saturates(9, "trace")]
    fn verbosity_maps_to_filter(#[case] verbose: u8, #[case] expected: &str) {
        assert_eq!(log_filter(verbose), expected);
        assert!(expected.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn cli_counts_repeated_verbose_flags() {
        let cli = Cli::try_parse_from(["depscope", "-vv", "cycles"]).expect("valid args");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Cycles { json: false }));
    }
}
