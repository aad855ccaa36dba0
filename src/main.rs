//! Binary entry point for the vermut CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Propose candidates, appending them to a targets file
//! vermut scan --tree prog.json --out targets.csv
//!
//! # Only binary operator and literal candidates, printed as JSON
//! vermut scan --tree prog.json --only BOR --only LVR
//!
//! # Apply one candidate
//! vermut mutate --tree prog.json --at 12-40 --op SDL --out mutant.json
//! vermut mutate --tree prog.json --at 13 --op BOR --arg Sub
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use vermut::cli::{run_mutate, run_scan};
use vermut::output::{emit_response, ErrorResponse};
use vermut_core::error::{OutputErrorCode, VermutError};
use vermut_mutate::{MutateOptions, DEFAULT_MAX_CASCADE_DEPTH};

// ============================================================================
// CLI Structure
// ============================================================================

/// Mutation testing for verified programs.
///
/// Reads a resolved program tree as JSON, proposes mutations, and applies
/// them one at a time. All output is JSON.
#[derive(Parser, Debug)]
#[command(name = "vermut", version, about = "Mutation testing for verified programs")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Propose every mutation the tree admits.
    Scan {
        /// Program tree (JSON).
        #[arg(long)]
        tree: PathBuf,

        /// Append candidates to this file instead of printing them.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Only propose these operators (short codes, repeatable).
        #[arg(long)]
        only: Vec<String>,
    },

    /// Apply one mutation and write the mutant tree.
    Mutate {
        /// Program tree (JSON).
        #[arg(long)]
        tree: PathBuf,

        /// Target location: `POS` or `START-END`.
        #[arg(long)]
        at: String,

        /// Operator short code.
        #[arg(long)]
        op: String,

        /// Operator argument.
        #[arg(long)]
        arg: Option<String>,

        /// Write the mutant here instead of printing it.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Bound on chained deletions after a variable is removed.
        #[arg(long, default_value_t = DEFAULT_MAX_CASCADE_DEPTH)]
        max_cascade_depth: usize,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON like every other response.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), VermutError> {
    let json = match cli.command {
        Command::Scan { tree, out, only } => run_scan(&tree, out.as_deref(), &only)?,
        Command::Mutate {
            tree,
            at,
            op,
            arg,
            out,
            max_cascade_depth,
        } => {
            let options = MutateOptions { max_cascade_depth };
            run_mutate(&tree, &at, &op, arg.as_deref(), out.as_deref(), &options)?
        }
    };

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json).map_err(|e| VermutError::internal(e.to_string()))?;
    let _ = stdout.flush();
    Ok(())
}
