//! Command-line interface for the Waymeal trip planner.
//!
//! `waymeal plan` answers a single request and prints the trip report as
//! JSON. `waymeal session` keeps a trip form open on standard input so points
//! can be picked by map click and the plan recomputed.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;
mod session;
mod sources;

pub use error::CliError;

use plan::{PlanArgs, run_plan};
use session::{SessionArgs, run_session};

const ARG_START: &str = "start";
const ARG_END: &str = "end";
const ARG_DEPARTURE: &str = "departure";
const ARG_EAT_AT: &str = "eat-at";
const ARG_CUISINE: &str = "cuisine";
const ENV_PLAN_START: &str = "WAYMEAL_CMDS_PLAN_START";
const ENV_PLAN_END: &str = "WAYMEAL_CMDS_PLAN_END";

/// Run the Waymeal CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, a
/// collaborator cannot be reached, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
        Command::Session(args) => run_session(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymeal",
    about = "Plan a drive and find somewhere to eat along the way",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan one trip and print the report as JSON.
    Plan(PlanArgs),
    /// Plan trips interactively from standard input.
    Session(SessionArgs),
}

#[cfg(test)]
mod tests;
