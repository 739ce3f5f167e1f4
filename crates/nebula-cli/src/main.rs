//! # nebula CLI entry point
//!
//! Parses command-line arguments, builds a volatile store and dispatches
//! to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nebula_cli::bounty::{run_bounty, BountyArgs};
use nebula_cli::interpret::{run_interpret, InterpretArgs};
use nebula_cli::repl::{run_repl, ReplArgs};
use nebula_cli::Context;

/// Nebula bounty command interpreter.
///
/// Turns free-text commands ("create a bounty for a landing page with a
/// reward of 0.5 ETH") into bounty store operations.
#[derive(Parser, Debug)]
#[command(name = "nebula", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Start from an empty store instead of the demo fixtures.
    #[arg(long, global = true)]
    no_seed: bool,

    /// Actor to log in as.
    #[arg(long, global = true)]
    actor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interpret a single command and print the response.
    Interpret(InterpretArgs),

    /// Interactive command loop with :login / :logout directives.
    Repl(ReplArgs),

    /// Inspect bounties and their chat threads.
    Bounties(BountyArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = match Context::build(!cli.no_seed, cli.actor.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(
        seeded = !cli.no_seed,
        actor = ctx.current_actor().as_ref().map(|a| a.as_str()),
        "nebula CLI starting"
    );

    let result = match &cli.command {
        Commands::Interpret(args) => run_interpret(args, &ctx).await,
        Commands::Repl(args) => run_repl(args, &ctx).await,
        Commands::Bounties(args) => run_bounty(args, &ctx).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
