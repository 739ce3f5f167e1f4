//! # Interpret Subcommand
//!
//! Runs a single command through the interpreter and prints the response.

use anyhow::Result;
use clap::Args;

use crate::Context;

/// Arguments for `nebula interpret`.
#[derive(Args, Debug)]
pub struct InterpretArgs {
    /// The command text, e.g. "check the status of my bounties".
    #[arg(required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Print the response and the recorded command as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `nebula interpret`.
pub async fn run_interpret(args: &InterpretArgs, ctx: &Context) -> Result<u8> {
    let input = args.input.join(" ");
    let actor = ctx.current_actor();
    let report = ctx.interpreter.run(&input, actor.as_ref()).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.response.trim_end());
    }
    Ok(0)
}
