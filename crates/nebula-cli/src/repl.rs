//! # REPL Subcommand
//!
//! Interactive command loop over one store. Lines starting with `:` are
//! session directives; everything else goes to the interpreter.
//!
//! ```text
//! :login <actor>   log in as <actor>
//! :logout          log out
//! :whoami          show the current actor
//! :history         recent commands, newest first
//! :say <id> <text> post a chat message on a bounty
//! :help            list directives
//! :quit            exit
//! ```
//!
//! Chat messages written to the store are pushed to the REPL through
//! [`BountyStore::subscribe_messages`] and printed before the next prompt.

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::Args;

use nebula_core::{ActorId, BountyId};
use nebula_store::{BountyStore, ChatMessage};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::Context;

/// Arguments for `nebula repl`.
#[derive(Args, Debug)]
pub struct ReplArgs {
    /// Prompt shown before each line.
    #[arg(long, default_value = "nebula> ")]
    pub prompt: String,
}

/// One parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Login(String),
    Logout,
    WhoAmI,
    History,
    Say { bounty: String, text: String },
    Help,
    Quit,
    Command(String),
    /// A directive that is unknown or missing its argument.
    Invalid(String),
}

/// Classify a line of REPL input.
pub fn parse_line(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    let Some(directive) = line.strip_prefix(':') else {
        return ReplInput::Command(line.to_string());
    };

    if let Some(rest) = directive.strip_prefix("say ") {
        if let Some((bounty, text)) = rest.trim().split_once(char::is_whitespace) {
            return ReplInput::Say {
                bounty: bounty.to_string(),
                text: text.trim().to_string(),
            };
        }
        return ReplInput::Invalid(line.to_string());
    }

    let mut words = directive.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("login"), Some(actor), None) => ReplInput::Login(actor.to_string()),
        (Some("logout"), None, _) => ReplInput::Logout,
        (Some("whoami"), None, _) => ReplInput::WhoAmI,
        (Some("history"), None, _) => ReplInput::History,
        (Some("help"), None, _) => ReplInput::Help,
        (Some("quit" | "exit" | "q"), None, _) => ReplInput::Quit,
        _ => ReplInput::Invalid(line.to_string()),
    }
}

const HELP: &str = "\
:login <actor>   log in as <actor>
:logout          log out
:whoami          show the current actor
:history         recent commands, newest first
:say <id> <text> post a chat message on a bounty
:quit            exit
Anything else is interpreted as a command, e.g. \"check the status of my bounties\".";

/// Execute `nebula repl` on stdin/stdout.
pub async fn run_repl(args: &ReplArgs, ctx: &Context) -> Result<u8> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    repl_loop(ctx, &args.prompt, stdin.lock(), stdout.lock()).await?;
    Ok(0)
}

/// Drive the REPL over arbitrary input and output streams.
pub async fn repl_loop<R: BufRead, W: Write>(
    ctx: &Context,
    prompt: &str,
    mut input: R,
    mut out: W,
) -> Result<()> {
    let mut chat = ctx.store.subscribe_messages();
    let mut line = String::new();
    loop {
        print_pushed(&mut chat, &mut out)?;
        write!(out, "{prompt}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return print_pushed(&mut chat, &mut out);
        }

        match parse_line(&line) {
            ReplInput::Empty => {}
            ReplInput::Quit => return Ok(()),
            ReplInput::Help => writeln!(out, "{HELP}")?,
            ReplInput::Login(actor) => match ActorId::new(actor.as_str()) {
                Ok(actor) => {
                    ctx.session.login(actor.clone());
                    writeln!(out, "Logged in as {actor}.")?;
                }
                Err(e) => writeln!(out, "Cannot log in: {e}.")?,
            },
            ReplInput::Logout => match ctx.session.logout() {
                Some(actor) => writeln!(out, "Logged out {actor}.")?,
                None => writeln!(out, "Nobody is logged in.")?,
            },
            ReplInput::WhoAmI => match ctx.current_actor() {
                Some(actor) => writeln!(out, "{actor}")?,
                None => writeln!(out, "Nobody is logged in.")?,
            },
            ReplInput::History => {
                for command in ctx.interpreter.recent_commands() {
                    writeln!(out, "[{}] {}", command.intent, command.input)?;
                }
            }
            ReplInput::Say { bounty, text } => {
                if let Err(msg) = say(ctx, &bounty, text).await {
                    writeln!(out, "Cannot send message: {msg}.")?;
                }
            }
            ReplInput::Invalid(text) => {
                writeln!(out, "Unknown directive {text:?}. Type :help for directives.")?;
            }
            ReplInput::Command(text) => {
                let response = ctx.interpreter.process_command(&text).await;
                writeln!(out, "{}", response.trim_end())?;
            }
        }
    }
}

async fn say(ctx: &Context, bounty: &str, text: String) -> std::result::Result<(), String> {
    let Some(sender) = ctx.current_actor() else {
        return Err("nobody is logged in".into());
    };
    let bounty = BountyId::new(bounty).map_err(|e| e.to_string())?;
    ctx.store
        .send_message(&bounty, &sender, text)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Print every chat message pushed since the last call.
fn print_pushed<W: Write>(chat: &mut broadcast::Receiver<ChatMessage>, out: &mut W) -> Result<()> {
    loop {
        match chat.try_recv() {
            Ok(m) => writeln!(out, "[{}] {}: {}", m.bounty_id, m.sender_id, m.content)?,
            Err(TryRecvError::Lagged(missed)) => {
                writeln!(out, "({missed} chat messages skipped)")?;
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
        }
    }
}
