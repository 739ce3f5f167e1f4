//! # Bounty Subcommand
//!
//! Read-only inspection of the bounty store.
//!
//! ```text
//! nebula bounties list [--status <status>] [--json]
//! nebula bounties show <id> [--json]
//! nebula bounties messages <id>
//! ```

use std::fmt::Write as _;

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};

use nebula_core::BountyId;
use nebula_state::{Bounty, BountyStatus};
use nebula_store::{BountyStore, ChatMessage};

use crate::Context;

/// Arguments for `nebula bounties`.
#[derive(Args, Debug)]
pub struct BountyArgs {
    #[command(subcommand)]
    pub command: BountyCommand,
}

#[derive(Subcommand, Debug)]
pub enum BountyCommand {
    /// List bounties in creation order.
    List {
        /// Only bounties in this status (open, in-progress, pending-review, ...).
        #[arg(long)]
        status: Option<BountyStatus>,
        #[arg(long)]
        json: bool,
    },
    /// Show one bounty and its legal next states.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the chat thread of a bounty.
    Messages { id: String },
}

/// Execute `nebula bounties`.
pub async fn run_bounty(args: &BountyArgs, ctx: &Context) -> Result<u8> {
    let store = ctx.store.as_ref();
    match &args.command {
        BountyCommand::List { status, json } => {
            let bounties = match status {
                Some(status) => store.load_bounties_by_status(*status).await?,
                None => store.list_bounties().await?,
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&bounties)?);
            } else {
                print!("{}", format_list(&bounties));
            }
        }
        BountyCommand::Show { id, json } => {
            let bounty = find(store, id).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&bounty)?);
            } else {
                print!("{}", format_detail(&bounty));
            }
        }
        BountyCommand::Messages { id } => {
            let bounty = find(store, id).await?;
            let messages = store.messages_for_bounty(&bounty.id).await?;
            print!("{}", format_messages(&messages));
        }
    }
    Ok(0)
}

async fn find(store: &dyn BountyStore, raw: &str) -> Result<Bounty> {
    let id = BountyId::new(raw).with_context(|| format!("invalid bounty id {raw:?}"))?;
    match store.load_bounty(&id).await? {
        Some(bounty) => Ok(bounty),
        None => bail!("bounty {id} not found"),
    }
}

fn format_list(bounties: &[Bounty]) -> String {
    if bounties.is_empty() {
        return "No bounties.\n".to_string();
    }
    let mut out = String::new();
    for b in bounties {
        let _ = writeln!(
            out,
            "{:<10} {:<15} {:>8} ETH  {}",
            b.id.as_str(),
            b.status.as_str(),
            b.reward.to_string(),
            b.title
        );
    }
    out
}

fn format_detail(b: &Bounty) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", b.title, b.id);
    let _ = writeln!(out, "  status:   {}", b.status);
    let _ = writeln!(out, "  reward:   {} ETH", b.reward);
    let _ = writeln!(out, "  creator:  {}", b.creator_id);
    if let Some(worker) = &b.worker_id {
        let _ = writeln!(out, "  worker:   {worker}");
    }
    let _ = writeln!(out, "  created:  {}", b.created_at);
    if let Some(deadline) = &b.deadline {
        let _ = writeln!(out, "  deadline: {deadline}");
    }
    if !b.tags.is_empty() {
        let tags: Vec<&str> = b.tags.iter().map(String::as_str).collect();
        let _ = writeln!(out, "  tags:     {}", tags.join(", "));
    }
    let next: Vec<&str> = b
        .status
        .valid_transitions()
        .iter()
        .map(|s| s.as_str())
        .collect();
    if next.is_empty() {
        let _ = writeln!(out, "  next:     (terminal)");
    } else {
        let _ = writeln!(out, "  next:     {}", next.join(", "));
    }
    if !b.description.is_empty() {
        let _ = writeln!(out, "\n{}", b.description);
    }
    out
}

fn format_messages(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return "No messages.\n".to_string();
    }
    let mut out = String::new();
    for m in messages {
        let _ = writeln!(out, "[{}] {}: {}", m.timestamp, m.sender_id, m.content);
    }
    out
}
