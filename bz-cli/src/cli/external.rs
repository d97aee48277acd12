//! # External Bug Commands
//!
//! Listing external bug links, and linking or unlinking GitHub pull requests.

use anyhow::{Context, Result};
use bz_client::{ExternalBug, PullRef};
use clap::Args;
use owo_colors::OwoColorize;

use crate::clients::{ConnectionOverrides, create_runtime_and_client};
use crate::output::{format_command, print_info, print_success, print_warning};

/// Command for listing a bug's external bugs
#[derive(Args)]
pub struct ExternalArgs {
  /// The numeric bug ID
  #[arg(required = true, index = 1)]
  pub id: u64,

  /// Only list linked GitHub pull requests
  #[arg(long)]
  pub prs: bool,
}

/// Command for linking or unlinking a pull request
#[derive(Args)]
pub struct PullLinkArgs {
  /// The numeric bug ID
  #[arg(required = true, index = 1)]
  pub id: u64,

  /// The pull request as org/repo/pull/N
  #[arg(required = true, index = 2, value_name = "ORG/REPO/pull/N")]
  pub pull: PullRef,
}

/// Handle the external command
pub(crate) fn handle_external_command(args: &ExternalArgs, overrides: &ConnectionOverrides) -> Result<()> {
  let (rt, client) = create_runtime_and_client(overrides)?;

  let external_bugs = if args.prs {
    rt.block_on(client.get_external_bug_prs_on_bug(args.id))
  } else {
    rt.block_on(client.get_external_bugs(args.id))
  }
  .with_context(|| format!("Failed to fetch external bugs for bug {}", args.id))?;

  if external_bugs.is_empty() {
    let what = if args.prs { "pull requests" } else { "external bugs" };
    print_info(&format!("Bug {} has no linked {what}", args.id));
    return Ok(());
  }

  for external_bug in &external_bugs {
    println!("  {} {}", "•".blue(), describe(external_bug));
  }

  Ok(())
}

/// Handle the link command
pub(crate) fn handle_link_command(args: &PullLinkArgs, overrides: &ConnectionOverrides) -> Result<()> {
  let (rt, client) = create_runtime_and_client(overrides)?;
  let PullRef { org, repo, number } = &args.pull;

  let changed = rt
    .block_on(client.add_pull_request_as_external_bug(args.id, org, repo, *number))
    .with_context(|| format!("Failed to link {} to bug {}", args.pull, args.id))?;

  if changed {
    print_success(&format!("Linked {} to bug {}", args.pull, args.id));
  } else {
    print_info(&format!("{} is already linked to bug {}", args.pull, args.id));
  }
  Ok(())
}

/// Handle the unlink command
pub(crate) fn handle_unlink_command(args: &PullLinkArgs, overrides: &ConnectionOverrides) -> Result<()> {
  let (rt, client) = create_runtime_and_client(overrides)?;
  let PullRef { org, repo, number } = &args.pull;

  let changed = rt
    .block_on(client.remove_pull_request_as_external_bug(args.id, org, repo, *number))
    .with_context(|| format!("Failed to unlink {} from bug {}", args.pull, args.id))?;

  if changed {
    print_success(&format!("Unlinked {} from bug {}", args.pull, args.id));
  } else {
    print_warning(&format!("{} was not linked to bug {}", args.pull, args.id));
    print_info(&format!(
      "List the current links with {}",
      format_command(&format!("bz external {} --prs", args.id))
    ));
  }
  Ok(())
}

fn describe(external_bug: &ExternalBug) -> String {
  match &external_bug.pull {
    Some(pull) => format!(
      "{}/{}#{} {}",
      pull.org,
      pull.repo,
      pull.number,
      format!("({}{})", external_bug.tracker.url, pull).dimmed()
    ),
    None => format!("{} {}", external_bug.external_bug_id, external_bug.tracker.url.dimmed()),
  }
}
