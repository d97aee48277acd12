//! # Bug Commands
//!
//! Derive-based implementation of the commands that read and update a single
//! bug.

use anyhow::{Context, Result, bail};
use bz_client::{Bug, BugComment, BugUpdate};
use clap::Args;

use crate::clients::{ConnectionOverrides, create_runtime_and_client};
use crate::output::{format_status, print_banner, print_field, print_rule, print_success};

/// Command for viewing a bug
#[derive(Args)]
pub struct ViewArgs {
  /// The numeric bug ID
  #[arg(required = true, index = 1)]
  pub id: u64,
}

/// Command for updating a bug
#[derive(Args)]
pub struct UpdateArgs {
  /// The numeric bug ID
  #[arg(required = true, index = 1)]
  pub id: u64,

  /// New status (e.g. MODIFIED, ON_QA, CLOSED)
  #[arg(long)]
  pub status: Option<String>,

  /// New resolution, usually given together with a closed status
  #[arg(long)]
  pub resolution: Option<String>,

  /// Target release to set (can be used multiple times)
  #[arg(long = "target-release", value_name = "RELEASE")]
  pub target_release: Vec<String>,

  /// Mark the bug as a duplicate of another bug
  #[arg(long = "dupe-of", value_name = "ID")]
  pub dupe_of: Option<u64>,

  /// Comment to add alongside the update
  #[arg(long)]
  pub comment: Option<String>,

  /// Make the comment private
  #[arg(long, requires = "comment")]
  pub private: bool,
}

impl UpdateArgs {
  /// Build the partial update described by the flags
  fn to_update(&self) -> BugUpdate {
    BugUpdate {
      status: self.status.clone(),
      resolution: self.resolution.clone(),
      target_release: self.target_release.clone(),
      dupe_of: self.dupe_of,
      comment: self.comment.as_ref().map(|body| BugComment {
        body: body.clone(),
        is_private: self.private,
      }),
    }
  }
}

/// Handle the view command
pub(crate) fn handle_view_command(args: &ViewArgs, overrides: &ConnectionOverrides) -> Result<()> {
  let (rt, client) = create_runtime_and_client(overrides)?;

  let bug = rt
    .block_on(client.get_bug(args.id))
    .with_context(|| format!("Failed to fetch bug {}", args.id))?;

  print_bug(&bug);
  Ok(())
}

/// Handle the update command
pub(crate) fn handle_update_command(args: &UpdateArgs, overrides: &ConnectionOverrides) -> Result<()> {
  let update = args.to_update();
  if update.is_empty() {
    bail!("Nothing to update. Pass at least one of --status, --resolution, --target-release, --dupe-of or --comment.");
  }

  let (rt, client) = create_runtime_and_client(overrides)?;
  rt.block_on(client.update_bug(args.id, &update))
    .with_context(|| format!("Failed to update bug {}", args.id))?;

  print_success(&format!("Updated bug {}", args.id));
  Ok(())
}

fn print_bug(bug: &Bug) {
  print_banner(&format!("Bug {}", bug.id));
  println!();

  print_field("Summary", &bug.summary);
  print_field("Status", &format_status(&bug.status, &bug.resolution));
  print_field("Product", &bug.product);
  if !bug.component.is_empty() {
    print_field("Component", &bug.component.join(", "));
  }
  if !bug.version.is_empty() {
    print_field("Version", &bug.version.join(", "));
  }
  if !bug.target_release.is_empty() {
    print_field("Target release", &bug.target_release.join(", "));
  }
  print_field("Severity", &bug.severity);
  print_field("Priority", &bug.priority);

  let assignee = bug
    .assigned_to_detail
    .as_ref()
    .map_or_else(|| bug.assigned_to.clone(), |user| user.real_name.clone());
  print_field("Assigned to", &assignee);

  if let Some(changed) = bug.last_change_time {
    print_field("Last changed", &changed.format("%Y-%m-%d %H:%M UTC").to_string());
  }
  if let Some(dupe_of) = bug.dupe_of {
    print_field("Duplicate of", &dupe_of.to_string());
  }

  println!();
  print_rule();
}
