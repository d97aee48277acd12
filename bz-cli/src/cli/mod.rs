//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the bz tool.

mod bug;
mod external;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};

use crate::clients::ConnectionOverrides;
use crate::output::ColorMode;

/// Top-level CLI command for the bz tool
#[derive(Parser)]
#[command(name = "bz")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Read and update Bugzilla bugs and their GitHub pull request links")]
#[command(
  long_about = "bz talks to a Bugzilla server over its REST and JSONRPC APIs.\n\n\
        The server is taken from BUGZILLA_ENDPOINT (or --endpoint). The API key is read\n\
        from BUGZILLA_API_KEY or from the password of the matching machine in ~/.netrc."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(long, value_enum, global = true, ignore_case = true, default_value_t = ColorMode::Auto)]
  pub colors: ColorMode,

  /// Bugzilla base URL, overriding BUGZILLA_ENDPOINT
  #[arg(long, global = true, value_name = "URL")]
  pub endpoint: Option<String>,

  /// How the API key is sent, overriding BUGZILLA_AUTH_METHOD
  #[arg(
    long = "auth-method",
    global = true,
    value_name = "METHOD",
    long_help = "How the API key is presented to the server, overriding BUGZILLA_AUTH_METHOD.\n\n\
             bearer: Authorization: Bearer header\n\
             query: api_key query parameter\n\
             x-bugzilla-api-key: X-BUGZILLA-API-KEY header\n\
             Without a value, both the query parameter and the header are sent."
  )]
  pub auth_method: Option<String>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the bz tool
#[derive(Subcommand)]
pub enum Commands {
  /// View a bug
  #[command(long_about = "Fetch a bug and print its key fields.")]
  #[command(alias = "show")]
  View(bug::ViewArgs),

  /// Update a bug
  #[command(long_about = "Apply a partial update to a bug.\n\n\
            Only the fields given as flags are sent. At least one is required.")]
  Update(bug::UpdateArgs),

  /// List a bug's external bugs
  #[command(long_about = "List the external bugs linked to a bug.\n\n\
            With --prs, only GitHub pull requests are listed.")]
  #[command(alias = "ext")]
  External(external::ExternalArgs),

  /// Link a GitHub pull request to a bug
  #[command(long_about = "Attach a GitHub pull request to a bug as an external bug.\n\n\
            Linking a pull request that is already attached is not an error.")]
  Link(external::PullLinkArgs),

  /// Unlink a GitHub pull request from a bug
  #[command(long_about = "Detach a GitHub pull request from a bug.")]
  Unlink(external::PullLinkArgs),
}

/// Handle the parsed command line
pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  let overrides = ConnectionOverrides {
    endpoint: cli.endpoint,
    auth_method: cli.auth_method,
  };

  match cli.command {
    Commands::View(args) => bug::handle_view_command(&args, &overrides),
    Commands::Update(args) => bug::handle_update_command(&args, &overrides),
    Commands::External(args) => external::handle_external_command(&args, &overrides),
    Commands::Link(args) => external::handle_link_command(&args, &overrides),
    Commands::Unlink(args) => external::handle_unlink_command(&args, &overrides),
  }
}
