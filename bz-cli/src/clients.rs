//! # Client Creation
//!
//! Builds an authenticated Bugzilla client for CLI commands, letting global
//! command-line flags take precedence over the environment.

use std::path::Path;

use anyhow::{Context, Result};
use bz_client::consts::{ENV_BUGZILLA_AUTH_METHOD, ENV_BUGZILLA_ENDPOINT};
use bz_client::{BugzillaClient, BugzillaConfig, create_bugzilla_runtime_and_client};
use directories::BaseDirs;
use tokio::runtime::Runtime;
use tracing::debug;

/// Connection settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
  pub endpoint: Option<String>,
  pub auth_method: Option<String>,
}

impl ConnectionOverrides {
  /// Look up `name`, preferring a command-line override over `fallback`.
  fn lookup(&self, name: &str, fallback: impl Fn(&str) -> Option<String>) -> Option<String> {
    let overridden = match name {
      ENV_BUGZILLA_ENDPOINT => self.endpoint.clone(),
      ENV_BUGZILLA_AUTH_METHOD => self.auth_method.clone(),
      _ => None,
    };

    overridden.or_else(|| fallback(name))
  }
}

/// Resolve the Bugzilla configuration for `home`.
pub fn resolve_config<F>(home: &Path, overrides: &ConnectionOverrides, env: F) -> Result<BugzillaConfig>
where
  F: Fn(&str) -> Option<String>,
{
  BugzillaConfig::from_lookup(home, |name| overrides.lookup(name, &env))
}

/// Creates a tokio runtime and an authenticated Bugzilla client
///
/// This is a convenience function for CLI commands that need both a runtime
/// and a Bugzilla client.
pub fn create_runtime_and_client(overrides: &ConnectionOverrides) -> Result<(Runtime, BugzillaClient)> {
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;
  let config = resolve_config(base_dirs.home_dir(), overrides, |name| std::env::var(name).ok())
    .context("Failed to load Bugzilla configuration")?;
  debug!("Using Bugzilla configuration {:?}", config);

  create_bugzilla_runtime_and_client(&config)
}
