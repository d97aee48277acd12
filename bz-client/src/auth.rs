//! Configuration and credential discovery for the Bugzilla client.
//!
//! The endpoint and auth mode come from the environment, while the API key is
//! taken from the environment or, failing that, from `~/.netrc`. The CLI and
//! any other consumer share this lookup so they agree on where settings live.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing::debug;
use url::Url;

use crate::BugzillaClient;
use crate::consts::{ENV_BUGZILLA_API_KEY, ENV_BUGZILLA_AUTH_METHOD, ENV_BUGZILLA_ENDPOINT};
use crate::models::AuthMethod;
use crate::netrc::{find_api_key, get_netrc_path};

/// Everything needed to construct a [`BugzillaClient`]
#[derive(Clone)]
pub struct BugzillaConfig {
  pub endpoint: String,
  pub api_key: String,
  pub auth_method: AuthMethod,
}

impl std::fmt::Debug for BugzillaConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BugzillaConfig")
      .field("endpoint", &self.endpoint)
      .field("api_key", &"<redacted>")
      .field("auth_method", &self.auth_method)
      .finish()
  }
}

impl BugzillaConfig {
  /// Resolve configuration from the process environment and `.netrc`.
  pub fn from_env(home: &Path) -> Result<Self> {
    Self::from_lookup(home, |name| std::env::var(name).ok())
  }

  /// Resolve configuration using `lookup` in place of the environment.
  ///
  /// `lookup` is asked for [`ENV_BUGZILLA_ENDPOINT`],
  /// [`ENV_BUGZILLA_AUTH_METHOD`] and [`ENV_BUGZILLA_API_KEY`]; blank values
  /// count as unset.
  pub fn from_lookup<F>(home: &Path, lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    let raw_endpoint = get(ENV_BUGZILLA_ENDPOINT).with_context(|| {
      format!("Bugzilla endpoint not configured. Please set the '{ENV_BUGZILLA_ENDPOINT}' environment variable.")
    })?;
    let endpoint = normalize_endpoint(&raw_endpoint)?;

    let auth_method = match get(ENV_BUGZILLA_AUTH_METHOD) {
      Some(name) => name
        .parse::<AuthMethod>()
        .with_context(|| format!("Invalid value for '{ENV_BUGZILLA_AUTH_METHOD}'"))?,
      None => AuthMethod::default(),
    };

    let api_key = match get(ENV_BUGZILLA_API_KEY) {
      Some(key) => key,
      None => get_bugzilla_api_key(home, &endpoint)?,
    };

    debug!("Resolved Bugzilla endpoint {} with auth method {}", endpoint, auth_method);

    Ok(Self {
      endpoint,
      api_key,
      auth_method,
    })
  }
}

/// Normalize a Bugzilla base URL.
///
/// A missing scheme defaults to `https://` and trailing slashes are dropped so
/// that paths like `/rest/bug/1` can be appended directly.
pub fn normalize_endpoint(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Bugzilla endpoint cannot be empty"));
  }

  let candidate = if trimmed.contains("://") {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let url = Url::parse(&candidate).with_context(|| format!("Failed to parse Bugzilla endpoint: '{input}'"))?;
  if !matches!(url.scheme(), "http" | "https") {
    return Err(anyhow::anyhow!(
      "Unsupported scheme '{}' in Bugzilla endpoint '{input}'",
      url.scheme()
    ));
  }

  Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Look up the API key for `endpoint` in the user's `.netrc`.
pub fn get_bugzilla_api_key(home: &Path, endpoint: &str) -> Result<String> {
  let url = Url::parse(endpoint).with_context(|| format!("Failed to parse Bugzilla endpoint: '{endpoint}'"))?;
  let host = url
    .host_str()
    .with_context(|| format!("Bugzilla endpoint '{endpoint}' has no host"))?;

  let netrc_path = get_netrc_path(home);
  if netrc_path.exists() {
    if let Some(key) = find_api_key(&netrc_path, host)? {
      return Ok(key);
    }
  }

  Err(anyhow::anyhow!(
    "Bugzilla API key not found. Please set '{ENV_BUGZILLA_API_KEY}' or add a password for machine '{host}' to your .netrc file."
  ))
}

/// Creates a Bugzilla client from configuration in the environment.
pub fn create_bugzilla_client_from_env(home: &Path) -> Result<BugzillaClient> {
  let config = BugzillaConfig::from_env(home).context("Failed to load Bugzilla configuration")?;
  Ok(BugzillaClient::from_config(&config))
}

/// Creates a tokio runtime and a Bugzilla client built from `config`.
pub fn create_bugzilla_runtime_and_client(config: &BugzillaConfig) -> Result<(Runtime, BugzillaClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  Ok((rt, BugzillaClient::from_config(config)))
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use bz_test_utils::{EnvVarGuard, NetrcGuard};

  use super::*;

  fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.get(name).cloned()
  }

  #[test]
  fn test_normalize_endpoint() {
    assert_eq!(
      normalize_endpoint("bugzilla.redhat.com").unwrap(),
      "https://bugzilla.redhat.com"
    );
    assert_eq!(
      normalize_endpoint("https://bugzilla.redhat.com/").unwrap(),
      "https://bugzilla.redhat.com"
    );
    assert_eq!(
      normalize_endpoint("http://localhost:8080/bugzilla/").unwrap(),
      "http://localhost:8080/bugzilla"
    );
    assert!(normalize_endpoint("   ").is_err());
    assert!(normalize_endpoint("ftp://bugzilla.example.com").is_err());
  }

  #[test]
  fn test_config_from_lookup_with_env_key() {
    let guard = NetrcGuard::empty_home();
    let config = BugzillaConfig::from_lookup(
      guard.home_dir(),
      lookup_from(&[
        (ENV_BUGZILLA_ENDPOINT, "bugzilla.example.com"),
        (ENV_BUGZILLA_API_KEY, "env-key"),
        (ENV_BUGZILLA_AUTH_METHOD, "bearer"),
      ]),
    )
    .unwrap();

    assert_eq!(config.endpoint, "https://bugzilla.example.com");
    assert_eq!(config.api_key, "env-key");
    assert_eq!(config.auth_method, AuthMethod::Bearer);
  }

  #[test]
  fn test_config_from_lookup_falls_back_to_netrc() {
    let guard = NetrcGuard::new("machine bugzilla.example.com\n  password netrc-key\n");
    let config = BugzillaConfig::from_lookup(
      guard.home_dir(),
      lookup_from(&[(ENV_BUGZILLA_ENDPOINT, "https://bugzilla.example.com/")]),
    )
    .unwrap();

    assert_eq!(config.api_key, "netrc-key");
    assert_eq!(config.auth_method, AuthMethod::Legacy);
  }

  #[test]
  fn test_config_from_lookup_missing_endpoint() {
    let guard = NetrcGuard::empty_home();
    let error = BugzillaConfig::from_lookup(guard.home_dir(), lookup_from(&[]))
      .unwrap_err()
      .to_string();

    assert!(error.contains(ENV_BUGZILLA_ENDPOINT));
  }

  #[test]
  fn test_config_from_lookup_missing_key() {
    let guard = NetrcGuard::new("machine github.com\n  password gh-token\n");
    let error = BugzillaConfig::from_lookup(
      guard.home_dir(),
      lookup_from(&[(ENV_BUGZILLA_ENDPOINT, "bugzilla.example.com")]),
    )
    .unwrap_err()
    .to_string();

    assert!(error.contains(ENV_BUGZILLA_API_KEY));
    assert!(error.contains("bugzilla.example.com"));
  }

  #[test]
  fn test_config_from_lookup_invalid_auth_method() {
    let guard = NetrcGuard::empty_home();
    let result = BugzillaConfig::from_lookup(
      guard.home_dir(),
      lookup_from(&[
        (ENV_BUGZILLA_ENDPOINT, "bugzilla.example.com"),
        (ENV_BUGZILLA_API_KEY, "key"),
        (ENV_BUGZILLA_AUTH_METHOD, "garbagein"),
      ]),
    );

    let error = format!("{:#}", result.unwrap_err());
    assert!(error.contains(ENV_BUGZILLA_AUTH_METHOD));
    assert!(error.contains("garbagein"));
  }

  #[test]
  fn test_config_from_env() {
    let guard = NetrcGuard::new("machine bz.test.example\n  password from-netrc\n");
    let endpoint = EnvVarGuard::new(ENV_BUGZILLA_ENDPOINT);
    let api_key = EnvVarGuard::new(ENV_BUGZILLA_API_KEY);
    let auth_method = EnvVarGuard::new(ENV_BUGZILLA_AUTH_METHOD);
    endpoint.set("bz.test.example");
    api_key.remove();
    auth_method.set("query");

    let config = BugzillaConfig::from_env(guard.home_dir()).unwrap();
    assert_eq!(config.endpoint, "https://bz.test.example");
    assert_eq!(config.api_key, "from-netrc");
    assert_eq!(config.auth_method, AuthMethod::Query);
  }

  #[test]
  fn test_config_debug_redacts_key() {
    let config = BugzillaConfig {
      endpoint: "https://bugzilla.example.com".to_string(),
      api_key: "secret".to_string(),
      auth_method: AuthMethod::Query,
    };
    assert!(!format!("{config:?}").contains("secret"));
  }
}
