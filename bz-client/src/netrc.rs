//! Helpers for reading Bugzilla API keys stored in `.netrc` files.
//!
//! The API key lives in the `password` slot of the `machine` entry for the
//! Bugzilla host. A `login` is optional since Bugzilla never asks for one.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// ```
/// use std::path::Path;
/// use bz_client::netrc::get_netrc_path;
///
/// let path = get_netrc_path(Path::new("/home/user"));
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Parses a `.netrc` file and returns the password for the requested machine.
///
/// Both single-line (`machine host login user password pass`) and multi-line
/// layouts are accepted. Returns `Ok(None)` when the machine is missing or has
/// no password.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn find_api_key(path: &Path, target_machine: &str) -> Result<Option<String>> {
  let file = File::open(path).context("Failed to open .netrc file")?;
  let reader = BufReader::new(file);

  let mut current_machine = String::new();
  let mut password = String::new();

  for line in reader.lines() {
    let line = line.context("Failed to read line from .netrc")?;
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut tokens = parts.iter();
    while let Some(&token) = tokens.next() {
      match token {
        "machine" | "default" => {
          if current_machine == target_machine && !password.is_empty() {
            return Ok(Some(password));
          }
          password.clear();
          // `default` starts an entry that matches no named machine
          current_machine = if token == "machine" {
            tokens.next().map(|m| m.to_string()).unwrap_or_default()
          } else {
            String::new()
          };
        }
        "password" => {
          if let Some(value) = tokens.next() {
            password = value.to_string();
          }
        }
        "login" | "account" => {
          tokens.next();
        }
        _ => {}
      }
    }
  }

  if current_machine == target_machine && !password.is_empty() {
    return Ok(Some(password));
  }

  Ok(None)
}

#[cfg(test)]
mod tests {
  use bz_test_utils::NetrcGuard;

  use super::*;

  #[test]
  fn test_find_api_key_multi_line() {
    let guard = NetrcGuard::new(
      r#"machine github.com
  login octocat
  password gh-token

machine bugzilla.redhat.com
  password bz-key
"#,
    );

    let key = find_api_key(guard.netrc_path(), "bugzilla.redhat.com").unwrap();
    assert_eq!(key.as_deref(), Some("bz-key"));

    let key = find_api_key(guard.netrc_path(), "github.com").unwrap();
    assert_eq!(key.as_deref(), Some("gh-token"));
  }

  #[test]
  fn test_find_api_key_single_line() {
    let guard = NetrcGuard::new("machine bugzilla.example.com login me password single-key\n");

    let key = find_api_key(guard.netrc_path(), "bugzilla.example.com").unwrap();
    assert_eq!(key.as_deref(), Some("single-key"));
  }

  #[test]
  fn test_find_api_key_missing_machine() {
    let guard = NetrcGuard::new("machine github.com\n  login octocat\n  password gh-token\n");

    assert_eq!(find_api_key(guard.netrc_path(), "bugzilla.example.com").unwrap(), None);
  }

  #[test]
  fn test_find_api_key_missing_file() {
    let guard = NetrcGuard::empty_home();

    assert!(find_api_key(guard.netrc_path(), "bugzilla.example.com").is_err());
  }

  #[test]
  fn test_find_api_key_ignores_default_entry() {
    let guard = NetrcGuard::new(
      r#"machine bugzilla.example.com
  login me

default
  password fallback-key
"#,
    );

    assert_eq!(find_api_key(guard.netrc_path(), "bugzilla.example.com").unwrap(), None);
  }

  #[test]
  fn test_find_api_key_before_default_entry() {
    let guard = NetrcGuard::new(
      "machine bugzilla.example.com login default password bz-key\ndefault password fallback-key\n",
    );

    let key = find_api_key(guard.netrc_path(), "bugzilla.example.com").unwrap();
    assert_eq!(key.as_deref(), Some("bz-key"));
  }
}
