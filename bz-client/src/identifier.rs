//! # Pull Identifier Parsing
//!
//! Bugzilla stores GitHub links as external bug IDs in the form
//! `{org}/{repo}/pull/{number}`. These helpers format and parse that
//! canonical form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// A GitHub pull request decomposed from an external bug identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRef {
  pub org: String,
  pub repo: String,
  pub number: u32,
}

impl PullRef {
  pub fn new(org: &str, repo: &str, number: u32) -> Self {
    Self {
      org: org.to_string(),
      repo: repo.to_string(),
      number,
    }
  }
}

impl fmt::Display for PullRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}/pull/{}", self.org, self.repo, self.number)
  }
}

impl FromStr for PullRef {
  type Err = IdentifierError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    pull_from_identifier(s)
  }
}

/// Format the external bug identifier for a pull request
pub fn identifier_for_pull(org: &str, repo: &str, number: u32) -> String {
  PullRef::new(org, repo, number).to_string()
}

/// Parse an external bug identifier into its pull request parts.
///
/// The identifier must have exactly four `/`-separated segments. A third
/// segment other than `pull` yields [`IdentifierError::NotForPull`] so callers
/// can skip links to issues or other resources.
pub fn pull_from_identifier(identifier: &str) -> Result<PullRef, IdentifierError> {
  let parts: Vec<&str> = identifier.split('/').collect();
  if parts.len() != 4 {
    return Err(IdentifierError::Malformed {
      identifier: identifier.to_string(),
      parts: parts.len(),
    });
  }

  if parts[2] != "pull" {
    return Err(IdentifierError::NotForPull(identifier.to_string()));
  }

  let number = parts[3]
    .parse::<u32>()
    .map_err(|e| IdentifierError::InvalidNumber {
      identifier: identifier.to_string(),
      reason: e.to_string(),
    })?;

  Ok(PullRef::new(parts[0], parts[1], number))
}
