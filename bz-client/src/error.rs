//! # Error Types
//!
//! Typed failures surfaced by the Bugzilla client. Callers match on these to
//! tell a missing bug apart from transport problems or JSONRPC faults.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used throughout the client
pub type Result<T, E = BugzillaError> = std::result::Result<T, E>;

/// Errors returned by [`crate::BugzillaClient`] operations
#[derive(Debug, Error)]
pub enum BugzillaError {
  #[error("Not found: {0}")]
  NotFound(String),
  #[error("Authentication failed. Please check your Bugzilla API key.")]
  Unauthorized,
  #[error("Unexpected error: HTTP {status} - {body}")]
  Http { status: StatusCode, body: String },
  #[error("Request to Bugzilla failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("Failed to decode Bugzilla response: {0}")]
  Decode(#[from] serde_json::Error),
  #[error("Unexpected response from Bugzilla: {0}")]
  UnexpectedResponse(String),
  #[error("JSONRPC error {code}: {message}")]
  Rpc { code: i64, message: String },
  #[error("JSONRPC response ID '{actual}' does not match request ID '{expected}'")]
  IdMismatch { expected: String, actual: String },
  #[error(transparent)]
  Identifier(#[from] IdentifierError),
  #[error("Invalid auth method '{0}': expected one of 'bearer', 'query', 'x-bugzilla-api-key'")]
  InvalidAuthMethod(String),
}

impl BugzillaError {
  /// Whether the server answered HTTP 404
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound(_))
  }
}

/// Errors produced while parsing an external bug identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
  #[error("Invalid pull identifier with {parts} parts: '{identifier}'")]
  Malformed { identifier: String, parts: usize },
  #[error("Identifier '{0}' is not for a pull request")]
  NotForPull(String),
  #[error("Invalid pull number in identifier '{identifier}': {reason}")]
  InvalidNumber { identifier: String, reason: String },
}

impl IdentifierError {
  /// Whether the identifier was well-formed but points at something other
  /// than a pull request
  pub fn is_not_for_pull(&self) -> bool {
    matches!(self, Self::NotForPull(_))
  }
}
