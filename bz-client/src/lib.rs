//! # Bugzilla API Client
//!
//! Provides Bugzilla REST and JSONRPC integration for reading and updating
//! bugs and for linking GitHub pull requests to them as external bugs.

pub mod auth;
mod client;
pub mod consts;
mod endpoints;
pub mod error;
pub mod identifier;
mod jsonrpc;
pub mod models;
pub mod netrc;

// Re-export the client
pub use auth::{BugzillaConfig, create_bugzilla_client_from_env, create_bugzilla_runtime_and_client};
pub use client::{BugzillaClient, create_bugzilla_client};
// Re-export errors
pub use error::{BugzillaError, IdentifierError, Result};
pub use identifier::{PullRef, identifier_for_pull, pull_from_identifier};
// Re-export models
pub use models::{
  AuthMethod, Bug, BugComment, BugUpdate, BugzillaAuth, ExternalBug, ExternalBugIdentifier,
  ExternalBugType, Flag, User,
};
