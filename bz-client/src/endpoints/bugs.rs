//! # Bugzilla Bug Endpoints
//!
//! REST endpoint implementations for reading and updating bugs.

use tracing::{debug, info, instrument, trace};

use crate::client::BugzillaClient;
use crate::error::{BugzillaError, Result};
use crate::models::{Bug, BugList, BugUpdate};

impl BugzillaClient {
  /// Get a bug by its numeric ID.
  ///
  /// # Errors
  ///
  /// Returns [`BugzillaError::NotFound`] when the server answers 404, and
  /// [`BugzillaError::UnexpectedResponse`] when the envelope does not hold
  /// exactly one bug.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_bug(&self, id: u64) -> Result<Bug> {
    info!("Fetching bug {}", id);

    let url = format!("{}/rest/bug/{}", self.base_url, id);
    trace!("Bugzilla API URL: {}", url);

    let response = self.execute(self.client.get(&url), &format!("bug {id}")).await?;
    let body = response.bytes().await?;
    let mut parsed: BugList<Bug> = serde_json::from_slice(&body)?;

    if parsed.bugs.len() != 1 {
      return Err(BugzillaError::UnexpectedResponse(format!(
        "expected one bug, but got {}",
        parsed.bugs.len()
      )));
    }

    let bug = parsed.bugs.remove(0);
    trace!("Bug: {:?}", bug);
    Ok(bug)
  }

  /// Apply a partial update to a bug.
  ///
  /// Only the fields set on `update` are sent.
  #[instrument(skip(self, update), level = "debug")]
  pub async fn update_bug(&self, id: u64, update: &BugUpdate) -> Result<()> {
    info!("Updating bug {}", id);

    let url = format!("{}/rest/bug/{}", self.base_url, id);
    trace!("Bugzilla API URL: {} payload: {:?}", url, update);

    self
      .execute(self.client.put(&url).json(update), &format!("bug {id}"))
      .await?;

    debug!("Bug {} updated", id);
    Ok(())
  }
}
