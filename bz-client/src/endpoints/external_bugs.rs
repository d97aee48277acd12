//! # Bugzilla External Bug Endpoints
//!
//! Reading external bug links over REST, and attaching or detaching GitHub
//! pull requests through the `ExternalBugs` JSONRPC extension.

use tracing::{debug, info, instrument, trace, warn};

use crate::client::BugzillaClient;
use crate::consts::{DUPLICATE_LINK_MESSAGE, GITHUB_TYPE_URL};
use crate::error::{BugzillaError, Result};
use crate::identifier::{PullRef, pull_from_identifier};
use crate::jsonrpc::RpcOutcome;
use crate::models::{
  AddExternalBugParameters, AddExternalBugResult, BugExternalBugs, BugList, ExternalBug, ExternalBugIdentifier,
  RemoveExternalBugParameters, RemoveExternalBugResult,
};

impl BugzillaClient {
  /// Fetch the raw external bug list of a bug via `include_fields`
  async fn fetch_external_bugs(&self, id: u64) -> Result<Vec<ExternalBug>> {
    let url = format!("{}/rest/bug/{}", self.base_url, id);
    trace!("Bugzilla API URL: {}", url);

    let request = self.client.get(&url).query(&[("include_fields", "external_bugs")]);
    let response = self.execute(request, &format!("bug {id}")).await?;
    let body = response.bytes().await?;
    let mut parsed: BugList<BugExternalBugs> = serde_json::from_slice(&body)?;

    if parsed.bugs.len() != 1 {
      return Err(BugzillaError::UnexpectedResponse(format!(
        "expected one bug, but got {}",
        parsed.bugs.len()
      )));
    }

    Ok(parsed.bugs.remove(0).external_bugs)
  }

  /// Get every external bug linked to a bug.
  ///
  /// Links that the server reports for other bugs are dropped.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_external_bugs(&self, id: u64) -> Result<Vec<ExternalBug>> {
    info!("Fetching external bugs for bug {}", id);

    let external_bugs = self
      .fetch_external_bugs(id)
      .await?
      .into_iter()
      .filter(|bug| bug.bugzilla_bug_id == id)
      .collect::<Vec<_>>();

    debug!("Bug {} has {} external bugs", id, external_bugs.len());
    Ok(external_bugs)
  }

  /// Get the GitHub pull requests linked to a bug.
  ///
  /// Links to other trackers and GitHub links that are not pull requests are
  /// skipped. Each returned record has [`ExternalBug::pull`] populated.
  ///
  /// # Errors
  ///
  /// Fails if a GitHub link looks like a pull request but cannot be parsed.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_external_bug_prs_on_bug(&self, id: u64) -> Result<Vec<ExternalBug>> {
    info!("Fetching linked pull requests for bug {}", id);

    let mut prs = Vec::new();
    for mut bug in self.fetch_external_bugs(id).await? {
      if bug.bugzilla_bug_id != id || bug.tracker.url != GITHUB_TYPE_URL {
        continue;
      }

      match pull_from_identifier(&bug.external_bug_id) {
        Ok(pull) => {
          bug.pull = Some(pull);
          prs.push(bug);
        }
        Err(e) if e.is_not_for_pull() => {
          trace!("Skipping non-pull external bug {}", bug.external_bug_id);
        }
        Err(e) => return Err(e.into()),
      }
    }

    debug!("Bug {} has {} linked pull requests", id, prs.len());
    Ok(prs)
  }

  /// Link a GitHub pull request to a bug.
  ///
  /// Returns whether the server recorded this pull request being added to
  /// this bug. Changes reported for other bugs or identifiers are ignored.
  /// Linking a pull request that is already attached is not an error and
  /// reports no change.
  #[instrument(skip(self), level = "debug")]
  pub async fn add_pull_request_as_external_bug(&self, id: u64, org: &str, repo: &str, num: u32) -> Result<bool> {
    let pull = PullRef::new(org, repo, num);
    info!("Linking {} to bug {}", pull, id);

    let params = AddExternalBugParameters {
      api_key: self.auth.api_key.clone(),
      bug_ids: vec![id],
      external_bugs: vec![ExternalBugIdentifier::for_pull(&pull)],
    };

    match self
      .call::<_, AddExternalBugResult>("ExternalBugs.add_external_bug", &params)
      .await?
    {
      RpcOutcome::Fault(fault) if fault.message.contains(DUPLICATE_LINK_MESSAGE) => {
        debug!("{} is already linked to bug {}", pull, id);
        Ok(false)
      }
      RpcOutcome::Fault(fault) => {
        warn!("Failed to link {} to bug {}: {}", pull, id, fault.message);
        Err(fault.into())
      }
      RpcOutcome::Result(result) => {
        let identifier = pull.to_string();
        let changed = result.is_some_and(|result| {
          result
            .bugs
            .iter()
            .any(|bug| bug.added_external_bug(id, &identifier))
        });
        debug!("Linking {} to bug {} changed: {}", pull, id, changed);
        Ok(changed)
      }
    }
  }

  /// Unlink a GitHub pull request from a bug.
  ///
  /// Returns whether the server reports this pull request as detached from
  /// this bug.
  #[instrument(skip(self), level = "debug")]
  pub async fn remove_pull_request_as_external_bug(&self, id: u64, org: &str, repo: &str, num: u32) -> Result<bool> {
    let pull = PullRef::new(org, repo, num);
    info!("Unlinking {} from bug {}", pull, id);

    let params = RemoveExternalBugParameters {
      api_key: self.auth.api_key.clone(),
      bug_ids: vec![id],
      external_bug: ExternalBugIdentifier::for_pull(&pull),
    };

    match self
      .call::<_, RemoveExternalBugResult>("ExternalBugs.remove_external_bug", &params)
      .await?
    {
      RpcOutcome::Fault(fault) => {
        warn!("Failed to unlink {} from bug {}: {}", pull, id, fault.message);
        Err(fault.into())
      }
      RpcOutcome::Result(result) => {
        let changed = result.is_some_and(|result| result.removed(id, &pull.to_string()));
        debug!("Unlinking {} from bug {} changed: {}", pull, id, changed);
        Ok(changed)
      }
    }
  }
}
