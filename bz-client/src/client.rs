//! # Bugzilla HTTP Client
//!
//! HTTP client implementation for Bugzilla API interactions, handling
//! credential attachment, request dispatch, and status mapping shared by the
//! REST and JSONRPC endpoints.

use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use tracing::{debug, instrument, trace, warn};

use crate::auth::BugzillaConfig;
use crate::consts::{API_KEY_HEADER, API_KEY_QUERY_PARAM, USER_AGENT};
use crate::error::{BugzillaError, Result};
use crate::models::{AuthMethod, BugzillaAuth, VersionResponse};

/// Represents a Bugzilla API client
pub struct BugzillaClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: BugzillaAuth,
}

impl BugzillaClient {
  /// Create a new Bugzilla client
  pub fn new(base_url: &str, auth: BugzillaAuth) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    }
  }

  /// Create a client from resolved configuration
  pub fn from_config(config: &BugzillaConfig) -> Self {
    Self::new(
      &config.endpoint,
      BugzillaAuth {
        api_key: config.api_key.clone(),
        method: config.auth_method,
      },
    )
  }

  /// The Bugzilla base URL requests are sent to
  pub fn endpoint(&self) -> &str {
    &self.base_url
  }

  /// The configured credential attachment mode
  pub const fn auth_method(&self) -> AuthMethod {
    self.auth.method
  }

  /// Attach the API key according to the configured [`AuthMethod`].
  pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
    let key = self.auth.api_key.as_str();
    let request = request.header(header::USER_AGENT, USER_AGENT);

    match self.auth.method {
      AuthMethod::Bearer => request.bearer_auth(key),
      AuthMethod::Query => request.query(&[(API_KEY_QUERY_PARAM, key)]),
      AuthMethod::XBugzillaApiKey => request.header(API_KEY_HEADER, key),
      AuthMethod::Legacy => request
        .query(&[(API_KEY_QUERY_PARAM, key)])
        .header(API_KEY_HEADER, key),
    }
  }

  /// Send an authorized request and map non-success statuses to errors.
  ///
  /// `what` names the resource for the not-found message.
  pub(crate) async fn execute(&self, request: RequestBuilder, what: &str) -> Result<Response> {
    let response = self.authorize(request).send().await?;

    let status = response.status();
    debug!("Bugzilla API response status: {}", status);

    match status {
      s if s.is_success() => Ok(response),
      StatusCode::NOT_FOUND => Err(BugzillaError::NotFound(what.to_string())),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        warn!("Authentication failed when accessing Bugzilla API");
        Err(BugzillaError::Unauthorized)
      }
      _ => {
        let body = response.text().await.unwrap_or_default();
        warn!("Unexpected Bugzilla API error: HTTP {} - {}", status, body);
        Err(BugzillaError::Http { status, body })
      }
    }
  }

  /// Fetch the server's Bugzilla version
  #[instrument(skip(self), level = "debug")]
  pub async fn version(&self) -> Result<String> {
    let url = format!("{}/rest/version", self.base_url);
    trace!("Bugzilla API URL: {}", url);

    let response = self.execute(self.client.get(&url), "version endpoint").await?;
    let body = response.bytes().await?;
    let version: VersionResponse = serde_json::from_slice(&body)?;
    Ok(version.version)
  }

  /// Test the Bugzilla connection by fetching the server version
  pub async fn test_connection(&self) -> bool {
    match self.version().await {
      Ok(version) => {
        debug!("Connected to Bugzilla {}", version);
        true
      }
      Err(e) => {
        debug!("Bugzilla connection test failed: {}", e);
        false
      }
    }
  }
}

/// Create a Bugzilla client from an endpoint, API key, and auth mode
pub fn create_bugzilla_client(base_url: &str, api_key: &str, method: AuthMethod) -> BugzillaClient {
  let auth = BugzillaAuth {
    api_key: api_key.to_string(),
    method,
  };

  BugzillaClient::new(base_url, auth)
}
