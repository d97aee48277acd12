//! # JSONRPC Transport
//!
//! Bugzilla exposes some extension methods (notably `ExternalBugs.*`) only
//! over its legacy JSONRPC 1.0 endpoint. Version 1.0 requires the parameters
//! as a single object inside a one-element array.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::client::BugzillaClient;
use crate::consts::{JSONRPC_PATH, JSONRPC_REQUEST_ID, JSONRPC_VERSION};
use crate::error::{BugzillaError, Result};

/// Outgoing JSONRPC 1.0 envelope
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a, P> {
  pub jsonrpc: &'static str,
  pub method: &'a str,
  pub params: [&'a P; 1],
  pub id: &'a str,
}

/// Error object reported by the server
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct JsonRpcError {
  #[serde(default)]
  pub code: i64,
  #[serde(default)]
  pub message: String,
}

/// Incoming JSONRPC 1.0 envelope
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse<R> {
  pub error: Option<JsonRpcError>,
  #[serde(default)]
  pub id: Option<String>,
  pub result: Option<R>,
}

/// What a JSONRPC call produced once the envelope has been checked
#[derive(Debug)]
pub(crate) enum RpcOutcome<R> {
  Result(Option<R>),
  Fault(JsonRpcError),
}

impl BugzillaClient {
  /// Issue a JSONRPC call and validate the response envelope.
  ///
  /// A response whose ID differs from the request's is rejected before the
  /// error object is looked at, since it cannot be trusted to describe this
  /// call. Server faults are returned as [`RpcOutcome::Fault`] so callers can
  /// decide which ones are benign.
  pub(crate) async fn call<P, R>(&self, method: &str, params: &P) -> Result<RpcOutcome<R>>
  where
    P: Serialize,
    R: DeserializeOwned,
  {
    let url = format!("{}{}", self.base_url, JSONRPC_PATH);
    trace!("Bugzilla JSONRPC URL: {} method: {}", url, method);

    let payload = JsonRpcRequest {
      jsonrpc: JSONRPC_VERSION,
      method,
      params: [params],
      id: JSONRPC_REQUEST_ID,
    };

    let response = self
      .execute(self.client.post(&url).json(&payload), &format!("JSONRPC method {method}"))
      .await?;
    let body = response.bytes().await?;
    let parsed: JsonRpcResponse<R> = serde_json::from_slice(&body)?;

    if parsed.id.as_deref() != Some(JSONRPC_REQUEST_ID) {
      return Err(BugzillaError::IdMismatch {
        expected: JSONRPC_REQUEST_ID.to_string(),
        actual: parsed.id.unwrap_or_default(),
      });
    }

    match parsed.error {
      Some(fault) => {
        debug!("JSONRPC method {} failed with code {}", method, fault.code);
        Ok(RpcOutcome::Fault(fault))
      }
      None => Ok(RpcOutcome::Result(parsed.result)),
    }
  }
}

impl From<JsonRpcError> for BugzillaError {
  fn from(fault: JsonRpcError) -> Self {
    Self::Rpc {
      code: fault.code,
      message: fault.message,
    }
  }
}
