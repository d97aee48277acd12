use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::EXTERNAL_BUG_CHANGE_FIELD;
use crate::error::BugzillaError;
use crate::identifier::PullRef;

/// How the API key is attached to outgoing requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMethod {
  /// `Authorization: Bearer <key>`
  Bearer,
  /// `?api_key=<key>`
  Query,
  /// `X-BUGZILLA-API-KEY: <key>`
  XBugzillaApiKey,
  /// Both the query parameter and the vendor header, for servers that only
  /// understand one of them
  #[default]
  Legacy,
}

impl AuthMethod {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Bearer => "bearer",
      Self::Query => "query",
      Self::XBugzillaApiKey => "x-bugzilla-api-key",
      Self::Legacy => "",
    }
  }
}

impl FromStr for AuthMethod {
  type Err = BugzillaError;

  /// Parse a mode name. An empty name selects [`AuthMethod::Legacy`].
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "" => Ok(Self::Legacy),
      "bearer" => Ok(Self::Bearer),
      "query" => Ok(Self::Query),
      "x-bugzilla-api-key" => Ok(Self::XBugzillaApiKey),
      other => Err(BugzillaError::InvalidAuthMethod(other.to_string())),
    }
  }
}

impl fmt::Display for AuthMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Legacy => f.write_str("query+x-bugzilla-api-key"),
      other => f.write_str(other.as_str()),
    }
  }
}

/// Represents Bugzilla authentication credentials
#[derive(Clone)]
pub struct BugzillaAuth {
  pub api_key: String,
  pub method: AuthMethod,
}

impl fmt::Debug for BugzillaAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BugzillaAuth")
      .field("api_key", &"<redacted>")
      .field("method", &self.method)
      .finish()
  }
}

/// A Bugzilla account as embedded in `*_detail` fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
  pub email: String,
  pub id: u64,
  pub name: String,
  pub real_name: String,
}

/// A flag set on a bug, e.g. `needinfo?` or `blocker+`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flag {
  pub id: u64,
  pub name: String,
  pub type_id: u64,
  pub creation_date: Option<DateTime<Utc>>,
  pub modification_date: Option<DateTime<Utc>>,
  pub status: String,
  pub setter: String,
  pub requestee: Option<String>,
}

/// Represents a Bugzilla bug as returned by `GET /rest/bug/{id}`
///
/// Every field is optional on the wire, since `include_fields` can trim the
/// response down to a handful of keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bug {
  pub actual_time: Option<f64>,
  pub alias: Vec<String>,
  pub assigned_to: String,
  pub assigned_to_detail: Option<User>,
  pub blocks: Vec<u64>,
  pub cc: Vec<String>,
  pub cc_detail: Vec<User>,
  pub classification: String,
  pub component: Vec<String>,
  pub creation_time: Option<DateTime<Utc>>,
  pub creator: String,
  pub creator_detail: Option<User>,
  pub deadline: Option<String>,
  pub depends_on: Vec<u64>,
  pub docs_contact: String,
  pub dupe_of: Option<u64>,
  pub estimated_time: Option<f64>,
  pub flags: Vec<Flag>,
  pub groups: Vec<String>,
  pub id: u64,
  pub is_cc_accessible: bool,
  pub is_confirmed: bool,
  pub is_creator_accessible: bool,
  pub is_open: bool,
  pub keywords: Vec<String>,
  pub last_change_time: Option<DateTime<Utc>>,
  #[serde(rename = "op_sys")]
  pub operating_system: String,
  pub platform: String,
  pub priority: String,
  pub product: String,
  pub qa_contact: String,
  pub qa_contact_detail: Option<User>,
  pub remaining_time: Option<f64>,
  pub resolution: String,
  pub see_also: Vec<String>,
  pub severity: String,
  pub status: String,
  pub summary: String,
  pub target_milestone: String,
  pub target_release: Vec<String>,
  pub url: String,
  pub version: Vec<String>,
  pub whiteboard: String,
}

impl Bug {
  /// Whether any of the bug's target releases appears in `targets`
  pub fn has_target_release(&self, targets: &[&str]) -> bool {
    self
      .target_release
      .iter()
      .any(|release| targets.contains(&release.as_str()))
  }
}

/// A comment attached to a bug update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BugComment {
  pub body: String,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub is_private: bool,
}

/// Partial update payload for `PUT /rest/bug/{id}`
///
/// Unset fields are left out of the JSON body so the server only touches
/// what the caller asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BugUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resolution: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub target_release: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dupe_of: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comment: Option<BugComment>,
}

impl BugUpdate {
  /// An update that only moves the bug to `status`
  pub fn status(status: &str) -> Self {
    Self {
      status: Some(status.to_string()),
      ..Default::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    self == &Self::default()
  }
}

/// The tracker an external bug belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalBugType {
  pub url: String,
}

/// A link between a Bugzilla bug and a record in another tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalBug {
  #[serde(rename = "type")]
  pub tracker: ExternalBugType,
  #[serde(rename = "bug_id")]
  pub bugzilla_bug_id: u64,
  #[serde(rename = "ext_bz_bug_id")]
  pub external_bug_id: String,
  /// Populated only when the link was resolved as a GitHub pull request
  #[serde(skip)]
  pub pull: Option<PullRef>,
}

/// Identifies an external bug when attaching or detaching it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalBugIdentifier {
  #[serde(rename = "ext_type_url")]
  pub type_url: String,
  #[serde(rename = "ext_bz_bug_id")]
  pub id: String,
}

impl ExternalBugIdentifier {
  pub fn for_pull(pull: &PullRef) -> Self {
    Self {
      type_url: crate::consts::GITHUB_TYPE_URL.to_string(),
      id: pull.to_string(),
    }
  }
}

/// Parameters for `ExternalBugs.add_external_bug`
#[derive(Debug, Clone, Serialize)]
pub struct AddExternalBugParameters {
  pub api_key: String,
  pub bug_ids: Vec<u64>,
  pub external_bugs: Vec<ExternalBugIdentifier>,
}

/// Parameters for `ExternalBugs.remove_external_bug`
#[derive(Debug, Clone, Serialize)]
pub struct RemoveExternalBugParameters {
  pub api_key: String,
  pub bug_ids: Vec<u64>,
  #[serde(flatten)]
  pub external_bug: ExternalBugIdentifier,
}

/// Before and after values of a single field change
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct FieldChange {
  pub added: String,
  pub removed: String,
}

/// A bug touched by a JSONRPC call, with the field changes it recorded
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ChangedBug {
  pub id: u64,
  pub changes: HashMap<String, FieldChange>,
}

impl ChangedBug {
  /// Whether this entry records `identifier` being linked to bug `id`.
  ///
  /// Bugzilla reports additions as a comma separated list of
  /// `<tracker> <identifier>` entries.
  pub fn added_external_bug(&self, id: u64, identifier: &str) -> bool {
    self.id == id
      && self
        .changes
        .get(EXTERNAL_BUG_CHANGE_FIELD)
        .is_some_and(|change| names_external_bug(&change.added, identifier))
  }
}

fn names_external_bug(list: &str, identifier: &str) -> bool {
  list
    .split(',')
    .map(str::trim)
    .any(|entry| entry == identifier || entry.rsplit(' ').next() == Some(identifier))
}

/// Result of `ExternalBugs.add_external_bug`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AddExternalBugResult {
  pub bugs: Vec<ChangedBug>,
}

/// An external bug reported as detached by `ExternalBugs.remove_external_bug`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RemovedExternalBug {
  pub bug_id: u64,
  pub ext_bz_bug_id: String,
}

/// Result of `ExternalBugs.remove_external_bug`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RemoveExternalBugResult {
  pub external_bugs: Vec<RemovedExternalBug>,
}

impl RemoveExternalBugResult {
  /// Whether `identifier` was detached from bug `id`
  pub fn removed(&self, id: u64, identifier: &str) -> bool {
    self
      .external_bugs
      .iter()
      .any(|bug| bug.bug_id == id && bug.ext_bz_bug_id == identifier)
  }
}

/// The `{"bugs": [...], "faults": [...]}` envelope of REST bug lookups
#[derive(Debug, Deserialize)]
pub(crate) struct BugList<T> {
  #[serde(default = "Vec::new")]
  pub bugs: Vec<T>,
}

/// A bug trimmed to its external bugs via `include_fields=external_bugs`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BugExternalBugs {
  pub external_bugs: Vec<ExternalBug>,
}

/// Response of `GET /rest/version`
#[derive(Debug, Deserialize)]
pub(crate) struct VersionResponse {
  pub version: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
  use serde_json::json;

  /// A real bug as served by `GET /rest/bug/1705243`
  pub(crate) fn bug_json() -> serde_json::Value {
    json!({
      "bugs": [{
        "alias": [],
        "assigned_to": "Steve Kuznetsov",
        "assigned_to_detail": {"email": "skuznets", "id": 381851, "name": "skuznets", "real_name": "Steve Kuznetsov"},
        "blocks": [],
        "cc": ["Sudha Ponnaganti"],
        "cc_detail": [{"email": "sponnaga", "id": 426940, "name": "sponnaga", "real_name": "Sudha Ponnaganti"}],
        "classification": "Red Hat",
        "component": ["Test Infrastructure"],
        "creation_time": "2019-05-01T19:33:36Z",
        "creator": "Dan Mace",
        "creator_detail": {"email": "dmace", "id": 330250, "name": "dmace", "real_name": "Dan Mace"},
        "deadline": null,
        "depends_on": [],
        "docs_contact": "",
        "dupe_of": null,
        "groups": [],
        "id": 1705243,
        "is_cc_accessible": true,
        "is_confirmed": true,
        "is_creator_accessible": true,
        "is_open": true,
        "keywords": [],
        "last_change_time": "2019-05-17T15:13:13Z",
        "op_sys": "Unspecified",
        "platform": "Unspecified",
        "priority": "unspecified",
        "product": "OpenShift Container Platform",
        "qa_contact": "",
        "resolution": "",
        "see_also": [],
        "severity": "medium",
        "status": "VERIFIED",
        "summary": "[ci] cli image flake affecting *-images jobs",
        "target_milestone": "---",
        "target_release": ["3.11.z"],
        "url": "",
        "version": ["3.11.0"],
        "whiteboard": ""
      }],
      "faults": []
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  #[test]
  fn test_auth_method_from_str() {
    assert_eq!("bearer".parse::<AuthMethod>().unwrap(), AuthMethod::Bearer);
    assert_eq!("query".parse::<AuthMethod>().unwrap(), AuthMethod::Query);
    assert_eq!(
      "x-bugzilla-api-key".parse::<AuthMethod>().unwrap(),
      AuthMethod::XBugzillaApiKey
    );
    assert_eq!("".parse::<AuthMethod>().unwrap(), AuthMethod::Legacy);

    let err = "garbagein".parse::<AuthMethod>().unwrap_err();
    assert!(matches!(err, BugzillaError::InvalidAuthMethod(ref name) if name == "garbagein"));
  }

  #[test]
  fn test_auth_debug_redacts_key() {
    let auth = BugzillaAuth {
      api_key: "secret".to_string(),
      method: AuthMethod::Bearer,
    };
    let debug = format!("{auth:?}");
    assert!(!debug.contains("secret"));
    assert!(debug.contains("Bearer"));
  }

  #[test]
  fn test_bug_deserialization() {
    let list: BugList<Bug> = serde_json::from_value(fixtures::bug_json()).unwrap();
    assert_eq!(list.bugs.len(), 1);
    let bug = &list.bugs[0];

    assert_eq!(bug.id, 1705243);
    assert_eq!(bug.status, "VERIFIED");
    assert_eq!(bug.assigned_to, "Steve Kuznetsov");
    assert_eq!(
      bug.assigned_to_detail,
      Some(User {
        email: "skuznets".to_string(),
        id: 381851,
        name: "skuznets".to_string(),
        real_name: "Steve Kuznetsov".to_string(),
      })
    );
    assert_eq!(bug.cc_detail.len(), 1);
    assert_eq!(bug.component, vec!["Test Infrastructure".to_string()]);
    assert_eq!(bug.operating_system, "Unspecified");
    assert_eq!(bug.deadline, None);
    assert_eq!(bug.dupe_of, None);
    assert_eq!(
      bug.creation_time,
      Some(Utc.with_ymd_and_hms(2019, 5, 1, 19, 33, 36).unwrap())
    );
    assert_eq!(bug.target_release, vec!["3.11.z".to_string()]);
    assert!(bug.is_open);
  }

  #[test]
  fn test_bug_deserialization_with_trimmed_fields() {
    let bug: Bug = serde_json::from_value(json!({"id": 3, "status": "NEW"})).unwrap();
    assert_eq!(bug.id, 3);
    assert_eq!(bug.status, "NEW");
    assert!(bug.component.is_empty());
    assert_eq!(bug.creation_time, None);
  }

  #[test]
  fn test_has_target_release() {
    let bug = Bug {
      target_release: vec!["4.1.0".to_string(), "4.2.0".to_string()],
      ..Default::default()
    };
    assert!(bug.has_target_release(&["4.2.0"]));
    assert!(bug.has_target_release(&["3.11.z", "4.1.0"]));
    assert!(!bug.has_target_release(&["4.3.0"]));
    assert!(!Bug::default().has_target_release(&["4.1.0"]));
  }

  #[test]
  fn test_bug_update_serialization() {
    let update = BugUpdate::status("UPDATED");
    assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"status":"UPDATED"}"#);

    let update = BugUpdate {
      status: Some("CLOSED".to_string()),
      resolution: Some("ERRATA".to_string()),
      comment: Some(BugComment {
        body: "Shipped".to_string(),
        is_private: false,
      }),
      ..Default::default()
    };
    assert_eq!(
      serde_json::to_value(&update).unwrap(),
      json!({"status": "CLOSED", "resolution": "ERRATA", "comment": {"body": "Shipped"}})
    );
    assert!(BugUpdate::default().is_empty());
    assert!(!update.is_empty());
  }

  #[test]
  fn test_external_bug_deserialization_skips_pull() {
    let bug: ExternalBug = serde_json::from_value(json!({
      "bug_id": 1705244,
      "ext_bz_bug_id": "org/repo/pull/1",
      "type": {"url": "https://github.com/"}
    }))
    .unwrap();

    assert_eq!(bug.bugzilla_bug_id, 1705244);
    assert_eq!(bug.external_bug_id, "org/repo/pull/1");
    assert_eq!(bug.tracker.url, "https://github.com/");
    assert_eq!(bug.pull, None);
  }

  #[test]
  fn test_remove_parameters_flatten_identifier() {
    let params = RemoveExternalBugParameters {
      api_key: "api-key".to_string(),
      bug_ids: vec![1],
      external_bug: ExternalBugIdentifier::for_pull(&PullRef::new("org", "repo", 2)),
    };
    assert_eq!(
      serde_json::to_value(&params).unwrap(),
      json!({
        "api_key": "api-key",
        "bug_ids": [1],
        "ext_type_url": "https://github.com/",
        "ext_bz_bug_id": "org/repo/pull/2"
      })
    );
  }

  #[test]
  fn test_changed_bug_added_external_bug() {
    let result: AddExternalBugResult = serde_json::from_value(json!({"bugs": [
      {"alias": [], "changes": {"ext_bz_bug_map.ext_bz_bug_id": {"added": "Github org/repo/pull/1", "removed": ""}}, "id": 1705244},
      {"alias": [], "changes": {"ext_bz_bug_map.ext_bz_bug_id": {"added": "Github org/repo/pull/2, Github org/repo/pull/10", "removed": ""}}, "id": 1705245}
    ]}))
    .unwrap();

    assert!(result.bugs[0].added_external_bug(1705244, "org/repo/pull/1"));
    assert!(!result.bugs[0].added_external_bug(1705245, "org/repo/pull/1"));
    assert!(result.bugs[1].added_external_bug(1705245, "org/repo/pull/10"));
    assert!(!result.bugs[1].added_external_bug(1705245, "org/repo/pull/1"));
    assert!(!ChangedBug::default().added_external_bug(0, "org/repo/pull/1"));
  }

  #[test]
  fn test_remove_result_removed() {
    let result: RemoveExternalBugResult = serde_json::from_value(json!({
      "external_bugs": [{"bug_id": 1705243, "ext_bz_bug_id": "org/repo/pull/1", "ext_description": ""}]
    }))
    .unwrap();

    assert!(result.removed(1705243, "org/repo/pull/1"));
    assert!(!result.removed(1705243, "org/repo/pull/2"));
    assert!(!result.removed(1, "org/repo/pull/1"));
  }
}
