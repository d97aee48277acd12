//! Constants for the bz-client crate.

/// User-Agent header value for the Bugzilla API client
pub const USER_AGENT: &str = concat!("bz/", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key in the vendor-specific auth mode
pub const API_KEY_HEADER: &str = "X-BUGZILLA-API-KEY";

/// Query parameter carrying the API key in the query auth mode
pub const API_KEY_QUERY_PARAM: &str = "api_key";

/// Path of the JSONRPC endpoint, relative to the Bugzilla base URL
pub const JSONRPC_PATH: &str = "/jsonrpc.cgi";

/// JSONRPC protocol version. Every Bugzilla server speaks 1.0.
pub const JSONRPC_VERSION: &str = "1.0";

/// Envelope ID sent with every JSONRPC request
pub const JSONRPC_REQUEST_ID: &str = "identifier";

/// Tracker type URL Bugzilla uses for GitHub external bugs
pub const GITHUB_TYPE_URL: &str = "https://github.com/";

/// Fragment of the database error Bugzilla returns when an external bug is
/// already linked
pub const DUPLICATE_LINK_MESSAGE: &str = "duplicate key value violates unique constraint";

/// Change-set key under which JSONRPC results report external bug links
pub const EXTERNAL_BUG_CHANGE_FIELD: &str = "ext_bz_bug_map.ext_bz_bug_id";

/// Environment variable holding the Bugzilla base URL
pub const ENV_BUGZILLA_ENDPOINT: &str = "BUGZILLA_ENDPOINT";

/// Environment variable holding the Bugzilla API key
pub const ENV_BUGZILLA_API_KEY: &str = "BUGZILLA_API_KEY";

/// Environment variable selecting the credential attachment mode
pub const ENV_BUGZILLA_AUTH_METHOD: &str = "BUGZILLA_AUTH_METHOD";
