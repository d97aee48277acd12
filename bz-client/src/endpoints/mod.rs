//! # Bugzilla API Endpoints
//!
//! Endpoint implementations grouped by resource: REST bug reads and updates,
//! and external bug links managed through JSONRPC.

pub mod bugs;
pub mod external_bugs;
