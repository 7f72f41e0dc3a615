//! REST client for the cloud infrastructure API.
//!
//! Only the managed database firewall endpoints are covered:
//!
//! - `GET /v2/databases/{id}/firewall` lists a cluster's rules
//! - `PUT /v2/databases/{id}/firewall` replaces a cluster's rules
//!
//! Transport, TLS and JSON decoding are handled by `reqwest` and `serde_json`;
//! this crate adds bearer authentication, typed payloads and an error
//! taxonomy that separates authentication failures from other HTTP errors.

pub mod client;
pub mod databases;
pub mod error;
pub mod types;

pub use client::{ApiClient, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use databases::DatabaseFirewalls;
pub use error::{ApiError, ApiResult};
pub use types::{
    FirewallRule, FirewallRuleRequest, FirewallRulesResponse, UpdateFirewallRulesRequest,
};
