//! Request and response payloads for the database firewall endpoints.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A stored firewall rule as returned by `GET /v2/databases/{id}/firewall`.
///
/// Every field is assigned or echoed by the server, so all of them are
/// required when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub uuid: String,
    pub cluster_uuid: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub value: String,
    pub created_at: DateTime<FixedOffset>,
}

/// A rule as submitted in an update request.
///
/// New rules carry only `type` and `value`. Existing rules that are resent
/// to preserve them also carry their `uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRuleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub value: String,
}

impl FirewallRuleRequest {
    /// A new rule with no server-assigned identity.
    pub fn new(rule_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            uuid: None,
            rule_type: rule_type.into(),
            value: value.into(),
        }
    }
}

impl From<&FirewallRule> for FirewallRuleRequest {
    fn from(rule: &FirewallRule) -> Self {
        Self {
            uuid: Some(rule.uuid.clone()),
            rule_type: rule.rule_type.clone(),
            value: rule.value.clone(),
        }
    }
}

/// Body of `PUT /v2/databases/{id}/firewall`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFirewallRulesRequest {
    pub rules: Vec<FirewallRuleRequest>,
}

impl UpdateFirewallRulesRequest {
    pub fn new(rules: Vec<FirewallRuleRequest>) -> Self {
        Self { rules }
    }
}

/// Body of a successful `GET /v2/databases/{id}/firewall`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRulesResponse {
    pub rules: Vec<FirewallRule>,
}
