//! In-memory server-side state for the mock API.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, FixedOffset, Utc};
use cloudctl_api::{FirewallRule, UpdateFirewallRulesRequest};

/// How the mock applies a `PUT` of the rule collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PutMode {
    /// Every submitted rule is stored as a new rule after the existing ones.
    #[default]
    Append,
    /// The submitted list replaces the stored one. Submitted rules whose
    /// `uuid` matches a stored rule keep that record unchanged.
    Replace,
}

/// A request that reached a registered route.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorized: bool,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Default)]
struct StoreState {
    clusters: HashMap<String, Vec<FirewallRule>>,
    assigned_uuids: VecDeque<String>,
    clock: Option<DateTime<FixedOffset>>,
    put_mode: PutMode,
    requests: Vec<RecordedRequest>,
    unexpected: Vec<String>,
}

/// Firewall rules per cluster plus a log of received requests.
///
/// Cloning shares the same state, so a test keeps one handle while the
/// server's handlers hold another.
#[derive(Debug, Clone, Default)]
pub struct FirewallStore {
    inner: Arc<Mutex<StoreState>>,
}

impl FirewallStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a cluster with its initial rules.
    pub fn with_cluster(self, cluster_id: impl Into<String>, rules: Vec<FirewallRule>) -> Self {
        self.state().clusters.insert(cluster_id.into(), rules);
        self
    }

    /// UUIDs handed out to new rules, in order. Random v4 UUIDs are used
    /// once these run out.
    pub fn with_assigned_uuids<I, S>(self, uuids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state()
            .assigned_uuids
            .extend(uuids.into_iter().map(Into::into));
        self
    }

    /// Stamp every new rule with this creation time instead of the current time.
    pub fn with_fixed_clock(self, created_at: DateTime<FixedOffset>) -> Self {
        self.state().clock = Some(created_at);
        self
    }

    pub fn with_put_mode(self, mode: PutMode) -> Self {
        self.state().put_mode = mode;
        self
    }

    /// Current rules of a cluster, `None` when the cluster is unknown.
    pub fn rules(&self, cluster_id: &str) -> Option<Vec<FirewallRule>> {
        self.state().clusters.get(cluster_id).cloned()
    }

    /// Apply an update to a known cluster and return the stored rules.
    pub fn apply_update(
        &self,
        cluster_id: &str,
        request: UpdateFirewallRulesRequest,
    ) -> Option<Vec<FirewallRule>> {
        let mut state = self.state();
        let mode = state.put_mode;
        let existing = state.clusters.get(cluster_id)?.clone();

        let mut updated = match mode {
            PutMode::Append => existing.clone(),
            PutMode::Replace => Vec::with_capacity(request.rules.len()),
        };

        for submitted in request.rules {
            let kept = match (mode, submitted.uuid.as_deref()) {
                (PutMode::Replace, Some(uuid)) => existing.iter().find(|r| r.uuid == uuid),
                _ => None,
            };
            let rule = match kept {
                Some(rule) => rule.clone(),
                None => FirewallRule {
                    uuid: state.next_uuid(),
                    cluster_uuid: cluster_id.to_string(),
                    rule_type: submitted.rule_type,
                    value: submitted.value,
                    created_at: state.now(),
                },
            };
            updated.push(rule);
        }

        state
            .clusters
            .insert(cluster_id.to_string(), updated.clone());
        Some(updated)
    }

    /// Requests received on registered routes, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// Number of received requests with the given method.
    pub fn count(&self, method: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    /// Descriptions of requests the mock did not expect.
    pub fn unexpected_requests(&self) -> Vec<String> {
        self.state().unexpected.clone()
    }

    pub(crate) fn record(&self, request: RecordedRequest) {
        self.state().requests.push(request);
    }

    pub(crate) fn record_unexpected(&self, description: String) {
        tracing::warn!("mock API received unexpected request: {description}");
        self.state().unexpected.push(description);
    }
}

impl StoreState {
    fn next_uuid(&mut self) -> String {
        self.assigned_uuids
            .pop_front()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.clock.unwrap_or_else(|| Utc::now().fixed_offset())
    }
}
