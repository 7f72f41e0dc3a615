//! Managed database firewall endpoints.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::types::{FirewallRule, FirewallRulesResponse, UpdateFirewallRulesRequest};

/// Operations on a database cluster's firewall rule collection.
///
/// Implemented by [`ApiClient`]; command handlers depend on this trait so
/// they can be exercised without a server.
#[async_trait]
pub trait DatabaseFirewalls: Send + Sync {
    /// Fetch the current rules of a cluster, in server order.
    async fn list_firewall_rules(&self, cluster_id: &str) -> ApiResult<Vec<FirewallRule>>;

    /// Replace the rules of a cluster.
    ///
    /// The service acknowledges with `204 No Content`; callers read the
    /// collection again to obtain the stored rules.
    async fn update_firewall_rules(
        &self,
        cluster_id: &str,
        request: &UpdateFirewallRulesRequest,
    ) -> ApiResult<()>;
}

#[async_trait]
impl DatabaseFirewalls for ApiClient {
    #[instrument(skip(self))]
    async fn list_firewall_rules(&self, cluster_id: &str) -> ApiResult<Vec<FirewallRule>> {
        let url = self.endpoint(&["v2", "databases", cluster_id, "firewall"])?;
        let response: FirewallRulesResponse = self.get_json(&url).await?;
        debug!(count = response.rules.len(), "fetched firewall rules");
        Ok(response.rules)
    }

    #[instrument(skip(self, request), fields(rules = request.rules.len()))]
    async fn update_firewall_rules(
        &self,
        cluster_id: &str,
        request: &UpdateFirewallRulesRequest,
    ) -> ApiResult<()> {
        let url = self.endpoint(&["v2", "databases", cluster_id, "firewall"])?;
        self.put_json(&url, request).await?;
        Ok(())
    }
}
