//! `cloudctl databases firewalls` - manage a cluster's firewall rules.
//!
//! Input is validated before any request is sent. Every command that
//! changes rules reads the collection back after the write and returns the
//! stored rules, so the caller only renders server state.

use cloudctl_api::{
    DatabaseFirewalls, FirewallRule, FirewallRuleRequest, UpdateFirewallRulesRequest,
};
use tracing::{debug, info};

use crate::cli::FirewallCommands;
use crate::context::CommandContext;
use crate::error::{CliError, CliResult};
use crate::rule_spec::{build_update_request, parse_rule_specs, RuleSpec};

/// Validated firewall command, ready to run against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirewallAction {
    List { cluster_id: String },
    Update { cluster_id: String, rules: Vec<RuleSpec> },
    Append { cluster_id: String, rules: Vec<RuleSpec> },
    Remove { cluster_id: String, uuid: String },
}

fn validate_cluster_id(cluster_id: &str) -> CliResult<String> {
    if cluster_id.trim().is_empty() {
        return Err(CliError::validation("database cluster ID must not be empty"));
    }
    Ok(cluster_id.to_string())
}

impl FirewallAction {
    /// Check arguments and parse rule specs.
    pub fn from_command(command: &FirewallCommands) -> CliResult<Self> {
        Ok(match command {
            FirewallCommands::List { cluster_id } => FirewallAction::List {
                cluster_id: validate_cluster_id(cluster_id)?,
            },
            FirewallCommands::Update { cluster_id, rules } => FirewallAction::Update {
                cluster_id: validate_cluster_id(cluster_id)?,
                rules: parse_rule_specs(rules)?,
            },
            FirewallCommands::Append { cluster_id, rules } => FirewallAction::Append {
                cluster_id: validate_cluster_id(cluster_id)?,
                rules: parse_rule_specs(rules)?,
            },
            FirewallCommands::Remove { cluster_id, uuid } => {
                if uuid.trim().is_empty() {
                    return Err(CliError::validation("rule UUID must not be empty"));
                }
                FirewallAction::Remove {
                    cluster_id: validate_cluster_id(cluster_id)?,
                    uuid: uuid.clone(),
                }
            }
        })
    }

    /// Run against the API and return the cluster's resulting rules.
    pub async fn run(self, api: &dyn DatabaseFirewalls) -> CliResult<Vec<FirewallRule>> {
        match self {
            FirewallAction::List { cluster_id } => list(api, &cluster_id).await,
            FirewallAction::Update { cluster_id, rules } => {
                let request = build_update_request(rules);
                write_and_reload(api, &cluster_id, &request).await
            }
            FirewallAction::Append { cluster_id, rules } => {
                let existing = list(api, &cluster_id).await?;
                let mut request = UpdateFirewallRulesRequest::new(
                    existing.iter().map(FirewallRuleRequest::from).collect(),
                );
                request.rules.extend(build_update_request(rules).rules);
                write_and_reload(api, &cluster_id, &request).await
            }
            FirewallAction::Remove { cluster_id, uuid } => {
                let existing = list(api, &cluster_id).await?;
                if !existing.iter().any(|rule| rule.uuid == uuid) {
                    return Err(CliError::validation(format!(
                        "firewall rule {uuid} not found on cluster {cluster_id}"
                    )));
                }
                let request = UpdateFirewallRulesRequest::new(
                    existing
                        .iter()
                        .filter(|rule| rule.uuid != uuid)
                        .map(FirewallRuleRequest::from)
                        .collect(),
                );
                write_and_reload(api, &cluster_id, &request).await
            }
        }
    }
}

async fn list(api: &dyn DatabaseFirewalls, cluster_id: &str) -> CliResult<Vec<FirewallRule>> {
    api.list_firewall_rules(cluster_id).await.map_err(|e| {
        CliError::api(
            format!("failed to list firewall rules for cluster {cluster_id}"),
            e,
        )
    })
}

async fn write_and_reload(
    api: &dyn DatabaseFirewalls,
    cluster_id: &str,
    request: &UpdateFirewallRulesRequest,
) -> CliResult<Vec<FirewallRule>> {
    debug!(cluster_id, rules = request.rules.len(), "updating firewall rules");
    api.update_firewall_rules(cluster_id, request)
        .await
        .map_err(|e| {
            CliError::api(
                format!("failed to update firewall rules for cluster {cluster_id}"),
                e,
            )
        })?;
    info!(cluster_id, "firewall rules updated");
    list(api, cluster_id).await
}

/// Run a validated firewall action and return the rendered output.
pub async fn execute(action: FirewallAction, ctx: &CommandContext) -> CliResult<String> {
    let client = ctx.api_client()?;
    let rules = action.run(&client).await?;
    ctx.output.render_firewall_rules(&rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::{EXIT_AUTH, EXIT_ERROR, EXIT_USAGE};
    use async_trait::async_trait;
    use chrono::DateTime;
    use cloudctl_api::{ApiError, ApiResult};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List(String),
        Update(String, UpdateFirewallRulesRequest),
    }

    /// In-memory API that records calls and replaces rules on update.
    #[derive(Default)]
    struct FakeApi {
        rules: Mutex<Vec<FirewallRule>>,
        calls: Mutex<Vec<Call>>,
        reject_update: Option<fn() -> ApiError>,
    }

    impl FakeApi {
        fn with_rules(rules: Vec<FirewallRule>) -> Self {
            Self {
                rules: Mutex::new(rules),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DatabaseFirewalls for FakeApi {
        async fn list_firewall_rules(&self, cluster_id: &str) -> ApiResult<Vec<FirewallRule>> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::List(cluster_id.to_string()));
            Ok(self.rules.lock().unwrap().clone())
        }

        async fn update_firewall_rules(
            &self,
            cluster_id: &str,
            request: &UpdateFirewallRulesRequest,
        ) -> ApiResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(cluster_id.to_string(), request.clone()));
            if let Some(reject) = self.reject_update {
                return Err(reject());
            }
            let mut rules = self.rules.lock().unwrap();
            let previous = rules.clone();
            *rules = request
                .rules
                .iter()
                .enumerate()
                .map(|(i, submitted)| match &submitted.uuid {
                    Some(uuid) => previous
                        .iter()
                        .find(|r| &r.uuid == uuid)
                        .cloned()
                        .expect("resubmitted rule exists"),
                    None => FirewallRule {
                        uuid: format!("new-{i}"),
                        cluster_uuid: cluster_id.to_string(),
                        rule_type: submitted.rule_type.clone(),
                        value: submitted.value.clone(),
                        created_at: DateTime::parse_from_rfc3339("2021-02-01T00:00:00Z")
                            .unwrap(),
                    },
                })
                .collect();
            Ok(())
        }
    }

    fn stored(uuid: &str, value: &str) -> FirewallRule {
        FirewallRule {
            uuid: uuid.to_string(),
            cluster_uuid: "1".to_string(),
            rule_type: "ip_addr".to_string(),
            value: value.to_string(),
            created_at: DateTime::parse_from_rfc3339("2021-01-27T20:34:12Z").unwrap(),
        }
    }

    fn update_command(cluster_id: &str, rules: &[&str]) -> FirewallCommands {
        FirewallCommands::Update {
            cluster_id: cluster_id.to_string(),
            rules: rules.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_malformed_rule_is_rejected_before_running() {
        let err = FirewallAction::from_command(&update_command("1", &["ip_addr-10.0.0.1"]))
            .unwrap_err();
        assert_eq!(err.exit_code, EXIT_USAGE);
        assert!(err.message.contains("expected <type>:<value>"));
    }

    #[test]
    fn test_empty_cluster_id_is_rejected() {
        let err = FirewallAction::from_command(&FirewallCommands::List {
            cluster_id: "  ".to_string(),
        })
        .unwrap_err();
        assert_eq!(err.exit_code, EXIT_USAGE);
    }

    #[tokio::test]
    async fn test_update_writes_then_reads_back() {
        let api = FakeApi::default();
        let action =
            FirewallAction::from_command(&update_command("1", &["ip_addr:192.168.1.2"])).unwrap();

        let rules = action.run(&api).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![
                Call::Update(
                    "1".to_string(),
                    UpdateFirewallRulesRequest::new(vec![FirewallRuleRequest::new(
                        "ip_addr",
                        "192.168.1.2"
                    )])
                ),
                Call::List("1".to_string()),
            ]
        );
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].uuid, "new-0");
    }

    #[tokio::test]
    async fn test_rejected_update_never_reads_back() {
        let api = FakeApi {
            reject_update: Some(|| ApiError::Unauthorized("bad token".to_string())),
            ..FakeApi::default()
        };
        let action =
            FirewallAction::from_command(&update_command("1", &["ip_addr:192.168.1.2"])).unwrap();

        let err = action.run(&api).await.unwrap_err();

        assert_eq!(err.exit_code, EXIT_AUTH);
        assert_eq!(api.calls().len(), 1);
        assert!(matches!(api.calls()[0], Call::Update(..)));
    }

    #[tokio::test]
    async fn test_server_error_on_update_is_general_error() {
        let api = FakeApi {
            reject_update: Some(|| ApiError::Api {
                status: 422,
                message: "invalid rule".to_string(),
            }),
            ..FakeApi::default()
        };
        let action = FirewallAction::from_command(&update_command("1", &["bogus:x"])).unwrap();
        let err = action.run(&api).await.unwrap_err();
        assert_eq!(err.exit_code, EXIT_ERROR);
        assert!(err.full_chain().contains("invalid rule"));
    }

    #[tokio::test]
    async fn test_append_resends_existing_rules_with_uuid() {
        let api = FakeApi::with_rules(vec![stored("keep-me", "10.0.0.1")]);
        let action = FirewallAction::from_command(&FirewallCommands::Append {
            cluster_id: "1".to_string(),
            rules: vec!["tag:web".to_string()],
        })
        .unwrap();

        let rules = action.run(&api).await.unwrap();

        let Call::Update(_, request) = &api.calls()[1] else {
            panic!("expected update as second call");
        };
        assert_eq!(request.rules[0].uuid.as_deref(), Some("keep-me"));
        assert_eq!(request.rules[1], FirewallRuleRequest::new("tag", "web"));
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], stored("keep-me", "10.0.0.1"));
    }

    #[tokio::test]
    async fn test_remove_drops_only_the_named_rule() {
        let api = FakeApi::with_rules(vec![stored("a", "10.0.0.1"), stored("b", "10.0.0.2")]);
        let action = FirewallAction::Remove {
            cluster_id: "1".to_string(),
            uuid: "a".to_string(),
        };

        let rules = action.run(&api).await.unwrap();

        assert_eq!(rules, vec![stored("b", "10.0.0.2")]);
    }

    #[tokio::test]
    async fn test_remove_unknown_rule_sends_no_update() {
        let api = FakeApi::with_rules(vec![stored("a", "10.0.0.1")]);
        let action = FirewallAction::Remove {
            cluster_id: "1".to_string(),
            uuid: "missing".to_string(),
        };

        let err = action.run(&api).await.unwrap_err();

        assert_eq!(err.exit_code, EXIT_USAGE);
        assert_eq!(api.calls(), vec![Call::List("1".to_string())]);
    }
}
