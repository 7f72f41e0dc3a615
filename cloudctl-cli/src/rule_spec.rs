//! Parsing of `<type>:<value>` firewall rule specifications.

use std::str::FromStr;

use cloudctl_api::{FirewallRuleRequest, UpdateFirewallRulesRequest};
use thiserror::Error;

/// A firewall rule given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub rule_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSpecError {
    #[error("invalid rule '{0}': expected <type>:<value>")]
    MissingSeparator(String),
    #[error("invalid rule '{0}': rule type must not be empty")]
    EmptyType(String),
    #[error("invalid rule '{0}': rule value must not be empty")]
    EmptyValue(String),
}

impl FromStr for RuleSpec {
    type Err = RuleSpecError;

    /// Split on the first `:` only; the value may contain further colons.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (rule_type, value) = spec
            .split_once(':')
            .ok_or_else(|| RuleSpecError::MissingSeparator(spec.to_string()))?;

        if rule_type.is_empty() {
            return Err(RuleSpecError::EmptyType(spec.to_string()));
        }
        if value.is_empty() {
            return Err(RuleSpecError::EmptyValue(spec.to_string()));
        }

        Ok(Self {
            rule_type: rule_type.to_string(),
            value: value.to_string(),
        })
    }
}

impl From<RuleSpec> for FirewallRuleRequest {
    fn from(spec: RuleSpec) -> Self {
        FirewallRuleRequest::new(spec.rule_type, spec.value)
    }
}

/// Parse every spec, failing on the first malformed one.
pub fn parse_rule_specs<S: AsRef<str>>(specs: &[S]) -> Result<Vec<RuleSpec>, RuleSpecError> {
    specs.iter().map(|spec| spec.as_ref().parse()).collect()
}

/// Request body holding one new rule per spec, in order.
pub fn build_update_request(specs: Vec<RuleSpec>) -> UpdateFirewallRulesRequest {
    UpdateFirewallRulesRequest::new(specs.into_iter().map(FirewallRuleRequest::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_ip_rule() {
        let spec: RuleSpec = "ip_addr:192.168.1.2".parse().unwrap();
        assert_eq!(spec.rule_type, "ip_addr");
        assert_eq!(spec.value, "192.168.1.2");
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let spec: RuleSpec = "ip_addr:2001:db8::1".parse().unwrap();
        assert_eq!(spec.rule_type, "ip_addr");
        assert_eq!(spec.value, "2001:db8::1");
    }

    #[test]
    fn test_malformed_specs() {
        assert_eq!(
            "192.168.1.2".parse::<RuleSpec>(),
            Err(RuleSpecError::MissingSeparator("192.168.1.2".to_string()))
        );
        assert_eq!(
            ":192.168.1.2".parse::<RuleSpec>(),
            Err(RuleSpecError::EmptyType(":192.168.1.2".to_string()))
        );
        assert_eq!(
            "ip_addr:".parse::<RuleSpec>(),
            Err(RuleSpecError::EmptyValue("ip_addr:".to_string()))
        );
    }

    #[test]
    fn test_parse_stops_at_first_error() {
        let err = parse_rule_specs(&["ip_addr:1.2.3.4", "bogus", "tag:"]).unwrap_err();
        assert_eq!(err, RuleSpecError::MissingSeparator("bogus".to_string()));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            RuleSpecError::MissingSeparator("bogus".to_string()).to_string(),
            "invalid rule 'bogus': expected <type>:<value>"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let specs = parse_rule_specs(&["ip_addr:192.168.1.2", "tag:web"]).unwrap();
        let body = serde_json::to_value(build_update_request(specs)).unwrap();
        assert_eq!(
            body,
            json!({
                "rules": [
                    { "type": "ip_addr", "value": "192.168.1.2" },
                    { "type": "tag", "value": "web" }
                ]
            })
        );
    }

    proptest! {
        #[test]
        fn prop_one_entry_per_spec_with_type_and_value_only(
            pairs in prop::collection::vec(("[a-z_]{1,12}", "[ -~]{1,40}"), 1..8)
        ) {
            let specs: Vec<String> = pairs
                .iter()
                .map(|(rule_type, value)| format!("{rule_type}:{value}"))
                .collect();

            let parsed = parse_rule_specs(&specs).unwrap();
            let body = serde_json::to_value(build_update_request(parsed)).unwrap();
            let rules = body["rules"].as_array().unwrap();

            prop_assert_eq!(rules.len(), pairs.len());
            for (rule, (rule_type, value)) in rules.iter().zip(&pairs) {
                let fields = rule.as_object().unwrap();
                prop_assert_eq!(fields.len(), 2);
                prop_assert_eq!(fields["type"].as_str(), Some(rule_type.as_str()));
                prop_assert_eq!(fields["value"].as_str(), Some(value.as_str()));
            }
        }

        #[test]
        fn prop_specs_without_colon_are_rejected(spec in "[^:]{0,30}") {
            prop_assert!(matches!(
                spec.parse::<RuleSpec>(),
                Err(RuleSpecError::MissingSeparator(_))
            ));
        }
    }
}
