//! Presentation of command results.

use chrono::{DateTime, FixedOffset};
use cloudctl_api::FirewallRule;
use cloudctl_config::OutputFormat;

use crate::error::{CliError, CliResult};
use crate::table;

/// Table columns for firewall rules, in display order.
pub const FIREWALL_RULE_COLUMNS: &[&str] = &["UUID", "ClusterUUID", "Type", "Value", "Created At"];

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS.ffffff ±HHMM ZONE`.
///
/// The timestamp stays in the offset the server sent. `ZONE` is `UTC` for a
/// zero offset; other offsets have no known zone name and repeat the offset.
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    let base = timestamp.format("%Y-%m-%d %H:%M:%S%.6f %z").to_string();
    if timestamp.offset().local_minus_utc() == 0 {
        format!("{base} UTC")
    } else {
        format!("{base} {}", timestamp.format("%z"))
    }
}

fn normalize_column(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// How results are written: format, selected columns and header visibility.
///
/// Built only through [`OutputOptions::select`] or [`OutputOptions::text`],
/// so every column index is valid for the columns it was resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    format: OutputFormat,
    columns: Vec<usize>,
    show_header: bool,
}

impl OutputOptions {
    /// Resolve `--format` column names against `available`.
    ///
    /// Names match case-insensitively, ignoring spaces and underscores, so
    /// `CreatedAt` and `created_at` both select `Created At`. The format is
    /// text until [`OutputOptions::with_format`] changes it.
    pub fn select(
        available: &[&str],
        requested: Option<&[String]>,
        no_header: bool,
    ) -> CliResult<Self> {
        let columns = match requested {
            None => (0..available.len()).collect(),
            Some(names) => names
                .iter()
                .map(|name| {
                    let wanted = normalize_column(name);
                    available
                        .iter()
                        .position(|column| normalize_column(column) == wanted)
                        .ok_or_else(|| {
                            CliError::validation(format!(
                                "unknown column '{}'; available columns: {}",
                                name.trim(),
                                available.join(", ")
                            ))
                        })
                })
                .collect::<CliResult<Vec<_>>>()?,
        };

        if columns.is_empty() {
            return Err(CliError::validation("--format selects no columns"));
        }

        Ok(Self {
            format: OutputFormat::Text,
            columns,
            show_header: !no_header,
        })
    }

    /// Default text table of all columns.
    pub fn text(available: &[&str]) -> Self {
        Self {
            format: OutputFormat::Text,
            columns: (0..available.len()).collect(),
            show_header: true,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Indices into the available columns, in display order.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn show_header(&self) -> bool {
        self.show_header
    }

    /// Render firewall rules in the selected format.
    pub fn render_firewall_rules(&self, rules: &[FirewallRule]) -> CliResult<String> {
        match self.format {
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(rules)?)),
            OutputFormat::Text => {
                let headers: Vec<&str> = self
                    .columns
                    .iter()
                    .filter_map(|&i| FIREWALL_RULE_COLUMNS.get(i).copied())
                    .collect();
                let rows: Vec<Vec<String>> = rules
                    .iter()
                    .map(|rule| {
                        let cells = firewall_rule_cells(rule);
                        self.columns
                            .iter()
                            .filter_map(|&i| cells.get(i).cloned())
                            .collect()
                    })
                    .collect();
                Ok(table::render_table(&headers, &rows, self.show_header))
            }
        }
    }
}

fn firewall_rule_cells(rule: &FirewallRule) -> [String; 5] {
    [
        rule.uuid.clone(),
        rule.cluster_uuid.clone(),
        rule.rule_type.clone(),
        rule.value.clone(),
        format_timestamp(&rule.created_at),
    ]
}
