//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of publish results
//! - Structured published/skipped package records

use crate::domain::{PublishOutcome, RunSummary, SkipReason};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    /// Whether this was a dry-run
    dry_run: bool,
    /// When the run started, RFC 3339
    started_at: String,
    /// Summary statistics
    summary: JsonSummary,
    /// Published packages
    published: Vec<JsonPublished>,
    /// Skipped packages
    skipped: Vec<JsonSkipped>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Number of published packages
    published: usize,
    /// Number of skipped packages
    skipped: usize,
}

/// JSON representation of a published package
#[derive(Serialize)]
struct JsonPublished {
    /// Package name
    name: String,
    /// Old version
    from: String,
    /// New version
    to: String,
    /// Branch the update was pushed to
    branch: String,
    /// Commit id, absent in dry-run
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<String>,
    /// Pull request URL when the forge reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pull_request: Option<String>,
}

/// JSON representation of a skipped package
#[derive(Serialize)]
struct JsonSkipped {
    /// Package name
    name: String,
    /// Old version
    from: String,
    /// New version
    to: String,
    /// Skip reason
    reason: String,
}

impl JsonFormatter {
    /// Convert a skip reason to a stable string
    fn skip_reason_to_string(reason: &SkipReason) -> String {
        match reason {
            SkipReason::Excluded => "excluded".to_string(),
            SkipReason::NotInOnlyList => "not_in_only_list".to_string(),
            SkipReason::PinViolation(msg) => format!("pin_violation: {}", msg),
            SkipReason::BranchInFlight => "branch_in_flight".to_string(),
            SkipReason::PublishFailed(msg) => format!("publish_failed: {}", msg),
        }
    }

    /// Convert a summary to the serializable shape
    fn to_json_output(&self, result: &OrchestratorResult) -> JsonOutput {
        let summary = &result.summary;

        let published: Vec<JsonPublished> = summary
            .published()
            .filter_map(|outcome| {
                if let PublishOutcome::Published {
                    proposal,
                    commit,
                    pr_url,
                } = outcome
                {
                    Some(JsonPublished {
                        name: proposal.name.clone(),
                        from: proposal.old_version.clone(),
                        to: proposal.new_version.clone(),
                        branch: proposal.branch_name(),
                        commit: commit.clone(),
                        pull_request: pr_url.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();

        let skipped: Vec<JsonSkipped> = summary
            .skips()
            .filter_map(|outcome| {
                if let PublishOutcome::Skipped { proposal, reason } = outcome {
                    Some(JsonSkipped {
                        name: proposal.name.clone(),
                        from: proposal.old_version.clone(),
                        to: proposal.new_version.clone(),
                        reason: Self::skip_reason_to_string(reason),
                    })
                } else {
                    None
                }
            })
            .collect();

        JsonOutput {
            dry_run: summary.dry_run,
            started_at: summary.started_at.to_rfc3339(),
            summary: JsonSummary {
                published: summary.published_count(),
                skipped: summary.skipped_count(),
            },
            published,
            skipped,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = self.to_json_output(result);
        let json = if self.verbosity == Verbosity::Quiet {
            serde_json::to_string(&output)?
        } else {
            serde_json::to_string_pretty(&output)?
        };
        writeln!(writer, "{}", json)
    }

    fn format_summary(
        &self,
        summary: &RunSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let json_summary = JsonSummary {
            published: summary.published_count(),
            skipped: summary.skipped_count(),
        };
        writeln!(writer, "{}", serde_json::to_string(&json_summary)?)
    }
}
