//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-package publish lines with major/minor/patch change labels
//! - Skipped package display with reasons
//! - Summary with a change-type breakdown and an error section

use crate::domain::{PublishOutcome, RunSummary, SkipReason};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Semantic version change type, for display only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two versions
    pub fn from_versions(old: &str, new: &str) -> Self {
        let parse = |v: &str| -> Option<(u64, u64)> {
            let v = v.strip_prefix('v').unwrap_or(v);
            // Split by . and - to shed prerelease suffixes
            let mut parts = v.split(['.', '-']);
            let major = parts.next()?.parse().ok()?;
            let minor = match parts.next() {
                Some(p) => p.parse().ok()?,
                None => 0,
            };
            Some((major, minor))
        };

        match (parse(old), parse(new)) {
            (Some((old_major, old_minor)), Some((new_major, new_minor))) => {
                if new_major != old_major {
                    VersionChangeType::Major
                } else if new_minor != old_minor {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    /// Format a skip reason for display
    fn format_skip_reason(&self, reason: &SkipReason) -> String {
        match reason {
            SkipReason::Excluded => "excluded".to_string(),
            SkipReason::NotInOnlyList => "not in --only".to_string(),
            SkipReason::PinViolation(msg) => format!("pin violation: {}", msg),
            SkipReason::BranchInFlight => "branch in flight".to_string(),
            SkipReason::PublishFailed(msg) => format!("publish failed: {}", msg),
        }
    }

    /// Longest package name, for column alignment
    fn max_name_length(&self, outcomes: &[&PublishOutcome]) -> usize {
        outcomes
            .iter()
            .map(|o| o.package_name().len())
            .max()
            .unwrap_or(0)
    }

    /// Format one published line
    fn format_published_line(
        &self,
        outcome: &PublishOutcome,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let PublishOutcome::Published {
            proposal,
            commit,
            pr_url,
        } = outcome
        else {
            return Ok(());
        };

        let change_type =
            VersionChangeType::from_versions(&proposal.old_version, &proposal.new_version);
        let commit_display = if self.verbosity == Verbosity::Verbose {
            commit
                .as_ref()
                .map(|c| format!(" @{}", c))
                .unwrap_or_default()
        } else {
            String::new()
        };
        let url_display = pr_url
            .as_ref()
            .map(|url| format!(" ({})", url))
            .unwrap_or_default();

        if self.color {
            writeln!(
                writer,
                "  {:width$} {} {} {} [{}]{}{}",
                proposal.name,
                proposal.old_version.dimmed(),
                "→".dimmed(),
                proposal.new_version.bright_white().bold(),
                change_type.colored_label(),
                commit_display.dimmed(),
                url_display.dimmed(),
                width = max_name_len
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]{}{}",
                proposal.name,
                proposal.old_version,
                proposal.new_version,
                change_type.label(),
                commit_display,
                url_display,
                width = max_name_len
            )
        }
    }

    /// Format one skipped line
    fn format_skip_line(
        &self,
        outcome: &PublishOutcome,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let PublishOutcome::Skipped { proposal, reason } = outcome else {
            return Ok(());
        };

        let reason_str = self.format_skip_reason(reason);
        if self.color {
            // Pad before coloring; escape codes would skew the column.
            let name_display = format!("{:width$}", proposal.name, width = max_name_len);
            writeln!(
                writer,
                "  {} {}",
                name_display.dimmed(),
                format!("({})", reason_str).dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} ({})",
                proposal.name,
                reason_str,
                width = max_name_len
            )
        }
    }

    /// Count published outcomes by change type
    fn count_by_change_type(&self, summary: &RunSummary) -> (usize, usize, usize, usize) {
        let mut major = 0;
        let mut minor = 0;
        let mut patch = 0;
        let mut unknown = 0;

        for outcome in summary.published() {
            if let PublishOutcome::Published { proposal, .. } = outcome {
                match VersionChangeType::from_versions(
                    &proposal.old_version,
                    &proposal.new_version,
                ) {
                    VersionChangeType::Major => major += 1,
                    VersionChangeType::Minor => minor += 1,
                    VersionChangeType::Patch => patch += 1,
                    VersionChangeType::Unknown => unknown += 1,
                }
            }
        }

        (major, minor, patch, unknown)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show the summary line
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        let published: Vec<&PublishOutcome> = result.summary.published().collect();
        let skips: Vec<&PublishOutcome> = result.summary.skips().collect();

        if !published.is_empty() {
            let max_name_len = self.max_name_length(&published).max(20);
            for outcome in &published {
                self.format_published_line(outcome, max_name_len, writer)?;
            }
            writeln!(writer)?;
        }

        if !skips.is_empty() {
            if self.color {
                writeln!(writer, "  {}", "Skipped:".dimmed())?;
            } else {
                writeln!(writer, "  Skipped:")?;
            }
            let max_name_len = self.max_name_length(&skips).max(20);
            for outcome in &skips {
                self.format_skip_line(outcome, max_name_len, writer)?;
            }
            writeln!(writer)?;
        }

        // Format errors if any
        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &RunSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let published = summary.published_count();
        let skipped = summary.skipped_count();

        if self.verbosity == Verbosity::Quiet {
            if published > 0 {
                if self.color {
                    writeln!(
                        writer,
                        "{}{} published",
                        prefix,
                        published.to_string().green()
                    )?;
                } else {
                    writeln!(writer, "{}{} published", prefix, published)?;
                }
            } else if self.color {
                writeln!(writer, "{}{}", prefix, "Nothing published".dimmed())?;
            } else {
                writeln!(writer, "{}Nothing published", prefix)?;
            }
            return Ok(());
        }

        let (major, minor, patch, unknown) = self.count_by_change_type(summary);
        let mut parts = Vec::new();
        if major > 0 {
            parts.push(format!("{} major", major));
        }
        if minor > 0 {
            parts.push(format!("{} minor", minor));
        }
        if patch > 0 {
            parts.push(format!("{} patch", patch));
        }
        if unknown > 0 {
            parts.push(format!("{} other", unknown));
        }

        if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;
            if published > 0 {
                writeln!(
                    writer,
                    "  {} package(s) published ({})",
                    published.to_string().green(),
                    parts.join(", ")
                )?;
            } else {
                writeln!(writer, "  {}", "No packages published".dimmed())?;
            }
            if skipped > 0 {
                writeln!(
                    writer,
                    "  {} package(s) skipped",
                    skipped.to_string().dimmed()
                )?;
            }
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
            if published > 0 {
                writeln!(
                    writer,
                    "  {} package(s) published ({})",
                    published,
                    parts.join(", ")
                )?;
            } else {
                writeln!(writer, "  No packages published")?;
            }
            if skipped > 0 {
                writeln!(writer, "  {} package(s) skipped", skipped)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UpdateProposal;

    fn sample_result() -> OrchestratorResult {
        let mut summary = RunSummary::new(false);
        summary.add_outcome(PublishOutcome::published(
            UpdateProposal::new("libgit2_0_25", "0.25.1", "0.25.3"),
            Some("ab12cd3".to_string()),
            Some("https://example.org/catalog/pull/42".to_string()),
        ));
        summary.add_outcome(PublishOutcome::skip(
            UpdateProposal::new("owncloud90", "9.0.2", "9.1.3"),
            SkipReason::PinViolation("'owncloud90' pins a version that 9.1.3 does not match".to_string()),
        ));

        OrchestratorResult {
            summary,
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_version_change_type_major() {
        assert_eq!(
            VersionChangeType::from_versions("1.0.0", "2.0.0"),
            VersionChangeType::Major
        );
    }

    #[test]
    fn test_version_change_type_minor() {
        assert_eq!(
            VersionChangeType::from_versions("1.0.0", "1.1.0"),
            VersionChangeType::Minor
        );
    }

    #[test]
    fn test_version_change_type_patch() {
        assert_eq!(
            VersionChangeType::from_versions("1.0.0", "1.0.1"),
            VersionChangeType::Patch
        );
    }

    #[test]
    fn test_version_change_type_with_v_prefix() {
        assert_eq!(
            VersionChangeType::from_versions("v1.0.0", "v2.0.0"),
            VersionChangeType::Major
        );
    }

    #[test]
    fn test_version_change_type_unknown() {
        assert_eq!(
            VersionChangeType::from_versions("latest", "2.0.0"),
            VersionChangeType::Unknown
        );
    }

    #[test]
    fn test_version_change_type_short_versions() {
        assert_eq!(
            VersionChangeType::from_versions("1", "2"),
            VersionChangeType::Major
        );
    }

    #[test]
    fn test_format_normal() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let result = sample_result();
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        assert!(output_str.contains("libgit2_0_25"));
        assert!(output_str.contains("0.25.1 -> 0.25.3"));
        assert!(output_str.contains("[patch]"));
        assert!(output_str.contains("pull/42"));
        assert!(output_str.contains("Skipped:"));
        assert!(output_str.contains("owncloud90"));
        assert!(output_str.contains("pin violation"));
        assert!(output_str.contains("Summary:"));
        assert!(output_str.contains("1 package(s) published"));
    }

    #[test]
    fn test_format_quiet() {
        let formatter = TextFormatter::with_color(Verbosity::Quiet, false, false);
        let result = sample_result();
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        assert!(output_str.contains("1 published"));
        assert!(!output_str.contains("Summary:"));
    }

    #[test]
    fn test_format_verbose_shows_commit() {
        let formatter = TextFormatter::with_color(Verbosity::Verbose, false, false);
        let result = sample_result();
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        assert!(output_str.contains("@ab12cd3"));
    }

    #[test]
    fn test_format_normal_hides_commit() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let result = sample_result();
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        assert!(!output_str.contains("@ab12cd3"));
    }

    #[test]
    fn test_format_dry_run_prefix() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, true, false);
        let result = sample_result();
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        assert!(output_str.contains("(dry-run)"));
    }

    #[test]
    fn test_format_errors_section() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let mut result = sample_result();
        result.errors.push(crate::error::AppError::Parse(
            crate::error::ParseError::malformed_line("pkg 1.0"),
        ));
        let mut output = Vec::new();

        formatter.format(&result, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        assert!(output_str.contains("Errors:"));
        assert!(output_str.contains("Unable to parse update: pkg 1.0"));
    }

    #[test]
    fn test_format_summary_nothing_published() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let summary = RunSummary::new(false);
        let mut output = Vec::new();

        formatter.format_summary(&summary, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        assert!(output_str.contains("No packages published"));
    }

    #[test]
    fn test_format_quiet_nothing_published() {
        let formatter = TextFormatter::with_color(Verbosity::Quiet, false, false);
        let summary = RunSummary::new(false);
        let mut output = Vec::new();

        formatter.format_summary(&summary, &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();

        assert!(output_str.contains("Nothing published"));
    }

    #[test]
    fn test_count_by_change_type() {
        let formatter = TextFormatter::new(Verbosity::Normal, false);
        let mut summary = RunSummary::new(false);
        summary.add_outcome(PublishOutcome::published(
            UpdateProposal::new("a", "1.0.0", "2.0.0"),
            None,
            None,
        ));
        summary.add_outcome(PublishOutcome::published(
            UpdateProposal::new("b", "1.0.0", "1.1.0"),
            None,
            None,
        ));
        summary.add_outcome(PublishOutcome::published(
            UpdateProposal::new("c", "1.0.0", "1.0.1"),
            None,
            None,
        ));

        let (major, minor, patch, unknown) = formatter.count_by_change_type(&summary);
        assert_eq!(major, 1);
        assert_eq!(minor, 1);
        assert_eq!(patch, 1);
        assert_eq!(unknown, 0);
    }
}
