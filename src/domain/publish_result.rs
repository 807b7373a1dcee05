//! Publish decision result types

use super::UpdateProposal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a proposal was not published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Package was excluded via --exclude flag
    Excluded,
    /// Package not in --only list
    NotInOnlyList,
    /// New version breaks the pin encoded in the entry name
    PinViolation(String),
    /// An update branch for this package already exists on the remote
    BranchInFlight,
    /// A publish step failed; carries the failure reason
    PublishFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Excluded => write!(f, "excluded by --exclude"),
            SkipReason::NotInOnlyList => write!(f, "not in --only list"),
            SkipReason::PinViolation(msg) => write!(f, "{}", msg),
            SkipReason::BranchInFlight => write!(f, "update branch already in flight"),
            SkipReason::PublishFailed(msg) => write!(f, "publish failed: {}", msg),
        }
    }
}

/// Result of the publish decision for a single proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// Proposal was published (or would be, in dry-run)
    Published {
        /// The proposal that was published
        proposal: UpdateProposal,
        /// Commit id on the update branch; absent in dry-run
        commit: Option<String>,
        /// Pull request URL when the forge CLI reported one
        pr_url: Option<String>,
    },
    /// Proposal was not published
    Skipped {
        /// The proposal that was skipped
        proposal: UpdateProposal,
        /// The reason for skipping
        reason: SkipReason,
    },
}

impl PublishOutcome {
    /// Creates a Published outcome
    pub fn published(
        proposal: UpdateProposal,
        commit: Option<String>,
        pr_url: Option<String>,
    ) -> Self {
        PublishOutcome::Published {
            proposal,
            commit,
            pr_url,
        }
    }

    /// Creates a Skipped outcome
    pub fn skip(proposal: UpdateProposal, reason: SkipReason) -> Self {
        PublishOutcome::Skipped { proposal, reason }
    }

    /// Returns true if this is a published outcome
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }

    /// Returns true if this is a skipped outcome
    pub fn is_skipped(&self) -> bool {
        matches!(self, PublishOutcome::Skipped { .. })
    }

    /// Returns the proposal reference
    pub fn proposal(&self) -> &UpdateProposal {
        match self {
            PublishOutcome::Published { proposal, .. } => proposal,
            PublishOutcome::Skipped { proposal, .. } => proposal,
        }
    }

    /// Returns the package name
    pub fn package_name(&self) -> &str {
        &self.proposal().name
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishOutcome::Published {
                proposal, pr_url, ..
            } => match pr_url {
                Some(url) => write!(f, "{}: published ({})", proposal.name, url),
                None => write!(f, "{}: published", proposal.name),
            },
            PublishOutcome::Skipped { proposal, reason } => {
                write!(f, "{}: skipped ({})", proposal.name, reason)
            }
        }
    }
}
