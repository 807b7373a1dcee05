//! Run summary types
//!
//! Tracks per-package publish outcomes for one run of the agent.

use super::PublishOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall summary of one publishing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Per-package outcomes, in input order
    pub outcomes: Vec<PublishOutcome>,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl RunSummary {
    /// Creates a new RunSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            outcomes: Vec::new(),
            dry_run,
            started_at: Utc::now(),
        }
    }

    /// Creates a RunSummary with a fixed start time (for testing)
    pub fn with_start(dry_run: bool, started_at: DateTime<Utc>) -> Self {
        Self {
            outcomes: Vec::new(),
            dry_run,
            started_at,
        }
    }

    /// Adds an outcome
    pub fn add_outcome(&mut self, outcome: PublishOutcome) {
        self.outcomes.push(outcome);
    }

    /// Returns the number of published proposals
    pub fn published_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_published()).count()
    }

    /// Returns the number of skipped proposals
    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// Returns the total number of proposals processed
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns all published outcomes
    pub fn published(&self) -> impl Iterator<Item = &PublishOutcome> {
        self.outcomes.iter().filter(|o| o.is_published())
    }

    /// Returns all skipped outcomes
    pub fn skips(&self) -> impl Iterator<Item = &PublishOutcome> {
        self.outcomes.iter().filter(|o| o.is_skipped())
    }

    /// Returns true if anything was published
    pub fn has_published(&self) -> bool {
        self.published_count() > 0
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new(false)
    }
}
