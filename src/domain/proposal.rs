//! Update proposal records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix for the version-control branch each published update lives on
const BRANCH_PREFIX: &str = "auto-update/";

/// A proposed version bump for a single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProposal {
    /// Catalog entry name (attr path), e.g. `owncloud90`
    pub name: String,
    /// Version currently recorded in the catalog
    pub old_version: String,
    /// Version the proposal wants to move to
    pub new_version: String,
}

impl UpdateProposal {
    /// Creates a new UpdateProposal
    pub fn new(
        name: impl Into<String>,
        old_version: impl Into<String>,
        new_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            old_version: old_version.into(),
            new_version: new_version.into(),
        }
    }

    /// Branch the published update lives on.
    ///
    /// Plain concatenation; the entry name is not validated as a
    /// branch-name component here.
    pub fn branch_name(&self) -> String {
        format!("{}{}", BRANCH_PREFIX, self.name)
    }

    /// One-line title used for the commit message and the pull request
    pub fn title(&self) -> String {
        format!("{}: {} -> {}", self.name, self.old_version, self.new_version)
    }
}

impl fmt::Display for UpdateProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}
