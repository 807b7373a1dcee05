//! Forge CLI integration for opening pull requests
//!
//! The forge is driven through its command-line client; this module only
//! builds the invocation and reads the URL back out of the captured
//! output.

use crate::domain::UpdateProposal;
use crate::exec::{CommandResult, CommandRunner, CommandSpec, Executor};
use regex::Regex;

/// Pattern the forge CLI prints for a created pull request
const PR_URL_PATTERN: &str = r"https://\S+/pull/\d+";

/// Pull-request operations through the forge CLI
pub struct ForgeClient<'a, R: CommandRunner> {
    exec: &'a Executor<R>,
}

impl<'a, R: CommandRunner> ForgeClient<'a, R> {
    /// Creates a client over the given executor
    pub fn new(exec: &'a Executor<R>) -> Self {
        Self { exec }
    }

    /// Open a pull request for a pushed update branch, returning the URL
    /// when the CLI reports one.
    pub fn open_pull_request(
        &self,
        proposal: &UpdateProposal,
        branch: &str,
        base: &str,
    ) -> CommandResult<Option<String>> {
        let title = proposal.title();
        let body = format!(
            "Automated update of {} from {} to {}.",
            proposal.name, proposal.old_version, proposal.new_version
        );
        let spec = CommandSpec::new("gh").args([
            "pr",
            "create",
            "--head",
            branch,
            "--base",
            base,
            "--title",
            title.as_str(),
            "--body",
            body.as_str(),
        ]);
        let output = self.exec.result_of(&spec)?;
        Ok(extract_pr_url(&output.stdout))
    }
}

/// Find the pull-request URL in CLI output.
fn extract_pr_url(stdout: &str) -> Option<String> {
    let pattern = Regex::new(PR_URL_PATTERN).expect("Invalid URL pattern");
    pattern.find(stdout).map(|m| m.as_str().to_string())
}
