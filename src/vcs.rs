//! Version-control operations for publishing update branches
//!
//! Builds the git invocations the workflow needs and interprets their
//! outcomes through the executor's combinators. Failures here are ordinary
//! values; only workspace preparation escalates, since nothing can proceed
//! without a usable checkout.

use crate::error::CommandError;
use crate::exec::{
    CommandOutput, CommandResult, CommandResultExt, CommandRunner, CommandSpec, Executor,
};

/// Git operations against the catalog checkout
pub struct GitWorkspace<'a, R: CommandRunner> {
    exec: &'a Executor<R>,
    remote: String,
    base_branch: String,
}

impl<'a, R: CommandRunner> GitWorkspace<'a, R> {
    /// Creates a workspace bound to a remote and base branch
    pub fn new(
        exec: &'a Executor<R>,
        remote: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self {
            exec,
            remote: remote.into(),
            base_branch: base_branch.into(),
        }
    }

    fn git<I, S>(args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("git").args(args)
    }

    /// Make sure the working directory holds a repository, cloning the
    /// catalog when a URL was provided for first-time setup.
    pub fn ensure_workspace(&self, clone_url: Option<&str>) -> Result<(), CommandError> {
        if self.exec.succeeded(&Self::git(["rev-parse", "--git-dir"])) {
            return Ok(());
        }
        let Some(url) = clone_url else {
            return Err(CommandError::failed(
                "git rev-parse --git-dir",
                "not a repository and no --clone-url given",
            ));
        };
        self.exec.run_checked(&Self::git(["clone", url, "."]))?;
        // The remote may already exist from an earlier partial setup.
        self.exec
            .tolerate(&Self::git(["remote", "add", "upstream", url]));
        Ok(())
    }

    /// Fetch the remote and return to the base branch. Fetching is
    /// tolerated so offline runs still work against local refs; checking
    /// out the base branch is not.
    pub fn prepare_base(&self) -> Result<(), CommandError> {
        self.exec.tolerate(&Self::git(["fetch", self.remote.as_str()]));
        self.exec
            .run_checked(&Self::git(["checkout", self.base_branch.as_str()]))?;
        Ok(())
    }

    /// Probe the remote for an existing update branch.
    ///
    /// The probe is expected to fail when no branch exists; unexpected
    /// success (an empty failure reason) therefore means a branch is
    /// already there.
    pub fn remote_branch_absent(&self, branch: &str) -> CommandResult<String> {
        self.exec.expect_failure(&Self::git([
            "ls-remote",
            "--exit-code",
            "--heads",
            self.remote.as_str(),
            branch,
        ]))
    }

    /// Switch to the update branch, creating it when it does not exist yet
    /// and reusing it when a previous run left it behind.
    pub fn switch_to(&self, branch: &str) -> CommandResult<CommandOutput> {
        self.exec.with_fallback(
            &Self::git(["checkout", "-b", branch]),
            &Self::git(["checkout", branch]),
        )
    }

    /// Commit all tracked changes under `message`.
    pub fn commit_all(&self, message: &str, package: &str) -> CommandResult<CommandOutput> {
        self.exec
            .result_of(&Self::git(["commit", "-am", message]))
            .with_reason(format!("no changes to commit for {}", package))
    }

    /// Current commit id, for the run report.
    pub fn head_commit(&self) -> String {
        self.exec
            .result_of(&Self::git(["rev-parse", "--short", "HEAD"]))
            .map(|output| output.stdout.trim().to_string())
            .recover(|_| String::from("unknown"))
    }

    /// Push the update branch to the remote.
    pub fn push(&self, branch: &str) -> CommandResult<CommandOutput> {
        self.exec.result_of(&Self::git([
            "push",
            "--set-upstream",
            self.remote.as_str(),
            branch,
        ]))
    }

    /// Return to the base branch, ignoring failures; used for cleanup.
    pub fn restore_base(&self) {
        self.exec
            .tolerate(&Self::git(["checkout", self.base_branch.as_str()]));
    }

    /// Drop a local update branch after a failed publish.
    pub fn discard_branch(&self, branch: &str) {
        self.restore_base();
        self.exec.tolerate(&Self::git(["branch", "-D", branch]));
    }
}
