//! Publishing orchestrator for the update workflow
//!
//! This module provides:
//! - Workflow coordination: parse → filter → pin gate → publish
//! - Partial continuation: one package's failure never stops the rest
//! - Dry-run mode support (gates only, no external commands)
//! - Error collection alongside the per-package summary

use crate::cli::CliArgs;
use crate::domain::{PublishOutcome, RunSummary, SkipReason, UpdateProposal};
use crate::error::{AppError, CommandError};
use crate::exec::{
    overwrite_reason, CommandResult, CommandRunner, CommandSpec, Executor, RunConfig, SystemRunner,
};
use crate::forge::ForgeClient;
use crate::parser::parse_updates;
use crate::pin;
use crate::progress::Progress;
use crate::vcs::GitWorkspace;

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Run summary with all per-package outcomes
    pub summary: RunSummary,
    /// Errors encountered during processing
    pub errors: Vec<AppError>,
}

/// Orchestrator coordinating the publish workflow
pub struct Orchestrator<R: CommandRunner> {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Executor for external commands
    exec: Executor<R>,
}

impl Orchestrator<SystemRunner> {
    /// Create an orchestrator running real commands per the CLI
    /// configuration
    pub fn new(args: CliArgs) -> Self {
        let config = RunConfig::new(&args.path)
            .with_dry_run(args.dry_run)
            .with_token(args.resolve_token());
        let runner = SystemRunner::new(config);
        Self::with_runner(args, runner)
    }
}

impl<R: CommandRunner> Orchestrator<R> {
    /// Create an orchestrator over an arbitrary runner (for testing)
    pub fn with_runner(args: CliArgs, runner: R) -> Self {
        Self {
            args,
            exec: Executor::new(runner),
        }
    }

    /// The underlying command runner
    pub fn runner(&self) -> &R {
        self.exec.runner()
    }

    /// Run the workflow over proposal text
    pub fn run(&self, proposals_text: &str) -> OrchestratorResult {
        let mut summary = RunSummary::new(self.args.dry_run);
        let mut errors = Vec::new();

        // Step 1: parse, keeping malformed lines as recorded errors
        let mut proposals = Vec::new();
        for parsed in parse_updates(proposals_text) {
            match parsed {
                Ok(proposal) => proposals.push(proposal),
                Err(e) => errors.push(AppError::Parse(e)),
            }
        }

        // Step 2: prepare the checkout; pointless in dry-run, fatal when
        // it fails otherwise
        let git = GitWorkspace::new(&self.exec, self.args.remote.clone(), self.args.base.clone());
        if !self.args.dry_run && !proposals.is_empty() {
            let prepared = git
                .ensure_workspace(self.args.clone_url.as_deref())
                .and_then(|_| git.prepare_base());
            if let Err(e) = prepared {
                errors.push(AppError::Command(e));
                return OrchestratorResult { summary, errors };
            }
        }

        // Step 3: gate and publish each proposal in input order
        let show_progress = !self.args.quiet && !self.args.json;
        let progress = Progress::start(show_progress, proposals.len() as u64);
        for proposal in proposals {
            progress.advance(&proposal.name);
            let outcome = self.process(&git, &proposal);
            if let PublishOutcome::Skipped {
                reason: SkipReason::PublishFailed(reason),
                proposal,
            } = &outcome
            {
                errors.push(AppError::Command(CommandError::failed(
                    format!("publish {}", proposal.name),
                    reason.clone(),
                )));
            }
            summary.add_outcome(outcome);
        }
        progress.clear();

        OrchestratorResult { summary, errors }
    }

    /// Gate one proposal and publish it when every gate passes
    fn process(&self, git: &GitWorkspace<'_, R>, proposal: &UpdateProposal) -> PublishOutcome {
        if let Some(reason) = self.filter_reason(&proposal.name) {
            return PublishOutcome::skip(proposal.clone(), reason);
        }

        if let Err(e) = pin::check_compatible(
            &proposal.name,
            &proposal.old_version,
            &proposal.new_version,
        ) {
            return PublishOutcome::skip(
                proposal.clone(),
                SkipReason::PinViolation(e.to_string()),
            );
        }

        if self.args.dry_run {
            // Gates only; no external command runs in dry-run mode.
            return PublishOutcome::published(proposal.clone(), None, None);
        }

        self.publish(git, proposal)
    }

    /// Package-filter decision mirroring --exclude / --only
    fn filter_reason(&self, name: &str) -> Option<SkipReason> {
        if self.args.should_process_package(name) {
            return None;
        }
        if !self.args.only.is_empty() {
            Some(SkipReason::NotInOnlyList)
        } else {
            Some(SkipReason::Excluded)
        }
    }

    /// Publish one gated proposal as a branch and pull request
    fn publish(&self, git: &GitWorkspace<'_, R>, proposal: &UpdateProposal) -> PublishOutcome {
        let branch = proposal.branch_name();

        // Probe success means a branch with this name is already on the
        // remote, so another update is in flight.
        if git.remote_branch_absent(&branch).is_err() {
            return PublishOutcome::skip(proposal.clone(), SkipReason::BranchInFlight);
        }

        let commit = match self.publish_steps(git, proposal, &branch) {
            Ok(commit) => commit,
            Err(reason) => {
                git.discard_branch(&branch);
                return PublishOutcome::skip(proposal.clone(), SkipReason::PublishFailed(reason));
            }
        };

        let forge = ForgeClient::new(&self.exec);
        let outcome = match forge.open_pull_request(proposal, &branch, &self.args.base) {
            Ok(pr_url) => PublishOutcome::published(proposal.clone(), Some(commit), pr_url),
            Err(reason) => PublishOutcome::skip(
                proposal.clone(),
                SkipReason::PublishFailed(format!("pull request creation failed: {}", reason)),
            ),
        };
        git.restore_base();
        outcome
    }

    /// Branch, apply, commit and push; returns the commit id
    fn publish_steps(
        &self,
        git: &GitWorkspace<'_, R>,
        proposal: &UpdateProposal,
        branch: &str,
    ) -> CommandResult<String> {
        git.switch_to(branch)?;
        self.apply_bump(proposal)?;
        git.commit_all(&proposal.title(), &proposal.name)?;
        let commit = git.head_commit();
        git.push(branch)?;
        Ok(commit)
    }

    /// Run the configured bump command, if any.
    ///
    /// Without an apply template the working tree is assumed to have been
    /// prepared by the caller.
    fn apply_bump(&self, proposal: &UpdateProposal) -> CommandResult<()> {
        let Some(ref template) = self.args.apply else {
            return Ok(());
        };
        let rendered = template
            .replace("{package}", &proposal.name)
            .replace("{old}", &proposal.old_version)
            .replace("{new}", &proposal.new_version);
        let mut parts = rendered.split_whitespace();
        let Some(program) = parts.next() else {
            return Err(String::from("empty apply command"));
        };
        let spec = CommandSpec::new(program).args(parts);
        overwrite_reason(format!("apply command failed for {}", proposal.name), || {
            self.exec.result_of(&spec).map(|_| ())
        })
    }
}
