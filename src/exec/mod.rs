//! External command execution
//!
//! This module provides:
//! - Command specifications and captured output values
//! - A `CommandRunner` trait seam over process spawning
//! - The system runner used in production, applying the run configuration
//!   (working directory, credential injection, pager suppression)
//! - An `Executor` with combinators that treat non-zero exits as ordinary
//!   data instead of aborting the workflow
//!
//! Everything here is synchronous: a run blocks the calling thread until
//! the child exits, and no two commands ever run at once.

mod outcome;

pub use outcome::{overwrite_reason, CommandResult, CommandResultExt};

use crate::error::CommandError;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Exit code reported when a command cannot be spawned at all
const SPAWN_FAILURE_CODE: i32 = 127;

/// Configuration threaded to every command run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Skip all mutating external commands
    pub dry_run: bool,
    /// Directory the commands run in (the catalog checkout)
    pub working_dir: PathBuf,
    /// Forge credential, injected per command as GH_TOKEN
    pub token: Option<String>,
}

impl RunConfig {
    /// Creates a config rooted at `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            dry_run: false,
            working_dir: working_dir.into(),
            token: None,
        }
    }

    /// Sets the dry-run flag
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the forge credential
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

/// Specification of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Creates a spec for `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program to run
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments, in order
    pub fn arg_list(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of one command run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; spawn failures surface as 127 with the error on stderr
    pub code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Creates an output value (used by runners and tests)
    pub fn new(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// True when the command exited 0
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Seam over process spawning, so the workflow can run against a scripted
/// double in tests.
pub trait CommandRunner {
    /// Run the command to completion, capturing exit code and both streams.
    fn run(&self, spec: &CommandSpec) -> CommandOutput;
}

/// Runner that spawns real processes with the run configuration applied
#[derive(Debug)]
pub struct SystemRunner {
    config: RunConfig,
}

impl SystemRunner {
    /// Creates a runner for the given configuration
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> CommandOutput {
        let mut command = Command::new(spec.program());
        command
            .args(spec.arg_list())
            .current_dir(&self.config.working_dir)
            // An interactive pager or credential prompt would hang an
            // unattended run.
            .env("GIT_PAGER", "cat")
            .env("PAGER", "cat")
            .env("GIT_TERMINAL_PROMPT", "0");
        if let Some(ref token) = self.config.token {
            command.env("GH_TOKEN", token);
        }

        match command.output() {
            Ok(output) => CommandOutput::new(
                // Termination by signal carries no code.
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stdout).to_string(),
                String::from_utf8_lossy(&output.stderr).to_string(),
            ),
            Err(e) => CommandOutput::new(
                SPAWN_FAILURE_CODE,
                String::new(),
                format!("failed to execute {}: {}", spec.program(), e),
            ),
        }
    }
}

/// Combinators over a command runner.
///
/// Every run here tolerates failure: a non-zero exit is data to inspect,
/// never an abort. The combinators hold no state of their own; each call
/// observes exactly the run it started.
pub struct Executor<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Executor<R> {
    /// Creates an executor over `runner`
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// The underlying runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `spec`, treating a non-zero exit as ordinary data.
    pub fn tolerate(&self, spec: &CommandSpec) -> CommandOutput {
        self.runner.run(spec)
    }

    /// Run `spec`; exit 0 yields the captured output, anything else a
    /// reason of the form `Exit code: N`.
    pub fn result_of(&self, spec: &CommandSpec) -> CommandResult<CommandOutput> {
        let output = self.tolerate(spec);
        if output.success() {
            Ok(output)
        } else {
            Err(format!("Exit code: {}", output.code))
        }
    }

    /// Run a command that should fail. Its captured stderr is the success
    /// value; an exit of 0 is reported as a failure with an empty reason,
    /// so callers can tell unexpected success (empty reason) apart from
    /// runs that produced diagnostics (populated reason).
    pub fn expect_failure(&self, spec: &CommandSpec) -> CommandResult<String> {
        let output = self.tolerate(spec);
        if output.success() {
            Err(String::new())
        } else {
            Ok(output.stderr)
        }
    }

    /// Run `primary`; only when it exits non-zero, run `fallback` and
    /// return its result. The fallback never runs otherwise, and the two
    /// never run concurrently.
    pub fn with_fallback(
        &self,
        primary: &CommandSpec,
        fallback: &CommandSpec,
    ) -> CommandResult<CommandOutput> {
        let output = self.tolerate(primary);
        if output.success() {
            Ok(output)
        } else {
            self.result_of(fallback)
        }
    }

    /// Run `spec` and report only whether it exited 0.
    pub fn succeeded(&self, spec: &CommandSpec) -> bool {
        self.tolerate(spec).success()
    }

    /// Run `spec`, escalating failure to a `CommandError` for steps the
    /// workflow cannot continue without.
    pub fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.result_of(spec)
            .map_err(|reason| CommandError::failed(spec.to_string(), reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Runner that replays scripted outputs and records every call
    struct ScriptedRunner {
        responses: RefCell<VecDeque<CommandOutput>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(responses: Vec<CommandOutput>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, spec: &CommandSpec) -> CommandOutput {
            self.calls.borrow_mut().push(spec.to_string());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| CommandOutput::new(0, "", ""))
        }
    }

    fn ok_output() -> CommandOutput {
        CommandOutput::new(0, "done", "")
    }

    fn failed_output(code: i32) -> CommandOutput {
        CommandOutput::new(code, "", "boom")
    }

    #[test]
    fn test_command_spec_display() {
        let spec = CommandSpec::new("git").args(["checkout", "-b", "auto-update/pkg"]);
        assert_eq!(format!("{}", spec), "git checkout -b auto-update/pkg");
    }

    #[test]
    fn test_command_spec_arg_accumulation() {
        let spec = CommandSpec::new("git").arg("fetch").arg("origin");
        assert_eq!(spec.program(), "git");
        assert_eq!(spec.arg_list(), ["fetch", "origin"]);
    }

    #[test]
    fn test_tolerate_returns_failure_as_data() {
        let exec = Executor::new(ScriptedRunner::new(vec![failed_output(1)]));
        let output = exec.tolerate(&CommandSpec::new("git"));
        assert_eq!(output.code, 1);
        assert_eq!(output.stderr, "boom");
    }

    #[test]
    fn test_result_of_success() {
        let exec = Executor::new(ScriptedRunner::new(vec![ok_output()]));
        let result = exec.result_of(&CommandSpec::new("git"));
        assert_eq!(result.unwrap().stdout, "done");
    }

    #[test]
    fn test_result_of_failure_reason() {
        let exec = Executor::new(ScriptedRunner::new(vec![failed_output(7)]));
        let result = exec.result_of(&CommandSpec::new("git"));
        assert_eq!(result, Err("Exit code: 7".to_string()));
    }

    #[test]
    fn test_expect_failure_yields_stderr_on_failure() {
        let exec = Executor::new(ScriptedRunner::new(vec![failed_output(2)]));
        let result = exec.expect_failure(&CommandSpec::new("git"));
        assert_eq!(result, Ok("boom".to_string()));
    }

    #[test]
    fn test_expect_failure_reports_unexpected_success_with_empty_reason() {
        let exec = Executor::new(ScriptedRunner::new(vec![ok_output()]));
        let result = exec.expect_failure(&CommandSpec::new("git"));
        assert_eq!(result, Err(String::new()));
    }

    #[test]
    fn test_with_fallback_skips_fallback_on_success() {
        let runner = ScriptedRunner::new(vec![ok_output()]);
        let exec = Executor::new(runner);
        let result = exec.with_fallback(
            &CommandSpec::new("primary"),
            &CommandSpec::new("fallback"),
        );
        assert!(result.is_ok());
        assert_eq!(exec.runner().call_count(), 1);
        assert_eq!(exec.runner().calls(), ["primary"]);
    }

    #[test]
    fn test_with_fallback_runs_fallback_after_failure() {
        let runner = ScriptedRunner::new(vec![failed_output(1), ok_output()]);
        let exec = Executor::new(runner);
        let result = exec.with_fallback(
            &CommandSpec::new("primary"),
            &CommandSpec::new("fallback"),
        );
        assert_eq!(result.unwrap().stdout, "done");
        assert_eq!(exec.runner().calls(), ["primary", "fallback"]);
    }

    #[test]
    fn test_with_fallback_returns_fallback_failure_verbatim() {
        let runner = ScriptedRunner::new(vec![failed_output(1), failed_output(3)]);
        let exec = Executor::new(runner);
        let result = exec.with_fallback(
            &CommandSpec::new("primary"),
            &CommandSpec::new("fallback"),
        );
        assert_eq!(result, Err("Exit code: 3".to_string()));
    }

    #[test]
    fn test_succeeded() {
        let exec = Executor::new(ScriptedRunner::new(vec![ok_output(), failed_output(1)]));
        assert!(exec.succeeded(&CommandSpec::new("git")));
        assert!(!exec.succeeded(&CommandSpec::new("git")));
    }

    #[test]
    fn test_run_checked_wraps_failure() {
        let exec = Executor::new(ScriptedRunner::new(vec![failed_output(128)]));
        let err = exec
            .run_checked(&CommandSpec::new("git").arg("fetch"))
            .unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("git fetch"));
        assert!(msg.contains("Exit code: 128"));
    }

    #[test]
    fn test_run_config_builders() {
        let config = RunConfig::new("/tmp/catalog")
            .with_dry_run(true)
            .with_token(Some("secret".to_string()));
        assert!(config.dry_run);
        assert_eq!(config.working_dir, PathBuf::from("/tmp/catalog"));
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_system_runner_spawn_failure_is_data() {
        let config = RunConfig::new(".");
        let runner = SystemRunner::new(config);
        let output = runner.run(&CommandSpec::new("definitely-not-a-real-binary-3141"));
        assert_eq!(output.code, SPAWN_FAILURE_CODE);
        assert!(output.stderr.contains("failed to execute"));
    }
}
