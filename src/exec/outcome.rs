//! Command outcome values and reason-rewriting combinators
//!
//! Failures of tolerated commands travel as plain `Err(reason)` values,
//! mirroring how the rest of the crate reports recoverable conditions.
//! Nothing in this layer panics or aborts; escalation is the caller's
//! decision.

/// Outcome of running a tolerated command: the success value, or a textual
/// failure reason derived from the exit code or captured stderr.
pub type CommandResult<T> = Result<T, String>;

/// Reason-rewriting helpers for `CommandResult`
pub trait CommandResultExt<T> {
    /// Replace any failure reason with `reason`; success values pass
    /// through unchanged.
    fn with_reason(self, reason: impl Into<String>) -> CommandResult<T>;

    /// Resolve the result, computing a substitute value from the failure
    /// reason.
    fn recover(self, on_failure: impl FnOnce(&str) -> T) -> T;
}

impl<T> CommandResultExt<T> for CommandResult<T> {
    fn with_reason(self, reason: impl Into<String>) -> CommandResult<T> {
        self.map_err(|_| reason.into())
    }

    fn recover(self, on_failure: impl FnOnce(&str) -> T) -> T {
        match self {
            Ok(value) => value,
            Err(reason) => on_failure(&reason),
        }
    }
}

/// Run `op` and replace any failure reason with `reason`.
pub fn overwrite_reason<T>(
    reason: impl Into<String>,
    op: impl FnOnce() -> CommandResult<T>,
) -> CommandResult<T> {
    op().with_reason(reason)
}
