//! Caller-driven retry loop around import passes.
//!
//! The workflow never reads input itself. After every pass that leaves failures it
//! asks a [`RetryDecider`] what to do next, so the CLI can prompt on a terminal while
//! tests answer from a script.

use tracing::info;

use crate::auth::{AuthError, AuthProvider, Token};
use crate::executor::{ExecutorConfig, ImportExecutor};
use crate::graph::PageStore;
use crate::models::{ImportOperation, ImportSession};
use crate::progress::{self, ProgressReport};

/// What to do after a pass that left failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the failed operations with the current token.
    Retry,
    /// Sign in again interactively, then retry the failed operations.
    ReauthenticateAndRetry,
    /// Stop and report the remaining failures.
    Abandon,
}

/// Supplies retry decisions between passes.
pub trait RetryDecider {
    /// Called after each pass with failures. `suggest_reauth` is set when any failure
    /// was an expired token.
    fn decide(
        &mut self,
        report: &ProgressReport,
        session: &ImportSession,
        suggest_reauth: bool,
    ) -> RetryDecision;
}

impl<F> RetryDecider for F
where
    F: FnMut(&ProgressReport, &ImportSession, bool) -> RetryDecision,
{
    fn decide(
        &mut self,
        report: &ProgressReport,
        session: &ImportSession,
        suggest_reauth: bool,
    ) -> RetryDecision {
        self(report, session, suggest_reauth)
    }
}

/// Runs an import to a terminal state: done, or abandoned by the decider.
pub struct ImportWorkflow<'a, S: PageStore + ?Sized, A: AuthProvider + ?Sized> {
    executor: ImportExecutor<'a, S>,
    auth: &'a A,
}

impl<'a, S: PageStore + ?Sized, A: AuthProvider + ?Sized> ImportWorkflow<'a, S, A> {
    pub fn new(store: &'a S, auth: &'a A) -> Self {
        Self::with_config(store, auth, ExecutorConfig::default())
    }

    pub fn with_config(store: &'a S, auth: &'a A, config: ExecutorConfig) -> Self {
        Self {
            executor: ImportExecutor::with_config(store, config),
            auth,
        }
    }

    /// Run the first pass over `operations`, then retry failures for as long as the
    /// decider asks to.
    ///
    /// An [`AuthError`] stops the workflow. The session keeps everything recorded so
    /// far, so the caller can still report what was created and what failed.
    pub async fn run<D: RetryDecider + ?Sized>(
        &self,
        session: &mut ImportSession,
        operations: Vec<ImportOperation>,
        decider: &mut D,
    ) -> Result<ProgressReport, AuthError> {
        let mut token: Token = self.auth.get_token(false).await?;
        self.executor.run_pass(session, operations, &token).await;

        loop {
            let report = progress::report(session);
            if session.state.is_terminal() {
                return Ok(report);
            }

            match decider.decide(&report, session, session.needs_reauth()) {
                RetryDecision::Abandon => {
                    session.abandon();
                    info!("Import abandoned with {} failures", report.failed_this_pass);
                    return Ok(progress::report(session));
                }
                RetryDecision::Retry => {}
                RetryDecision::ReauthenticateAndRetry => {
                    token = self.auth.get_token(true).await?;
                }
            }

            self.executor.retry_failed(session, &token).await;
        }
    }
}
