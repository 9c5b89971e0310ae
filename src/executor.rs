//! Import passes: run an operation list against a [`PageStore`] one item at a time.
//!
//! A pass never aborts early. Each operation yields exactly one [`ImportResult`], and
//! the results are folded into the caller's [`ImportSession`] when the pass ends.
//! Operations the session already created are never submitted again.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::auth::Token;
use crate::graph::PageStore;
use crate::models::{
    ImportOperation, ImportResult, ImportSession, ItemError, OperationId, RemotePageRef,
};

/// Tuning for how passes hit the remote store.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Delay between consecutive remote calls. Zero disables pacing.
    pub pace: Duration,
}

/// Runs import passes against one page store.
pub struct ImportExecutor<'a, S: PageStore + ?Sized> {
    store: &'a S,
    config: ExecutorConfig,
}

/// Counts for one finished pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub pass: u32,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl<'a, S: PageStore + ?Sized> ImportExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_config(store, ExecutorConfig::default())
    }

    pub fn with_config(store: &'a S, config: ExecutorConfig) -> Self {
        Self { store, config }
    }

    /// Run one pass over `operations` with `token`, then fold the results into `session`.
    ///
    /// Lessons resolve their parent page from this pass first, then from earlier passes.
    /// A lesson whose parent failed in this pass, or was never created, fails without
    /// a remote call.
    pub async fn run_pass(
        &self,
        session: &mut ImportSession,
        operations: Vec<ImportOperation>,
        token: &Token,
    ) -> PassSummary {
        session.begin_pass();
        let pass = session.passes;
        info!("Starting pass {} with {} operations", pass, operations.len());

        let mut created: HashMap<OperationId, RemotePageRef> = HashMap::new();
        let mut failed: HashSet<OperationId> = HashSet::new();
        let mut results = Vec::with_capacity(operations.len());
        let mut remote_calls = 0usize;

        for operation in operations {
            if session.is_succeeded(operation.id) {
                debug!("Skipping '{}': already created", operation.title);
                continue;
            }

            let parent = match operation.parent {
                None => Ok(None),
                Some(parent_id) if failed.contains(&parent_id) => Err(ItemError::ParentMissing(
                    "parent section failed in this pass".to_string(),
                )),
                Some(parent_id) => match created
                    .get(&parent_id)
                    .or_else(|| session.created_page(parent_id))
                {
                    Some(page) => Ok(Some(page.clone())),
                    None => Err(ItemError::ParentMissing(
                        "parent section has not been created".to_string(),
                    )),
                },
            };

            let outcome = match parent {
                Err(e) => Err(e),
                Ok(parent) => {
                    if remote_calls > 0 && !self.config.pace.is_zero() {
                        tokio::time::sleep(self.config.pace).await;
                    }
                    remote_calls += 1;
                    self.store
                        .create_page(
                            token,
                            parent.as_ref(),
                            &operation.title,
                            &operation.content,
                        )
                        .await
                }
            };

            let result = match outcome {
                Ok(page) => {
                    debug!("Created '{}' as {}", operation.title, page.id);
                    created.insert(operation.id, page.clone());
                    ImportResult::succeeded(operation, page)
                }
                Err(e) => {
                    warn!("Failed to create '{}': {}", operation.title, e);
                    failed.insert(operation.id);
                    ImportResult::failed(operation, e)
                }
            };
            results.push(result);
        }

        let summary = PassSummary {
            pass,
            attempted: results.len(),
            succeeded: results.iter().filter(|r| r.is_success()).count(),
            failed: results.iter().filter(|r| !r.is_success()).count(),
        };
        session.complete_pass(results);

        info!(
            "Pass {} complete: {} created, {} failed",
            pass, summary.succeeded, summary.failed
        );
        summary
    }

    /// Run a retry pass over the failures of the previous pass.
    pub async fn retry_failed(&self, session: &mut ImportSession, token: &Token) -> PassSummary {
        let operations = session.retry_operations();
        self.run_pass(session, operations, token).await
    }
}
