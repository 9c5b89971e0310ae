use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::operation::{ImportOperation, OperationId};
use super::result::{ImportResult, Outcome, RemotePageRef};

/// Caller-owned bookkeeping for one import run.
///
/// A session is threaded through every pass by the caller; nothing about it lives in
/// global state. Created pages accumulate across passes and are never attempted
/// again. The failed list only ever holds the failures of the most recent pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSession {
    pub id: Uuid,
    pub total_planned: usize,
    pub state: SessionState,
    /// Number of passes started so far.
    pub passes: u32,
    pub started_at: DateTime<Utc>,
    /// Operations created so far, in the order they succeeded.
    succeeded: Vec<ImportOperation>,
    created: HashMap<OperationId, RemotePageRef>,
    /// Failures of the last completed pass, in attempt order.
    failed: Vec<ImportResult>,
}

/// Where an import run stands.
///
/// - `Idle`: Planned, no pass started
/// - `Running`: A pass is in progress
/// - `Complete`: A pass finished with failures; the caller may start another
/// - `Done`: A pass finished with nothing left to create
/// - `Abandoned`: The caller declined further passes with failures outstanding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running,
    Complete,
    Done,
    Abandoned,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Done => "done",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Abandoned)
    }
}

impl ImportSession {
    pub fn new(total_planned: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            total_planned,
            state: SessionState::Idle,
            passes: 0,
            started_at: Utc::now(),
            succeeded: Vec::new(),
            created: HashMap::new(),
            failed: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> &[ImportOperation] {
        &self.succeeded
    }

    pub fn failed(&self) -> &[ImportResult] {
        &self.failed
    }

    /// Operations to feed into the next retry pass.
    pub fn retry_operations(&self) -> Vec<ImportOperation> {
        self.failed.iter().map(|r| r.operation.clone()).collect()
    }

    pub fn is_succeeded(&self, id: OperationId) -> bool {
        self.created.contains_key(&id)
    }

    /// The page created for an operation in any earlier pass.
    pub fn created_page(&self, id: OperationId) -> Option<&RemotePageRef> {
        self.created.get(&id)
    }

    /// True when the last pass left failures that an expired token could explain.
    pub fn needs_reauth(&self) -> bool {
        self.failed
            .iter()
            .filter_map(ImportResult::error)
            .any(|e| e.is_auth_expired())
    }

    pub(crate) fn begin_pass(&mut self) {
        self.passes += 1;
        self.state = SessionState::Running;
    }

    /// Fold a finished pass into the session.
    pub(crate) fn complete_pass(&mut self, results: Vec<ImportResult>) {
        self.failed.clear();
        for result in results {
            match result.outcome {
                Outcome::Succeeded(ref page) => {
                    if self
                        .created
                        .insert(result.operation.id, page.clone())
                        .is_none()
                    {
                        self.succeeded.push(result.operation);
                    }
                }
                Outcome::Failed(_) => self.failed.push(result),
            }
        }
        self.state = if self.failed.is_empty() {
            SessionState::Done
        } else {
            SessionState::Complete
        };
    }

    /// Stop retrying. The failed set stays available for the final report.
    pub fn abandon(&mut self) {
        if !self.state.is_terminal() {
            self.state = if self.failed.is_empty() {
                SessionState::Done
            } else {
                SessionState::Abandoned
            };
        }
    }
}
