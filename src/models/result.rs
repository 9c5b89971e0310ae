use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::operation::ImportOperation;

/// A page that exists on the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemotePageRef {
    pub id: String,
    pub title: String,
    /// Browser link to the page, when the store reports one.
    pub web_url: Option<String>,
}

/// Why a single operation failed.
///
/// Every variant lands in the same failed bucket and is retryable; the variant only
/// matters for diagnostics and for suggesting re-authentication.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ItemError {
    /// The bearer token was refused. Re-authenticate before the next pass.
    #[error("Authentication expired: {0}")]
    AuthExpired(String),

    /// The store rejected the request (bad parent, title constraint, missing section).
    #[error("Rejected by remote: {0}")]
    RemoteRejected(String),

    /// Network-level failure or a server-side error worth trying again.
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Not attempted because the parent section page does not exist.
    #[error("Skipped: {0}")]
    ParentMissing(String),
}

impl ItemError {
    pub fn detail(&self) -> &str {
        match self {
            Self::AuthExpired(d)
            | Self::RemoteRejected(d)
            | Self::Transient(d)
            | Self::ParentMissing(d) => d,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthExpired(_) => "auth_expired",
            Self::RemoteRejected(_) => "remote_rejected",
            Self::Transient(_) => "transient",
            Self::ParentMissing(_) => "parent_missing",
        }
    }
}

/// Outcome of one attempt. A remote reference exists iff the attempt succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded(RemotePageRef),
    Failed(ItemError),
}

/// The result of attempting one operation during one pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportResult {
    pub operation: ImportOperation,
    pub outcome: Outcome,
}

impl ImportResult {
    pub fn succeeded(operation: ImportOperation, page: RemotePageRef) -> Self {
        Self {
            operation,
            outcome: Outcome::Succeeded(page),
        }
    }

    pub fn failed(operation: ImportOperation, error: ItemError) -> Self {
        Self {
            operation,
            outcome: Outcome::Failed(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded(_))
    }

    pub fn remote_id(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Succeeded(page) => Some(&page.id),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ItemError> {
        match &self.outcome {
            Outcome::Succeeded(_) => None,
            Outcome::Failed(e) => Some(e),
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error().map(ItemError::detail)
    }
}
