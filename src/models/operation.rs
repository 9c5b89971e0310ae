use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::outline::NodePath;

/// Identity of a planned operation. Session bookkeeping is keyed by this, never by title.
pub type OperationId = Uuid;

/// One planned page creation.
///
/// Operations are produced once per planning run and never mutated afterwards, so a
/// retry pass resubmits exactly the same title and parent link as the first attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportOperation {
    pub id: OperationId,
    pub kind: OperationKind,
    /// Display title, already resolved through the naming strategy.
    pub title: String,
    /// Body text placed under the page heading.
    pub content: String,
    /// The section operation whose page this lesson is created under. `None` for sections.
    pub parent: Option<OperationId>,
    /// Where the operation came from in the outline tree. `None` for free-standing pages.
    pub source: Option<NodePath>,
}

/// What an operation creates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Section,
    Lesson,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Lesson => "lesson",
        }
    }
}

impl ImportOperation {
    pub fn section(title: impl Into<String>, content: impl Into<String>, source: NodePath) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: OperationKind::Section,
            title: title.into(),
            content: content.into(),
            parent: None,
            source: Some(source),
        }
    }

    /// A top-level page with no outline behind it.
    pub fn page(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: OperationKind::Section,
            title: title.into(),
            content: content.into(),
            parent: None,
            source: None,
        }
    }

    pub fn lesson(
        parent: OperationId,
        title: impl Into<String>,
        content: impl Into<String>,
        source: NodePath,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: OperationKind::Lesson,
            title: title.into(),
            content: content.into(),
            parent: Some(parent),
            source: Some(source),
        }
    }
}
