//! Batch import planning: turn a selected part of the course tree into an ordered
//! list of page creations.

use std::fmt;

use tracing::{debug, warn};

use crate::models::{ImportOperation, NodePath, OutlineNode};
use crate::naming::{resolve_title, NamingStrategy};

/// A requested section index that does not exist in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionWarning {
    pub index: String,
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Section {} not found in outline, skipped", self.index)
    }
}

/// Planned operations plus anything worth warning the user about.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub operations: Vec<ImportOperation>,
    pub warnings: Vec<SelectionWarning>,
}

impl ImportPlan {
    pub fn titles(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.title.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Plan the import of `course`.
///
/// `selection` holds section index labels; an empty selection means every section.
/// Sections come out in file order, each immediately followed by its own lessons in
/// file order, so a section's operation always precedes its lessons. Unknown indices
/// become warnings and planning continues with the rest.
pub fn plan_import(
    course: &OutlineNode,
    selection: &[String],
    strategy: NamingStrategy,
) -> ImportPlan {
    let sections = course.sections();

    let mut warnings = Vec::new();
    for index in selection {
        if !sections.iter().any(|s| &s.index == index)
            && !warnings.iter().any(|w: &SelectionWarning| &w.index == index)
        {
            warn!("Selected section {} is not in the outline", index);
            warnings.push(SelectionWarning {
                index: index.clone(),
            });
        }
    }

    let mut operations = Vec::new();
    for (s, section) in sections.iter().enumerate() {
        if !selection.is_empty() && !selection.contains(&section.index) {
            continue;
        }

        let section_op = ImportOperation::section(
            resolve_title(section, strategy, None),
            course.title.clone(),
            NodePath::section(s),
        );
        let section_id = section_op.id;
        operations.push(section_op);

        for (l, lesson) in section.children.iter().enumerate() {
            operations.push(ImportOperation::lesson(
                section_id,
                resolve_title(lesson, strategy, Some(section)),
                course.title.clone(),
                NodePath::lesson(s, l),
            ));
        }
    }

    debug!(
        "Planned {} operations with {} naming",
        operations.len(),
        strategy
    );

    ImportPlan {
        operations,
        warnings,
    }
}

/// Plan a flat batch of top-level pages, one per non-blank title, in input order.
pub fn plan_pages(titles: &[String], content: &str) -> ImportPlan {
    let operations: Vec<ImportOperation> = titles
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| ImportOperation::page(t, content))
        .collect();

    debug!("Planned {} free-standing pages", operations.len());

    ImportPlan {
        operations,
        warnings: Vec::new(),
    }
}

/// Split a comma or whitespace separated list of section indices.
pub fn parse_selection(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|s| s.trim().trim_end_matches('.'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
