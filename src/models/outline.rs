use serde::{Deserialize, Serialize};

/// A node of a parsed course outline.
///
/// The tree is always three levels deep: one course owning sections, each section
/// owning lessons. `index` is the dotted label exactly as written in the source
/// (`"1"`, `"1.2"`); it is a label, never a sort key, so `children` keeps file order
/// even when the numbering does not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineNode {
    pub kind: NodeKind,
    pub title: String,
    /// Dotted numeric label. Empty for the course node.
    pub index: String,
    pub children: Vec<OutlineNode>,
}

/// The level of an outline node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Course,
    Section,
    Lesson,
}

impl OutlineNode {
    pub fn course(title: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Course,
            title: title.into(),
            index: String::new(),
            children: Vec::new(),
        }
    }

    pub fn section(index: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Section,
            title: title.into(),
            index: index.into(),
            children: Vec::new(),
        }
    }

    pub fn lesson(index: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Lesson,
            title: title.into(),
            index: index.into(),
            children: Vec::new(),
        }
    }

    /// Sections of a course node, in file order.
    pub fn sections(&self) -> &[OutlineNode] {
        match self.kind {
            NodeKind::Course => &self.children,
            _ => &[],
        }
    }

    /// Total number of lessons under this node.
    pub fn lesson_count(&self) -> usize {
        match self.kind {
            NodeKind::Lesson => 1,
            _ => self.children.iter().map(OutlineNode::lesson_count).sum(),
        }
    }

    /// Look up the node a [`NodePath`] points at, relative to a course node.
    pub fn resolve(&self, path: &NodePath) -> Option<&OutlineNode> {
        let section = self.sections().get(path.section)?;
        match path.lesson {
            Some(lesson) => section.children.get(lesson),
            None => Some(section),
        }
    }
}

/// Positional back-reference from an operation to the outline node it came from.
///
/// Positions rather than index labels, because labels may repeat in a sloppy file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodePath {
    pub section: usize,
    pub lesson: Option<usize>,
}

impl NodePath {
    pub fn section(section: usize) -> Self {
        Self {
            section,
            lesson: None,
        }
    }

    pub fn lesson(section: usize, lesson: usize) -> Self {
        Self {
            section,
            lesson: Some(lesson),
        }
    }
}
