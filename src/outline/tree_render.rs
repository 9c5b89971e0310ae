//! ASCII tree rendering for outline hierarchies.

use std::collections::HashSet;

use crate::models::OutlineNode;
use crate::naming::{resolve_title, NamingStrategy};

const SELECTED: char = '●';
const UNSELECTED: char = '○';

/// Render a course tree as ASCII art, with titles resolved through `strategy`.
///
/// Sections whose index is in `selected` are marked `●`, others `○`. Pass `None` to
/// mark every section as selected.
///
/// Example output:
/// ```text
/// Rust Fundamentals
/// ├── ● 1. Week 1
/// │   ├── 1.1. Ownership
/// │   └── 1.2. Borrowing
/// └── ○ 2. Week 2
///     └── 2.1. Traits
/// ```
pub fn render_tree(
    course: &OutlineNode,
    strategy: NamingStrategy,
    selected: Option<&HashSet<String>>,
) -> String {
    let mut output = String::new();
    output.push_str(&course.title);
    output.push('\n');

    let sections = course.sections();
    for (i, section) in sections.iter().enumerate() {
        let is_last = i == sections.len() - 1;
        let is_selected = selected.map_or(true, |s| s.contains(&section.index));
        render_section(&mut output, section, strategy, is_last, is_selected);
    }
    output
}

fn render_section(
    output: &mut String,
    section: &OutlineNode,
    strategy: NamingStrategy,
    is_last: bool,
    is_selected: bool,
) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(branch);
    output.push(if is_selected { SELECTED } else { UNSELECTED });
    output.push(' ');
    output.push_str(&resolve_title(section, strategy, None));
    output.push('\n');

    let child_prefix = if is_last { "    " } else { "│   " };
    for (i, lesson) in section.children.iter().enumerate() {
        let branch = if i == section.children.len() - 1 {
            "└── "
        } else {
            "├── "
        };
        output.push_str(child_prefix);
        output.push_str(branch);
        output.push_str(&resolve_title(lesson, strategy, Some(section)));
        output.push('\n');
    }
}
