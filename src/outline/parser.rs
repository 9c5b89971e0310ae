use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::OutlineNode;

static COURSE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*COURSE:\s*(.+)$").expect("valid course pattern"));
static SECTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.+)$").expect("valid section pattern"));
static LESSON_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+(\d+)\.(\d+)\.\s+(.+)$").expect("valid lesson pattern"));

/// Errors that abort parsing of a whole outline file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Outline has no 'COURSE:' title line")]
    NoCourseTitle,
}

/// Classification of a single outline line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    CourseTitle(&'a str),
    SectionHeader {
        index: &'a str,
        title: &'a str,
    },
    LessonHeader {
        section_index: &'a str,
        number: &'a str,
        title: &'a str,
    },
    /// Blank lines, banners and stray text.
    Ignored,
}

/// Classify one line of outline text. Never fails.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim_end();

    if let Some(caps) = COURSE_LINE.captures(line) {
        if let Some(title) = caps.get(1).map(|m| m.as_str().trim()) {
            if !title.is_empty() {
                return LineKind::CourseTitle(title);
            }
        }
        return LineKind::Ignored;
    }

    if let Some(caps) = SECTION_LINE.captures(line) {
        if let (Some(index), Some(title)) = (caps.get(1), caps.get(2)) {
            return LineKind::SectionHeader {
                index: index.as_str(),
                title: title.as_str().trim(),
            };
        }
    }

    if let Some(caps) = LESSON_LINE.captures(line) {
        if let (Some(section_index), Some(number), Some(title)) =
            (caps.get(1), caps.get(2), caps.get(3))
        {
            return LineKind::LessonHeader {
                section_index: section_index.as_str(),
                number: number.as_str(),
                title: title.as_str().trim(),
            };
        }
    }

    LineKind::Ignored
}

/// A line the parser skipped for a reason worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number in the source text.
    pub line: usize,
    pub reason: WarningReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningReason {
    /// A lesson line before any section line.
    OrphanLesson { index: String },
    /// A lesson whose dotted prefix names a different section than the open one.
    MismatchedLesson { index: String, section: String },
    /// A second `COURSE:` line. The first one wins.
    DuplicateCourseTitle { title: String },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            WarningReason::OrphanLesson { index } => {
                write!(f, "line {}: lesson {} appears before any section", self.line, index)
            }
            WarningReason::MismatchedLesson { index, section } => write!(
                f,
                "line {}: lesson {} does not belong to section {}",
                self.line, index, section
            ),
            WarningReason::DuplicateCourseTitle { title } => write!(
                f,
                "line {}: extra course title '{}' ignored",
                self.line, title
            ),
        }
    }
}

/// A parsed course tree plus the lines that were skipped along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOutline {
    pub course: OutlineNode,
    pub warnings: Vec<ParseWarning>,
}

/// Parse the full text of an outline file.
///
/// Sections and lessons keep file order. Irregular lines are skipped and reported as
/// warnings; only a missing course title is an error, and no partial tree is returned.
pub fn parse_outline(text: &str) -> Result<ParsedOutline, ParseError> {
    let mut course_title: Option<String> = None;
    let mut sections: Vec<OutlineNode> = Vec::new();
    let mut warnings = Vec::new();

    // Editors on Windows often save UTF-8 with a byte order mark.
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        match classify_line(line) {
            LineKind::CourseTitle(title) => {
                if course_title.is_none() {
                    course_title = Some(title.to_string());
                } else {
                    warnings.push(ParseWarning {
                        line: line_no,
                        reason: WarningReason::DuplicateCourseTitle {
                            title: title.to_string(),
                        },
                    });
                }
            }
            LineKind::SectionHeader { index, title } => {
                sections.push(OutlineNode::section(index, title));
            }
            LineKind::LessonHeader {
                section_index,
                number,
                title,
            } => {
                let index = format!("{}.{}", section_index, number);
                match sections.last_mut() {
                    None => warnings.push(ParseWarning {
                        line: line_no,
                        reason: WarningReason::OrphanLesson { index },
                    }),
                    Some(section) if section.index != section_index => {
                        warnings.push(ParseWarning {
                            line: line_no,
                            reason: WarningReason::MismatchedLesson {
                                index,
                                section: section.index.clone(),
                            },
                        })
                    }
                    Some(section) => section.children.push(OutlineNode::lesson(index, title)),
                }
            }
            LineKind::Ignored => {}
        }
    }

    for warning in &warnings {
        warn!("Skipped outline line: {}", warning);
    }

    let title = course_title.ok_or(ParseError::NoCourseTitle)?;
    let mut course = OutlineNode::course(title);
    course.children = sections;

    debug!(
        "Parsed course '{}': {} sections, {} lessons",
        course.title,
        course.children.len(),
        course.lesson_count()
    );

    Ok(ParsedOutline { course, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_line_kind() {
        assert_eq!(classify_line("COURSE: Rust"), LineKind::CourseTitle("Rust"));
        assert_eq!(
            classify_line("  COURSE:   Rust 101  "),
            LineKind::CourseTitle("Rust 101")
        );
        assert_eq!(
            classify_line("3. Week 3"),
            LineKind::SectionHeader {
                index: "3",
                title: "Week 3"
            }
        );
        assert_eq!(
            classify_line("    3.10. Closures"),
            LineKind::LessonHeader {
                section_index: "3",
                number: "10",
                title: "Closures"
            }
        );
    }

    #[test]
    fn ignores_banners_and_stray_text() {
        assert_eq!(classify_line(""), LineKind::Ignored);
        assert_eq!(classify_line("=========="), LineKind::Ignored);
        assert_eq!(classify_line("Notes for the instructor"), LineKind::Ignored);
        assert_eq!(classify_line("COURSE:"), LineKind::Ignored);
    }

    #[test]
    fn indented_section_and_unindented_lesson_are_ignored() {
        assert_eq!(classify_line("  1. Week 1"), LineKind::Ignored);
        assert_eq!(classify_line("1.1. Ownership"), LineKind::Ignored);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let parsed = parse_outline("COURSE: X\r\n1. Week 1\r\n  1.1. A\r\n").unwrap();
        assert_eq!(parsed.course.children[0].title, "Week 1");
        assert_eq!(parsed.course.children[0].children[0].title, "A");
    }
}
