//! Title lists for free-standing page batches.
//!
//! A batch is a flat list of page titles created in one OneNote section, planned by
//! [`crate::planner::plan_pages`]. Titles come from a comma-separated argument, from
//! lines of text, or from a built-in [`PageTemplate`].

use std::io::BufRead;

/// Built-in title lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTemplate {
    DailyPlanning,
    WeeklyReview,
    ProjectManagement,
    MeetingNotes,
    StudyNotes,
}

impl PageTemplate {
    pub const ALL: [PageTemplate; 5] = [
        Self::DailyPlanning,
        Self::WeeklyReview,
        Self::ProjectManagement,
        Self::MeetingNotes,
        Self::StudyNotes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DailyPlanning => "daily-planning",
            Self::WeeklyReview => "weekly-review",
            Self::ProjectManagement => "project-management",
            Self::MeetingNotes => "meeting-notes",
            Self::StudyNotes => "study-notes",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DailyPlanning => "Daily Planning",
            Self::WeeklyReview => "Weekly Review",
            Self::ProjectManagement => "Project Management",
            Self::MeetingNotes => "Meeting Notes",
            Self::StudyNotes => "Study Notes",
        }
    }

    pub fn titles(&self) -> &'static [&'static str] {
        match self {
            Self::DailyPlanning => &[
                "Today's Goals",
                "Priority Tasks",
                "Meetings",
                "Notes",
                "Tomorrow's Prep",
            ],
            Self::WeeklyReview => &[
                "Monday Plan",
                "Tuesday Plan",
                "Wednesday Plan",
                "Thursday Plan",
                "Friday Plan",
                "Weekend Goals",
                "Weekly Summary",
            ],
            Self::ProjectManagement => &[
                "Project Overview",
                "Requirements",
                "Timeline",
                "Resources",
                "Milestones",
                "Risk Assessment",
                "Status Updates",
            ],
            Self::MeetingNotes => &[
                "Agenda",
                "Attendees",
                "Discussion Points",
                "Decisions Made",
                "Action Items",
                "Follow-up Tasks",
            ],
            Self::StudyNotes => &[
                "Key Concepts",
                "Important Formulas",
                "Examples",
                "Practice Problems",
                "Summary",
                "Questions for Review",
            ],
        }
    }

    pub fn title_list(&self) -> Vec<String> {
        self.titles().iter().map(|t| t.to_string()).collect()
    }
}

impl std::str::FromStr for PageTemplate {
    type Err = String;

    /// Accepts the kebab-case name, the display name, or the 1-based position.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .enumerate()
            .find(|(i, t)| {
                wanted == t.as_str()
                    || wanted == t.name().to_ascii_lowercase()
                    || wanted == (i + 1).to_string()
            })
            .map(|(_, t)| *t)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                format!("Unknown template '{}'. Must be one of: {}", s, names.join(", "))
            })
    }
}

impl std::fmt::Display for PageTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a comma-separated title list, dropping blanks.
pub fn parse_titles(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read one title per line until end of input, dropping blank lines.
pub fn read_titles(input: impl BufRead) -> std::io::Result<Vec<String>> {
    let mut titles = Vec::new();
    for line in input.lines() {
        let line = line?;
        let title = line.trim();
        if !title.is_empty() {
            titles.push(title.to_string());
        }
    }
    Ok(titles)
}
