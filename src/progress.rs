//! Cumulative progress of an import session.

use std::fmt;

use serde::Serialize;

use crate::models::ImportSession;

/// Counts across every pass of a session so far.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ProgressReport {
    pub succeeded_so_far: usize,
    pub failed_this_pass: usize,
    pub total_planned: usize,
}

impl ProgressReport {
    pub fn is_complete(&self) -> bool {
        self.failed_this_pass == 0 && self.succeeded_so_far >= self.total_planned
    }

    pub fn remaining(&self) -> usize {
        self.total_planned.saturating_sub(self.succeeded_so_far)
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} created, {} failed this pass",
            self.succeeded_so_far, self.total_planned, self.failed_this_pass
        )
    }
}

/// Summarize `session`.
pub fn report(session: &ImportSession) -> ProgressReport {
    ProgressReport {
        succeeded_so_far: session.succeeded().len(),
        failed_this_pass: session.failed().len(),
        total_planned: session.total_planned,
    }
}
