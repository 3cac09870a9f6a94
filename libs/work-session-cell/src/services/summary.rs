use serde::{Deserialize, Serialize};

use crate::models::{CalendarEvent, WorkSessionStatus};

/// Per-status counts shown next to the calendar.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub in_progress: usize,
    pub canceled: usize,
    pub completed: usize,
}

impl SessionSummary {
    pub fn from_events(events: &[CalendarEvent]) -> Self {
        events.iter().fold(Self::default(), |mut summary, event| {
            summary.total += 1;
            match event.status() {
                WorkSessionStatus::Pending => summary.pending += 1,
                WorkSessionStatus::Approved => summary.approved += 1,
                WorkSessionStatus::InProgress => summary.in_progress += 1,
                WorkSessionStatus::Canceled => summary.canceled += 1,
                WorkSessionStatus::Completed => summary.completed += 1,
            }
            summary
        })
    }

    pub fn count(&self, status: WorkSessionStatus) -> usize {
        match status {
            WorkSessionStatus::Pending => self.pending,
            WorkSessionStatus::Approved => self.approved,
            WorkSessionStatus::InProgress => self.in_progress,
            WorkSessionStatus::Canceled => self.canceled,
            WorkSessionStatus::Completed => self.completed,
        }
    }

    /// Sessions still expected to happen.
    pub fn active(&self) -> usize {
        self.pending + self.approved + self.in_progress
    }
}
