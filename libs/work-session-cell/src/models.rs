// libs/work-session-cell/src/models.rs
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// WORK SESSIONS (as returned by the clinic API)
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: WorkSessionStatus,
    pub doctor: Option<SessionDoctor>,
    pub technician: Option<SessionStaff>,
    #[serde(default)]
    pub services: Vec<SessionService>,
    pub booth: Option<Booth>,
}

impl WorkSession {
    pub fn specialty_id(&self) -> Option<Uuid> {
        self.doctor.as_ref().and_then(|d| d.specialty_id)
    }

    /// Name of whoever staffs the session, doctor first.
    pub fn staff_name(&self) -> Option<&str> {
        self.doctor
            .as_ref()
            .map(|d| d.name.as_str())
            .or_else(|| self.technician.as_ref().map(|t| t.name.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkSessionStatus {
    Pending,
    Approved,
    InProgress,
    Canceled,
    Completed,
}

impl WorkSessionStatus {
    pub const ALL: [WorkSessionStatus; 5] = [
        WorkSessionStatus::Pending,
        WorkSessionStatus::Approved,
        WorkSessionStatus::InProgress,
        WorkSessionStatus::Canceled,
        WorkSessionStatus::Completed,
    ];

    pub fn colors(self) -> EventColors {
        match self {
            WorkSessionStatus::Pending => EventColors::new("#fff7e6", "#fa8c16", "#ad4e00"),
            WorkSessionStatus::Approved => EventColors::new("#f6ffed", "#52c41a", "#237804"),
            WorkSessionStatus::InProgress => EventColors::new("#e6f4ff", "#1677ff", "#003eb3"),
            WorkSessionStatus::Canceled => EventColors::new("#fff1f0", "#ff4d4f", "#a8071a"),
            WorkSessionStatus::Completed => EventColors::new("#f5f5f5", "#8c8c8c", "#434343"),
        }
    }
}

impl fmt::Display for WorkSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkSessionStatus::Pending => write!(f, "PENDING"),
            WorkSessionStatus::Approved => write!(f, "APPROVED"),
            WorkSessionStatus::InProgress => write!(f, "IN_PROGRESS"),
            WorkSessionStatus::Canceled => write!(f, "CANCELED"),
            WorkSessionStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionDoctor {
    pub id: Uuid,
    pub specialty_id: Option<Uuid>,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStaff {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionService {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booth {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
}

// ==============================================================================
// CALENDAR EVENTS (what the widget renders)
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventColors {
    pub background_color: String,
    pub border_color: String,
    pub text_color: String,
}

impl EventColors {
    fn new(background: &str, border: &str, text: &str) -> Self {
        Self {
            background_color: background.to_string(),
            border_color: border.to_string(),
            text_color: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedProps {
    pub work_session: WorkSession,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub background_color: String,
    pub border_color: String,
    pub text_color: String,
    pub extended_props: ExtendedProps,
}

impl CalendarEvent {
    pub fn from_work_session(session: WorkSession) -> Self {
        let staff = session.staff_name().unwrap_or("Work session");
        let title = match &session.booth {
            Some(booth) => format!("{} - {}", staff, booth.name),
            None => staff.to_string(),
        };
        let colors = session.status.colors();

        Self {
            id: session.id,
            title,
            start: session.start_time,
            end: session.end_time,
            background_color: colors.background_color,
            border_color: colors.border_color,
            text_color: colors.text_color,
            extended_props: ExtendedProps { work_session: session },
        }
    }

    pub fn work_session(&self) -> &WorkSession {
        &self.extended_props.work_session
    }

    pub fn status(&self) -> WorkSessionStatus {
        self.extended_props.work_session.status
    }

    pub fn specialty_id(&self) -> Option<Uuid> {
        self.extended_props.work_session.specialty_id()
    }
}

pub fn events_from_sessions(sessions: Vec<WorkSession>) -> Vec<CalendarEvent> {
    sessions.into_iter().map(CalendarEvent::from_work_session).collect()
}

// ==============================================================================
// CALENDAR NAVIGATION
// ==============================================================================

/// Identifies one calendar month; rendered as `"{year}-{month}"` with a 1-based month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// `[first day, first day of next month)`.
    pub fn range(self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: self.next().first_day(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

/// Half-open date interval: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn to_query(self) -> Vec<(&'static str, String)> {
        vec![
            ("startDate", self.start.format("%Y-%m-%d").to_string()),
            ("endDate", self.end.format("%Y-%m-%d").to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

impl ViewMode {
    /// Step `date` one unit of this view forwards or backwards.
    pub fn shift(self, date: NaiveDate, forward: bool) -> NaiveDate {
        let shifted = match (self, forward) {
            (ViewMode::Month, true) => date.checked_add_months(Months::new(1)),
            (ViewMode::Month, false) => date.checked_sub_months(Months::new(1)),
            (ViewMode::Week, true) => date.checked_add_signed(Duration::days(7)),
            (ViewMode::Week, false) => date.checked_sub_signed(Duration::days(7)),
            (ViewMode::Day, true) => date.checked_add_signed(Duration::days(1)),
            (ViewMode::Day, false) => date.checked_sub_signed(Duration::days(1)),
        };
        shifted.unwrap_or(date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Prev,
    Next,
    Today,
}

/// Whose sessions the calendar loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    All,
    Doctor(Option<Uuid>),
    Mine,
}
