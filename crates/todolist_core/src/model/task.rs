//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record owned by a project.
//! - Provide status/priority enums with stable wire strings.
//! - Parse and format due dates for storage and display.
//!
//! # Invariants
//! - `id` is stable for the task lifetime and never reused.
//! - New tasks start as `TaskStatus::Pending`.
//! - Due dates are calendar dates; the wire form is `YYYY-MM-DD`.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
///
/// Replaces positional addressing so edits survive reordering.
pub type TaskId = Uuid;

const DUE_DATE_WIRE_FORMAT: &str = "%Y-%m-%d";
const DUE_DATE_DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// Task priority as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parses a wire/user string (`low|medium|high`, case-insensitive).
    pub fn parse(value: &str) -> Result<Self, TaskValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TaskValidationError::InvalidPriority(value.to_string())),
        }
    }

    /// Wire string used by persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Capitalized label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

impl TaskStatus {
    /// Parses a wire/user string (`pending|done`, case-insensitive).
    pub fn parse(value: &str) -> Result<Self, TaskValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            _ => Err(TaskValidationError::InvalidStatus(value.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }

    /// Returns the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Done,
            Self::Done => Self::Pending,
        }
    }
}

/// Validation errors for task input and persisted task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    InvalidDueDate(String),
    InvalidPriority(String),
    InvalidStatus(String),
    DueDateInPast { due_date: NaiveDate, today: NaiveDate },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::InvalidDueDate(value) => write!(f, "invalid due date `{value}`"),
            Self::InvalidPriority(value) => {
                write!(f, "invalid priority `{value}`; expected low|medium|high")
            }
            Self::InvalidStatus(value) => {
                write!(f, "invalid status `{value}`; expected pending|done")
            }
            Self::DueDateInPast { due_date, today } => {
                write!(f, "due date {due_date} is before today ({today})")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Payloads written before ids existed get a fresh id on load.
    #[serde(default = "new_task_id")]
    pub id: TaskId,
    pub title: String,
    pub description: String,
    #[serde(with = "due_date_format")]
    pub due_date: NaiveDate,
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// Creates a pending task with a generated stable id.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        priority: Priority,
    ) -> Self {
        Self {
            id: new_task_id(),
            title: title.into(),
            description: description.into(),
            due_date,
            priority,
            status: TaskStatus::Pending,
        }
    }

    /// Builder-style status override.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Flips `Pending <-> Done` and returns the new status.
    pub fn toggle_status(&mut self) -> TaskStatus {
        self.status = self.status.toggled();
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Returns whether the due date lies strictly before `today`.
    ///
    /// A task due today is never overdue.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }

    /// `is_overdue_on` against the local calendar date.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(local_today())
    }

    /// Due date rendered for display, e.g. `Oct 19, 2026`.
    pub fn formatted_due_date(&self) -> String {
        format_due_date(self.due_date)
    }

    /// Applies a partial edit.
    ///
    /// Nothing is changed when validation fails.
    pub fn apply_update(&mut self, update: TaskUpdate) -> Result<(), TaskValidationError> {
        if let Some(title) = update.title.as_deref() {
            if title.trim().is_empty() {
                return Err(TaskValidationError::EmptyTitle);
            }
        }

        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        Ok(())
    }
}

/// Partial task edit. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

/// Raw user-entered task fields, as collected by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
    /// Blank means `pending`.
    pub status: String,
}

impl NewTask {
    /// Parses the form fields into a task.
    ///
    /// Rejects due dates before `today`; today itself is accepted.
    pub fn into_task(self, today: NaiveDate) -> Result<Task, TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        let due_date = parse_due_date(&self.due_date)?;
        if due_date < today {
            return Err(TaskValidationError::DueDateInPast { due_date, today });
        }
        let priority = Priority::parse(&self.priority)?;
        let status = if self.status.trim().is_empty() {
            TaskStatus::Pending
        } else {
            TaskStatus::parse(&self.status)?
        };

        Ok(Task::new(
            self.title.trim(),
            self.description.trim(),
            due_date,
            priority,
        )
        .with_status(status))
    }
}

/// Parses a due date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps keep the calendar date of their own offset.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, TaskValidationError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DUE_DATE_WIRE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|parsed| parsed.date_naive())
        })
        .ok_or_else(|| TaskValidationError::InvalidDueDate(value.to_string()))
}

/// Formats a due date for display (`Oct 19, 2026`).
pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_DISPLAY_FORMAT).to_string()
}

/// Current calendar date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn new_task_id() -> TaskId {
    Uuid::new_v4()
}

mod due_date_format {
    use super::{parse_due_date, DUE_DATE_WIRE_FORMAT};
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DUE_DATE_WIRE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_due_date(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_due_date, parse_due_date, Priority, TaskStatus, TaskValidationError};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
    }

    #[test]
    fn parse_due_date_accepts_plain_and_rfc3339() {
        assert_eq!(
            parse_due_date("2026-10-19").expect("plain date should parse"),
            date(2026, 10, 19)
        );
        assert_eq!(
            parse_due_date(" 2026-10-19T08:30:00Z ").expect("rfc3339 should parse"),
            date(2026, 10, 19)
        );
        assert_eq!(
            parse_due_date("2026-10-19T23:30:00-05:00").expect("offset timestamp should parse"),
            date(2026, 10, 19)
        );
    }

    #[test]
    fn parse_due_date_rejects_garbage() {
        let err = parse_due_date("next tuesday").expect_err("garbage must fail");
        assert_eq!(
            err,
            TaskValidationError::InvalidDueDate("next tuesday".to_string())
        );
    }

    #[test]
    fn format_due_date_uses_short_month_without_padding() {
        assert_eq!(format_due_date(date(2026, 3, 5)), "Mar 5, 2026");
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse(" HIGH ").expect("HIGH"), Priority::High);
        assert!(Priority::parse("urgent").is_err());
        assert_eq!(Priority::Medium.label(), "Medium");
    }

    #[test]
    fn status_toggled_flips() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::parse("Done").expect("Done"), TaskStatus::Done);
    }
}
