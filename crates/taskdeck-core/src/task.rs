use crate::id::TaskId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

time::serde::format_description!(date_wire, Date, "[year]-[month]-[day]");

/// Wire format for calendar dates (`YYYY-MM-DD`).
static DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Task priority level. Requests that omit the priority get [`Priority::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Lowest of the three defined levels.
    Low,
    /// The creation default.
    #[default]
    Medium,
    /// Highest of the three defined levels.
    High,
}

impl Priority {
    /// Numeric rank used by the priority sort: high 3, medium 2, low 1.
    /// A task without a priority ranks 0 and is handled by the caller.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(label)
    }
}

/// Error returned when a priority token cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid priority: {token} (expected low, medium or high)")]
pub struct ParsePriorityError {
    /// The rejected input token.
    pub token: String,
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError { token: s.to_owned() }),
        }
    }
}

/// Errors produced when task fields fail validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidTask {
    /// The task text was empty or only whitespace.
    #[error("task text must not be empty")]
    EmptyText,
}

/// A single to-do record.
///
/// The identifier and creation timestamp are assigned by the store and never
/// change afterwards. Serialized field names follow the JSON wire format of
/// the HTTP surface (camelCase, dates as `YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque, immutable identifier assigned at creation.
    pub id: TaskId,
    /// Human-readable task text, never empty.
    pub text: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Priority level; documents without one rank lowest during sort.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Free-form category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Optional calendar due date.
    #[serde(default, with = "date_wire::option")]
    pub due_date: Option<Date>,
    /// Creation timestamp assigned by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Task {
    /// Build a new task from a draft, assigning the identifier and creation
    /// timestamp.
    ///
    /// # Errors
    /// Returns [`InvalidTask::EmptyText`] when the draft text is blank.
    pub fn from_draft(draft: TaskDraft) -> Result<Self, InvalidTask> {
        let text = normalize_text(&draft.text)?;
        Ok(Self {
            id: TaskId::new(),
            text,
            completed: false,
            priority: Some(draft.priority.unwrap_or_default()),
            category: normalize_category(draft.category),
            due_date: draft.due_date,
            created_at: OffsetDateTime::now_utc(),
        })
    }
}

/// Create payload: the client-supplied fields of a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Task text; must be non-empty once trimmed.
    pub text: String,
    /// Optional due date.
    #[serde(default, with = "date_wire::option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    /// Optional priority; defaults to medium at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TaskDraft {
    /// Convenience constructor for a draft carrying only text.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Partial update. Absent fields leave the stored value untouched; clearing a
/// previously set category or due date is not part of the update surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// Replace the task text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replace the completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Replace the priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Replace the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Replace the due date.
    #[serde(default, with = "date_wire::option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
}

impl TaskPatch {
    /// Shorthand for a patch that only flips the completion flag.
    #[must_use]
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
    }

    /// Apply the patch to a task in place.
    ///
    /// # Errors
    /// Returns [`InvalidTask::EmptyText`] when the patch would leave the task
    /// with blank text; the task is not modified in that case.
    pub fn apply(&self, task: &mut Task) -> Result<(), InvalidTask> {
        let text = self.text.as_deref().map(normalize_text).transpose()?;
        if let Some(text) = text {
            task.text = text;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = Some(priority);
        }
        if let Some(category) = self.category.clone() {
            task.category = normalize_category(Some(category));
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        Ok(())
    }
}

/// Parse a calendar date in the `YYYY-MM-DD` wire format.
///
/// # Errors
/// Returns a parse error when the input does not match the format.
pub fn parse_date(input: &str) -> Result<Date, time::error::Parse> {
    Date::parse(input.trim(), DATE_FORMAT)
}

fn normalize_text(raw: &str) -> Result<String, InvalidTask> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidTask::EmptyText);
    }
    Ok(trimmed.to_owned())
}

fn normalize_category(raw: Option<String>) -> Option<String> {
    raw.and_then(|category| {
        let trimmed = category.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn draft(text: &str) -> TaskDraft {
        TaskDraft::with_text(text)
    }

    #[test]
    fn from_draft_assigns_id_and_defaults() {
        let task = Task::from_draft(TaskDraft {
            text: "  Buy milk  ".into(),
            due_date: Some(date!(2025 - 08 - 14)),
            priority: None,
            category: Some("Shopping".into()),
        })
        .unwrap_or_else(|err| panic!("draft must validate: {err}"));

        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Some(Priority::Medium));
        assert_eq!(task.category.as_deref(), Some("Shopping"));
        assert_eq!(task.due_date, Some(date!(2025 - 08 - 14)));
    }

    #[test]
    fn from_draft_rejects_blank_text() {
        assert_eq!(Task::from_draft(draft("   ")), Err(InvalidTask::EmptyText));
    }

    #[test]
    fn from_draft_drops_blank_category() {
        let task = Task::from_draft(TaskDraft {
            text: "task".into(),
            category: Some("  ".into()),
            ..TaskDraft::default()
        })
        .unwrap_or_else(|err| panic!("draft must validate: {err}"));
        assert_eq!(task.category, None);
    }

    #[test]
    fn patch_apply_edits_fields() {
        let mut task = Task::from_draft(draft("original"))
            .unwrap_or_else(|err| panic!("draft must validate: {err}"));
        let patch = TaskPatch {
            text: Some("edited".into()),
            completed: Some(true),
            priority: Some(Priority::High),
            ..TaskPatch::default()
        };
        patch
            .apply(&mut task)
            .unwrap_or_else(|err| panic!("patch must apply: {err}"));

        assert_eq!(task.text, "edited");
        assert!(task.completed);
        assert_eq!(task.priority, Some(Priority::High));
    }

    #[test]
    fn patch_apply_rejects_blank_text_without_touching_task() {
        let mut task = Task::from_draft(draft("original"))
            .unwrap_or_else(|err| panic!("draft must validate: {err}"));
        let patch = TaskPatch {
            text: Some("  ".into()),
            completed: Some(true),
            ..TaskPatch::default()
        };

        assert_eq!(patch.apply(&mut task), Err(InvalidTask::EmptyText));
        assert_eq!(task.text, "original");
        assert!(!task.completed);
    }

    #[test]
    fn task_serializes_to_camel_case_wire_format() {
        let mut task = Task::from_draft(draft("Buy milk"))
            .unwrap_or_else(|err| panic!("draft must validate: {err}"));
        task.due_date = Some(date!(2025 - 08 - 14));

        let value = serde_json::to_value(&task)
            .unwrap_or_else(|err| panic!("task must serialize: {err}"));
        assert_eq!(value["text"], json!("Buy milk"));
        assert_eq!(value["dueDate"], json!("2025-08-14"));
        assert_eq!(value["priority"], json!("medium"));
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn patch_deserializes_partial_bodies() {
        let patch: TaskPatch = serde_json::from_value(json!({ "completed": true }))
            .unwrap_or_else(|err| panic!("patch must parse: {err}"));
        assert_eq!(patch.completed, Some(true));
        assert!(patch.text.is_none());
        assert!(patch.due_date.is_none());
    }

    #[test]
    fn priority_parses_and_ranks() {
        let parsed: Priority = "High".parse().unwrap_or_else(|err| panic!("must parse: {err}"));
        assert_eq!(parsed, Priority::High);
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn parse_date_accepts_wire_format() {
        let parsed = parse_date("2025-08-14").unwrap_or_else(|err| panic!("must parse: {err}"));
        assert_eq!(parsed, date!(2025 - 08 - 14));
        assert!(parse_date("14/08/2025").is_err());
    }
}
