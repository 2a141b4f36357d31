use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;

use crate::domain::timestamp::{format_timestamp, humanize_duration};

/// Placeholder shown for entries saved without a comment.
pub const NO_COMMENT: &str = "(no comment)";

/// Capability shared by everything shown in a selectable list.
pub trait ListItem {
    /// Stable identity used to keep selection across reloads.
    fn item_id(&self) -> i64;

    /// Primary line of the list row.
    fn title(&self) -> String;

    /// Secondary line of the list row.
    fn description(&self) -> String;
}

/// A unit of work that time is tracked against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub active: bool,
    pub created_at: OffsetDateTime,
    pub id: i64,
    /// Sum of `secs_spent` over every closed entry owned by this task.
    pub secs_spent: i64,
    pub summary: String,
    pub updated_at: OffsetDateTime,
}

impl ListItem for Task {
    fn item_id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        self.summary.clone()
    }

    fn description(&self) -> String {
        let spent = if self.secs_spent == 0 {
            "no time logged".to_string()
        } else {
            format!("worked on for {}", humanize_duration(self.secs_spent))
        };

        format!("{spent} · updated {}", format_timestamp(self.updated_at))
    }
}

/// A closed stretch of time logged against a task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskLogEntry {
    pub begin: OffsetDateTime,
    pub comment: Option<String>,
    pub end: OffsetDateTime,
    pub id: i64,
    pub secs_spent: i64,
    pub task_id: i64,
    pub task_summary: String,
}

impl TaskLogEntry {
    /// Returns the comment, or the placeholder when none was saved.
    pub fn comment_or_placeholder(&self) -> &str {
        self.comment
            .as_deref()
            .filter(|comment| !comment.trim().is_empty())
            .unwrap_or(NO_COMMENT)
    }
}

impl ListItem for TaskLogEntry {
    fn item_id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        self.comment_or_placeholder()
            .lines()
            .next()
            .unwrap_or(NO_COMMENT)
            .to_string()
    }

    fn description(&self) -> String {
        format!(
            "{} · {} ... {} ({})",
            self.task_summary,
            format_timestamp(self.begin),
            format_timestamp(self.end),
            humanize_duration(self.secs_spent)
        )
    }
}

/// Details of the single open entry, derived on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveTaskDetails {
    pub begin: OffsetDateTime,
    pub comment: Option<String>,
    pub entry_id: i64,
    pub task_id: i64,
    pub task_summary: String,
}

/// Per-task aggregate over a reporting window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskReportEntry {
    pub num_entries: i64,
    pub secs_spent: i64,
    pub task_id: i64,
    pub task_summary: String,
}

/// Filter applied to the owning task when aggregating log entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskStatus {
    #[default]
    Any,
    Active,
    Inactive,
}

impl TaskStatus {
    /// Returns the lowercase keyword accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a task status keyword is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status \"{0}\"; expected any, active, or inactive")]
pub struct UnknownTaskStatus(String);

impl FromStr for TaskStatus {
    type Err = UnknownTaskStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(UnknownTaskStatus(value.to_string())),
        }
    }
}
