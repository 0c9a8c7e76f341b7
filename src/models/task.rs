use serde::Deserialize;

use crate::entities::types::{Frequency, RecurringPattern, TaskPriority, TaskStatus};
use crate::schema::{FieldKind, FieldSpec, OWNER_FIELD, Schema, nullable};

const RECURRING_PATTERN_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("frequency", FieldKind::OneOf(Frequency::VALUES)),
    FieldSpec::defaulted("interval", FieldKind::Integer { min: 1, max: 365 }),
    FieldSpec::defaulted("daysOfWeek", FieldKind::IntegerList { min: 0, max: 6 }),
    FieldSpec::optional("endDate", FieldKind::Date),
];

pub const TASK_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(OWNER_FIELD, FieldKind::ID),
    FieldSpec::optional("projectId", FieldKind::ID),
    FieldSpec::required("title", FieldKind::text(200)),
    FieldSpec::optional("description", FieldKind::TEXT),
    FieldSpec::optional("time", FieldKind::Clock),
    FieldSpec::optional("duration", FieldKind::Integer { min: 0, max: 10_080 }),
    FieldSpec::defaulted("priority", FieldKind::OneOf(TaskPriority::VALUES)),
    FieldSpec::optional("category", FieldKind::text(100)),
    FieldSpec::defaulted("status", FieldKind::OneOf(TaskStatus::VALUES)),
    FieldSpec::optional("scheduledDate", FieldKind::Date),
    FieldSpec::optional(
        "recurringPattern",
        FieldKind::Object(RECURRING_PATTERN_FIELDS),
    ),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub user_id: String,
    pub project_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub time: Option<String>,
    pub duration: Option<i32>,
    #[serde(default)]
    pub priority: TaskPriority,
    pub category: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    pub scheduled_date: Option<String>,
    pub recurring_pattern: Option<RecurringPattern>,
}

impl Schema for NewTask {
    const FIELDS: &'static [FieldSpec] = TASK_FIELDS;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: Option<Option<String>>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub duration: Option<Option<i32>>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub scheduled_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub recurring_pattern: Option<Option<RecurringPattern>>,
}

impl Schema for TaskPatch {
    const FIELDS: &'static [FieldSpec] = TASK_FIELDS;
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
}

/// New value for `completedAt` after a status change, or `None` to leave it
/// untouched.
///
/// Entering `completed` stamps `now`; leaving it clears the stamp.
#[must_use]
pub fn completion_stamp(
    previous: TaskStatus,
    next: TaskStatus,
    now: &str,
) -> Option<Option<String>> {
    match (previous == TaskStatus::Completed, next == TaskStatus::Completed) {
        (false, true) => Some(Some(now.to_string())),
        (true, false) => Some(None),
        _ => None,
    }
}
