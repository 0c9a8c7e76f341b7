//! Request and reply shapes of the AI proxy endpoints.
//!
//! Every reply type implements [`Default`]; the default value is the fixed
//! payload returned when the hosted model cannot be reached or answers with
//! something unusable.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entities::types::{ProjectStatus, TaskPriority, TaskStatus};
use crate::schema::{FieldKind, FieldSpec, Schema};

pub const MAX_SUGGESTIONS: usize = 5;
pub const MAX_CAPTIONS: usize = 5;

pub const CHAT_APOLOGY: &str =
    "Sorry, I can't answer right now. Please try again in a little while.";

const TIME_SUGGESTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("mood", FieldKind::text(50)),
    FieldSpec::required("availableMinutes", FieldKind::Integer { min: 1, max: 1440 }),
    FieldSpec::defaulted("recentActivities", FieldKind::TextList),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSuggestionRequest {
    pub mood: String,
    pub available_minutes: u32,
    #[serde(default)]
    pub recent_activities: Vec<String>,
}

impl Schema for TimeSuggestionRequest {
    const FIELDS: &'static [FieldSpec] = TIME_SUGGESTION_FIELDS;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSuggestions {
    #[serde(default, deserialize_with = "lenient_list")]
    pub suggestions: Vec<TimeSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSuggestion {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "whole_minutes")]
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

const PROJECT_BRIEF_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::text(200)),
    FieldSpec::optional("status", FieldKind::OneOf(ProjectStatus::VALUES)),
    FieldSpec::optional("progress", FieldKind::Integer { min: 0, max: 100 }),
    FieldSpec::optional("deadline", FieldKind::Date),
    FieldSpec::optional("description", FieldKind::TEXT),
];

const TASK_BRIEF_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::text(200)),
    FieldSpec::optional("status", FieldKind::OneOf(TaskStatus::VALUES)),
    FieldSpec::optional("priority", FieldKind::OneOf(TaskPriority::VALUES)),
    FieldSpec::optional("scheduledDate", FieldKind::Date),
];

const PROJECT_ANALYSIS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("project", FieldKind::Object(PROJECT_BRIEF_FIELDS)),
    FieldSpec::defaulted("tasks", FieldKind::ObjectList(TASK_BRIEF_FIELDS)),
];

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectAnalysisRequest {
    pub project: ProjectBrief,
    #[serde(default)]
    pub tasks: Vec<TaskBrief>,
}

impl Schema for ProjectAnalysisRequest {
    const FIELDS: &'static [FieldSpec] = PROJECT_ANALYSIS_FIELDS;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectBrief {
    pub name: String,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
    pub deadline: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBrief {
    pub title: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub scheduled_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub risks: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub next_steps: Vec<String>,
}

const CAPTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("brand", FieldKind::text(200)),
    FieldSpec::defaulted("recentPosts", FieldKind::TextList),
    FieldSpec::optional("platform", FieldKind::text(50)),
    FieldSpec::optional("topic", FieldKind::text(200)),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    pub brand: String,
    #[serde(default)]
    pub recent_posts: Vec<String>,
    pub platform: Option<String>,
    pub topic: Option<String>,
}

impl Schema for CaptionRequest {
    const FIELDS: &'static [FieldSpec] = CAPTION_FIELDS;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Captions {
    #[serde(default, deserialize_with = "lenient_list")]
    pub captions: Vec<String>,
}

const CHAT_TURN_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("role", FieldKind::OneOf(ChatRole::VALUES)),
    FieldSpec::required("content", FieldKind::TEXT),
];

const CHAT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("message", FieldKind::text(4000)),
    FieldSpec::defaulted("history", FieldKind::ObjectList(CHAT_TURN_FIELDS)),
];

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl Schema for ChatRequest {
    const FIELDS: &'static [FieldSpec] = CHAT_FIELDS;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub const VALUES: &'static [&'static str] = &["user", "assistant"];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

impl Default for ChatReply {
    fn default() -> Self {
        Self {
            reply: CHAT_APOLOGY.to_string(),
        }
    }
}

// Model replies are loosely typed. One malformed item must not discard the
// rest of the reply.

/// Keeps the array items that parse as `T` and skips the others. `null` is
/// an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `15` as well as `15.0`, rounding to whole minutes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let minutes = f64::deserialize(deserializer)?;
    if minutes.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&minutes) {
        Ok(minutes.round() as u32)
    } else {
        Err(D::Error::custom(format!("invalid duration: {minutes}")))
    }
}
