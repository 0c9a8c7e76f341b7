use serde::Deserialize;

use crate::entities::types::{ProjectPriority, ProjectStatus};
use crate::schema::{FieldKind, FieldSpec, OWNER_FIELD, Schema, nullable};

pub const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(OWNER_FIELD, FieldKind::ID),
    FieldSpec::required("name", FieldKind::text(200)),
    FieldSpec::optional("description", FieldKind::TEXT),
    FieldSpec::defaulted("status", FieldKind::OneOf(ProjectStatus::VALUES)),
    FieldSpec::optional("category", FieldKind::text(100)),
    FieldSpec::defaulted("progress", FieldKind::Integer { min: 0, max: 100 }),
    FieldSpec::optional("deadline", FieldKind::Date),
    FieldSpec::optional("budget", FieldKind::Number { min: 0.0 }),
    FieldSpec::defaulted("spent", FieldKind::Number { min: 0.0 }),
    FieldSpec::defaulted("priority", FieldKind::OneOf(ProjectPriority::VALUES)),
    FieldSpec::defaulted("tags", FieldKind::TextList),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub category: Option<String>,
    #[serde(default)]
    pub progress: i32,
    pub deadline: Option<String>,
    pub budget: Option<f64>,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub priority: ProjectPriority,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Schema for NewProject {
    const FIELDS: &'static [FieldSpec] = PROJECT_FIELDS;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    pub progress: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub deadline: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub budget: Option<Option<f64>>,
    pub spent: Option<f64>,
    pub priority: Option<ProjectPriority>,
    pub tags: Option<Vec<String>>,
}

impl Schema for ProjectPatch {
    const FIELDS: &'static [FieldSpec] = PROJECT_FIELDS;
}
