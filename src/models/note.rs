use serde::Deserialize;

use crate::schema::{FieldKind, FieldSpec, OWNER_FIELD, Schema, nullable};

pub const NOTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(OWNER_FIELD, FieldKind::ID),
    FieldSpec::required("content", FieldKind::TEXT),
    FieldSpec::optional("title", FieldKind::text(200)),
    FieldSpec::optional("category", FieldKind::text(100)),
    FieldSpec::defaulted("tags", FieldKind::TextList),
    FieldSpec::optional("taskId", FieldKind::ID),
    FieldSpec::optional("projectId", FieldKind::ID),
    FieldSpec::optional("contactId", FieldKind::ID),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub user_id: String,
    pub content: String,
    pub title: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub task_id: Option<String>,
    pub project_id: Option<String>,
    pub contact_id: Option<String>,
}

impl Schema for NewNote {
    const FIELDS: &'static [FieldSpec] = NOTE_FIELDS;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub task_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub contact_id: Option<Option<String>>,
}

impl Schema for NotePatch {
    const FIELDS: &'static [FieldSpec] = NOTE_FIELDS;
}
