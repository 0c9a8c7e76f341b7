use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::schema::{FieldKind, FieldSpec, OWNER_FIELD, Schema};

pub const MOOD_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(OWNER_FIELD, FieldKind::ID),
    FieldSpec::required("mood", FieldKind::text(50)),
    FieldSpec::optional("energyLevel", FieldKind::Integer { min: 1, max: 10 }),
    FieldSpec::optional("notes", FieldKind::TEXT),
    FieldSpec::optional("timestamp", FieldKind::DateTime),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMoodEntry {
    pub user_id: String,
    pub mood: String,
    pub energy_level: Option<i32>,
    pub notes: Option<String>,
    pub timestamp: Option<String>,
}

impl Schema for NewMoodEntry {
    const FIELDS: &'static [FieldSpec] = MOOD_FIELDS;
}

impl NewMoodEntry {
    /// The supplied timestamp normalized to UTC, or `now` when absent.
    ///
    /// Entries are listed by this column, so every row uses the same format.
    #[must_use]
    pub fn resolved_timestamp(&self, now: &str) -> String {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map_or_else(
                || now.to_string(),
                |ts| {
                    ts.with_timezone(&Utc)
                        .to_rfc3339_opts(SecondsFormat::Millis, true)
                },
            )
    }
}
