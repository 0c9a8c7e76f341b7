use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::entities::contacts;
use crate::schema::{FieldKind, FieldSpec, OWNER_FIELD, Schema, nullable, parse_date};

pub const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(OWNER_FIELD, FieldKind::ID),
    FieldSpec::required("firstName", FieldKind::text(100)),
    FieldSpec::optional("lastName", FieldKind::text(100)),
    FieldSpec::optional("email", FieldKind::text(254)),
    FieldSpec::optional("phone", FieldKind::text(40)),
    FieldSpec::optional("relationshipType", FieldKind::text(50)),
    FieldSpec::optional("relationshipLevel", FieldKind::Integer { min: 1, max: 5 }),
    FieldSpec::optional(
        "contactFrequencyDays",
        FieldKind::Integer { min: 1, max: 3650 },
    ),
    FieldSpec::optional("lastContactedAt", FieldKind::Date),
    FieldSpec::optional("nextContactDue", FieldKind::Date),
    FieldSpec::optional("notes", FieldKind::TEXT),
    FieldSpec::defaulted("tags", FieldKind::TextList),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub user_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship_type: Option<String>,
    pub relationship_level: Option<i32>,
    pub contact_frequency_days: Option<i32>,
    pub last_contacted_at: Option<String>,
    pub next_contact_due: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Schema for NewContact {
    const FIELDS: &'static [FieldSpec] = CONTACT_FIELDS;
}

impl NewContact {
    /// The explicit due date if given, otherwise one derived from the last
    /// contact and the desired frequency.
    #[must_use]
    pub fn resolved_next_contact_due(&self) -> Option<String> {
        self.next_contact_due.clone().or_else(|| {
            let last = self.last_contacted_at.as_deref()?;
            next_contact_due(parse_date(last)?, self.contact_frequency_days?)
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub relationship_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub relationship_level: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub contact_frequency_days: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_contacted_at: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub next_contact_due: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl Schema for ContactPatch {
    const FIELDS: &'static [FieldSpec] = CONTACT_FIELDS;
}

/// `YYYY-MM-DD` of `last + frequency_days`.
#[must_use]
pub fn next_contact_due(last: NaiveDate, frequency_days: i32) -> Option<String> {
    let days = u64::try_from(frequency_days).ok()?;
    last.checked_add_days(Days::new(days))
        .map(|due| due.format("%Y-%m-%d").to_string())
}

/// A contact is due once its `nextContactDue` is today or earlier.
#[must_use]
pub fn is_due(contact: &contacts::Model, today: NaiveDate) -> bool {
    contact
        .next_contact_due
        .as_deref()
        .and_then(parse_date)
        .is_some_and(|due| due <= today)
}
