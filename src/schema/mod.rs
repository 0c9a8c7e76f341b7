//! Declarative field specs and the validator that checks raw JSON payloads
//! against them.
//!
//! Every create endpoint runs its body through [`insert`], every update
//! endpoint through [`update`]. Both return the payload deserialized into the
//! matching typed struct, or a [`ValidationError`] listing each field-level
//! problem. Keys that are not declared in the field specs (including the
//! server-assigned `id`, `createdAt` and `updatedAt`) are dropped before
//! deserialization.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Ownership reference carried by every user-owned record. Never patchable.
pub const OWNER_FIELD: &str = "userId";

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text { max_len: Option<usize> },
    Integer { min: i64, max: i64 },
    Number { min: f64 },
    Boolean,
    /// `YYYY-MM-DD` or a full RFC 3339 timestamp.
    Date,
    /// RFC 3339 timestamp.
    DateTime,
    /// `HH:MM`, 24-hour clock.
    Clock,
    OneOf(&'static [&'static str]),
    TextList,
    IntegerList { min: i64, max: i64 },
    Object(&'static [FieldSpec]),
    ObjectList(&'static [FieldSpec]),
}

impl FieldKind {
    pub const TEXT: Self = Self::Text { max_len: None };
    pub const ID: Self = Self::Text { max_len: Some(64) };

    #[must_use]
    pub const fn text(max_len: usize) -> Self {
        Self::Text {
            max_len: Some(max_len),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldSpec {
    /// Must be present and non-null on insert.
    #[must_use]
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
        }
    }

    /// May be absent or null.
    #[must_use]
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: true,
        }
    }

    /// May be absent (a server default applies) but never null.
    #[must_use]
    pub const fn defaulted(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Required,
    InvalidType,
    InvalidValue,
    InvalidFormat,
    TooSmall,
    TooBig,
    UnknownReference,
    InvalidBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: String,
    pub code: IssueCode,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }

    fn required(path: &str) -> Self {
        Self::new(path, IssueCode::Required, format!("{path} is required"))
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payload: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    #[must_use]
    pub fn single(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

fn summarize(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A payload type whose raw JSON is checked against `FIELDS` before
/// deserialization.
pub trait Schema: DeserializeOwned {
    const FIELDS: &'static [FieldSpec];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Insert,
    Update,
}

/// Validates a create payload and deserializes it into `T`.
pub fn insert<T: Schema>(payload: &Value) -> Result<T, ValidationError> {
    let cleaned = validate_insert(T::FIELDS, payload)?;
    from_cleaned(cleaned)
}

/// Validates a partial update payload against the relaxed schema and
/// deserializes it into `T`.
pub fn update<T: Schema>(payload: &Value) -> Result<T, ValidationError> {
    let cleaned = validate_update(T::FIELDS, payload)?;
    from_cleaned(cleaned)
}

pub fn validate_insert(fields: &[FieldSpec], payload: &Value) -> Result<Value, ValidationError> {
    validate(fields, payload, Mode::Insert)
}

/// Relaxed variant: nothing is required, the owner reference is dropped, and
/// nullable fields may be cleared with an explicit `null`.
pub fn validate_update(fields: &[FieldSpec], payload: &Value) -> Result<Value, ValidationError> {
    validate(fields, payload, Mode::Update)
}

fn validate(fields: &[FieldSpec], payload: &Value, mode: Mode) -> Result<Value, ValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationError::single(Issue::new(
            "",
            IssueCode::InvalidType,
            "Request body must be a JSON object",
        )));
    };

    let mut issues = Vec::new();
    let cleaned = check_object(fields, object, "", mode, &mut issues);

    if issues.is_empty() {
        Ok(Value::Object(cleaned))
    } else {
        Err(ValidationError { issues })
    }
}

fn from_cleaned<T: DeserializeOwned>(cleaned: Value) -> Result<T, ValidationError> {
    serde_json::from_value(cleaned).map_err(|e| {
        ValidationError::single(Issue::new("", IssueCode::InvalidBody, e.to_string()))
    })
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_object(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    prefix: &str,
    mode: Mode,
    issues: &mut Vec<Issue>,
) -> Map<String, Value> {
    let mut cleaned = Map::new();

    for field in fields {
        if mode == Mode::Update && prefix.is_empty() && field.name == OWNER_FIELD {
            continue;
        }

        let path = join_path(prefix, field.name);

        match object.get(field.name) {
            None => {
                if field.required && mode == Mode::Insert {
                    issues.push(Issue::required(&path));
                }
            }
            Some(Value::Null) => {
                if field.required {
                    issues.push(Issue::required(&path));
                } else if !field.nullable {
                    issues.push(Issue::new(
                        &path,
                        IssueCode::InvalidType,
                        format!("{path} must not be null"),
                    ));
                } else if mode == Mode::Update {
                    // Explicit null clears the column on update; on insert it
                    // is the same as leaving the field out.
                    cleaned.insert(field.name.to_string(), Value::Null);
                }
            }
            Some(value) => {
                let checked = check_value(field, value, &path, issues);
                cleaned.insert(field.name.to_string(), checked);
            }
        }
    }

    cleaned
}

fn check_value(field: &FieldSpec, value: &Value, path: &str, issues: &mut Vec<Issue>) -> Value {
    match field.kind {
        FieldKind::Text { max_len } => {
            if let Some(text) = expect_str(value, path, issues) {
                if field.required && text.trim().is_empty() {
                    issues.push(Issue::new(
                        path,
                        IssueCode::TooSmall,
                        format!("{path} must not be empty"),
                    ));
                }
                if let Some(max) = max_len
                    && text.chars().count() > max
                {
                    issues.push(Issue::new(
                        path,
                        IssueCode::TooBig,
                        format!("{path} must be at most {max} characters"),
                    ));
                }
            }
        }
        FieldKind::Integer { min, max } => check_integer(value, path, min, max, issues),
        FieldKind::Number { min } => match value.as_f64() {
            Some(n) if n < min => issues.push(Issue::new(
                path,
                IssueCode::TooSmall,
                format!("{path} must be at least {min}"),
            )),
            Some(_) => {}
            None => issues.push(invalid_type(path, "number")),
        },
        FieldKind::Boolean => {
            if !value.is_boolean() {
                issues.push(invalid_type(path, "boolean"));
            }
        }
        FieldKind::Date => {
            if let Some(text) = expect_str(value, path, issues)
                && parse_date(text).is_none()
            {
                issues.push(Issue::new(
                    path,
                    IssueCode::InvalidFormat,
                    format!("{path} must be a date (YYYY-MM-DD or RFC 3339)"),
                ));
            }
        }
        FieldKind::DateTime => {
            if let Some(text) = expect_str(value, path, issues)
                && DateTime::parse_from_rfc3339(text).is_err()
            {
                issues.push(Issue::new(
                    path,
                    IssueCode::InvalidFormat,
                    format!("{path} must be an RFC 3339 timestamp"),
                ));
            }
        }
        FieldKind::Clock => {
            if let Some(text) = expect_str(value, path, issues)
                && NaiveTime::parse_from_str(text, "%H:%M").is_err()
            {
                issues.push(Issue::new(
                    path,
                    IssueCode::InvalidFormat,
                    format!("{path} must be a time of day (HH:MM)"),
                ));
            }
        }
        FieldKind::OneOf(allowed) => {
            if let Some(text) = expect_str(value, path, issues)
                && !allowed.contains(&text)
            {
                issues.push(Issue::new(
                    path,
                    IssueCode::InvalidValue,
                    format!("{path} must be one of: {}", allowed.join(", ")),
                ));
            }
        }
        FieldKind::TextList => {
            if let Some(items) = expect_array(value, path, issues) {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        issues.push(invalid_type(&format!("{path}[{i}]"), "string"));
                    }
                }
            }
        }
        FieldKind::IntegerList { min, max } => {
            if let Some(items) = expect_array(value, path, issues) {
                for (i, item) in items.iter().enumerate() {
                    check_integer(item, &format!("{path}[{i}]"), min, max, issues);
                }
            }
        }
        FieldKind::Object(nested) => {
            return match value.as_object() {
                // Nested objects are always replaced whole, so their own
                // required fields apply even inside an update.
                Some(object) => {
                    Value::Object(check_object(nested, object, path, Mode::Insert, issues))
                }
                None => {
                    issues.push(invalid_type(path, "object"));
                    value.clone()
                }
            };
        }
        FieldKind::ObjectList(nested) => {
            if let Some(items) = expect_array(value, path, issues) {
                let mut cleaned = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    match item.as_object() {
                        Some(object) => cleaned.push(Value::Object(check_object(
                            nested,
                            object,
                            &item_path,
                            Mode::Insert,
                            issues,
                        ))),
                        None => {
                            issues.push(invalid_type(&item_path, "object"));
                            cleaned.push(item.clone());
                        }
                    }
                }
                return Value::Array(cleaned);
            }
        }
    }

    value.clone()
}

fn check_integer(value: &Value, path: &str, min: i64, max: i64, issues: &mut Vec<Issue>) {
    match value.as_i64() {
        Some(n) if n < min => issues.push(Issue::new(
            path,
            IssueCode::TooSmall,
            format!("{path} must be at least {min}"),
        )),
        Some(n) if n > max => issues.push(Issue::new(
            path,
            IssueCode::TooBig,
            format!("{path} must be at most {max}"),
        )),
        Some(_) => {}
        None => issues.push(invalid_type(path, "integer")),
    }
}

fn invalid_type(path: &str, expected: &str) -> Issue {
    Issue::new(
        path,
        IssueCode::InvalidType,
        format!("{path} must be a {expected}"),
    )
}

fn expect_str<'a>(value: &'a Value, path: &str, issues: &mut Vec<Issue>) -> Option<&'a str> {
    let text = value.as_str();
    if text.is_none() {
        issues.push(invalid_type(path, "string"));
    }
    text
}

fn expect_array<'a>(
    value: &'a Value,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<&'a Vec<Value>> {
    let items = value.as_array();
    if items.is_none() {
        issues.push(invalid_type(path, "list"));
    }
    items
}

/// Parses a calendar date from `YYYY-MM-DD` or the date part of an RFC 3339
/// timestamp.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in patch structs. Use with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PRIORITIES: &[&str] = &["low", "medium", "high"];

    const STEP_FIELDS: &[FieldSpec] = &[
        FieldSpec::required("label", FieldKind::TEXT),
        FieldSpec::optional("minutes", FieldKind::Integer { min: 0, max: 600 }),
    ];

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::required(OWNER_FIELD, FieldKind::ID),
        FieldSpec::required("title", FieldKind::text(10)),
        FieldSpec::optional("notes", FieldKind::TEXT),
        FieldSpec::defaulted("priority", FieldKind::OneOf(PRIORITIES)),
        FieldSpec::optional("due", FieldKind::Date),
        FieldSpec::optional("at", FieldKind::Clock),
        FieldSpec::defaulted("tags", FieldKind::TextList),
        FieldSpec::optional("step", FieldKind::Object(STEP_FIELDS)),
        FieldSpec::optional("steps", FieldKind::ObjectList(STEP_FIELDS)),
    ];

    fn paths(err: &ValidationError) -> Vec<&str> {
        err.issues.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn test_missing_required_field_is_reported_by_path() {
        let err = validate_insert(FIELDS, &json!({ "title": "Call Jane" })).unwrap_err();
        assert_eq!(paths(&err), vec!["userId"]);
        assert_eq!(err.issues[0].code, IssueCode::Required);
    }

    #[test]
    fn test_null_and_blank_required_fields_are_rejected() {
        let err = validate_insert(FIELDS, &json!({ "userId": null, "title": "   " })).unwrap_err();
        assert_eq!(paths(&err), vec!["userId", "title"]);
        assert_eq!(err.issues[1].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_server_assigned_and_unknown_keys_are_stripped() {
        let cleaned = validate_insert(
            FIELDS,
            &json!({
                "id": "client-chosen",
                "createdAt": "2024-01-01T00:00:00Z",
                "userId": "u1",
                "title": "Walk",
                "mystery": 1
            }),
        )
        .unwrap();

        assert_eq!(cleaned, json!({ "userId": "u1", "title": "Walk" }));
    }

    #[test]
    fn test_type_and_value_checks() {
        let err = validate_insert(
            FIELDS,
            &json!({
                "userId": "u1",
                "title": "far too long title",
                "priority": "critical",
                "due": "next week",
                "at": "25:00",
                "tags": ["ok", 3]
            }),
        )
        .unwrap_err();

        assert_eq!(paths(&err), vec!["title", "priority", "due", "at", "tags[1]"]);
        assert_eq!(err.issues[0].code, IssueCode::TooBig);
        assert_eq!(err.issues[1].code, IssueCode::InvalidValue);
        assert_eq!(err.issues[4].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_nested_paths() {
        let err = validate_insert(
            FIELDS,
            &json!({
                "userId": "u1",
                "title": "Plan",
                "step": { "minutes": 5 },
                "steps": [{ "label": "a" }, { "label": "b", "minutes": 900 }, 4]
            }),
        )
        .unwrap_err();

        assert_eq!(paths(&err), vec!["step.label", "steps[1].minutes", "steps[2]"]);
    }

    #[test]
    fn test_null_on_insert_is_dropped_for_nullable_and_rejected_for_defaulted() {
        let cleaned =
            validate_insert(FIELDS, &json!({ "userId": "u1", "title": "a", "notes": null }))
                .unwrap();
        assert_eq!(cleaned, json!({ "userId": "u1", "title": "a" }));

        let err = validate_insert(FIELDS, &json!({ "userId": "u1", "title": "a", "priority": null }))
            .unwrap_err();
        assert_eq!(paths(&err), vec!["priority"]);
    }

    #[test]
    fn test_update_is_relaxed_but_still_typed() {
        let cleaned = validate_update(FIELDS, &json!({ "notes": null, "userId": "other" })).unwrap();
        assert_eq!(cleaned, json!({ "notes": null }));

        let err = validate_update(FIELDS, &json!({ "title": null, "priority": 3 })).unwrap_err();
        assert_eq!(paths(&err), vec!["title", "priority"]);

        assert_eq!(validate_update(FIELDS, &json!({})).unwrap(), json!({}));
    }

    #[test]
    fn test_non_object_body() {
        let err = validate_insert(FIELDS, &json!([1, 2])).unwrap_err();
        assert_eq!(err.issues[0].code, IssueCode::InvalidType);
        assert_eq!(err.issues[0].path, "");
    }

    #[test]
    fn test_parse_date_accepts_both_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9);
        assert_eq!(parse_date("2025-03-09"), expected);
        assert_eq!(parse_date("2025-03-09T22:15:00+02:00"), expected);
        assert_eq!(parse_date("03/09/2025"), None);
    }

    #[test]
    fn test_nullable_distinguishes_absent_from_null() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "nullable")]
            notes: Option<Option<String>>,
        }

        let absent: Patch = serde_json::from_value(json!({})).unwrap();
        let cleared: Patch = serde_json::from_value(json!({ "notes": null })).unwrap();
        let set: Patch = serde_json::from_value(json!({ "notes": "x" })).unwrap();

        assert_eq!(absent.notes, None);
        assert_eq!(cleared.notes, Some(None));
        assert_eq!(set.notes, Some(Some("x".to_string())));
    }

    #[test]
    fn test_error_message_summarizes_issues() {
        let err = validate_insert(FIELDS, &json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid payload: userId is required; title is required"
        );
    }
}
