//! Request validation: body and query extractors that answer with a 400
//! envelope, plus checks for list parameters.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;
use crate::db::Store;
use crate::schema::{self, Issue, IssueCode, OWNER_FIELD, Schema, ValidationError};

pub const DEFAULT_WITHIN_DAYS: i64 = 30;

/// JSON body validated against the insert schema of `T`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Schema,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let payload = json_body(req, state).await?;
        Ok(Self(schema::insert(&payload)?))
    }
}

/// JSON body validated against the relaxed update schema of `T`.
pub struct ValidPatch<T>(pub T);

impl<S, T> FromRequest<S> for ValidPatch<T>
where
    S: Send + Sync,
    T: Schema,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let payload = json_body(req, state).await?;
        Ok(Self(schema::update(&payload)?))
    }
}

async fn json_body<S: Send + Sync>(req: Request, state: &S) -> Result<Value, ApiError> {
    let Json(payload) = Json::<Value>::from_request(req, state)
        .await
        .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    Ok(payload)
}

/// Query string extractor whose failures use the API error envelope.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Self(query))
    }
}

fn invalid_param(name: &str, code: IssueCode, message: String) -> ApiError {
    ValidationError::single(Issue::new(name, code, message)).into()
}

/// The `ownerId` list parameter, which must be present and non-blank.
pub fn require_owner(owner_id: Option<&str>) -> Result<&str, ApiError> {
    match owner_id.map(str::trim) {
        Some(owner) if !owner.is_empty() => Ok(owner),
        _ => Err(invalid_param(
            "ownerId",
            IssueCode::Required,
            "ownerId query parameter is required".to_string(),
        )),
    }
}

pub fn validate_limit(limit: Option<i64>) -> Result<Option<u64>, ApiError> {
    const MAX_LIMIT: i64 = 1000;
    const MIN_LIMIT: i64 = 1;

    let Some(limit) = limit else {
        return Ok(None);
    };

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(invalid_param(
            "limit",
            IssueCode::InvalidValue,
            format!("Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_LIMIT}"),
        ));
    }
    Ok(u64::try_from(limit).ok())
}

pub fn validate_within_days(within_days: Option<i64>) -> Result<u32, ApiError> {
    const MAX_DAYS: i64 = 365;

    let days = within_days.unwrap_or(DEFAULT_WITHIN_DAYS);
    if !(1..=MAX_DAYS).contains(&days) {
        return Err(invalid_param(
            "withinDays",
            IssueCode::InvalidValue,
            format!("Invalid withinDays: {days}. Must be between 1 and {MAX_DAYS}"),
        ));
    }
    u32::try_from(days).map_err(|e| ApiError::internal(e.to_string()))
}

/// Parses an optional closed-set query parameter, e.g. a status filter.
pub fn parse_choice<T: DeserializeOwned>(
    name: &str,
    value: Option<&str>,
    allowed: &[&str],
) -> Result<Option<T>, ApiError> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    serde_json::from_value(Value::String(value.to_string()))
        .map(Some)
        .map_err(|_| {
            invalid_param(
                name,
                IssueCode::InvalidValue,
                format!("{name} must be one of: {}", allowed.join(", ")),
            )
        })
}

/// Rejects a create payload whose `userId` does not name an existing user.
pub async fn ensure_owner_exists(store: &Store, user_id: &str) -> Result<(), ApiError> {
    if store.user_exists(user_id).await? {
        Ok(())
    } else {
        Err(invalid_param(
            OWNER_FIELD,
            IssueCode::UnknownReference,
            format!("User {user_id} does not exist"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::types::TaskStatus;

    #[test]
    fn test_require_owner() {
        assert_eq!(require_owner(Some(" u1 ")).unwrap(), "u1");
        assert!(require_owner(Some("  ")).is_err());
        assert!(require_owner(None).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None).unwrap(), None);
        assert_eq!(validate_limit(Some(10)).unwrap(), Some(10));
        assert!(validate_limit(Some(0)).is_err());
        assert!(validate_limit(Some(1001)).is_err());
    }

    #[test]
    fn test_validate_within_days() {
        assert_eq!(validate_within_days(None).unwrap(), 30);
        assert_eq!(validate_within_days(Some(365)).unwrap(), 365);
        assert!(validate_within_days(Some(0)).is_err());
        assert!(validate_within_days(Some(366)).is_err());
    }

    #[test]
    fn test_parse_choice() {
        let status: Option<TaskStatus> =
            parse_choice("status", Some("in_progress"), TaskStatus::VALUES).unwrap();
        assert_eq!(status, Some(TaskStatus::InProgress));

        assert!(parse_choice::<TaskStatus>("status", Some("done"), TaskStatus::VALUES).is_err());
        assert_eq!(
            parse_choice::<TaskStatus>("status", None, TaskStatus::VALUES).unwrap(),
            None
        );
    }
}
