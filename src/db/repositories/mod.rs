pub mod asset;
pub mod contact;
pub mod mood;
pub mod note;
pub mod project;
pub mod task;
pub mod user;

use chrono::{SecondsFormat, Utc};

/// Current time as an RFC 3339 string in UTC with millisecond precision.
///
/// Every stored timestamp uses this format so that string order matches
/// chronological order.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
