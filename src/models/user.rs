use serde::{Deserialize, Serialize};

use crate::entities::users;
use crate::schema::{FieldKind, FieldSpec, Issue, IssueCode, Schema, ValidationError};

pub const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("username", FieldKind::text(64)),
    FieldSpec::required("password", FieldKind::text(256)),
    FieldSpec::optional("displayName", FieldKind::text(100)),
];

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl Schema for NewUser {
    const FIELDS: &'static [FieldSpec] = USER_FIELDS;
}

impl NewUser {
    /// Length rules the field specs cannot express.
    pub fn check_credentials(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.username.trim().chars().count() < MIN_USERNAME_LEN {
            issues.push(Issue::new(
                "username",
                IssueCode::TooSmall,
                format!("username must be at least {MIN_USERNAME_LEN} characters"),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            issues.push(Issue::new(
                "password",
                IssueCode::TooSmall,
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

/// User as returned by the API. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for UserDto {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
