use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};
use tokio::task;

use super::{new_id, now_timestamp};
use crate::config::SecurityConfig;
use crate::entities::users;
use crate::models::user::{NewUser, UserDto};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates a user, hashing the password with the configured Argon2id
    /// parameters. Returns `None` when the username is already taken.
    pub async fn create(&self, input: NewUser, config: &SecurityConfig) -> Result<Option<UserDto>> {
        let password = input.password;
        let config = config.clone();
        // Argon2 is CPU-heavy; keep it off the async workers.
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let now = now_timestamp();
        let active = users::ActiveModel {
            id: Set(new_id()),
            username: Set(input.username.trim().to_string()),
            password_hash: Set(password_hash),
            display_name: Set(input.display_name),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        match active.insert(&self.conn).await {
            Ok(user) => Ok(Some(UserDto::from(user))),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<UserDto>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(UserDto::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserDto>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username.trim()))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(UserDto::from))
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        let count = users::Entity::find_by_id(id)
            .count(&self.conn)
            .await
            .context("Failed to check user existence")?;

        Ok(count > 0)
    }
}

/// Hash a password using Argon2id with the given parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};

    #[test]
    fn test_hash_password_uses_argon2id() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };
        let hash = hash_password("correct horse", &config).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
    }
}
