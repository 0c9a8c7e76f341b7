use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::{new_id, now_timestamp};
use crate::entities::{mood_entries, prelude::*};
use crate::models::mood::NewMoodEntry;

/// Mood entries are append-only; there is no update or delete.
pub struct MoodRepository {
    conn: DatabaseConnection,
}

impl MoodRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, owner_id: &str, limit: Option<u64>) -> Result<Vec<mood_entries::Model>> {
        MoodEntries::find()
            .filter(mood_entries::Column::UserId.eq(owner_id))
            .order_by_desc(mood_entries::Column::Timestamp)
            .order_by_desc(mood_entries::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list mood entries")
    }

    pub async fn get(&self, id: &str) -> Result<Option<mood_entries::Model>> {
        MoodEntries::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query mood entry")
    }

    pub async fn create(&self, input: NewMoodEntry) -> Result<mood_entries::Model> {
        let now = now_timestamp();
        let active = mood_entries::ActiveModel {
            id: Set(new_id()),
            timestamp: Set(input.resolved_timestamp(&now)),
            user_id: Set(input.user_id),
            mood: Set(input.mood),
            energy_level: Set(input.energy_level),
            notes: Set(input.notes),
            created_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert mood entry")
    }
}
