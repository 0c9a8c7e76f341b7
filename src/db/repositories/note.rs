use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use super::{new_id, now_timestamp};
use crate::entities::{notes, prelude::*, types::Tags};
use crate::models::note::{NewNote, NotePatch};

pub struct NoteRepository {
    conn: DatabaseConnection,
}

impl NoteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<notes::Model>> {
        Notes::find()
            .filter(notes::Column::UserId.eq(owner_id))
            .order_by_desc(notes::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list notes")
    }

    pub async fn get(&self, id: &str) -> Result<Option<notes::Model>> {
        Notes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query note")
    }

    pub async fn create(&self, input: NewNote) -> Result<notes::Model> {
        let now = now_timestamp();
        let active = notes::ActiveModel {
            id: Set(new_id()),
            user_id: Set(input.user_id),
            title: Set(input.title),
            content: Set(input.content),
            category: Set(input.category),
            tags: Set(Tags(input.tags)),
            task_id: Set(input.task_id),
            project_id: Set(input.project_id),
            contact_id: Set(input.contact_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert note")
    }

    pub async fn update(&self, id: &str, patch: NotePatch) -> Result<Option<notes::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(Tags(tags));
        }
        if let Some(task_id) = patch.task_id {
            active.task_id = Set(task_id);
        }
        if let Some(project_id) = patch.project_id {
            active.project_id = Set(project_id);
        }
        if let Some(contact_id) = patch.contact_id {
            active.contact_id = Set(contact_id);
        }
        active.updated_at = Set(now_timestamp());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update note")?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Notes::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete note")?;
        Ok(result.rows_affected > 0)
    }
}
