use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use super::{new_id, now_timestamp};
use crate::entities::{prelude::*, projects, types::Tags};
use crate::models::project::{NewProject, ProjectPatch};

pub struct ProjectRepository {
    conn: DatabaseConnection,
}

impl ProjectRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<projects::Model>> {
        Projects::find()
            .filter(projects::Column::UserId.eq(owner_id))
            .order_by_desc(projects::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list projects")
    }

    pub async fn get(&self, id: &str) -> Result<Option<projects::Model>> {
        Projects::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query project")
    }

    pub async fn create(&self, input: NewProject) -> Result<projects::Model> {
        let now = now_timestamp();
        let active = projects::ActiveModel {
            id: Set(new_id()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            description: Set(input.description),
            status: Set(input.status),
            category: Set(input.category),
            progress: Set(input.progress),
            deadline: Set(input.deadline),
            budget: Set(input.budget),
            spent: Set(input.spent),
            priority: Set(input.priority),
            tags: Set(Tags(input.tags)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert project")
    }

    pub async fn update(&self, id: &str, patch: ProjectPatch) -> Result<Option<projects::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(progress) = patch.progress {
            active.progress = Set(progress);
        }
        if let Some(deadline) = patch.deadline {
            active.deadline = Set(deadline);
        }
        if let Some(budget) = patch.budget {
            active.budget = Set(budget);
        }
        if let Some(spent) = patch.spent {
            active.spent = Set(spent);
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority);
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(Tags(tags));
        }
        active.updated_at = Set(now_timestamp());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update project")?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Projects::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete project")?;
        Ok(result.rows_affected > 0)
    }
}
