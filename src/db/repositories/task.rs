use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QueryTrait, Set,
};

use super::{new_id, now_timestamp};
use crate::entities::{prelude::*, tasks, types::TaskStatus};
use crate::models::task::{NewTask, TaskFilter, TaskPatch, completion_stamp};

pub struct TaskRepository {
    conn: DatabaseConnection,
}

impl TaskRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, owner_id: &str, filter: TaskFilter) -> Result<Vec<tasks::Model>> {
        Tasks::find()
            .filter(tasks::Column::UserId.eq(owner_id))
            .apply_if(filter.project_id, |query, project_id| {
                query.filter(tasks::Column::ProjectId.eq(project_id))
            })
            .apply_if(filter.status, |query, status| {
                query.filter(tasks::Column::Status.eq(status))
            })
            .order_by_desc(tasks::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list tasks")
    }

    pub async fn get(&self, id: &str) -> Result<Option<tasks::Model>> {
        Tasks::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query task")
    }

    pub async fn create(&self, input: NewTask) -> Result<tasks::Model> {
        let now = now_timestamp();
        let completed_at = (input.status == TaskStatus::Completed).then(|| now.clone());

        let active = tasks::ActiveModel {
            id: Set(new_id()),
            user_id: Set(input.user_id),
            project_id: Set(input.project_id),
            title: Set(input.title),
            description: Set(input.description),
            time: Set(input.time),
            duration: Set(input.duration),
            priority: Set(input.priority),
            category: Set(input.category),
            status: Set(input.status),
            scheduled_date: Set(input.scheduled_date),
            recurring_pattern: Set(input.recurring_pattern),
            completed_at: Set(completed_at),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert task")
    }

    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Option<tasks::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let now = now_timestamp();
        let previous_status = existing.status;
        let mut active = existing.into_active_model();

        if let Some(project_id) = patch.project_id {
            active.project_id = Set(project_id);
        }
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(time) = patch.time {
            active.time = Set(time);
        }
        if let Some(duration) = patch.duration {
            active.duration = Set(duration);
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(status) = patch.status {
            if let Some(completed_at) = completion_stamp(previous_status, status, &now) {
                active.completed_at = Set(completed_at);
            }
            active.status = Set(status);
        }
        if let Some(scheduled_date) = patch.scheduled_date {
            active.scheduled_date = Set(scheduled_date);
        }
        if let Some(recurring_pattern) = patch.recurring_pattern {
            active.recurring_pattern = Set(recurring_pattern);
        }
        active.updated_at = Set(now);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update task")?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Tasks::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete task")?;
        Ok(result.rows_affected > 0)
    }
}
