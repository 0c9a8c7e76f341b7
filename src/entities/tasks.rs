use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::types::{RecurringPattern, TaskPriority, TaskStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tasks")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    /// Not a foreign key: deleting a project leaves its tasks pointing at it.
    pub project_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// Start time of day, `HH:MM`
    pub time: Option<String>,
    /// Minutes
    pub duration: Option<i32>,
    pub priority: TaskPriority,
    pub category: Option<String>,
    pub status: TaskStatus,
    pub scheduled_date: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub recurring_pattern: Option<RecurringPattern>,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
