use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::types::{ProjectPriority, ProjectStatus, Tags};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "projects")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub category: Option<String>,
    /// Percent complete, 0..=100
    pub progress: i32,
    pub deadline: Option<String>,
    pub budget: Option<f64>,
    pub spent: f64,
    pub priority: ProjectPriority,
    #[sea_orm(column_type = "Json")]
    pub tags: Tags,
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
