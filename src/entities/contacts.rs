use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::types::Tags;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "contacts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship_type: Option<String>,
    /// Closeness, 1..=5
    pub relationship_level: Option<i32>,
    pub contact_frequency_days: Option<i32>,
    pub last_contacted_at: Option<String>,
    pub next_contact_due: Option<String>,
    pub notes: Option<String>,
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
