use crate::entities::{assets, contacts, mood_entries, notes, prelude::*, projects, tasks};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_projects_user_id")
                    .table(Projects)
                    .col(projects::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_user_id")
                    .table(Tasks)
                    .col(tasks::Column::UserId)
                    .col(tasks::Column::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contacts_user_id")
                    .table(Contacts)
                    .col(contacts::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notes_user_id")
                    .table(Notes)
                    .col(notes::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assets_user_id")
                    .table(Assets)
                    .col(assets::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mood_entries_user_timestamp")
                    .table(MoodEntries)
                    .col(mood_entries::Column::UserId)
                    .col(mood_entries::Column::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_projects_user_id", Projects.into_table_ref()),
            ("idx_tasks_user_id", Tasks.into_table_ref()),
            ("idx_contacts_user_id", Contacts.into_table_ref()),
            ("idx_notes_user_id", Notes.into_table_ref()),
            ("idx_assets_user_id", Assets.into_table_ref()),
            ("idx_mood_entries_user_timestamp", MoodEntries.into_table_ref()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}
