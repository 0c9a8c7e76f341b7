use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Users first: every other table carries a foreign key to it.
        create(manager, &schema, Users).await?;
        create(manager, &schema, Projects).await?;
        create(manager, &schema, Tasks).await?;
        create(manager, &schema, Contacts).await?;
        create(manager, &schema, Notes).await?;
        create(manager, &schema, Assets).await?;
        create(manager, &schema, MoodEntries).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MoodEntries).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

async fn create<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}
