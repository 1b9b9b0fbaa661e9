use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: name lookups from search
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_name")
                    .table(Users::Table)
                    .col(Users::Name)
                    .to_owned(),
            )
            .await?;

        // Items: price range filters
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_items_price")
                    .table(Items::Table)
                    .col(Items::Price)
                    .to_owned(),
            )
            .await?;

        // Posts: published-only listing and stats
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_posts_published")
                    .table(Posts::Table)
                    .col(Posts::Published)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_posts_published").table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_items_price").table(Items::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_users_name").table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users { Table, Name }

#[derive(DeriveIden)]
enum Items { Table, Price }

#[derive(DeriveIden)]
enum Posts { Table, Published }
