use sea_orm_migration::prelude::*;

const CREATED_AT_INDEX: &str = "idx_blog_posts_created_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_table()).await?;
        manager.create_index(created_at_index()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogPosts::Table).if_exists().to_owned())
            .await
    }
}

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(BlogPosts::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(BlogPosts::Id)
                .uuid()
                .not_null()
                .primary_key()
                .default(Expr::cust("gen_random_uuid()")),
        )
        .col(ColumnDef::new(BlogPosts::Title).string().not_null())
        .col(ColumnDef::new(BlogPosts::Content).text().not_null())
        .col(ColumnDef::new(BlogPosts::Excerpt).text().not_null())
        .col(ColumnDef::new(BlogPosts::Type).string_len(20).not_null())
        .col(ColumnDef::new(BlogPosts::Topic).string().not_null())
        .col(ColumnDef::new(BlogPosts::Metrics).json_binary().null())
        .col(ColumnDef::new(BlogPosts::Sources).json_binary().null())
        .col(ColumnDef::new(BlogPosts::CaseStudyLink).string().null())
        .col(
            ColumnDef::new(BlogPosts::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(BlogPosts::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(BlogPosts::Published)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(BlogPosts::Seq)
                .big_integer()
                .not_null()
                .auto_increment()
                .unique_key(),
        )
        .check(Expr::col(BlogPosts::Type).is_in(["blog", "case-study"]))
        .to_owned()
}

/// Listing is always newest-first, ties broken by insertion order.
fn created_at_index() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name(CREATED_AT_INDEX)
        .table(BlogPosts::Table)
        .col((BlogPosts::CreatedAt, IndexOrder::Desc))
        .col((BlogPosts::Seq, IndexOrder::Desc))
        .to_owned()
}

#[derive(DeriveIden)]
enum BlogPosts {
    Table,
    Id,
    Title,
    Content,
    Excerpt,
    #[sea_orm(iden = "type")]
    Type,
    Topic,
    Metrics,
    Sources,
    CaseStudyLink,
    CreatedAt,
    UpdatedAt,
    Published,
    Seq,
}
