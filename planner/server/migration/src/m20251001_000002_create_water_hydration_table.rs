use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum WaterHydration {
    Table,
    Id,
    Liters,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WaterHydration::Table)
                    .if_not_exists()
                    .col(integer(WaterHydration::Id).primary_key())
                    .col(double(WaterHydration::Liters).default(0.0))
                    .col(
                        timestamp_with_time_zone(WaterHydration::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WaterHydration::Table).to_owned())
            .await
    }
}
