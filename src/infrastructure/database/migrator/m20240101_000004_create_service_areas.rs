//! Create service_areas table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceAreas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceAreas::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceAreas::Pincode).string().not_null())
                    .col(ColumnDef::new(ServiceAreas::City).string().not_null())
                    .col(ColumnDef::new(ServiceAreas::State).string().not_null())
                    .col(
                        ColumnDef::new(ServiceAreas::Country)
                            .string()
                            .not_null()
                            .default("India"),
                    )
                    .col(
                        ColumnDef::new(ServiceAreas::IsServiceable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ServiceAreas::ServiceTypes)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(ServiceAreas::DeliveryTimeHours).integer())
                    .col(ColumnDef::new(ServiceAreas::DeliveryCharge).big_integer())
                    .col(ColumnDef::new(ServiceAreas::Latitude).double())
                    .col(ColumnDef::new(ServiceAreas::Longitude).double())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_areas_pincode")
                    .table(ServiceAreas::Table)
                    .col(ServiceAreas::Pincode)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceAreas::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServiceAreas {
    Table,
    Id,
    Pincode,
    City,
    State,
    Country,
    IsServiceable,
    ServiceTypes,
    DeliveryTimeHours,
    DeliveryCharge,
    Latitude,
    Longitude,
}
