//! Create categories, offerings and area_offerings tables

use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_service_areas::ServiceAreas;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Offerings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Offerings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Offerings::ServiceTypeId).string().not_null())
                    .col(ColumnDef::new(Offerings::CategoryId).integer())
                    .col(ColumnDef::new(Offerings::Name).string().not_null())
                    .col(
                        ColumnDef::new(Offerings::BasePrice)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Offerings::Stock).big_integer())
                    .col(
                        ColumnDef::new(Offerings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Offerings::PrimaryImageUrl).string())
                    .col(
                        ColumnDef::new(Offerings::CustomFields)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(ColumnDef::new(Offerings::Brand).string())
                    .col(ColumnDef::new(Offerings::Rating).string())
                    .col(ColumnDef::new(Offerings::Seats).string())
                    .col(ColumnDef::new(Offerings::Transmission).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offerings_category")
                            .from(Offerings::Table, Offerings::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_offerings_service_type")
                    .table(Offerings::Table)
                    .col(Offerings::ServiceTypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AreaOfferings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AreaOfferings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AreaOfferings::ServiceAreaId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AreaOfferings::OfferingId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AreaOfferings::Price)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AreaOfferings::Stock).big_integer())
                    .col(
                        ColumnDef::new(AreaOfferings::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_area_offerings_area")
                            .from(AreaOfferings::Table, AreaOfferings::ServiceAreaId)
                            .to(ServiceAreas::Table, ServiceAreas::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_area_offerings_offering")
                            .from(AreaOfferings::Table, AreaOfferings::OfferingId)
                            .to(Offerings::Table, Offerings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_area_offerings_unique")
                    .table(AreaOfferings::Table)
                    .col(AreaOfferings::ServiceAreaId)
                    .col(AreaOfferings::OfferingId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AreaOfferings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offerings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Categories {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub enum Offerings {
    Table,
    Id,
    ServiceTypeId,
    CategoryId,
    Name,
    BasePrice,
    Stock,
    IsActive,
    PrimaryImageUrl,
    CustomFields,
    Brand,
    Rating,
    Seats,
    Transmission,
}

#[derive(Iden)]
pub enum AreaOfferings {
    Table,
    Id,
    ServiceAreaId,
    OfferingId,
    Price,
    Stock,
    IsAvailable,
}
