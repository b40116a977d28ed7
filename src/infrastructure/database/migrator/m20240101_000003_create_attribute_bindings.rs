//! Create attribute_bindings table
//!
//! One row per (service type, attribute definition). Bindings go away with
//! their service type; a bound definition cannot be deleted.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_service_types::ServiceTypes;
use super::m20240101_000002_create_attribute_definitions::AttributeDefinitions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AttributeBindings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttributeBindings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttributeBindings::ServiceTypeId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeBindings::AttributeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeBindings::IsRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AttributeBindings::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AttributeBindings::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AttributeBindings::FieldGroup)
                            .string()
                            .not_null()
                            .default("custom"),
                    )
                    .col(ColumnDef::new(AttributeBindings::OverrideLabel).string())
                    .col(ColumnDef::new(AttributeBindings::OverridePlaceholder).string())
                    .col(ColumnDef::new(AttributeBindings::OverrideHelpText).string())
                    .col(
                        ColumnDef::new(AttributeBindings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeBindings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_bindings_service_type")
                            .from(AttributeBindings::Table, AttributeBindings::ServiceTypeId)
                            .to(ServiceTypes::Table, ServiceTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_bindings_attribute")
                            .from(AttributeBindings::Table, AttributeBindings::AttributeId)
                            .to(AttributeDefinitions::Table, AttributeDefinitions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_bindings_unique")
                    .table(AttributeBindings::Table)
                    .col(AttributeBindings::ServiceTypeId)
                    .col(AttributeBindings::AttributeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_bindings_attribute")
                    .table(AttributeBindings::Table)
                    .col(AttributeBindings::AttributeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttributeBindings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum AttributeBindings {
    Table,
    Id,
    ServiceTypeId,
    AttributeId,
    IsRequired,
    IsVisible,
    DisplayOrder,
    FieldGroup,
    OverrideLabel,
    OverridePlaceholder,
    OverrideHelpText,
    CreatedAt,
    UpdatedAt,
}
