//! Create attribute_definitions table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AttributeDefinitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttributeDefinitions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttributeDefinitions::Name)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttributeDefinitions::Label).string())
                    .col(
                        ColumnDef::new(AttributeDefinitions::DataType)
                            .string()
                            .not_null()
                            .default("text"),
                    )
                    .col(
                        ColumnDef::new(AttributeDefinitions::InputType)
                            .string()
                            .not_null()
                            .default("text"),
                    )
                    .col(ColumnDef::new(AttributeDefinitions::Options).text())
                    .col(ColumnDef::new(AttributeDefinitions::Placeholder).string())
                    .col(ColumnDef::new(AttributeDefinitions::HelpText).string())
                    .col(ColumnDef::new(AttributeDefinitions::GroupName).string())
                    .col(ColumnDef::new(AttributeDefinitions::DefaultValue).string())
                    .col(
                        ColumnDef::new(AttributeDefinitions::ApplicableEntityTypes)
                            .text()
                            .not_null()
                            .default("[\"product\"]"),
                    )
                    .col(
                        ColumnDef::new(AttributeDefinitions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AttributeDefinitions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeDefinitions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_definitions_name")
                    .table(AttributeDefinitions::Table)
                    .col(AttributeDefinitions::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttributeDefinitions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum AttributeDefinitions {
    Table,
    Id,
    Name,
    Label,
    DataType,
    InputType,
    Options,
    Placeholder,
    HelpText,
    GroupName,
    DefaultValue,
    ApplicableEntityTypes,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
