//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_service_types;
mod m20240101_000002_create_attribute_definitions;
mod m20240101_000003_create_attribute_bindings;
mod m20240101_000004_create_service_areas;
mod m20240101_000005_create_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_service_types::Migration),
            Box::new(m20240101_000002_create_attribute_definitions::Migration),
            Box::new(m20240101_000003_create_attribute_bindings::Migration),
            Box::new(m20240101_000004_create_service_areas::Migration),
            Box::new(m20240101_000005_create_catalog::Migration),
        ]
    }
}
