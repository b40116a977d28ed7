//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::attribute::AttributeDefinitionRepository;
use crate::domain::binding::AttributeBindingRepository;
use crate::domain::catalog::CatalogRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::service_area::ServiceAreaRepository;
use crate::domain::service_type::ServiceTypeRepository;

use super::attribute_repository::SeaOrmAttributeRepository;
use super::binding_repository::SeaOrmBindingRepository;
use super::catalog_repository::SeaOrmCatalogRepository;
use super::service_area_repository::SeaOrmServiceAreaRepository;
use super::service_type_repository::SeaOrmServiceTypeRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let bindings = repos.bindings().find_by_service_type("grocery").await?;
/// let area = repos.service_areas().find_by_pincode("560001").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    attributes: SeaOrmAttributeRepository,
    bindings: SeaOrmBindingRepository,
    service_types: SeaOrmServiceTypeRepository,
    service_areas: SeaOrmServiceAreaRepository,
    catalog: SeaOrmCatalogRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            attributes: SeaOrmAttributeRepository::new(db.clone()),
            bindings: SeaOrmBindingRepository::new(db.clone()),
            service_types: SeaOrmServiceTypeRepository::new(db.clone()),
            service_areas: SeaOrmServiceAreaRepository::new(db.clone()),
            catalog: SeaOrmCatalogRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn attributes(&self) -> &dyn AttributeDefinitionRepository {
        &self.attributes
    }

    fn bindings(&self) -> &dyn AttributeBindingRepository {
        &self.bindings
    }

    fn service_types(&self) -> &dyn ServiceTypeRepository {
        &self.service_types
    }

    fn service_areas(&self) -> &dyn ServiceAreaRepository {
        &self.service_areas
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        &self.catalog
    }
}
