//! Catalog query interface

use async_trait::async_trait;

use super::model::{CatalogQuery, CatalogRow};
use crate::domain::DomainResult;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Active offerings of the query's service type that carry local pricing
    /// in the area. `price`/`stock`/`is_available` are the area values.
    async fn area_catalog(&self, service_area_id: i32, query: &CatalogQuery)
        -> DomainResult<Vec<CatalogRow>>;

    /// Whether any local pricing exists for the area and service type,
    /// ignoring category/search filters.
    async fn has_area_pricing(&self, service_area_id: i32, service_type: &str) -> DomainResult<bool>;

    /// Active offerings of the service type at base price.
    async fn global_catalog(&self, query: &CatalogQuery) -> DomainResult<Vec<CatalogRow>>;
}
