//! Service type repository interface

use async_trait::async_trait;

use super::model::ServiceType;
use crate::domain::DomainResult;

#[async_trait]
pub trait ServiceTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceType>>;
    /// Active service types, ascending by `(sort_order, id)`.
    async fn find_active(&self) -> DomainResult<Vec<ServiceType>>;
    /// Insert or replace by id.
    async fn save(&self, service_type: ServiceType) -> DomainResult<()>;
    /// Deletes the service type together with its bindings.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
