//! Service area repository interface

use async_trait::async_trait;

use super::model::ServiceArea;
use crate::domain::DomainResult;

#[async_trait]
pub trait ServiceAreaRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ServiceArea>>;
    async fn find_by_pincode(&self, pincode: &str) -> DomainResult<Option<ServiceArea>>;
    /// Areas that carry coordinates, for nearest-area matching.
    async fn find_geolocated(&self) -> DomainResult<Vec<ServiceArea>>;
    /// Inserts when `id == 0`, otherwise replaces. Returns the stored row.
    async fn save(&self, area: ServiceArea) -> DomainResult<ServiceArea>;
}
