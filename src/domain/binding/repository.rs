//! Attribute binding repository interface
//!
//! Multi-row writes are all-or-nothing: implementations run them in a
//! single transaction (or under a single lock).

use async_trait::async_trait;

use super::model::{AttributeBinding, NewBinding};
use crate::domain::DomainResult;

#[async_trait]
pub trait AttributeBindingRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<AttributeBinding>>;
    /// All bindings of a service type, ascending by `(display_order, id)`.
    async fn find_by_service_type(&self, service_type_id: &str)
        -> DomainResult<Vec<AttributeBinding>>;
    async fn count_for_attribute(&self, attribute_id: i32) -> DomainResult<u64>;
    /// Inserts every row or none. Fails with `Conflict` if any
    /// `(service_type_id, attribute_id)` pair already exists.
    async fn insert_batch(&self, bindings: Vec<NewBinding>) -> DomainResult<Vec<AttributeBinding>>;
    async fn update(&self, binding: AttributeBinding) -> DomainResult<()>;
    /// Exchange the stored `display_order` of two bindings as one unit.
    async fn swap_display_order(&self, first_id: i32, second_id: i32) -> DomainResult<()>;
    /// Rewrite `display_order` for each `(binding_id, order)` as one unit.
    async fn renumber(&self, orders: &[(i32, u32)]) -> DomainResult<()>;
    async fn delete_batch(&self, service_type_id: &str, attribute_ids: &[i32]) -> DomainResult<u64>;
}
