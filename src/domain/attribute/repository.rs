//! Attribute definition repository interface

use async_trait::async_trait;

use super::model::{AttributeDefinition, NewAttributeDefinition};
use crate::domain::DomainResult;

#[async_trait]
pub trait AttributeDefinitionRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<AttributeDefinition>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<AttributeDefinition>>;
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<AttributeDefinition>>;
    async fn find_all(&self) -> DomainResult<Vec<AttributeDefinition>>;
    /// Fails with `Conflict` when the name is already taken.
    async fn save(&self, definition: NewAttributeDefinition) -> DomainResult<AttributeDefinition>;
    async fn update(&self, definition: AttributeDefinition) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
