//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::attribute::AttributeDefinitionRepository;
use super::binding::AttributeBindingRepository;
use super::catalog::CatalogRepository;
use super::service_area::ServiceAreaRepository;
use super::service_type::ServiceTypeRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let st = repos.service_types().find_by_id("handyman").await?;
///     let bindings = repos.bindings().find_by_service_type("handyman").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn attributes(&self) -> &dyn AttributeDefinitionRepository;
    fn bindings(&self) -> &dyn AttributeBindingRepository;
    fn service_types(&self) -> &dyn ServiceTypeRepository;
    fn service_areas(&self) -> &dyn ServiceAreaRepository;
    fn catalog(&self) -> &dyn CatalogRepository;
}
