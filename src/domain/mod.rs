pub mod attribute;
pub mod binding;
pub mod catalog;
pub mod repositories;
pub mod service_area;
pub mod service_type;

// Re-export commonly used types
pub use attribute::{AttributeDefinition, DataType, EntityType, InputType, SelectOption};
pub use binding::{
    AttributeBinding, BindingPatch, Direction, FieldGroup, FieldRef, ResolvedField,
    MANDATORY_FIELDS,
};
pub use catalog::{CatalogEntry, CatalogFilters, PriceSource};
pub use repositories::{DomainResult, RepositoryProvider};
pub use service_area::{GeoPoint, LocationQuery, ServiceArea};
pub use service_type::ServiceType;

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
