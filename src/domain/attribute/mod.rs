//! Attribute registry aggregate
//!
//! Attribute definitions are independent of any service type; bindings
//! attach them to one.

pub mod model;
pub mod repository;

pub use model::{
    AttributeDefinition, AttributeDefinitionPatch, DataType, EntityType, InputType,
    NewAttributeDefinition, SelectOption,
};
pub use repository::AttributeDefinitionRepository;
