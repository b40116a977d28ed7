//! Attribute binding aggregate
//!
//! Binds registry definitions to a service type with per-binding overrides,
//! ordering and grouping. Mandatory fields live outside the table.

pub mod model;
pub mod repository;

pub use model::{
    is_mandatory_key, AttributeBinding, BindingPatch, Direction, FieldGroup, FieldRef,
    FieldSource, MandatoryField, NewBinding, ResolvedField, MANDATORY_FIELDS,
};
pub use repository::AttributeBindingRepository;
