//! Application services

mod attribute_registry;
mod binding_resolver;
mod catalog;
pub mod form_schema;
mod location;

#[cfg(test)]
pub(crate) mod test_support;

pub use attribute_registry::AttributeRegistryService;
pub use binding_resolver::BindingResolver;
pub use catalog::CatalogResolver;
pub use form_schema::{generate_preview, PreviewField, PreviewFieldType};
pub use location::{
    LocationResolution, LocationResolver, LocationSession, LocationState, NotServiceableReason,
    RequestTicket,
};
