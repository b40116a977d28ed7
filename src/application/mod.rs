pub mod services;

// Re-export key types for convenience
pub use services::{
    generate_preview, AttributeRegistryService, BindingResolver, CatalogResolver,
    LocationResolution, LocationResolver, LocationSession, LocationState, PreviewField,
};
