//! Database entities module

pub mod area_offering;
pub mod attribute_binding;
pub mod attribute_definition;
pub mod category;
pub mod offering;
pub mod service_area;
pub mod service_type;

pub use area_offering::Entity as AreaOffering;
pub use attribute_binding::Entity as AttributeBinding;
pub use attribute_definition::Entity as AttributeDefinition;
pub use category::Entity as Category;
pub use offering::Entity as Offering;
pub use service_area::Entity as ServiceArea;
pub use service_type::Entity as ServiceType;
