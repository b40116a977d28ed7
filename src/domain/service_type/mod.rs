//! Service type (vertical) aggregate

pub mod model;
pub mod repository;

pub use model::ServiceType;
pub use repository::ServiceTypeRepository;
