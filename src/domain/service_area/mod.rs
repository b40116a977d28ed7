//! Service area aggregate

pub mod model;
pub mod repository;

pub use model::{GeoPoint, LocationQuery, ServiceArea};
pub use repository::ServiceAreaRepository;
