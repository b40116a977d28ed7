//! # Storefront Engine
//!
//! Dynamic attribute configuration and location-scoped catalog resolution
//! for a multi-vertical storefront.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core entities, value types and repository traits
//! - **application**: Registry, binding resolver, location resolver,
//!   catalog resolver and form schema generation
//! - **infrastructure**: SeaORM (SQLite) and in-memory repository providers
//! - **shared**: Errors, pagination, retry and validation helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
