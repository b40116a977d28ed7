//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod attribute_repository;
pub mod binding_repository;
pub mod catalog_repository;
pub mod repository_provider;
pub mod service_area_repository;
pub mod service_type_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Constraint violations are caller errors; anything else means the store
/// could not serve the request.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            DomainError::Conflict(format!("Unique constraint violated: {}", msg))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            DomainError::Conflict(format!("Foreign key constraint violated: {}", msg))
        }
        _ => DomainError::UpstreamUnavailable(format!("Database error: {}", e)),
    }
}
