pub mod coalesce;
pub mod retry;

pub use coalesce::Coalesce;
pub use retry::{retry_with_backoff, RetryConfig};
