//! Data storage layer
//!
//! - `postgres` - Connection pool and repositories for the collection database
//! - `types` - Row types returned by repositories
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod postgres;
pub mod types;

pub use error::DataError;
pub use postgres::PostgresService;
