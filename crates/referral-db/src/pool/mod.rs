//! Connection pool management

mod sqlite;

pub use sqlite::{create_pool, create_pool_from_env, DatabaseConfig};
pub use sqlx::SqlitePool;
