//! # referral-db
//!
//! Database layer implementing repository traits with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides SQLite implementations for all repository traits
//! defined in `referral-core`. It handles:
//!
//! - Connection pool management over a single database file
//! - Additive schema management (presence-check then `ALTER`, never destructive)
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use referral_db::pool::{create_pool, DatabaseConfig};
//! use referral_db::schema::ensure_schema;
//! use referral_db::SqliteReferralRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     ensure_schema(&pool).await?;
//!     let referral_repo = SqliteReferralRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, SqlitePool};
pub use repositories::{
    SqliteAuditLogRepository, SqliteBoardMessageRepository, SqliteMemberHistoryRepository,
    SqliteReferralRepository,
};
pub use schema::ensure_schema;
