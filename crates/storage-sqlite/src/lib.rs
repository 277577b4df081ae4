//! SQLite storage implementation for the fee-commission engine.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository trait defined in `feecalc-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The calculation history repository
//! - Database-specific model types (with Diesel derives)
//!
//! ```text
//! core (domain, traits)
//!        │
//!        ▼
//! storage-sqlite (this crate)
//!        │
//!        ▼
//!    SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod calculations;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use calculations::CalculationRepository;

// Re-export from feecalc-core for convenience
pub use feecalc_core::errors::{DatabaseError, Error, Result};
