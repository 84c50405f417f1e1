//! SQLite storage implementation for TripSync.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `tripsync-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! All other crates (`core`, the server) are database-agnostic and work with traits.
//!
//! Reads go through a connection pool; every write goes through a single
//! writer task (see [`db::write_actor`]) so multi-statement operations like
//! proposal conversion and RSVP resolution serialize instead of racing.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod notifications;
pub mod proposals;
pub mod schedule;
pub mod trips;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from tripsync-core for convenience
pub use tripsync_core::errors::{DatabaseError, Error, Result};
