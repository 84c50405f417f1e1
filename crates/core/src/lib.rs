//! TripSync Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for TripSync: proposal
//! conversion, invite/RSVP handling with capacity and waitlist semantics,
//! and notification dispatch. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod errors;
pub mod events;
pub mod notifications;
pub mod proposals;
pub mod schedule;
pub mod trips;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
