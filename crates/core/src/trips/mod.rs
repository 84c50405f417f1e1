//! Trips module - read-only trip and membership data.
//!
//! Trip lifecycle (create/update/member management) is owned by an external
//! service; conversion and RSVP only need trip metadata and the current
//! member list, exposed through [`TripRepositoryTrait`].

mod trips_model;
mod trips_traits;

pub use trips_model::{MemberRole, Trip, TripMember};
pub use trips_traits::TripRepositoryTrait;
