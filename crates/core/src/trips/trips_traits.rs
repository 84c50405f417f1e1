use crate::errors::Result;
use crate::trips::trips_model::Trip;

/// Trait for trip repository operations.
///
/// Read-only: TripSync treats the trip/membership store as an external
/// collaborator. Conversion seeds invites from `get_member_ids` and RSVP
/// validates responders with `is_member` (former members must be rejected,
/// not silently re-admitted).
pub trait TripRepositoryTrait: Send + Sync {
    fn get_trip(&self, trip_id: &str) -> Result<Trip>;
    fn get_member_ids(&self, trip_id: &str) -> Result<Vec<String>>;
    fn is_member(&self, trip_id: &str, user_id: &str) -> Result<bool>;
}
