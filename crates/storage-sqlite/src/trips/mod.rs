mod model;
mod repository;

pub use model::{TripDB, TripMemberDB};
pub use repository::TripRepository;
