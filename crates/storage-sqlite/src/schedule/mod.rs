mod model;
mod repository;

pub use model::{ActivityDB, InviteDB};
pub use repository::ScheduleRepository;
