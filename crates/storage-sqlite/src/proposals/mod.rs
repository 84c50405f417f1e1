mod model;
mod repository;

pub use model::{ProposalDB, ProposalScheduleLinkDB};
pub use repository::ProposalRepository;
