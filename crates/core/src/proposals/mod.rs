//! Proposals module - proposal rows and their conversion into scheduled
//! activities.
//!
//! A proposal is a tentative trip-planning item awaiting group commitment.
//! Accepting one is idempotent: the `proposal_schedule_links` row is the
//! at-most-once guard, and a duplicate accept returns the already-linked
//! activity with `created = false` instead of creating a second one.

mod conversion_service;
mod payload;
mod proposals_model;
mod proposals_traits;

pub use conversion_service::ConversionService;
pub use payload::derive_activity;
pub use proposals_model::{
    ConversionOutcome, NewProposal, Proposal, ProposalCategory, ProposalStatus,
};
pub use proposals_traits::{ConversionServiceTrait, ProposalRepositoryTrait};
