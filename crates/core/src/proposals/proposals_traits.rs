use crate::errors::Result;
use crate::proposals::proposals_model::{ConversionOutcome, NewProposal, Proposal};
use crate::schedule::{InviteSeed, NewScheduledActivity};
use async_trait::async_trait;

/// Trait for proposal repository operations.
///
/// `convert_to_scheduled` is the whole conversion write as one transaction:
/// check the link row (idempotency short-circuit), insert the activity and
/// the link, seed the invite rows, and flip the proposal status to
/// accepted. A failure anywhere rolls the entire step back.
#[async_trait]
pub trait ProposalRepositoryTrait: Send + Sync {
    fn get_proposal(&self, proposal_id: &str) -> Result<Proposal>;
    fn get_proposals_by_trip(&self, trip_id: &str) -> Result<Vec<Proposal>>;
    async fn create_proposal(&self, new_proposal: NewProposal) -> Result<Proposal>;
    async fn convert_to_scheduled(
        &self,
        proposal_id: String,
        activity: NewScheduledActivity,
        invites: Vec<InviteSeed>,
    ) -> Result<ConversionOutcome>;
}

/// Trait for the conversion coordinator.
#[async_trait]
pub trait ConversionServiceTrait: Send + Sync {
    fn get_proposal(&self, proposal_id: &str) -> Result<Proposal>;
    fn get_proposals_by_trip(&self, trip_id: &str) -> Result<Vec<Proposal>>;
    async fn create_proposal(&self, new_proposal: NewProposal) -> Result<Proposal>;

    /// Idempotently converts an accepted proposal into a scheduled activity.
    ///
    /// `attendees` restricts the seeded invites to a subset of the trip
    /// roster; `None` invites every current member. The proposal creator is
    /// always seeded as accepted.
    async fn accept_proposal(
        &self,
        proposal_id: &str,
        acting_user_id: &str,
        attendees: Option<Vec<String>>,
    ) -> Result<ConversionOutcome>;
}
