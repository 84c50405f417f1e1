use log::error;
use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::payload::derive_activity;
use super::proposals_model::{ConversionOutcome, NewProposal, Proposal, ProposalStatus};
use super::proposals_traits::{ConversionServiceTrait, ProposalRepositoryTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::notifications::NotificationServiceTrait;
use crate::schedule::{InviteSeed, InviteStatus};
use crate::trips::TripRepositoryTrait;

/// Conversion coordinator: turns an accepted proposal into a scheduled
/// activity exactly once.
///
/// The repository runs the multi-table write as a single transaction with
/// the link-row idempotency check inside it; this service owns the
/// preconditions, the payload derivation, the invite seeding rules, and the
/// post-commit side effects.
pub struct ConversionService {
    proposal_repository: Arc<dyn ProposalRepositoryTrait>,
    trip_repository: Arc<dyn TripRepositoryTrait>,
    notification_service: Arc<dyn NotificationServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl ConversionService {
    pub fn new(
        proposal_repository: Arc<dyn ProposalRepositoryTrait>,
        trip_repository: Arc<dyn TripRepositoryTrait>,
        notification_service: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        Self {
            proposal_repository,
            trip_repository,
            notification_service,
            event_sink: Arc::new(NoOpDomainEventSink),
        }
    }

    /// Sets the domain event sink for emitting ActivityCreated events.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    /// Builds the invite rows seeded alongside the new activity: the
    /// proposal creator accepted, every other invited member pending.
    fn build_invite_seeds(
        proposal: &Proposal,
        members: &[String],
        attendees: Option<Vec<String>>,
    ) -> Result<Vec<InviteSeed>> {
        let roster: BTreeSet<&str> = members.iter().map(String::as_str).collect();

        let invited: Vec<String> = match attendees {
            Some(subset) => {
                for user_id in &subset {
                    if !roster.contains(user_id.as_str()) {
                        return Err(Error::Membership(format!(
                            "Attendee {} is not a member of trip {}",
                            user_id, proposal.trip_id
                        )));
                    }
                }
                subset
            }
            None => members.to_vec(),
        };

        let mut seeds = vec![InviteSeed {
            user_id: proposal.created_by.clone(),
            status: InviteStatus::Accepted,
        }];
        let mut seen: BTreeSet<String> = BTreeSet::new();
        seen.insert(proposal.created_by.clone());
        for user_id in invited {
            if seen.insert(user_id.clone()) {
                seeds.push(InviteSeed {
                    user_id,
                    status: InviteStatus::Pending,
                });
            }
        }
        Ok(seeds)
    }
}

#[async_trait]
impl ConversionServiceTrait for ConversionService {
    fn get_proposal(&self, proposal_id: &str) -> Result<Proposal> {
        self.proposal_repository.get_proposal(proposal_id)
    }

    fn get_proposals_by_trip(&self, trip_id: &str) -> Result<Vec<Proposal>> {
        self.proposal_repository.get_proposals_by_trip(trip_id)
    }

    async fn create_proposal(&self, new_proposal: NewProposal) -> Result<Proposal> {
        if !self
            .trip_repository
            .is_member(&new_proposal.trip_id, &new_proposal.created_by)?
        {
            return Err(Error::Membership(format!(
                "User {} is not a member of trip {}",
                new_proposal.created_by, new_proposal.trip_id
            )));
        }
        self.proposal_repository.create_proposal(new_proposal).await
    }

    async fn accept_proposal(
        &self,
        proposal_id: &str,
        acting_user_id: &str,
        attendees: Option<Vec<String>>,
    ) -> Result<ConversionOutcome> {
        let proposal = self.proposal_repository.get_proposal(proposal_id)?;

        if !self
            .trip_repository
            .is_member(&proposal.trip_id, acting_user_id)?
        {
            return Err(Error::Membership(format!(
                "User {} is not a member of trip {}",
                acting_user_id, proposal.trip_id
            )));
        }

        // Accepted proposals fall through to the idempotency short-circuit
        // in the repository; declined and expired ones are terminal.
        if matches!(
            proposal.status,
            ProposalStatus::Declined | ProposalStatus::Expired
        ) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Proposal {} is {} and can no longer be accepted",
                proposal.id,
                proposal.status.as_str()
            ))));
        }

        let trip = self.trip_repository.get_trip(&proposal.trip_id)?;
        let members = self.trip_repository.get_member_ids(&proposal.trip_id)?;
        let activity = derive_activity(&proposal, &trip);
        let seeds = Self::build_invite_seeds(&proposal, &members, attendees)?;

        let recipients: Vec<String> = seeds
            .iter()
            .map(|s| s.user_id.clone())
            .filter(|u| u != acting_user_id)
            .collect();

        let outcome = self
            .proposal_repository
            .convert_to_scheduled(proposal.id.clone(), activity, seeds)
            .await?;

        // Post-commit side effects, failure-isolated. An idempotent
        // re-accept changed nothing, so it notifies and broadcasts nothing.
        if outcome.created {
            if let Err(e) = self
                .notification_service
                .notify_activity_created(&outcome.activity, &recipients)
                .await
            {
                error!(
                    "Failed to record conversion notifications for activity {}: {}",
                    outcome.activity.id, e
                );
            }
            self.event_sink.emit(DomainEvent::activity_created(
                outcome.activity.trip_id.clone(),
                outcome.activity.id.clone(),
                proposal.id.clone(),
                acting_user_id.to_string(),
            ));
        }

        Ok(outcome)
    }
}
