//! Capacity-aware RSVP transition logic.
//!
//! Pure decision function shared by the storage layer, which evaluates it
//! inside the same transaction that counts accepted invites, so concurrent
//! requests racing for the last slot are serialized by the database and the
//! loser is downgraded instead of erroring.

use super::schedule_model::{InviteStatus, RsvpRequest};

/// Resolved transition for one RSVP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsvpDecision {
    /// The status the invite row moves to.
    pub next: InviteStatus,
    /// True when the transition vacates an accepted slot on a
    /// capacity-limited activity, which triggers waitlist promotion.
    pub frees_slot: bool,
    /// True when the invite enters the waitlist with this transition.
    /// The caller refreshes `created_at` so the member queues behind
    /// everyone already waiting.
    pub joins_waitlist: bool,
}

/// Resolves an RSVP request against the current invite state and the
/// accepted-invite count observed inside the owning transaction.
///
/// Rules:
/// - Any state -> `declined` is always allowed.
/// - `-> accepted` is unconditional when `max_capacity` is unset; otherwise
///   it requires `accepted_count < max_capacity`, and a full activity
///   silently downgrades the request to `waitlisted` (policy, not an error).
/// - A waitlisted invite requesting `accepted` stays `waitlisted`: the only
///   path out of the waitlist is the promotion engine, preserving FIFO
///   fairness.
pub fn resolve_rsvp(
    current: InviteStatus,
    requested: RsvpRequest,
    accepted_count: i64,
    max_capacity: Option<i32>,
) -> RsvpDecision {
    let next = match requested {
        RsvpRequest::Declined => InviteStatus::Declined,
        RsvpRequest::Accepted => match current {
            // Already holding a slot; nothing to re-check.
            InviteStatus::Accepted => InviteStatus::Accepted,
            // Promotion engine only.
            InviteStatus::Waitlisted => InviteStatus::Waitlisted,
            InviteStatus::Pending | InviteStatus::Declined => match max_capacity {
                None => InviteStatus::Accepted,
                Some(cap) if accepted_count < cap as i64 => InviteStatus::Accepted,
                Some(_) => InviteStatus::Waitlisted,
            },
        },
    };

    RsvpDecision {
        next,
        frees_slot: current == InviteStatus::Accepted
            && next != InviteStatus::Accepted
            && max_capacity.is_some(),
        joins_waitlist: next == InviteStatus::Waitlisted && current != InviteStatus::Waitlisted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decline_is_always_allowed() {
        for current in [
            InviteStatus::Pending,
            InviteStatus::Accepted,
            InviteStatus::Declined,
            InviteStatus::Waitlisted,
        ] {
            let decision = resolve_rsvp(current, RsvpRequest::Declined, 5, Some(5));
            assert_eq!(decision.next, InviteStatus::Declined);
        }
    }

    #[test]
    fn accept_is_unconditional_without_capacity() {
        let decision = resolve_rsvp(InviteStatus::Pending, RsvpRequest::Accepted, 1_000, None);
        assert_eq!(decision.next, InviteStatus::Accepted);
        assert!(!decision.joins_waitlist);
    }

    #[test]
    fn accept_with_free_slot_is_accepted() {
        let decision = resolve_rsvp(InviteStatus::Pending, RsvpRequest::Accepted, 1, Some(2));
        assert_eq!(decision.next, InviteStatus::Accepted);
    }

    #[test]
    fn accept_into_full_activity_downgrades_to_waitlisted() {
        let decision = resolve_rsvp(InviteStatus::Pending, RsvpRequest::Accepted, 2, Some(2));
        assert_eq!(decision.next, InviteStatus::Waitlisted);
        assert!(decision.joins_waitlist);
        assert!(!decision.frees_slot);
    }

    #[test]
    fn re_accept_after_decline_is_subject_to_capacity() {
        let free = resolve_rsvp(InviteStatus::Declined, RsvpRequest::Accepted, 0, Some(1));
        assert_eq!(free.next, InviteStatus::Accepted);

        let full = resolve_rsvp(InviteStatus::Declined, RsvpRequest::Accepted, 1, Some(1));
        assert_eq!(full.next, InviteStatus::Waitlisted);
        assert!(full.joins_waitlist);
    }

    #[test]
    fn waitlisted_member_cannot_jump_the_queue() {
        // Even with a free slot the entrypoint keeps the member waitlisted;
        // only the promotion engine moves waitlisted -> accepted.
        let decision = resolve_rsvp(InviteStatus::Waitlisted, RsvpRequest::Accepted, 0, Some(2));
        assert_eq!(decision.next, InviteStatus::Waitlisted);
        assert!(!decision.joins_waitlist);
    }

    #[test]
    fn accepted_member_re_accepting_keeps_slot_without_capacity_check() {
        // accepted_count already includes this member's own slot.
        let decision = resolve_rsvp(InviteStatus::Accepted, RsvpRequest::Accepted, 2, Some(2));
        assert_eq!(decision.next, InviteStatus::Accepted);
        assert!(!decision.frees_slot);
    }

    #[test]
    fn decline_from_accepted_frees_slot_only_with_capacity() {
        let capped = resolve_rsvp(InviteStatus::Accepted, RsvpRequest::Declined, 2, Some(2));
        assert!(capped.frees_slot);

        let uncapped = resolve_rsvp(InviteStatus::Accepted, RsvpRequest::Declined, 2, None);
        assert!(!uncapped.frees_slot);
    }

    #[test]
    fn decline_from_pending_frees_nothing() {
        let decision = resolve_rsvp(InviteStatus::Pending, RsvpRequest::Declined, 2, Some(2));
        assert!(!decision.frees_slot);
    }
}
