//! Gate pass state machine.
//!
//! Every status change in the crate goes through [`transition`], so the full
//! table lives in one exhaustive `match`:
//!
//! | From       | Event     | Actor   | To         |
//! |------------|-----------|---------|------------|
//! | `pending`  | `Approve` | admin   | `approved` |
//! | `pending`  | `Reject`  | admin   | `rejected` |
//! | `approved` | `Scan`    | gate    | `out`      |
//! | `out`      | `Scan`    | gate    | `in`       |
//!
//! Creation (`Apply`, by a student) is not a transition from an existing status;
//! new passes always start in [`GatePassStatus::Pending`].

use crate::{
    entities::GatePassStatus,
    errors::{Error, Result},
};

/// Who is allowed to trigger an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The student the pass belongs to
    Student,
    /// Hostel warden or administrator
    Admin,
    /// Security staff or hardware at the gate
    Gate,
}

/// Something that happens to a gate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// Student files a new pass
    Apply,
    /// Admin accepts a pending pass
    Approve,
    /// Admin refuses a pending pass
    Reject,
    /// Gate scans the approval payload
    Scan,
}

impl GateEvent {
    /// The only actor allowed to trigger this event.
    #[must_use]
    pub const fn actor(self) -> Actor {
        match self {
            Self::Apply => Actor::Student,
            Self::Approve | Self::Reject => Actor::Admin,
            Self::Scan => Actor::Gate,
        }
    }
}

/// Status every new pass starts in.
pub const INITIAL_STATUS: GatePassStatus = GatePassStatus::Pending;

/// Computes the status that `event` moves a pass in `current` to.
///
/// Any pair outside the table fails with [`Error::InvalidTransition`] carrying
/// `current`, including re-deciding an already decided pass.
pub fn transition(current: GatePassStatus, event: GateEvent) -> Result<GatePassStatus> {
    match (current, event) {
        (GatePassStatus::Pending, GateEvent::Approve) => Ok(GatePassStatus::Approved),
        (GatePassStatus::Pending, GateEvent::Reject) => Ok(GatePassStatus::Rejected),
        (GatePassStatus::Approved, GateEvent::Scan) => Ok(GatePassStatus::Out),
        (GatePassStatus::Out, GateEvent::Scan) => Ok(GatePassStatus::In),
        (
            GatePassStatus::Pending
            | GatePassStatus::Approved
            | GatePassStatus::Out
            | GatePassStatus::In
            | GatePassStatus::Rejected,
            GateEvent::Apply | GateEvent::Approve | GateEvent::Reject | GateEvent::Scan,
        ) => Err(Error::InvalidTransition { status: current }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_happy_path_walks_to_in() {
        let approved = transition(INITIAL_STATUS, GateEvent::Approve).unwrap();
        assert_eq!(approved, GatePassStatus::Approved);
        let out = transition(approved, GateEvent::Scan).unwrap();
        assert_eq!(out, GatePassStatus::Out);
        let back = transition(out, GateEvent::Scan).unwrap();
        assert_eq!(back, GatePassStatus::In);
        assert!(back.is_terminal());
    }

    #[test]
    fn test_reject_is_terminal() {
        let rejected = transition(GatePassStatus::Pending, GateEvent::Reject).unwrap();
        assert_eq!(rejected, GatePassStatus::Rejected);
        assert!(rejected.is_terminal());
    }

    #[test]
    fn test_terminal_statuses_accept_nothing() {
        for status in [GatePassStatus::In, GatePassStatus::Rejected] {
            for event in [
                GateEvent::Apply,
                GateEvent::Approve,
                GateEvent::Reject,
                GateEvent::Scan,
            ] {
                let err = transition(status, event).unwrap_err();
                assert!(
                    matches!(err, Error::InvalidTransition { status: s } if s == status),
                    "{status:?} + {event:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_redeciding_is_rejected() {
        let err = transition(GatePassStatus::Approved, GateEvent::Reject).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                status: GatePassStatus::Approved
            }
        ));
        let err = transition(GatePassStatus::Rejected, GateEvent::Approve).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                status: GatePassStatus::Rejected
            }
        ));
    }

    #[test]
    fn test_pending_cannot_be_scanned() {
        let err = transition(GatePassStatus::Pending, GateEvent::Scan).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot update status. Current status is pending."
        );
    }

    #[test]
    fn test_apply_never_transitions_an_existing_pass() {
        for status in GatePassStatus::iter() {
            assert!(transition(status, GateEvent::Apply).is_err());
        }
    }

    #[test]
    fn test_actor_rules() {
        assert_eq!(GateEvent::Apply.actor(), Actor::Student);
        assert_eq!(GateEvent::Approve.actor(), Actor::Admin);
        assert_eq!(GateEvent::Reject.actor(), Actor::Admin);
        assert_eq!(GateEvent::Scan.actor(), Actor::Gate);
    }

    #[test]
    fn test_active_set_matches_terminal_flag() {
        for status in GatePassStatus::iter() {
            assert_eq!(
                GatePassStatus::ACTIVE.contains(&status),
                !status.is_terminal()
            );
        }
    }
}
