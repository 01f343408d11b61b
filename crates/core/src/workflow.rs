//! Knowledge review status machine.
//!
//! Validates who may move a knowledge item between review states and
//! computes the audit-field writes each permitted change entails. The
//! repository layer applies the resulting [`TransitionPlan`] verbatim;
//! nothing else in the system writes `submitted_at`, `approved_at`, or
//! `approved_by`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Review status of a knowledge item.
///
/// `published` is terminal from the workflow's point of view: no endpoint
/// targets it specifically, and only administrators (who may perform any
/// transition) can move an item into or out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeStatus {
    Draft,
    Submitted,
    Approved,
    Published,
}

impl KnowledgeStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: &'static [KnowledgeStatus] = &[
        KnowledgeStatus::Draft,
        KnowledgeStatus::Submitted,
        KnowledgeStatus::Approved,
        KnowledgeStatus::Published,
    ];

    /// The stored / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            KnowledgeStatus::Draft => "draft",
            KnowledgeStatus::Submitted => "submitted",
            KnowledgeStatus::Approved => "approved",
            KnowledgeStatus::Published => "published",
        }
    }
}

impl fmt::Display for KnowledgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KnowledgeStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(KnowledgeStatus::Draft),
            "submitted" => Ok(KnowledgeStatus::Submitted),
            "approved" => Ok(KnowledgeStatus::Approved),
            "published" => Ok(KnowledgeStatus::Published),
            other => Err(CoreError::Validation(format!(
                "Invalid knowledge status '{other}'. Must be one of: draft, submitted, approved, published"
            ))),
        }
    }
}

/// Kind of change a knowledge item proposes against its reference article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Modify,
    Delete,
}

impl ChangeKind {
    /// The stored / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Modify => "modify",
            ChangeKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modify" => Ok(ChangeKind::Modify),
            "delete" => Ok(ChangeKind::Delete),
            other => Err(CoreError::Validation(format!(
                "Invalid change kind '{other}'. Must be one of: modify, delete"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition planning
// ---------------------------------------------------------------------------

/// The user attempting a status change.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: DbId,
    pub is_admin: bool,
}

/// A pending write to one audited field (or field pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value untouched.
    Keep,
    /// Overwrite with a new value.
    Set(T),
    /// Reset to NULL.
    Clear,
}

/// The fully-resolved effect of a permitted status change.
///
/// `approval` covers `approved_at` and `approved_by` as a pair: the two
/// columns are always set together and cleared together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub status: KnowledgeStatus,
    pub submitted_at: FieldUpdate<Timestamp>,
    pub approval: FieldUpdate<(Timestamp, DbId)>,
}

/// Check permissions for a status change and compute its audit-field writes.
///
/// Permission rules:
/// - administrators may perform any transition, same-state included;
/// - the item's owner may only toggle `draft -> submitted` and
///   `submitted -> draft`;
/// - everyone else is forbidden unconditionally.
///
/// Field effects are a pure function of `(from, to, actor, now)`:
/// - entering `submitted` from another state stamps `submitted_at` (the
///   field records "last submitted" and is never cleared);
/// - entering `approved` from another state stamps `approved_at` and
///   `approved_by`;
/// - leaving `approved` clears both.
pub fn plan_transition(
    actor: &Actor,
    owner_id: DbId,
    from: KnowledgeStatus,
    to: KnowledgeStatus,
    now: Timestamp,
) -> Result<TransitionPlan, CoreError> {
    if !actor.is_admin {
        let owner_toggle = (from == KnowledgeStatus::Draft && to == KnowledgeStatus::Submitted)
            || (from == KnowledgeStatus::Submitted && to == KnowledgeStatus::Draft);

        if actor.id != owner_id {
            return Err(CoreError::Forbidden(
                "Only the item's owner or an administrator may change its status".into(),
            ));
        }
        if !owner_toggle {
            return Err(CoreError::Forbidden(format!(
                "Owners may only move items between 'draft' and 'submitted', not '{from}' to '{to}'"
            )));
        }
    }

    let submitted_at = if to == KnowledgeStatus::Submitted && from != KnowledgeStatus::Submitted {
        FieldUpdate::Set(now)
    } else {
        FieldUpdate::Keep
    };

    let approval = if to == KnowledgeStatus::Approved && from != KnowledgeStatus::Approved {
        FieldUpdate::Set((now, actor.id))
    } else if from == KnowledgeStatus::Approved && to != KnowledgeStatus::Approved {
        FieldUpdate::Clear
    } else {
        FieldUpdate::Keep
    };

    Ok(TransitionPlan {
        status: to,
        submitted_at,
        approval,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const OWNER_ID: DbId = 7;

    fn owner() -> Actor {
        Actor {
            id: OWNER_ID,
            is_admin: false,
        }
    }

    fn admin() -> Actor {
        Actor {
            id: 42,
            is_admin: true,
        }
    }

    fn stranger() -> Actor {
        Actor {
            id: 99,
            is_admin: false,
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for &s in KnowledgeStatus::ALL {
            assert_eq!(s.as_str().parse::<KnowledgeStatus>().unwrap(), s);
        }
        assert!("pending".parse::<KnowledgeStatus>().is_err());
        assert!("".parse::<KnowledgeStatus>().is_err());
    }

    #[test]
    fn change_kind_round_trips_through_strings() {
        assert_eq!("modify".parse::<ChangeKind>().unwrap(), ChangeKind::Modify);
        assert_eq!("delete".parse::<ChangeKind>().unwrap(), ChangeKind::Delete);
        assert!("rename".parse::<ChangeKind>().is_err());
    }

    /// The full permission matrix: admins pass every (from, to) pair, the
    /// owner passes exactly the draft<->submitted toggle, strangers never
    /// pass.
    #[test]
    fn permission_matrix_is_exact() {
        let now = Utc::now();
        for &from in KnowledgeStatus::ALL {
            for &to in KnowledgeStatus::ALL {
                assert!(
                    plan_transition(&admin(), OWNER_ID, from, to, now).is_ok(),
                    "admin must be allowed {from} -> {to}"
                );

                let owner_allowed = matches!(
                    (from, to),
                    (KnowledgeStatus::Draft, KnowledgeStatus::Submitted)
                        | (KnowledgeStatus::Submitted, KnowledgeStatus::Draft)
                );
                assert_eq!(
                    plan_transition(&owner(), OWNER_ID, from, to, now).is_ok(),
                    owner_allowed,
                    "owner permission wrong for {from} -> {to}"
                );

                assert!(
                    plan_transition(&stranger(), OWNER_ID, from, to, now).is_err(),
                    "stranger must be forbidden {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn forbidden_transitions_are_forbidden_not_validation() {
        let now = Utc::now();
        let err = plan_transition(
            &stranger(),
            OWNER_ID,
            KnowledgeStatus::Draft,
            KnowledgeStatus::Submitted,
            now,
        )
        .unwrap_err();
        assert_matches::assert_matches!(err, CoreError::Forbidden(_));

        let err = plan_transition(
            &owner(),
            OWNER_ID,
            KnowledgeStatus::Submitted,
            KnowledgeStatus::Approved,
            now,
        )
        .unwrap_err();
        assert_matches::assert_matches!(err, CoreError::Forbidden(_));
    }

    #[test]
    fn submitting_stamps_submitted_at() {
        let now = Utc::now();
        let plan = plan_transition(
            &owner(),
            OWNER_ID,
            KnowledgeStatus::Draft,
            KnowledgeStatus::Submitted,
            now,
        )
        .unwrap();
        assert_eq!(plan.status, KnowledgeStatus::Submitted);
        assert_eq!(plan.submitted_at, FieldUpdate::Set(now));
        assert_eq!(plan.approval, FieldUpdate::Keep);
    }

    #[test]
    fn withdrawing_keeps_submitted_at() {
        // submitted_at records "last submitted", so pulling an item back to
        // draft must not clear it.
        let now = Utc::now();
        let plan = plan_transition(
            &owner(),
            OWNER_ID,
            KnowledgeStatus::Submitted,
            KnowledgeStatus::Draft,
            now,
        )
        .unwrap();
        assert_eq!(plan.submitted_at, FieldUpdate::Keep);
        assert_eq!(plan.approval, FieldUpdate::Keep);
    }

    #[test]
    fn approving_stamps_approval_pair() {
        let now = Utc::now();
        let actor = admin();
        let plan = plan_transition(
            &actor,
            OWNER_ID,
            KnowledgeStatus::Submitted,
            KnowledgeStatus::Approved,
            now,
        )
        .unwrap();
        assert_eq!(plan.approval, FieldUpdate::Set((now, actor.id)));
        assert_eq!(plan.submitted_at, FieldUpdate::Keep);
    }

    #[test]
    fn leaving_approved_clears_approval_pair() {
        let now = Utc::now();
        for &to in KnowledgeStatus::ALL {
            if to == KnowledgeStatus::Approved {
                continue;
            }
            let plan =
                plan_transition(&admin(), OWNER_ID, KnowledgeStatus::Approved, to, now).unwrap();
            assert_eq!(
                plan.approval,
                FieldUpdate::Clear,
                "approved -> {to} must clear the approval fields"
            );
        }
    }

    #[test]
    fn same_state_transitions_touch_nothing() {
        // Only admins can reach a same-state "transition"; it must be a
        // field-level no-op in every state.
        let now = Utc::now();
        for &s in KnowledgeStatus::ALL {
            let plan = plan_transition(&admin(), OWNER_ID, s, s, now).unwrap();
            assert_eq!(plan.status, s);
            assert_eq!(plan.submitted_at, FieldUpdate::Keep);
            assert_eq!(plan.approval, FieldUpdate::Keep);
        }
    }

    #[test]
    fn approve_then_unapprove_round_trips() {
        let now = Utc::now();
        for &prior in KnowledgeStatus::ALL {
            if prior == KnowledgeStatus::Approved {
                continue;
            }
            let approve =
                plan_transition(&admin(), OWNER_ID, prior, KnowledgeStatus::Approved, now).unwrap();
            assert_matches::assert_matches!(approve.approval, FieldUpdate::Set(_));

            let unapprove =
                plan_transition(&admin(), OWNER_ID, KnowledgeStatus::Approved, prior, now).unwrap();
            assert_eq!(unapprove.approval, FieldUpdate::Clear);
        }
    }

    #[test]
    fn admin_who_owns_item_uses_admin_rules() {
        // An admin editing their own item is not limited to the owner toggle.
        let now = Utc::now();
        let acting_admin = Actor {
            id: OWNER_ID,
            is_admin: true,
        };
        assert!(plan_transition(
            &acting_admin,
            OWNER_ID,
            KnowledgeStatus::Draft,
            KnowledgeStatus::Approved,
            now,
        )
        .is_ok());
    }
}
