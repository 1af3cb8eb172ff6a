//! Comment vote reconciliation
//!
//! One canonical state machine covers every voting endpoint. A voter's
//! state per comment is `None`, liked, or disliked; the planner computes the
//! minimal mutation set to reach the target state from the observed one,
//! and the repository applies it in a single transaction. The toggle
//! endpoint dispatches `Like`/`Unlike` through the same planner rather than
//! maintaining its own counter.
//!
//! All transitions are idempotent: repeating an action from the state it
//! produced plans no mutation.

use serde::{Deserialize, Serialize};

/// Which set a voter's single vote row targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Like => "like",
            VoteKind::Dislike => "dislike",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(VoteKind::Like),
            "dislike" => Some(VoteKind::Dislike),
            _ => None,
        }
    }
}

/// Requested vote action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VoteAction {
    Like,
    Unlike,
    Dislike,
    Undislike,
    SwitchToLike,
    SwitchToDislike,
}

/// Change to the voter's membership row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// No write needed
    Keep,
    /// Upsert the row to the given kind
    Set(VoteKind),
    /// Delete the row
    Clear,
}

/// Minimal mutation set for one reconciled action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePlan {
    pub membership: MembershipChange,
    pub like_delta: i64,
    pub dislike_delta: i64,
}

impl VotePlan {
    pub const NOOP: VotePlan = VotePlan {
        membership: MembershipChange::Keep,
        like_delta: 0,
        dislike_delta: 0,
    };

    pub fn is_noop(&self) -> bool {
        matches!(self.membership, MembershipChange::Keep)
    }
}

/// Compute the mutation set that takes `current` to the state `action`
/// requests. Because a voter holds at most one vote row, `Like` while
/// disliked retargets the row (a switch), preserving mutual exclusion.
pub fn plan_vote(action: VoteAction, current: Option<VoteKind>) -> VotePlan {
    match (action, current) {
        (VoteAction::Like | VoteAction::SwitchToLike, Some(VoteKind::Like)) => VotePlan::NOOP,
        (VoteAction::Like | VoteAction::SwitchToLike, None) => VotePlan {
            membership: MembershipChange::Set(VoteKind::Like),
            like_delta: 1,
            dislike_delta: 0,
        },
        (VoteAction::Like | VoteAction::SwitchToLike, Some(VoteKind::Dislike)) => VotePlan {
            membership: MembershipChange::Set(VoteKind::Like),
            like_delta: 1,
            dislike_delta: -1,
        },

        (VoteAction::Unlike, Some(VoteKind::Like)) => VotePlan {
            membership: MembershipChange::Clear,
            like_delta: -1,
            dislike_delta: 0,
        },
        (VoteAction::Unlike, _) => VotePlan::NOOP,

        (VoteAction::Dislike | VoteAction::SwitchToDislike, Some(VoteKind::Dislike)) => {
            VotePlan::NOOP
        }
        (VoteAction::Dislike | VoteAction::SwitchToDislike, None) => VotePlan {
            membership: MembershipChange::Set(VoteKind::Dislike),
            like_delta: 0,
            dislike_delta: 1,
        },
        (VoteAction::Dislike | VoteAction::SwitchToDislike, Some(VoteKind::Like)) => VotePlan {
            membership: MembershipChange::Set(VoteKind::Dislike),
            like_delta: -1,
            dislike_delta: 1,
        },

        (VoteAction::Undislike, Some(VoteKind::Dislike)) => VotePlan {
            membership: MembershipChange::Clear,
            like_delta: 0,
            dislike_delta: -1,
        },
        (VoteAction::Undislike, _) => VotePlan::NOOP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [VoteAction; 6] = [
        VoteAction::Like,
        VoteAction::Unlike,
        VoteAction::Dislike,
        VoteAction::Undislike,
        VoteAction::SwitchToLike,
        VoteAction::SwitchToDislike,
    ];

    const ALL_STATES: [Option<VoteKind>; 3] =
        [None, Some(VoteKind::Like), Some(VoteKind::Dislike)];

    /// Simulated comment counters plus one voter's membership
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Sim {
        vote: Option<VoteKind>,
        likes: i64,
        dislikes: i64,
    }

    impl Sim {
        fn fresh() -> Self {
            Sim {
                vote: None,
                likes: 0,
                dislikes: 0,
            }
        }

        fn apply(self, action: VoteAction) -> Self {
            let plan = plan_vote(action, self.vote);
            let vote = match plan.membership {
                MembershipChange::Keep => self.vote,
                MembershipChange::Set(kind) => Some(kind),
                MembershipChange::Clear => None,
            };
            Sim {
                vote,
                likes: self.likes + plan.like_delta,
                dislikes: self.dislikes + plan.dislike_delta,
            }
        }

        /// Counter consistency for a single voter: the counters must equal
        /// the size of the membership set
        fn assert_consistent(&self) {
            let expected_likes = i64::from(self.vote == Some(VoteKind::Like));
            let expected_dislikes = i64::from(self.vote == Some(VoteKind::Dislike));
            assert_eq!(self.likes, expected_likes, "likes out of sync: {:?}", self);
            assert_eq!(
                self.dislikes, expected_dislikes,
                "dislikes out of sync: {:?}",
                self
            );
        }
    }

    #[test]
    fn test_all_transitions_idempotent() {
        for action in ALL_ACTIONS {
            for state in ALL_STATES {
                let mut sim = Sim {
                    vote: state,
                    likes: i64::from(state == Some(VoteKind::Like)),
                    dislikes: i64::from(state == Some(VoteKind::Dislike)),
                };
                sim = sim.apply(action);
                let repeated = sim.apply(action);
                assert_eq!(sim, repeated, "{:?} from {:?} not idempotent", action, state);
                assert!(
                    plan_vote(action, sim.vote).is_noop(),
                    "{:?} from {:?} should plan a no-op on repeat",
                    action,
                    state
                );
            }
        }
    }

    #[test]
    fn test_counters_track_membership_over_all_sequences() {
        // Every 3-step action sequence from a fresh comment
        for a in ALL_ACTIONS {
            for b in ALL_ACTIONS {
                for c in ALL_ACTIONS {
                    let mut sim = Sim::fresh();
                    for action in [a, b, c] {
                        sim = sim.apply(action);
                        sim.assert_consistent();
                    }
                }
            }
        }
    }

    #[test]
    fn test_switch_moves_vote() {
        let plan = plan_vote(VoteAction::SwitchToLike, Some(VoteKind::Dislike));
        assert_eq!(plan.membership, MembershipChange::Set(VoteKind::Like));
        assert_eq!(plan.like_delta, 1);
        assert_eq!(plan.dislike_delta, -1);

        let plan = plan_vote(VoteAction::SwitchToDislike, Some(VoteKind::Like));
        assert_eq!(plan.membership, MembershipChange::Set(VoteKind::Dislike));
        assert_eq!(plan.like_delta, -1);
        assert_eq!(plan.dislike_delta, 1);
    }

    #[test]
    fn test_switch_without_existing_vote_just_adds() {
        let plan = plan_vote(VoteAction::SwitchToLike, None);
        assert_eq!(plan.membership, MembershipChange::Set(VoteKind::Like));
        assert_eq!(plan.like_delta, 1);
        assert_eq!(plan.dislike_delta, 0);
    }

    #[test]
    fn test_like_then_switch_then_undislike_returns_to_zero() {
        let mut sim = Sim::fresh();
        for action in [
            VoteAction::Like,
            VoteAction::SwitchToDislike,
            VoteAction::Undislike,
        ] {
            sim = sim.apply(action);
            sim.assert_consistent();
        }
        assert_eq!(sim, Sim::fresh());
    }

    #[test]
    fn test_unlike_without_like_is_noop() {
        assert!(plan_vote(VoteAction::Unlike, None).is_noop());
        assert!(plan_vote(VoteAction::Unlike, Some(VoteKind::Dislike)).is_noop());
        assert!(plan_vote(VoteAction::Undislike, Some(VoteKind::Like)).is_noop());
    }
}
