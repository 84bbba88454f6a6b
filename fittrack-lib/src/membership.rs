// src/membership.rs
use std::collections::BTreeSet;

use crate::undo::Undoable;

pub type ChallengeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Joined,
    NotJoined,
}

/// Challenges the user has joined.
///
/// Joining keeps the previous set so the join can be undone; leaving is
/// final and cancels whatever undo was pending.
#[derive(Debug, Clone, Default)]
pub struct MembershipSet {
    joined: Undoable<BTreeSet<ChallengeId>>,
}

impl MembershipSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self, id: ChallengeId) -> Membership {
        if self.is_joined(id) {
            Membership::Joined
        } else {
            Membership::NotJoined
        }
    }

    #[must_use]
    pub fn is_joined(&self, id: ChallengeId) -> bool {
        self.joined.get().contains(&id)
    }

    /// Flips membership of `id` and returns the new state.
    pub fn toggle(&mut self, id: ChallengeId) -> Membership {
        if self.is_joined(id) {
            self.joined.set(|set| set.remove(&id));
            tracing::info!(challenge = id, "Left challenge");
            Membership::NotJoined
        } else {
            self.joined.commit(|set| set.insert(id));
            tracing::info!(challenge = id, "Joined challenge");
            Membership::Joined
        }
    }

    /// Reverts the last join. A second call, or a call after another change,
    /// does nothing and returns `false`.
    pub fn undo(&mut self) -> bool {
        let undone = self.joined.undo();
        if undone {
            tracing::info!("Membership change undone");
        } else {
            tracing::debug!("Nothing to undo for memberships");
        }
        undone
    }

    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.joined.can_undo()
    }

    pub fn discard_undo(&mut self) {
        self.joined.discard();
    }

    /// Joined ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ChallengeId> + '_ {
        self.joined.get().iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.joined.get().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joined.get().is_empty()
    }
}
