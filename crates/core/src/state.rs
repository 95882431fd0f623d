//! Resolution state lattice.
//!
//! Every processed file ends in one [`ConflictState`], and a session folds
//! those outcomes together with [`ConflictState::combine`]. The order
//! `None < Resolved < Unresolved` is declared explicitly through
//! [`ConflictState::rank`] rather than inherited from variant order.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::EXIT_UNRESOLVED;

/// Outcome of resolving one file, or of a whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictState {
    /// No conflict marker was ever found.
    #[default]
    None,
    /// Conflicts were found and all of them were cleared.
    Resolved,
    /// At least one conflict remains.
    Unresolved,
}

impl ConflictState {
    /// Position in the total order used by [`combine`](Self::combine).
    pub const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Resolved => 1,
            Self::Unresolved => 2,
        }
    }

    /// Join of two states: the greater of the two under [`rank`](Self::rank).
    ///
    /// Commutative, associative and idempotent, with [`ConflictState::None`]
    /// as the identity.
    pub const fn combine(self, other: Self) -> Self {
        if self.rank() >= other.rank() {
            self
        } else {
            other
        }
    }

    /// Fold any number of states, starting from the identity.
    pub fn join_all<I: IntoIterator<Item = Self>>(states: I) -> Self {
        states.into_iter().fold(Self::None, Self::combine)
    }

    /// Whether a session ending in this state counts as a success.
    pub fn is_success(self) -> bool {
        self != Self::Unresolved
    }

    /// Process exit code for a session that ends in this state.
    pub fn exit_code(self) -> u8 {
        if self.is_success() {
            0
        } else {
            EXIT_UNRESOLVED
        }
    }

    /// Message shown to the user once the session is over.
    pub fn summary(self) -> &'static str {
        match self {
            Self::None => "No conflicts detected.",
            Self::Resolved => "All conflicts resolved.",
            Self::Unresolved => "Unresolved conflicts remain.",
        }
    }
}

impl PartialOrd for ConflictState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConflictState {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for ConflictState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Resolved => write!(f, "resolved"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}
