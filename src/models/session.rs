//! Session state and its persisted subset.

use serde::{Deserialize, Serialize};

use crate::models::User;

/// The slice of session state that survives a restart.
///
/// `loading` and `initialized` are deliberately absent: they describe the
/// current process, not the account, and reset on every fresh load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_admin: bool,
}

impl SessionSnapshot {
    /// Anonymous snapshot, the state after logout.
    pub fn anonymous() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_admin: false,
        }
    }
}

/// Full session state as seen by every reader of the store.
///
/// Invariants maintained by `AuthSessionStore`:
/// - `is_authenticated` is true iff `user` is present
/// - `is_admin` follows `compute_is_admin` while authenticated, false otherwise
/// - `initialized` becomes true exactly once per process and never reverts
/// - while `loading` is true, readers must not assume `user` reflects the
///   latest server truth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub loading: bool,
    pub initialized: bool,
}

impl Session {
    /// Fresh anonymous state for a process with no persisted snapshot.
    pub fn anonymous() -> Self {
        Self::from_snapshot(SessionSnapshot::anonymous())
    }

    /// Rehydrate from a persisted snapshot. The result is a "last known"
    /// session usable for optimistic rendering; `initialized` stays false
    /// until the first verification attempt resolves.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            user: snapshot.user,
            token: snapshot.token,
            is_authenticated: snapshot.is_authenticated,
            is_admin: snapshot.is_admin,
            loading: false,
            initialized: false,
        }
    }

    /// The persisted subset of this state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            token: self.token.clone(),
            is_authenticated: self.is_authenticated,
            is_admin: self.is_admin,
        }
    }

    /// Settled means the first verification attempt has resolved and no
    /// round-trip is in flight.
    pub fn is_settled(&self) -> bool {
        self.initialized && !self.loading
    }
}
