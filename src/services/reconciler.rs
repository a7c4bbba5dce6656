// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth session bridge.
//!
//! Keeps a third-party OAuth provider's notion of identity consistent with
//! the session store. All precedence rules live in one code path
//! (`observe`) so the "never clobber a real token with the sentinel" rule
//! is enforceable in a single place.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{Role, User};
use crate::store::AuthSessionStore;

/// Placeholder credential recorded when a session came from the OAuth
/// provider and no genuine bearer JWT exists. Opaque to the backend.
pub const OAUTH_SESSION_SENTINEL: &str = "oauth-session";

/// Status reported by the OAuth provider.
///
/// Provider errors surface as `Unauthenticated`; there is no separate error
/// channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    Loading,
    Authenticated(ProviderProfile),
    Unauthenticated,
}

/// Identity payload from the OAuth provider session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub id: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Option<Role>,
}

/// Bridges provider status transitions into store operations.
pub struct SessionReconciler {
    store: Arc<AuthSessionStore>,
}

impl SessionReconciler {
    pub fn new(store: Arc<AuthSessionStore>) -> Self {
        Self { store }
    }

    /// Feed one provider status into the store.
    ///
    /// - ensures the store is initialized (idempotent flag set, not a
    ///   re-verification)
    /// - on `Authenticated`, merges the provider identity while reusing any
    ///   token already in the store
    /// - on `Unauthenticated` or `Loading`, mutates nothing: a transient
    ///   provider expiry must not log out a user who is independently
    ///   authenticated via credentials
    pub fn observe(&self, status: &ProviderStatus) {
        if !self.store.session().initialized {
            self.store.initialize();
        }

        let profile = match status {
            ProviderStatus::Authenticated(profile) => profile,
            ProviderStatus::Loading | ProviderStatus::Unauthenticated => return,
        };

        let user = profile_to_user(profile);
        let token = self
            .store
            .session()
            .token
            .unwrap_or_else(|| OAUTH_SESSION_SENTINEL.to_string());

        tracing::debug!(email = %user.email, "Merging OAuth provider session");
        self.store.login(user, token);
    }

    /// Drive the reconciler from a provider status channel until the
    /// provider side shuts down.
    pub async fn run(self, mut rx: watch::Receiver<ProviderStatus>) {
        self.observe(&rx.borrow().clone());
        while rx.changed().await.is_ok() {
            let status = rx.borrow_and_update().clone();
            self.observe(&status);
        }
    }
}

/// Map a provider profile onto the user model. The provider does not report
/// an account creation time, so the merge time stands in for it.
fn profile_to_user(profile: &ProviderProfile) -> User {
    User {
        id: profile.id.clone().unwrap_or_default(),
        email: profile.email.clone(),
        name: profile.name.clone(),
        avatar: profile.image.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
        role: Some(profile.role.unwrap_or(Role::User)),
    }
}
