// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The authoritative session store.
//!
//! Single writer of `Session`. Every reader (pages, gates, the reconciler)
//! consumes the state through `session()` or a `subscribe()`d watch channel.
//! Mutations persist their snapshot before the state lock is released, so
//! the in-memory state and the durable snapshot never diverge.

use std::sync::Mutex;

use tokio::sync::watch;

use crate::config::Config;
use crate::models::{compute_is_admin, Session, User};
use crate::services::identity::{IdentityClient, VerifyOutcome};
use crate::storage::SnapshotStore;

/// Process-wide session state machine.
///
/// Constructed explicitly and passed to consumers (no global), so tests can
/// build isolated instances.
pub struct AuthSessionStore {
    admin_email: String,
    identity: IdentityClient,
    storage: SnapshotStore,
    state: Mutex<Session>,
    watch_tx: watch::Sender<Session>,
}

impl AuthSessionStore {
    /// Build a store, rehydrating the last persisted snapshot if one exists.
    ///
    /// The rehydrated session is "last known" state for optimistic
    /// rendering; `initialized` stays false until the first verification
    /// attempt resolves, and a corrupt snapshot degrades to anonymous.
    pub fn new(config: &Config, identity: IdentityClient, storage: SnapshotStore) -> Self {
        let session = match storage.load() {
            Ok(Some(snapshot)) => Session::from_snapshot(snapshot),
            Ok(None) => Session::anonymous(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load session snapshot, starting anonymous");
                Session::anonymous()
            }
        };

        let (watch_tx, _) = watch::channel(session.clone());

        Self {
            admin_email: config.admin_email.clone(),
            identity,
            storage,
            state: Mutex::new(session),
            watch_tx,
        }
    }

    /// Current session state.
    pub fn session(&self) -> Session {
        self.state.lock().expect("session lock poisoned").clone()
    }

    /// Subscribe to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.watch_tx.subscribe()
    }

    /// Adopt a freshly authenticated identity.
    ///
    /// Trusted internal call made only after a successful upstream
    /// authentication (credentials login, registration, or the OAuth
    /// reconciler); there is no error path.
    pub fn login(&self, user: User, token: String) {
        let is_admin = compute_is_admin(&user, &self.admin_email);

        let mut state = self.state.lock().expect("session lock poisoned");
        state.user = Some(user);
        state.token = Some(token);
        state.is_authenticated = true;
        state.is_admin = is_admin;
        state.loading = false;
        self.commit(&state);

        tracing::info!(is_admin, "Session established");
    }

    /// Drop to the anonymous state. Idempotent.
    pub fn logout(&self) {
        let mut state = self.state.lock().expect("session lock poisoned");
        state.user = None;
        state.token = None;
        state.is_authenticated = false;
        state.is_admin = false;
        state.loading = false;
        self.commit(&state);

        tracing::info!("Session cleared");
    }

    /// Mark the store initialized without verifying anything.
    ///
    /// Used by the reconciler's first-mount path. Idempotent; `initialized`
    /// never reverts to false afterwards.
    pub fn initialize(&self) {
        let mut state = self.state.lock().expect("session lock poisoned");
        if !state.initialized {
            state.initialized = true;
            self.publish(&state);
        }
    }

    /// Verify the persisted token against the backend identity query.
    ///
    /// Safe to call redundantly. Outcomes:
    /// - no token: initialized, zero network calls
    /// - verified: adopt the returned identity
    /// - explicit 401/403: clear the session (unless the token was replaced
    ///   by a concurrent `login` while the call was in flight)
    /// - anything else: preserve the session, finish initializing
    ///
    /// Errors never escape: this runs from application bootstrap where an
    /// unhandled failure would be worse than a stale session.
    pub async fn check_auth(&self) {
        let token = {
            let mut state = self.state.lock().expect("session lock poisoned");
            match state.token.clone() {
                None => {
                    // An unauthenticated visitor is a valid terminal state
                    state.initialized = true;
                    self.publish(&state);
                    return;
                }
                Some(token) => {
                    state.loading = true;
                    self.publish(&state);
                    token
                }
            }
        };

        let outcome = self.identity.verify(&token).await;

        let mut state = self.state.lock().expect("session lock poisoned");
        match outcome {
            VerifyOutcome::Verified(user) => {
                let is_admin = compute_is_admin(&user, &self.admin_email);
                state.user = Some(user);
                state.is_authenticated = true;
                state.is_admin = is_admin;
                state.loading = false;
                state.initialized = true;
                self.commit(&state);
            }
            VerifyOutcome::Rejected => {
                if state.token.as_deref() == Some(token.as_str()) {
                    tracing::info!("Token rejected by backend, clearing session");
                    state.user = None;
                    state.token = None;
                    state.is_authenticated = false;
                    state.is_admin = false;
                    state.loading = false;
                    state.initialized = true;
                    self.commit(&state);
                } else {
                    // A concurrent login replaced the token we verified;
                    // the rejection is stale and must not clear it.
                    tracing::warn!("Discarding rejection for a replaced token");
                    state.loading = false;
                    state.initialized = true;
                    self.publish(&state);
                }
            }
            VerifyOutcome::Inconclusive(reason) => {
                tracing::warn!(reason = %reason, "Identity check inconclusive, preserving session");
                state.loading = false;
                state.initialized = true;
                self.publish(&state);
            }
        }
    }

    /// Call count of the underlying mock transport (test support).
    pub fn identity_verify_calls(&self) -> usize {
        self.identity.verify_calls()
    }

    /// Persist the snapshot and publish the new state. Called with the
    /// state lock held so readers of the file and readers of the channel
    /// agree with the in-memory state.
    fn commit(&self, state: &Session) {
        if let Err(e) = self.storage.save(&state.snapshot()) {
            tracing::error!(error = %e, "Failed to persist session snapshot");
        }
        self.publish(state);
    }

    /// Publish without persisting, for transitions that only touch the
    /// transient `loading`/`initialized` flags.
    fn publish(&self, state: &Session) {
        self.watch_tx.send_replace(state.clone());
    }
}
