// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Initialization barrier and role-gated access checks.
//!
//! A page declares its required capability; the gate answers with a
//! three-state decision. The unsettled check always runs before the
//! capability check so protected content can never flash while the first
//! verification is still in flight.

use tokio::sync::watch;

use crate::models::Session;
use crate::store::AuthSessionStore;

/// Capability a page requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Open browsing - the top-level gate wrapping the whole application
    Public,
    /// Any authenticated user
    Authenticated,
    /// Admin dashboards and user management
    Admin,
}

/// Gate answer for the current session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// First verification not yet resolved - render a blocking placeholder,
    /// make no redirect decision
    Unsettled,
    /// Requirement unmet - render the forbidden view. Terminal, not
    /// retried, not an error
    Denied,
    /// Render children
    Allowed,
}

/// Evaluate a policy against a session. Pure; no IO.
pub fn evaluate(session: &Session, policy: AccessPolicy) -> GateDecision {
    // Unsettled check must precede any capability check
    if !session.is_settled() {
        return GateDecision::Unsettled;
    }

    let allowed = match policy {
        AccessPolicy::Public => true,
        AccessPolicy::Authenticated => session.is_authenticated,
        AccessPolicy::Admin => session.is_authenticated && session.is_admin,
    };

    if allowed {
        GateDecision::Allowed
    } else {
        GateDecision::Denied
    }
}

/// A live gate bound to a store subscription.
///
/// Gates compose: one `Public` instance wraps the application, and
/// individual pages hold stricter instances over the same store.
pub struct AccessGate {
    policy: AccessPolicy,
    rx: watch::Receiver<Session>,
}

impl AccessGate {
    pub fn new(store: &AuthSessionStore, policy: AccessPolicy) -> Self {
        Self {
            policy,
            rx: store.subscribe(),
        }
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    /// Decision for the state the store currently holds.
    pub fn decision(&self) -> GateDecision {
        evaluate(&self.rx.borrow(), self.policy)
    }

    /// Wait for the store to settle, then return the terminal decision.
    ///
    /// If the store side goes away before settling, returns the decision
    /// for the last observed state rather than blocking forever.
    pub async fn wait_settled(&mut self) -> GateDecision {
        loop {
            let decision = evaluate(&self.rx.borrow_and_update(), self.policy);
            if decision != GateDecision::Unsettled {
                return decision;
            }
            if self.rx.changed().await.is_err() {
                return evaluate(&self.rx.borrow(), self.policy);
            }
        }
    }
}
