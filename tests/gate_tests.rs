// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access gate tests.
//!
//! The unsettled check must win over every capability check: protected
//! content never renders while the first verification is unresolved, no
//! matter what the rehydrated flags claim.

use skillsprint_session::gate::{evaluate, AccessGate, AccessPolicy, GateDecision};
use skillsprint_session::models::Session;
use skillsprint_session::services::VerifyOutcome;

mod common;

fn settled_anonymous() -> Session {
    let mut session = Session::anonymous();
    session.initialized = true;
    session
}

#[test]
fn test_uninitialized_is_unsettled_regardless_of_flags() {
    let mut session = Session::anonymous();
    session.is_authenticated = true;
    session.is_admin = true;

    for policy in [
        AccessPolicy::Public,
        AccessPolicy::Authenticated,
        AccessPolicy::Admin,
    ] {
        assert_eq!(evaluate(&session, policy), GateDecision::Unsettled);
    }
}

#[test]
fn test_loading_is_unsettled() {
    let mut session = settled_anonymous();
    session.loading = true;
    assert_eq!(
        evaluate(&session, AccessPolicy::Public),
        GateDecision::Unsettled
    );
}

#[test]
fn test_policy_matrix_once_settled() {
    let anonymous = settled_anonymous();
    assert_eq!(evaluate(&anonymous, AccessPolicy::Public), GateDecision::Allowed);
    assert_eq!(
        evaluate(&anonymous, AccessPolicy::Authenticated),
        GateDecision::Denied
    );
    assert_eq!(evaluate(&anonymous, AccessPolicy::Admin), GateDecision::Denied);

    let mut learner = settled_anonymous();
    learner.user = Some(common::student("student@example.com"));
    learner.is_authenticated = true;
    assert_eq!(evaluate(&learner, AccessPolicy::Public), GateDecision::Allowed);
    assert_eq!(
        evaluate(&learner, AccessPolicy::Authenticated),
        GateDecision::Allowed
    );
    assert_eq!(evaluate(&learner, AccessPolicy::Admin), GateDecision::Denied);

    let mut admin = learner.clone();
    admin.user = Some(common::admin("admin@skillsprint.com"));
    admin.is_admin = true;
    assert_eq!(evaluate(&admin, AccessPolicy::Admin), GateDecision::Allowed);
}

#[test]
fn test_live_gate_blocks_before_settle_even_for_admins() {
    let store = common::test_store(vec![]);
    // Rehydration-style state: authenticated and admin, but not yet settled
    store.login(common::admin("admin@skillsprint.com"), "jwt1".to_string());

    let gate = AccessGate::new(&store, AccessPolicy::Admin);
    assert_eq!(gate.decision(), GateDecision::Unsettled);

    store.initialize();
    assert_eq!(gate.decision(), GateDecision::Allowed);
}

#[tokio::test]
async fn test_wait_settled_resolves_after_check_auth() {
    let store = std::sync::Arc::new(common::test_store(vec![VerifyOutcome::Verified(
        common::admin("admin@skillsprint.com"),
    )]));
    store.login(common::student("student@example.com"), "jwt1".to_string());

    let mut gate = AccessGate::new(&store, AccessPolicy::Admin);
    assert_eq!(gate.decision(), GateDecision::Unsettled);

    let checker = {
        let store = store.clone();
        tokio::spawn(async move { store.check_auth().await })
    };

    assert_eq!(gate.wait_settled().await, GateDecision::Allowed);
    checker.await.unwrap();
}

#[tokio::test]
async fn test_wait_settled_denies_anonymous_visitor() {
    let store = std::sync::Arc::new(common::test_store(vec![]));

    let mut gate = AccessGate::new(&store, AccessPolicy::Authenticated);

    let checker = {
        let store = store.clone();
        tokio::spawn(async move { store.check_auth().await })
    };

    assert_eq!(gate.wait_settled().await, GateDecision::Denied);
    checker.await.unwrap();
}

#[test]
fn test_gates_compose_over_one_store() {
    let store = common::test_store(vec![]);
    store.login(common::student("student@example.com"), "jwt1".to_string());
    store.initialize();

    // Top-level pass-through for public browsing, stricter per-page gate
    let app_gate = AccessGate::new(&store, AccessPolicy::Public);
    let admin_page_gate = AccessGate::new(&store, AccessPolicy::Admin);

    assert_eq!(app_gate.decision(), GateDecision::Allowed);
    assert_eq!(admin_page_gate.decision(), GateDecision::Denied);
}
