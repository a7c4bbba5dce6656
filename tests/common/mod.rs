// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use skillsprint_session::config::Config;
use skillsprint_session::models::{Role, User};
use skillsprint_session::services::{IdentityClient, VerifyOutcome};
use skillsprint_session::storage::SnapshotStore;
use skillsprint_session::AuthSessionStore;

/// Create a store with scripted verification outcomes and in-memory storage.
#[allow(dead_code)]
pub fn test_store(outcomes: Vec<VerifyOutcome>) -> AuthSessionStore {
    test_store_with_storage(outcomes, SnapshotStore::new_mock())
}

/// Create a store whose verification calls resolve only after `latency`,
/// for interleaving tests.
#[allow(dead_code)]
pub fn test_store_with_latency(
    outcomes: Vec<VerifyOutcome>,
    latency: std::time::Duration,
) -> AuthSessionStore {
    AuthSessionStore::new(
        &Config::default(),
        IdentityClient::new_mock_with_latency(outcomes, latency),
        SnapshotStore::new_mock(),
    )
}

/// Create a store over explicit storage, for persistence tests.
#[allow(dead_code)]
pub fn test_store_with_storage(
    outcomes: Vec<VerifyOutcome>,
    storage: SnapshotStore,
) -> AuthSessionStore {
    AuthSessionStore::new(&Config::default(), IdentityClient::new_mock(outcomes), storage)
}

/// A regular learner account.
#[allow(dead_code)]
pub fn student(email: &str) -> User {
    User {
        id: "user-1".to_string(),
        email: email.to_string(),
        name: Some("Student".to_string()),
        avatar: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        role: Some(Role::User),
    }
}

/// An account whose role grants admin capability.
#[allow(dead_code)]
pub fn admin(email: &str) -> User {
    User {
        id: "admin-1".to_string(),
        email: email.to_string(),
        name: Some("Admin".to_string()),
        avatar: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        role: Some(Role::Admin),
    }
}
