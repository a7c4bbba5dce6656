// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SkillSprint session bootstrap
//!
//! Wires the session core the way the client application does on startup:
//! rehydrate the persisted snapshot, verify it against the backend, and
//! report the settled session and gate decisions.

use std::sync::Arc;
use std::time::Duration;

use skillsprint_session::{
    config::Config,
    gate::{self, AccessPolicy},
    services::IdentityClient,
    storage::SnapshotStore,
    AuthSessionStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(api_url = %config.api_url, "Starting SkillSprint session core");

    let storage = SnapshotStore::open(&config.storage_path);
    let identity = IdentityClient::new(
        config.api_url.clone(),
        Duration::from_secs(config.check_timeout_secs),
    )?;

    let store = Arc::new(AuthSessionStore::new(&config, identity, storage));

    // First verification attempt; settles the session whatever the outcome
    store.check_auth().await;

    let session = store.session();
    tracing::info!(
        authenticated = session.is_authenticated,
        admin = session.is_admin,
        email = session.user.as_ref().map(|u| u.email.as_str()).unwrap_or("-"),
        "Session settled"
    );

    for policy in [
        AccessPolicy::Public,
        AccessPolicy::Authenticated,
        AccessPolicy::Admin,
    ] {
        tracing::info!(
            policy = ?policy,
            decision = ?gate::evaluate(&session, policy),
            "Gate decision"
        );
    }

    Ok(())
}

/// Initialize logging with an env-filter.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillsprint_session=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
