// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend and provider integration.

pub mod identity;
pub mod reconciler;

pub use identity::{IdentityClient, VerifyOutcome};
pub use reconciler::{ProviderProfile, ProviderStatus, SessionReconciler, OAUTH_SESSION_SENTINEL};
