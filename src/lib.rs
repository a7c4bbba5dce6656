// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! SkillSprint session core
//!
//! Client-side authentication and authorization state for the SkillSprint
//! e-learning client: the authoritative session store, its persisted
//! snapshot, the GraphQL identity client, the OAuth session reconciler,
//! and role-gated access checks.

pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;

pub use store::AuthSessionStore;
