// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session error types with a transient/fatal split.

/// Errors produced by the session core.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Explicit 401/403 from the backend. Fatal to the session.
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    AccountExists,

    /// Client-side validation of a login/registration form.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Network error, timeout, or a non-auth HTTP failure. Never clears
    /// the session.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// 2xx response whose body did not match the expected shape.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Whether this error should preserve the current session rather than
    /// clear it. Only an explicit backend rejection is fatal.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AuthError::Unavailable(_) | AuthError::MalformedResponse(_) | AuthError::Storage(_)
        )
    }

    /// Whether this error should be shown to the user on a login or
    /// registration form.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::AccountExists | AuthError::Validation(_)
        )
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, AuthError>;
