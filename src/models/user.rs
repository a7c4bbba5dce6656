//! User model and admin-capability derivation.

use serde::{Deserialize, Serialize};

/// Role reported by the backend.
///
/// Serialized in the backend's SCREAMING_CASE convention. A user record
/// without a role is treated as a plain `User` for UI purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Lead,
    Teacher,
    Admin,
}

/// Authenticated principal.
///
/// Constructed from a credentials-login response or from an OAuth provider
/// profile, replaced wholesale on every successful (re)authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque stable identifier
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Account creation timestamp (backend-provided, not mutated here)
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl User {
    /// Role to use for display and gating when the backend omitted one.
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::User)
    }
}

/// Whether a user carries the admin capability.
///
/// The well-known email is a deliberate secondary signal: admin access is
/// never purely role-string-dependent.
pub fn compute_is_admin(user: &User, admin_email: &str) -> bool {
    user.role == Some(Role::Admin) || user.email == admin_email
}
