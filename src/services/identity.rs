// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GraphQL client for the backend identity API.
//!
//! Handles:
//! - Bearer-token identity verification (the `me` query)
//! - Credentials login and registration mutations
//! - Outcome classification: only an explicit 401/403 is a rejection,
//!   everything else is inconclusive and must not clear a session

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AuthError;
use crate::models::User;

const ME_QUERY: &str = "query { me { id email name avatar createdAt role } }";

const LOGIN_MUTATION: &str = "mutation Login($email: String!, $password: String!) { \
     login(email: $email, password: $password) { \
     access_token user { id email name avatar createdAt role } } }";

const REGISTER_MUTATION: &str =
    "mutation Register($name: String!, $email: String!, $password: String!) { \
     register(name: $name, email: $email, password: $password) { \
     access_token user { id email name avatar createdAt role } } }";

/// Result of an identity verification round-trip.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    /// 2xx with a valid identity payload
    Verified(User),
    /// Explicit 401/403 - the token is dead
    Rejected,
    /// Network error, timeout, other non-2xx, or a malformed payload.
    /// The caller must preserve its current session.
    Inconclusive(String),
}

/// Client for the backend GraphQL identity API.
pub struct IdentityClient {
    transport: Transport,
}

enum Transport {
    Http {
        http: reqwest::Client,
        endpoint: String,
    },
    /// Scripted outcomes for offline tests.
    Mock {
        outcomes: Mutex<VecDeque<VerifyOutcome>>,
        verify_calls: AtomicUsize,
        latency: Option<Duration>,
    },
}

impl IdentityClient {
    /// Create a client against the given GraphQL endpoint.
    ///
    /// The timeout applies per request so a stalled backend can never leave
    /// the session store loading forever.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Internal(e.into()))?;

        Ok(Self {
            transport: Transport::Http {
                http,
                endpoint: endpoint.into(),
            },
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// `verify` pops the scripted outcomes in order; login and registration
    /// return an error if called.
    pub fn new_mock(outcomes: Vec<VerifyOutcome>) -> Self {
        Self {
            transport: Transport::Mock {
                outcomes: Mutex::new(outcomes.into()),
                verify_calls: AtomicUsize::new(0),
                latency: None,
            },
        }
    }

    /// Mock client whose `verify` resolves only after `latency`, for tests
    /// that interleave store operations with an in-flight verification.
    pub fn new_mock_with_latency(outcomes: Vec<VerifyOutcome>, latency: Duration) -> Self {
        Self {
            transport: Transport::Mock {
                outcomes: Mutex::new(outcomes.into()),
                verify_calls: AtomicUsize::new(0),
                latency: Some(latency),
            },
        }
    }

    /// Number of `verify` calls observed by the mock transport.
    pub fn verify_calls(&self) -> usize {
        match &self.transport {
            Transport::Mock { verify_calls, .. } => verify_calls.load(Ordering::SeqCst),
            Transport::Http { .. } => 0,
        }
    }

    /// Verify a bearer token against the backend identity query.
    ///
    /// Never returns an error: every failure mode is folded into the
    /// three-way outcome so the caller's state machine stays total.
    pub async fn verify(&self, token: &str) -> VerifyOutcome {
        let (http, endpoint) = match &self.transport {
            Transport::Mock {
                outcomes,
                verify_calls,
                latency,
            } => {
                verify_calls.fetch_add(1, Ordering::SeqCst);
                let outcome = outcomes
                    .lock()
                    .expect("mock outcomes lock poisoned")
                    .pop_front()
                    .unwrap_or_else(|| {
                        VerifyOutcome::Inconclusive("mock script exhausted".to_string())
                    });
                if let Some(latency) = latency {
                    tokio::time::sleep(*latency).await;
                }
                return outcome;
            }
            Transport::Http { http, endpoint } => (http, endpoint),
        };

        let request = GraphqlRequest {
            query: ME_QUERY,
            variables: serde_json::Value::Null,
        };

        let response = match http
            .post(endpoint)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return VerifyOutcome::Inconclusive(format!("identity request failed: {}", e))
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => classify_me_response(status, &body),
            Err(e) => VerifyOutcome::Inconclusive(format!("identity response read failed: {}", e)),
        }
    }

    /// Credentials login. On success yields the `(user, token)` pair fed to
    /// `AuthSessionStore::login`; on failure the store is never touched.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let input = LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        };
        input
            .validate()
            .map_err(|_| AuthError::Validation("Email and password are required".to_string()))?;

        let variables = serde_json::json!({ "email": email, "password": password });
        let data = self
            .post_graphql(LOGIN_MUTATION, variables, map_login_errors)
            .await?;

        extract_credentials(data, "login")
    }

    /// Account registration. Same contract as `login`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let input = RegisterInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(errors) = input.validate() {
            if errors.field_errors().contains_key("password") {
                return Err(AuthError::Validation(
                    "Password must be at least 8 characters long".to_string(),
                ));
            }
            return Err(AuthError::Validation(
                "Name, email, and password are required".to_string(),
            ));
        }

        let variables = serde_json::json!({ "name": name, "email": email, "password": password });
        let data = self
            .post_graphql(REGISTER_MUTATION, variables, map_register_errors)
            .await?;

        extract_credentials(data, "register")
    }

    /// POST a GraphQL document and return the `data` object, mapping
    /// GraphQL-level errors through `map_errors`.
    async fn post_graphql(
        &self,
        query: &'static str,
        variables: serde_json::Value,
        map_errors: fn(&str) -> AuthError,
    ) -> Result<serde_json::Value, AuthError> {
        let (http, endpoint) = match &self.transport {
            Transport::Mock { .. } => {
                return Err(AuthError::Unavailable(
                    "identity backend not connected (offline mode)".to_string(),
                ))
            }
            Transport::Http { http, endpoint } => (http, endpoint),
        };

        let request = GraphqlRequest { query, variables };

        let response = http
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Unavailable(format!("HTTP {}", status)));
        }

        let envelope: GraphqlResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        if let Some(error) = envelope.errors.first() {
            return Err(map_errors(&error.message));
        }

        envelope
            .data
            .ok_or_else(|| AuthError::MalformedResponse("missing data object".to_string()))
    }
}

/// Classify the identity query response per the preserve-vs-clear asymmetry.
fn classify_me_response(status: StatusCode, body: &str) -> VerifyOutcome {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return VerifyOutcome::Rejected;
    }
    if !status.is_success() {
        return VerifyOutcome::Inconclusive(format!("HTTP {}", status));
    }

    match serde_json::from_str::<GraphqlResponse<MeData>>(body) {
        Ok(envelope) => match envelope.data.and_then(|d| d.me) {
            Some(user) => VerifyOutcome::Verified(user),
            None => {
                let reason = envelope
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "empty identity payload".to_string());
                VerifyOutcome::Inconclusive(reason)
            }
        },
        Err(e) => VerifyOutcome::Inconclusive(format!("JSON parse error: {}", e)),
    }
}

/// Map backend errors for the login mutation. The backend does not
/// distinguish bad email from bad password, and neither do we.
fn map_login_errors(_message: &str) -> AuthError {
    AuthError::InvalidCredentials
}

/// Map backend errors for the register mutation.
fn map_register_errors(message: &str) -> AuthError {
    if message.contains("unique constraint") {
        AuthError::AccountExists
    } else {
        AuthError::Validation(message.to_string())
    }
}

fn extract_credentials(
    data: serde_json::Value,
    operation: &str,
) -> Result<(User, String), AuthError> {
    let payload = data.get(operation).cloned().ok_or_else(|| {
        AuthError::MalformedResponse(format!("missing {} payload", operation))
    })?;

    let payload: CredentialsPayload = serde_json::from_value(payload)
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    Ok((payload.user, payload.access_token))
}

#[derive(Serialize)]
struct GraphqlRequest {
    query: &'static str,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct MeData {
    me: Option<User>,
}

#[derive(Deserialize)]
struct CredentialsPayload {
    access_token: String,
    user: User,
}

#[derive(Debug, Validate)]
struct LoginInput {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    password: String,
}

#[derive(Debug, Validate)]
struct RegisterInput {
    #[validate(length(min = 1))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
}
