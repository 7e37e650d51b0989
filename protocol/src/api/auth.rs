//! Authentication API DTOs
//!
//! Bodies for the account endpoints under `/auth/` and the token endpoint.
//! None of these carry a bearer token themselves; the ones that need one
//! get it from the caller.

use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Registration
// ============================================================================

/// New-account request for POST /auth/register/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    /// Omitted from the body when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 32))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration response; the account is created but not signed in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

// ============================================================================
// Tokens
// ============================================================================

/// Credentials for POST /token/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Access/refresh pair issued on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

// ============================================================================
// Password & Email Flows
// ============================================================================

/// POST /auth/password/change/ (bearer)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 1))]
    pub new_password: String,
}

/// POST /auth/password/reset/request/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

/// POST /auth/password/reset/confirm/
///
/// `token` and `uid` come from the reset link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetConfirm {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1))]
    pub uid: String,
    #[validate(length(min = 1))]
    pub new_password: String,
}

/// POST /auth/email/verify/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1))]
    pub uid: String,
    #[validate(length(min = 1))]
    pub token: String,
}
