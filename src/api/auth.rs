//! Account and token endpoints
//!
//! Each body is validated locally before it is sent. Server-side failures
//! come back as the first field message of the response body.

use laptophub_protocol::{
    ChangePasswordRequest, LoginRequest, PasswordResetConfirm, PasswordResetRequest,
    RegisterRequest, RegisterResponse, TokenPair, VerifyEmailRequest,
};
use validator::Validate;

use crate::client::{require_token, ApiClient, Failure};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `auth.*`
#[derive(Debug)]
pub struct AuthApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> ApiClient<T> {
    pub fn auth(&self) -> AuthApi<'_, T> {
        AuthApi { client: self }
    }
}

impl<'a, T: Transport> AuthApi<'a, T> {
    /// POST /auth/register/
    ///
    /// Creates the account without signing in. An empty success body
    /// echoes back the submitted names and email.
    pub async fn register(&self, data: &RegisterRequest) -> Result<RegisterResponse> {
        data.validate()?;
        let request = ApiRequest::post("/auth/register/").json(data)?;
        let registered = self.client.execute(request, Failure::Normalized).await?;
        Ok(registered.unwrap_or_else(|| RegisterResponse {
            email: data.email.clone(),
            first_name: Some(data.first_name.clone()),
            last_name: Some(data.last_name.clone()),
        }))
    }

    /// POST /token/
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        credentials.validate()?;
        let request = ApiRequest::post("/token/").json(&credentials)?;
        self.client.fetch(request, Failure::Normalized).await
    }

    /// POST /auth/password/change/ (bearer)
    pub async fn change_password(&self, token: &str, data: &ChangePasswordRequest) -> Result<()> {
        let token = require_token(token)?;
        data.validate()?;
        let request = ApiRequest::post("/auth/password/change/")
            .bearer(token)
            .json(data)?;
        self.client.perform(request, Failure::Normalized).await
    }

    /// POST /auth/password/reset/request/
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let data = PasswordResetRequest {
            email: email.trim().to_string(),
        };
        data.validate()?;
        let request = ApiRequest::post("/auth/password/reset/request/").json(&data)?;
        self.client.perform(request, Failure::Normalized).await
    }

    /// POST /auth/password/reset/confirm/
    pub async fn confirm_password_reset(&self, data: &PasswordResetConfirm) -> Result<()> {
        data.validate()?;
        let request = ApiRequest::post("/auth/password/reset/confirm/").json(data)?;
        self.client.perform(request, Failure::Normalized).await
    }

    /// POST /auth/email/verify/
    pub async fn verify_email(&self, uid: &str, token: &str) -> Result<()> {
        let data = VerifyEmailRequest {
            uid: uid.trim().to_string(),
            token: token.trim().to_string(),
        };
        data.validate()?;
        let request = ApiRequest::post("/auth/email/verify/").json(&data)?;
        self.client.perform(request, Failure::Normalized).await
    }

    /// POST /auth/email/resend/ (bearer)
    pub async fn resend_verification(&self, token: &str) -> Result<()> {
        let token = require_token(token)?;
        let request = ApiRequest::post("/auth/email/resend/").bearer(token);
        self.client.perform(request, Failure::Normalized).await
    }
}
