//! API client for the LaptopHub backend
//!
//! `ApiClient` holds no session state. Every operation is a function of
//! its arguments; authenticated calls take the bearer token explicitly.
//! Operations are grouped by resource behind accessors such as
//! [`ApiClient::laptops`] and [`ApiClient::reviews`].

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{LaptopHubError, Result};
use crate::normalize::{normalize_failure, status_failure, MessagePolicy};
use crate::transport::{ApiReply, ApiRequest, HttpTransport, Transport};

/// How a non-2xx response is turned into an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    /// `HTTP {status}` only; used by anonymous catalog reads
    StatusOnly,
    /// Field error body parsed through the message policy
    Normalized,
}

/// Typed client over one configured base URL
#[derive(Debug)]
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    config: ClientConfig,
    policy: Box<dyn MessagePolicy>,
}

impl ApiClient<HttpTransport> {
    /// reqwest-backed client for `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        let policy = config.error_messages.policy();
        Self {
            transport,
            config,
            policy,
        }
    }

    /// Replace the rule that picks the message out of field error bodies.
    pub fn with_message_policy(mut self, policy: Box<dyn MessagePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Server page size for pagination math.
    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// Send and return the raw reply, whatever its status.
    pub(crate) async fn send_raw(&self, request: ApiRequest) -> Result<ApiReply> {
        self.transport.send(request).await
    }

    pub(crate) fn failure(&self, reply: &ApiReply, failure: Failure) -> LaptopHubError {
        debug!(status = reply.status, "request failed");
        match failure {
            Failure::StatusOnly => status_failure(reply.status),
            Failure::Normalized => normalize_failure(reply.status, &reply.body, self.policy.as_ref()),
        }
    }

    /// Send and decode. An empty 2xx body decodes to `None`.
    pub(crate) async fn execute<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        failure: Failure,
    ) -> Result<Option<R>> {
        let reply = self.send_raw(request).await?;
        if !reply.is_success() {
            return Err(self.failure(&reply, failure));
        }
        decode_body(&reply.body)
    }

    /// Send and decode a payload that must be present.
    pub(crate) async fn fetch<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        failure: Failure,
    ) -> Result<R> {
        self.execute(request, failure)
            .await?
            .ok_or_else(|| LaptopHubError::decode("Empty response body"))
    }

    /// Send and discard any payload.
    pub(crate) async fn perform(&self, request: ApiRequest, failure: Failure) -> Result<()> {
        let reply = self.send_raw(request).await?;
        if !reply.is_success() {
            return Err(self.failure(&reply, failure));
        }
        Ok(())
    }
}

pub(crate) fn decode_body<R: DeserializeOwned>(body: &str) -> Result<Option<R>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(body)?))
}

/// Rejects a missing bearer token before any request is made.
pub(crate) fn require_token(token: &str) -> Result<&str> {
    if token.trim().is_empty() {
        return Err(LaptopHubError::NotAuthenticated);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::JoinedMessages;
    use crate::tests::mocks::MockTransport;

    #[test]
    fn test_decode_empty_body_is_absent() {
        let decoded: Option<serde_json::Value> = decode_body("").unwrap();
        assert!(decoded.is_none());
        let decoded: Option<serde_json::Value> = decode_body("  \n").unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_decode_malformed_body_errors() {
        let decoded: Result<Option<serde_json::Value>> = decode_body("{not json");
        assert!(matches!(decoded, Err(LaptopHubError::Decode { .. })));
    }

    #[test]
    fn test_require_token() {
        assert!(matches!(require_token(""), Err(LaptopHubError::NotAuthenticated)));
        assert_eq!(require_token("abc").unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_execute_empty_success_is_absent() {
        let mock = MockTransport::new();
        mock.respond("POST", "/auth/email/resend/", 200, "");
        let client = ApiClient::with_transport(mock, ClientConfig::default());

        let result: Option<serde_json::Value> = client
            .execute(ApiRequest::post("/auth/email/resend/"), Failure::Normalized)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_custom_message_policy() {
        let mock = MockTransport::new();
        mock.respond(
            "POST",
            "/auth/register/",
            400,
            r#"{"email": ["already taken"], "password": ["too short"]}"#,
        );
        let client = ApiClient::with_transport(mock, ClientConfig::default())
            .with_message_policy(Box::new(JoinedMessages::default()));

        let err = client
            .perform(ApiRequest::post("/auth/register/"), Failure::Normalized)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "already taken; too short");
    }
}
