//! Signed-in user's own profile

use laptophub_protocol::{ProfileUpdate, UserProfile};
use tracing::debug;

use crate::client::{decode_body, require_token, ApiClient, Failure};
use crate::error::{LaptopHubError, Result};
use crate::transport::{ApiRequest, Transport};

/// `profile.*`
#[derive(Debug)]
pub struct ProfileApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> ApiClient<T> {
    pub fn profile(&self) -> ProfileApi<'_, T> {
        ProfileApi { client: self }
    }
}

impl<'a, T: Transport> ProfileApi<'a, T> {
    /// GET /auth/profile/
    ///
    /// A 404 means the account has no profile yet and yields `Ok(None)`.
    pub async fn get(&self, token: &str) -> Result<Option<UserProfile>> {
        let token = require_token(token)?;
        let reply = self
            .client
            .send_raw(ApiRequest::get("/auth/profile/").bearer(token))
            .await?;

        if reply.status == 404 {
            return Ok(None);
        }
        if !reply.is_success() {
            return Err(self.client.failure(&reply, Failure::Normalized));
        }
        decode_body(&reply.body)
    }

    /// Like [`get`](Self::get) but never fails. Used after sign-in, where a
    /// missing profile must not undo the sign-in itself.
    pub async fn best_effort(&self, token: &str) -> Option<UserProfile> {
        match self.get(token).await {
            Ok(profile) => profile,
            Err(e) => {
                debug!(error = %e, "profile fetch failed");
                None
            }
        }
    }

    /// PATCH /auth/profile/ as multipart form data
    pub async fn update(&self, token: &str, update: ProfileUpdate) -> Result<UserProfile> {
        let token = require_token(token)?;
        if update.is_empty() {
            return Err(LaptopHubError::validation("Nothing to update"));
        }
        let request = ApiRequest::patch("/auth/profile/")
            .bearer(token)
            .multipart(update);
        self.client.fetch(request, Failure::Normalized).await
    }

    /// DELETE /auth/profile/delete/
    pub async fn delete_account(&self, token: &str) -> Result<()> {
        let token = require_token(token)?;
        let request = ApiRequest::delete("/auth/profile/delete/").bearer(token);
        self.client.perform(request, Failure::Normalized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::tests::mocks::{profile_json, MockTransport};
    use crate::transport::RequestBody;
    use laptophub_protocol::Avatar;

    fn create_client() -> (MockTransport, ApiClient<MockTransport>) {
        let mock = MockTransport::new();
        let client = ApiClient::with_transport(mock.clone(), ClientConfig::default());
        (mock, client)
    }

    #[tokio::test]
    async fn test_get_profile() {
        let (mock, client) = create_client();
        mock.respond_json("GET", "/auth/profile/", 200, profile_json("sara@example.com"));

        let profile = client.profile().get("tok").await.unwrap().unwrap();
        assert_eq!(profile.email, "sara@example.com");
        assert_eq!(mock.last_request().bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_profile_with_null_contact_fields() {
        let (mock, client) = create_client();
        let mut body = profile_json("sara@example.com");
        body["phone_number"] = serde_json::Value::Null;
        body["bio"] = serde_json::Value::Null;
        mock.respond_json("GET", "/auth/profile/", 200, body);

        let profile = client.profile().get("tok").await.unwrap().unwrap();
        assert_eq!(profile.phone_number, "");
        assert_eq!(profile.bio, "");
        assert_eq!(profile.first_name, "Sara");
    }

    #[tokio::test]
    async fn test_missing_profile_is_none() {
        let (mock, client) = create_client();
        mock.respond("GET", "/auth/profile/", 404, r#"{"detail": "Not found."}"#);

        assert!(client.profile().get("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_not_a_soft_miss() {
        let (mock, client) = create_client();
        mock.respond("GET", "/auth/profile/", 500, "");

        let err = client.profile().get("tok").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_expired_token_is_error() {
        let (mock, client) = create_client();
        mock.respond(
            "GET",
            "/auth/profile/",
            401,
            r#"{"detail": "Given token not valid for any token type"}"#,
        );

        let err = client.profile().get("stale").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Given token not valid for any token type");
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failures() {
        let (mock, client) = create_client();
        mock.respond("GET", "/auth/profile/", 500, "");
        assert!(client.profile().best_effort("tok").await.is_none());

        mock.go_offline();
        assert!(client.profile().best_effort("tok").await.is_none());
    }

    #[tokio::test]
    async fn test_update_sends_multipart() {
        let (mock, client) = create_client();
        mock.respond_json("PATCH", "/auth/profile/", 200, profile_json("sara@example.com"));

        let update = ProfileUpdate {
            bio: Some("Refurbishes ThinkPads".into()),
            profile_picture: Some(Avatar {
                file_name: "me.png".into(),
                mime_type: Some("image/png".into()),
                bytes: vec![0x89, 0x50],
            }),
            ..Default::default()
        };
        let profile = client.profile().update("tok", update.clone()).await.unwrap();
        assert_eq!(profile.email, "sara@example.com");

        let request = mock.last_request();
        assert_eq!(request.body, RequestBody::Multipart(update));
        assert_eq!(request.bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_locally() {
        let (mock, client) = create_client();
        let err = client
            .profile()
            .update("tok", ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LaptopHubError::Validation { .. }));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_account() {
        let (mock, client) = create_client();
        mock.respond("DELETE", "/auth/profile/delete/", 204, "");

        client.profile().delete_account("tok").await.unwrap();
        assert_eq!(mock.last_request().path, "/auth/profile/delete/");
    }
}
