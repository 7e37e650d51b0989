//! HTTP transport seam
//!
//! `ApiClient` describes each call as an `ApiRequest` and hands it to a
//! `Transport`. `HttpTransport` is the reqwest implementation; tests swap
//! in a recording mock.

use std::future::Future;
use std::time::Duration;

use laptophub_protocol::ProfileUpdate;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{LaptopHubError, Result};

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(ProfileUpdate),
}

/// One call against the API, relative to the configured base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path such as `/laptops/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: ProfileUpdate) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Value of a query parameter, if sent.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Raw response: status and undecoded body text
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Carries an `ApiRequest` to the server
///
/// Errors are reserved for requests that got no response at all; any
/// status code, success or not, comes back as an `ApiReply`.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiReply>> + Send;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder();
        if let Some(seconds) = config.timeout {
            client_builder = client_builder.timeout(Duration::from_secs(seconds));
        }

        let client = client_builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply> {
        let url = self.config.endpoint_url(&request.path);
        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = request.bearer.is_some(),
            "sending request"
        );

        let mut request_builder = self.client.request(request.method, &url);

        if !request.query.is_empty() {
            request_builder = request_builder.query(&request.query);
        }

        if let Some(token) = &request.bearer {
            request_builder = request_builder.header("Authorization", format!("Bearer {}", token));
        }

        request_builder = match request.body {
            RequestBody::Empty => request_builder,
            RequestBody::Json(value) => request_builder.json(&value),
            RequestBody::Multipart(update) => request_builder.multipart(profile_form(update)?),
        };

        let response = request_builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiReply { status, body })
    }
}

fn profile_form(update: ProfileUpdate) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in update.text_fields() {
        form = form.text(name, value.to_string());
    }

    if let Some(avatar) = update.profile_picture {
        let mut part = Part::bytes(avatar.bytes).file_name(avatar.file_name);
        if let Some(mime) = &avatar.mime_type {
            part = part.mime_str(mime).map_err(|e| {
                LaptopHubError::validation(format!("Invalid avatar type {}: {}", mime, e))
            })?;
        }
        form = form.part(ProfileUpdate::AVATAR_FIELD, part);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get("/laptops/")
            .query("page", 2)
            .bearer("abc");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("q"), None);
        assert_eq!(request.bearer.as_deref(), Some("abc"));
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[test]
    fn test_reply_success_range() {
        assert!(ApiReply::new(204, "").is_success());
        assert!(!ApiReply::new(301, "").is_success());
        assert!(!ApiReply::new(404, "").is_success());
    }

    #[test]
    fn test_profile_form_rejects_bad_mime() {
        let update = ProfileUpdate {
            profile_picture: Some(laptophub_protocol::Avatar {
                file_name: "me.png".into(),
                mime_type: Some("not a mime".into()),
                bytes: vec![1, 2, 3],
            }),
            ..Default::default()
        };
        assert!(profile_form(update).is_err());
    }

    #[test]
    fn test_transport_rejects_invalid_config() {
        let config = ClientConfig {
            base_url: String::new(),
            ..ClientConfig::default()
        };
        assert!(HttpTransport::new(config).is_err());
    }
}
