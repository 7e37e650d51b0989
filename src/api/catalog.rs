//! Listing and channel reads
//!
//! All anonymous. Failures carry the status code only.

use laptophub_protocol::{Channel, Listing, Paginated};

use crate::client::{ApiClient, Failure};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `laptops.*`
#[derive(Debug)]
pub struct LaptopsApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

/// `chats.*`
#[derive(Debug)]
pub struct ChatsApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

/// `chat.*`: listings scoped to one channel
#[derive(Debug)]
pub struct ChatApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> ApiClient<T> {
    pub fn laptops(&self) -> LaptopsApi<'_, T> {
        LaptopsApi { client: self }
    }

    pub fn chats(&self) -> ChatsApi<'_, T> {
        ChatsApi { client: self }
    }

    pub fn chat(&self) -> ChatApi<'_, T> {
        ChatApi { client: self }
    }
}

/// Pages are 1-based; anything lower is treated as the first page.
fn page_number(page: u32) -> u32 {
    page.max(1)
}

impl<'a, T: Transport> LaptopsApi<'a, T> {
    /// GET /laptops/?page=&q=
    ///
    /// The query is trimmed and only sent when something is left.
    pub async fn list(&self, page: u32, query: Option<&str>) -> Result<Paginated<Listing>> {
        let mut request = ApiRequest::get("/laptops/").query("page", page_number(page));
        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            request = request.query("q", q);
        }
        self.client.fetch(request, Failure::StatusOnly).await
    }

    /// GET /laptops/{uuid}/
    pub async fn retrieve(&self, uuid: &str) -> Result<Listing> {
        let request = ApiRequest::get(format!("/laptops/{}/", uuid));
        self.client.fetch(request, Failure::StatusOnly).await
    }
}

impl<'a, T: Transport> ChatsApi<'a, T> {
    /// GET /chats/?page=
    pub async fn list(&self, page: u32) -> Result<Paginated<Channel>> {
        let request = ApiRequest::get("/chats/").query("page", page_number(page));
        self.client.fetch(request, Failure::StatusOnly).await
    }

    /// GET /chats/{id}/
    pub async fn retrieve(&self, channel_id: i64) -> Result<Channel> {
        let request = ApiRequest::get(format!("/chats/{}/", channel_id));
        self.client.fetch(request, Failure::StatusOnly).await
    }
}

impl<'a, T: Transport> ChatApi<'a, T> {
    /// GET /chat/{id}?page=
    pub async fn posts(&self, channel_id: i64, page: u32) -> Result<Paginated<Listing>> {
        let request = ApiRequest::get(format!("/chat/{}", channel_id)).query("page", page_number(page));
        self.client.fetch(request, Failure::StatusOnly).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::LaptopHubError;
    use crate::tests::mocks::{channel_json, listing_json, MockTransport};
    use serde_json::json;

    fn create_client() -> (MockTransport, ApiClient<MockTransport>) {
        let mock = MockTransport::new();
        let client = ApiClient::with_transport(mock.clone(), ClientConfig::default());
        (mock, client)
    }

    fn listing_page(count: u64, uuids: &[&str]) -> serde_json::Value {
        json!({
            "count": count,
            "next": null,
            "previous": null,
            "results": uuids.iter().map(|u| listing_json(u)).collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_list_laptops_sends_page_and_query() {
        let (mock, client) = create_client();
        mock.respond_json("GET", "/laptops/", 200, listing_page(2, &["a", "b"]));

        let page = client.laptops().list(3, Some("  thinkpad ")).await.unwrap();
        assert_eq!(page.count, 2);
        assert!(page.results.len() as u64 <= page.count);

        let request = mock.last_request();
        assert_eq!(request.query_value("page"), Some("3"));
        assert_eq!(request.query_value("q"), Some("thinkpad"));
        assert!(request.bearer.is_none());
    }

    #[tokio::test]
    async fn test_blank_and_missing_query_send_identical_params() {
        let (mock, client) = create_client();
        mock.respond_json("GET", "/laptops/", 200, listing_page(0, &[]));

        client.laptops().list(1, None).await.unwrap();
        client.laptops().list(1, Some("")).await.unwrap();
        client.laptops().list(1, Some("   ")).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert_eq!(request.query, requests[0].query);
            assert_eq!(request.query_value("q"), None);
        }
    }

    #[tokio::test]
    async fn test_page_zero_is_first_page() {
        let (mock, client) = create_client();
        mock.respond_json("GET", "/chats/", 200, json!({"count": 0, "results": []}));

        client.chats().list(0).await.unwrap();
        assert_eq!(mock.last_request().query_value("page"), Some("1"));
    }

    #[tokio::test]
    async fn test_retrieve_missing_listing_is_http_error() {
        let (mock, client) = create_client();
        mock.respond("GET", "/laptops/nope/", 404, r#"{"detail": "Not found."}"#);

        let err = client.laptops().retrieve("nope").await.unwrap_err();
        assert!(matches!(err, LaptopHubError::Http { status: 404 }));
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[tokio::test]
    async fn test_retrieve_listing() {
        let (mock, client) = create_client();
        mock.respond_json("GET", "/laptops/3f2b/", 200, listing_json("3f2b"));

        let listing = client.laptops().retrieve("3f2b").await.unwrap();
        assert_eq!(listing.uuid, "3f2b");
        assert_eq!(listing.price.as_deref(), Some("62000.00"));
    }

    #[tokio::test]
    async fn test_channel_and_posts() {
        let (mock, client) = create_client();
        mock.respond_json("GET", "/chats/1001/", 200, channel_json(1001));
        mock.respond_json("GET", "/chat/1001", 200, listing_page(13, &["x"]));

        let chats = client.chats();
        let chat = client.chat();
        let (channel, posts) = tokio::join!(chats.retrieve(1001), chat.posts(1001, 2));
        let channel = channel.unwrap();
        let posts = posts.unwrap();

        assert_eq!(channel.channel_id, 1001);
        assert!(channel.is_verified);
        assert_eq!(posts.page_count(client.page_size()), 2);

        let posts_request = mock
            .requests()
            .into_iter()
            .find(|r| r.path == "/chat/1001")
            .unwrap();
        assert_eq!(posts_request.query_value("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_server_error_on_list() {
        let (mock, client) = create_client();
        mock.respond("GET", "/chats/", 500, r#"{"detail": "boom"}"#);

        let err = client.chats().list(1).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500");
    }
}
