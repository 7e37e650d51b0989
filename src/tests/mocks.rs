//! Mock implementations for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{LaptopHubError, Result};
use crate::store::KeyValueStore;
use crate::transport::{ApiReply, ApiRequest, Transport};

/// Recording transport with canned replies per (method, path)
///
/// Unmatched requests get an empty 404. The latest registration for a
/// route wins, so a test can change an answer midway.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<Vec<(String, String, ApiReply)>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    offline: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: &str) {
        self.responses.lock().unwrap().push((
            method.to_string(),
            path.to_string(),
            ApiReply::new(status, body),
        ));
    }

    pub fn respond_json(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        self.respond(method, path, status, &body.to_string());
    }

    /// Every later request fails as if the server were unreachable.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply> {
        self.requests.lock().unwrap().push(request.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(LaptopHubError::network("Could not connect to the server"));
        }

        let responses = self.responses.lock().unwrap();
        let reply = responses
            .iter()
            .rev()
            .find(|(method, path, _)| *method == request.method.as_str() && *path == request.path)
            .map(|(_, _, reply)| reply.clone())
            .unwrap_or_else(|| ApiReply::new(404, ""));
        Ok(reply)
    }
}

/// Key/value store whose contents a test can inspect after handing it over
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value).unwrap();
        }
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

pub fn profile_json(email: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 7,
        "email": email,
        "is_verified": false,
        "date_joined": "2024-03-01T09:00:00Z",
        "first_name": "Sara",
        "last_name": "Tesfaye",
        "phone_number": "",
        "profile_picture": null,
        "bio": ""
    })
}

pub fn listing_json(uuid: &str) -> serde_json::Value {
    serde_json::json!({
        "uuid": uuid,
        "title": "Dell XPS 13 9310",
        "processor": "i7-1185G7",
        "ram": "16GB",
        "storage": "512GB SSD",
        "status": "New",
        "price": "62000.00",
        "channel_name": "Laptop Store ET",
        "channel": "https://example.test/api/chat/1001",
        "posted_at": "2024-05-10T12:00:00Z",
        "images": [],
        "reviews": [],
        "average_rating": "0.00",
        "simmilar_items": []
    })
}

pub fn channel_json(channel_id: i64) -> serde_json::Value {
    serde_json::json!({
        "channel_id": channel_id,
        "chat_posts": format!("https://example.test/api/chat/{}", channel_id),
        "username": "laptopstore_et",
        "title": "Laptop Store ET",
        "description": "Used and new laptops",
        "member_count": 15230,
        "is_verified": true,
        "is_private": false,
        "is_active": true,
        "created_at": "2023-06-01T00:00:00Z",
        "updated_at": "2024-05-01T00:00:00Z",
        "profile_photo": "https://cdn.test/channel.jpg",
        "language": "en",
        "category": "electronics"
    })
}

pub fn review_json(id: u64, rating: i32, comment: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "user": "Sara T.",
        "rating": rating,
        "comment": comment,
        "created_at": "2024-05-11T08:00:00Z"
    })
}
