//! LaptopHub client library
//!
//! Typed access to the LaptopHub marketplace API plus a session manager
//! that keeps the signed-in user's tokens in durable storage.
//!
//! ```no_run
//! use std::sync::Arc;
//! use laptophub::{open_store, ApiClient, ClientConfig, Session};
//!
//! # async fn run() -> laptophub::Result<()> {
//! let config = ClientConfig::new()?;
//! let store = open_store(&config.token_storage);
//! let client = Arc::new(ApiClient::new(config)?);
//!
//! let page = client.laptops().list(1, Some("thinkpad")).await?;
//! println!("{} listings", page.count);
//!
//! let session = Session::initialize(client, store);
//! session.login("sara@example.com", "secret").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod normalize;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(test)]
mod tests;

pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder, TokenStorageConfig};
pub use error::{ErrorCode, LaptopHubError, Result};
pub use normalize::{FirstMessage, JoinedMessages, MessagePolicy, MessagePolicyKind};
pub use session::{Session, SessionState};
pub use store::{open_store, FileStore, KeyValueStore, MemoryStore, UnavailableStore};
pub use transport::{ApiReply, ApiRequest, HttpTransport, RequestBody, Transport};

pub use laptophub_protocol as protocol;
