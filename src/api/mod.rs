//! Resource operations, grouped the way the backend groups its endpoints
//!
//! - `catalog`: listings and channels (anonymous reads)
//! - `auth`: registration, tokens, password and email flows
//! - `profile`: the signed-in account
//! - `reviews`: listing reviews

pub mod auth;
pub mod catalog;
pub mod profile;
pub mod reviews;

pub use auth::AuthApi;
pub use catalog::{ChatApi, ChatsApi, LaptopsApi};
pub use profile::ProfileApi;
pub use reviews::ReviewsApi;
