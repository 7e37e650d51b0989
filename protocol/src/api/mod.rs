//! API DTOs module
//!
//! Request bodies and endpoint-specific responses, organized by domain:
//! - `auth`: registration, login, password and email flows
//! - `profile_update`: multipart profile updates
//! - `review_input`: review submission and edits

pub mod auth;
pub mod profile_update;
pub mod review_input;

pub use auth::*;
pub use profile_update::*;
pub use review_input::*;
