//! Wire types for the LaptopHub marketplace API
//!
//! Records mirror the backend's JSON one-to-one, including its spellings.
//! `common` holds the resources the API returns, `api` the request bodies
//! and small response envelopes specific to one endpoint.

pub mod api;
pub mod common;

pub use api::*;
pub use common::*;
