//! Synchronous client core for the VK API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses raw responses without touching the
//! network (host-does-IO pattern). A `Transport` implementation performs the
//! actual round-trip; everything else is deterministic.
//!
//! # Design
//! - `VkResponse::parse` splits a raw response into status, headers and body
//!   and decodes the body permissively; it never fails.
//! - Remote errors are classified by code into `ApiErrorKind` through the
//!   static `API_ERRORS` table; unknown codes fall back to `Unclassified`.
//! - `VkApiClient` is stateless. Method groups (`docs`, `friends`, `newsfeed`,
//!   `pages`) are generated from method tables and all forward to
//!   `VkApiClient::call`.

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod response;
pub mod transport;

pub use client::VkApiClient;
pub use config::{ClientConfig, Language};
pub use error::{classify, ApiError, ApiErrorDescriptor, ApiErrorKind, VkError, API_ERRORS};
pub use http::{HttpMethod, HttpRequest};
pub use params::{ParamValue, Params};
pub use response::{ExecuteError, VkResponse};
pub use transport::{Transport, TransportError};
