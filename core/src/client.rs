//! Stateless HTTP request builder and response parser for the VK API.
//!
//! # Design
//! `VkApiClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Every remote method goes through the same two steps:
//! `build_request` produces an `HttpRequest`, and `parse_response` turns the
//! raw response text into the call's payload or a `VkError`. `call` glues the
//! two around a `Transport`; the method groups (`docs()`, `friends()`, ...)
//! are thin wrappers over `call`.

use serde_json::Value;
use tracing::debug;

use crate::actions::{Docs, Friends, Newsfeed, Pages};
use crate::config::ClientConfig;
use crate::error::VkError;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::Params;
use crate::response::VkResponse;
use crate::transport::Transport;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless client for the VK API.
#[derive(Debug, Clone, Default)]
pub struct VkApiClient {
    config: ClientConfig,
}

impl VkApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Client with default settings talking to `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self, VkError> {
        Ok(Self::new(ClientConfig::builder().base_url(base_url).build()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request for `method` (e.g. `docs.get`).
    ///
    /// The caller's params are sent first, followed by `access_token` (when
    /// not empty), `v` and `lang`.
    pub fn build_request(
        &self,
        method: &str,
        access_token: &str,
        params: &Params,
    ) -> Result<HttpRequest, VkError> {
        validate_method(method)?;

        let mut form = params.clone();
        if !access_token.is_empty() {
            form.insert("access_token", access_token);
        }
        form.insert("v", self.config.version.as_str());
        if let Some(language) = self.config.language {
            form.insert("lang", language.as_str());
        }

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/method/{method}", self.config.base_url),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(form.to_form()?),
        };
        debug!(
            method,
            verb = %request.method,
            params = params.len(),
            "building VK API request"
        );
        Ok(request)
    }

    /// Parse a raw response into the call's payload.
    ///
    /// Returns the `response` member when present, otherwise the whole
    /// decoded body. A 200 body that is not a JSON object yields `{}`; use
    /// `fetch` to see `VkResponse::decode_error` for such responses.
    pub fn parse_response(&self, raw: &str) -> Result<Value, VkError> {
        check_response(VkResponse::parse(raw))
    }

    /// Build and send a call, returning the full parsed view without any
    /// call-level checks.
    pub fn fetch<T: Transport + ?Sized>(
        &self,
        transport: &T,
        method: &str,
        access_token: &str,
        params: &Params,
    ) -> Result<VkResponse, VkError> {
        let request = self.build_request(method, access_token, params)?;
        let raw = transport.send(&request)?;
        Ok(VkResponse::parse(&raw))
    }

    /// Build, send and parse a single remote call.
    pub fn call<T: Transport + ?Sized>(
        &self,
        transport: &T,
        method: &str,
        access_token: &str,
        params: &Params,
    ) -> Result<Value, VkError> {
        check_response(self.fetch(transport, method, access_token, params)?)
    }

    pub fn docs(&self) -> Docs<'_> {
        Docs::new(self)
    }

    pub fn friends(&self) -> Friends<'_> {
        Friends::new(self)
    }

    pub fn newsfeed(&self) -> Newsfeed<'_> {
        Newsfeed::new(self)
    }

    pub fn pages(&self) -> Pages<'_> {
        Pages::new(self)
    }
}

fn validate_method(method: &str) -> Result<(), VkError> {
    let valid = !method.is_empty()
        && method
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(VkError::InvalidRequest(format!("invalid method name: {method:?}")))
    }
}

/// Surface the remote error first, then any non-200 status.
fn check_response(response: VkResponse) -> Result<Value, VkError> {
    if let Some(status) = response.status().filter(|s| *s != 200) {
        if response.error().is_none() {
            return Err(VkError::HttpStatus {
                status,
                body: response.body().to_string(),
            });
        }
    }

    let mut body = response.into_result()?;
    match body.remove("response") {
        Some(payload) => Ok(payload),
        None => Ok(Value::Object(body)),
    }
}
