//! Raw VK response parsing.
//!
//! # Design
//! `VkResponse::parse` never fails. Transports may hand over several head
//! blocks (a `100 Continue`, proxy hops, followed redirects); only the last
//! block and the last body segment are kept. A malformed status line leaves
//! `status()` empty, and a body that is not a JSON object decodes to the empty
//! map with the reason kept in `decode_error()`. The only error surfaced is the
//! remote one, classified from the body's `error` object and carried on the
//! response for the caller to propagate.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::ApiError;

lazy_static! {
    static ref STATUS_LINE: Regex = Regex::new(r"^HTTP/\d(?:\.\d)?\s+(\d+)(?:\s+.*)?$").unwrap();
}

const BODY_SEPARATOR: &str = "\r\n\r\n";

/// A failed sub-request of an `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteError {
    /// Remote method that failed inside the `execute` script.
    pub method: String,
    pub error: ApiError,
}

/// Immutable view over a parsed raw response.
#[derive(Debug, Clone, PartialEq)]
pub struct VkResponse {
    status: Option<u16>,
    headers: HashMap<String, String>,
    /// Lowercased name to the value received last under any casing.
    header_index: HashMap<String, String>,
    body: String,
    decoded_body: Map<String, Value>,
    decode_error: Option<String>,
    error: Option<ApiError>,
}

impl VkResponse {
    /// Break a raw response into status, headers and body and decode the body.
    pub fn parse(raw: &str) -> Self {
        let (raw_head, raw_body) = match raw.rsplit_once(BODY_SEPARATOR) {
            Some((head, body)) => (head.trim(), body.trim()),
            None => ("", raw.trim()),
        };

        let (status, headers, header_index) = parse_head(raw_head);
        let (decoded_body, decode_error) = decode_body(raw_body);

        if let Some(reason) = &decode_error {
            warn!(%reason, body_len = raw_body.len(), "response body is not a JSON object, using empty body");
        }

        let error = decoded_body
            .get("error")
            .filter(|v| !v.is_null())
            .map(ApiError::from_error_value);

        if let Some(err) = &error {
            debug!(code = err.code(), kind = ?err.kind(), "response carries API error");
        }

        Self {
            status,
            headers,
            header_index,
            body: raw_body.to_string(),
            decoded_body,
            decode_error,
            error,
        }
    }

    /// HTTP status code, `None` when no valid status line was found.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|s| (200..300).contains(&s))
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value, matched case-insensitively. When the same name
    /// arrives under several casings the last one received wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_index
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Raw text of the final body segment.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decoded body; empty when the body was not a JSON object.
    pub fn decoded_body(&self) -> &Map<String, Value> {
        &self.decoded_body
    }

    /// Why decoding fell back to the empty map, if it did.
    pub fn decode_error(&self) -> Option<&str> {
        self.decode_error.as_deref()
    }

    pub fn is_decoded(&self) -> bool {
        self.decode_error.is_none()
    }

    /// The classified remote error carried by this response.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// The `response` member of a successful call.
    pub fn response(&self) -> Option<&Value> {
        self.decoded_body.get("response")
    }

    /// Classified `execute_errors` entries. Empty when absent or malformed.
    pub fn execute_errors(&self) -> Vec<ExecuteError> {
        let Some(Value::Array(entries)) = self.decoded_body.get("execute_errors") else {
            return Vec::new();
        };
        entries
            .iter()
            .filter(|entry| entry.is_object())
            .map(|entry| ExecuteError {
                method: entry
                    .get("method")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                error: ApiError::from_error_value(entry),
            })
            .collect()
    }

    /// The decoded body, or the carried error.
    pub fn into_result(self) -> Result<Map<String, Value>, ApiError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.decoded_body),
        }
    }
}

/// Keep the last head block and read its status line and headers.
fn parse_head(
    raw_head: &str,
) -> (Option<u16>, HashMap<String, String>, HashMap<String, String>) {
    let mut status = None;
    let mut headers = HashMap::new();
    let mut header_index = HashMap::new();

    let normalized = raw_head.replace("\r\n", "\n");
    let block = normalized.trim().rsplit("\n\n").next().unwrap_or_default();

    for line in block.lines() {
        match line.split_once(": ") {
            Some((name, value)) => {
                headers.insert(name.to_string(), value.to_string());
                header_index.insert(name.to_ascii_lowercase(), value.to_string());
            }
            None => match parse_status_line(line) {
                Some(code) => status = Some(code),
                None => trace!(line, "ignoring head line without a valid status"),
            },
        }
    }

    if status.is_none() && !block.is_empty() {
        warn!("response head has no valid status line");
    }

    (status, headers, header_index)
}

fn parse_status_line(line: &str) -> Option<u16> {
    STATUS_LINE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn decode_body(body: &str) -> (Map<String, Value>, Option<String>) {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => (map, None),
        Ok(other) => (
            Map::new(),
            Some(format!("expected a JSON object, got {}", json_type(&other))),
        ),
        Err(e) => (Map::new(), Some(e.to_string())),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ApiErrorKind;

    fn raw(head: &str, body: &str) -> String {
        format!("{head}\r\n\r\n{body}")
    }

    #[test]
    fn parses_status_headers_and_body() {
        let response = VkResponse::parse(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"response\":[1,2,3]}",
        );
        assert_eq!(response.status(), Some(200));
        assert!(response.is_success());
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.body(), "{\"response\":[1,2,3]}");
        assert_eq!(
            Value::Object(response.decoded_body().clone()),
            json!({"response": [1, 2, 3]})
        );
        assert_eq!(response.response(), Some(&json!([1, 2, 3])));
        assert!(response.error().is_none());
        assert!(response.is_decoded());
    }

    #[test]
    fn classifies_known_error_code() {
        let response = VkResponse::parse(&raw(
            "HTTP/1.1 200 OK",
            r#"{"error":{"error_code":4,"error_msg":"invalid sig"}}"#,
        ));
        let err = response.error().expect("error should be carried");
        assert_eq!(err.code(), 4);
        assert_eq!(err.kind(), ApiErrorKind::Signature);
        assert_eq!(err.description(), Some("Incorrect signature"));
        assert_eq!(err.message(), "invalid sig");
    }

    #[test]
    fn classifies_unknown_error_code_as_fallback() {
        let response = VkResponse::parse(&raw(
            "HTTP/1.1 200 OK",
            r#"{"error":{"error_code":999999,"error_msg":"future code"}}"#,
        ));
        let err = response.error().expect("error should be carried");
        assert_eq!(err.code(), 999_999);
        assert!(err.is_unclassified());
        assert!(err.description().is_none());
        assert_eq!(err.message(), "future code");
    }

    #[test]
    fn non_json_body_decodes_to_empty_map() {
        let response = VkResponse::parse(&raw("HTTP/1.1 200 OK", "\"not json\""));
        assert!(response.decoded_body().is_empty());
        assert!(response.error().is_none());
        assert!(!response.is_decoded());

        let response = VkResponse::parse(&raw("HTTP/1.1 200 OK", "not json"));
        assert!(response.decoded_body().is_empty());
        assert!(response.decode_error().is_some());
    }

    #[test]
    fn non_object_json_decodes_to_empty_map() {
        for body in ["[1,2,3]", "42", "true", "null", ""] {
            let response = VkResponse::parse(&raw("HTTP/1.1 200 OK", body));
            assert!(response.decoded_body().is_empty(), "body {body:?}");
            assert!(response.decode_error().is_some(), "body {body:?}");
        }
        let response = VkResponse::parse(&raw("HTTP/1.1 200 OK", "[1]"));
        assert_eq!(
            response.decode_error(),
            Some("expected a JSON object, got an array")
        );
    }

    #[test]
    fn only_last_head_block_is_kept() {
        let raw = "HTTP/1.1 301 Moved Permanently\r\nLocation: https://api.vk.com/\r\nX-Hop: first\r\n\r\n\
                   HTTP/1.1 200 OK\r\nX-Hop: second\r\n\r\n\
                   {\"response\":1}";
        let response = VkResponse::parse(raw);
        assert_eq!(response.status(), Some(200));
        assert_eq!(response.header("X-Hop"), Some("second"));
        assert_eq!(response.header("Location"), None);
        assert_eq!(response.headers().len(), 1);
        assert_eq!(response.response(), Some(&json!(1)));
    }

    #[test]
    fn continue_block_is_skipped() {
        let raw = "HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 404 Not Found\r\nServer: kittenx\r\n\r\n{}";
        let response = VkResponse::parse(raw);
        assert_eq!(response.status(), Some(404));
        assert_eq!(response.header("server"), Some("kittenx"));
        assert!(!response.is_success());
    }

    #[test]
    fn repeated_header_last_value_wins() {
        let response = VkResponse::parse(&raw(
            "HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2",
            "{}",
        ));
        assert_eq!(response.header("Set-Cookie"), Some("b=2"));
    }

    #[test]
    fn header_lookup_ignores_case_and_keeps_last_received() {
        let head = "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\nContent-Type: application/json";
        for _ in 0..32 {
            let response = VkResponse::parse(&raw(head, "{}"));
            assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
            assert_eq!(response.header("content-type"), Some("application/json"));
            assert_eq!(response.content_type(), Some("application/json"));
        }

        let response = VkResponse::parse(&raw(
            "HTTP/1.1 200 OK\r\nX-Trace: first\r\nx-trace: second",
            "{}",
        ));
        assert_eq!(response.header("X-Trace"), Some("second"));
        assert_eq!(response.headers().len(), 2);
    }

    #[test]
    fn header_value_keeps_later_separators() {
        let response = VkResponse::parse(&raw("HTTP/1.1 200 OK\r\nX-Note: a: b", "{}"));
        assert_eq!(response.header("X-Note"), Some("a: b"));
    }

    #[test]
    fn malformed_status_line_still_parses_rest() {
        let response = VkResponse::parse(&raw(
            "HTTP/x 200 OK\r\nContent-Type: application/json",
            r#"{"response":"ok"}"#,
        ));
        assert_eq!(response.status(), None);
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.response(), Some(&json!("ok")));
    }

    #[test]
    fn http2_status_line_is_accepted() {
        let response = VkResponse::parse(&raw("HTTP/2 200", "{}"));
        assert_eq!(response.status(), Some(200));
    }

    #[test]
    fn raw_without_separator_is_all_body() {
        let response = VkResponse::parse(r#"{"response":{"count":0}}"#);
        assert_eq!(response.status(), None);
        assert!(response.headers().is_empty());
        assert_eq!(response.response(), Some(&json!({"count": 0})));
    }

    #[test]
    fn null_error_entry_is_not_an_error() {
        let response = VkResponse::parse(&raw("HTTP/1.1 200 OK", r#"{"error":null,"response":1}"#));
        assert!(response.error().is_none());
    }

    #[test]
    fn execute_errors_are_classified() {
        let body = json!({
            "response": [false, 1],
            "execute_errors": [
                {"method": "docs.edit", "error_code": 1150, "error_msg": "Invalid document id"},
                "garbage"
            ]
        });
        let response = VkResponse::parse(&raw("HTTP/1.1 200 OK", &body.to_string()));
        let errors = response.execute_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].method, "docs.edit");
        assert_eq!(errors[0].error.kind(), ApiErrorKind::ParamDocId);
        assert!(response.error().is_none());
    }

    #[test]
    fn into_result_returns_error_or_body() {
        let ok = VkResponse::parse(&raw("HTTP/1.1 200 OK", r#"{"response":1}"#));
        assert_eq!(ok.into_result().unwrap().get("response"), Some(&json!(1)));

        let err = VkResponse::parse(&raw(
            "HTTP/1.1 200 OK",
            r#"{"error":{"error_code":1152,"error_msg":"title"}}"#,
        ));
        assert_eq!(err.into_result().unwrap_err().kind(), ApiErrorKind::ParamDocTitle);
    }
}
