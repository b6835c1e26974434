//! Error types for the VK API client.
//!
//! # Design
//! Every remote error code VK documents gets one `ApiErrorKind` variant. The
//! enum, the `API_ERRORS` table and the code lookup are all generated from the
//! single list in `api_error_codes!`, so they cannot drift apart. Codes missing
//! from the list classify as `ApiErrorKind::Unclassified` and keep the server's
//! code and message, which makes `classify` total.
//!
//! `VkError` is the crate-level error returned by `VkApiClient`. Remote errors
//! travel inside it as `VkError::Api`; transport, status and request-building
//! failures get their own variants.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// One entry of the compiled-in remote error table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorDescriptor {
    pub code: i64,
    pub description: &'static str,
    pub kind: ApiErrorKind,
}

macro_rules! api_error_codes {
    ($( $(#[$meta:meta])* $kind:ident = $code:literal => $desc:literal, )+) => {
        /// Category of a remote VK API error, keyed by its numeric code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ApiErrorKind {
            $( $(#[$meta])* $kind, )+
            /// The code is not in the compiled-in table.
            Unclassified,
        }

        /// Every known remote error code with its fixed description.
        pub static API_ERRORS: &[ApiErrorDescriptor] = &[
            $( ApiErrorDescriptor { code: $code, description: $desc, kind: ApiErrorKind::$kind }, )+
        ];

        impl ApiErrorKind {
            /// Classify a remote error code. Unknown codes map to `Unclassified`.
            pub const fn from_code(code: i64) -> Self {
                match code {
                    $( $code => ApiErrorKind::$kind, )+
                    _ => ApiErrorKind::Unclassified,
                }
            }

            /// The remote code this kind stands for, `None` for `Unclassified`.
            pub const fn code(self) -> Option<i64> {
                match self {
                    $( ApiErrorKind::$kind => Some($code), )+
                    ApiErrorKind::Unclassified => None,
                }
            }

            /// The fixed, code-specific description.
            pub const fn description(self) -> Option<&'static str> {
                match self {
                    $( ApiErrorKind::$kind => Some($desc), )+
                    ApiErrorKind::Unclassified => None,
                }
            }
        }
    };
}

api_error_codes! {
    Unknown = 1 => "Unknown error occurred",
    Disabled = 2 => "Application is disabled. Enable your application or use test mode",
    Method = 3 => "Unknown method passed",
    /// Request signature does not match.
    Signature = 4 => "Incorrect signature",
    Auth = 5 => "User authorization failed",
    TooMany = 6 => "Too many requests per second",
    Permission = 7 => "Permission to perform this action is denied",
    Request = 8 => "Invalid request",
    Flood = 9 => "Flood control",
    Server = 10 => "Internal server error",
    EnabledInTest = 11 => "In test mode application should be disabled or user should be authorized",
    /// Carries `captcha_sid` / `captcha_img` in the request params.
    Captcha = 14 => "Captcha needed",
    Access = 15 => "Access denied",
    AuthHttps = 16 => "HTTP authorization failed",
    AuthValidation = 17 => "Validation required",
    UserDeleted = 18 => "User was deleted or banned",
    MethodPermission = 20 => "Permission to perform this action is denied for non-standalone applications",
    MethodAds = 21 => "Permission to perform this action is allowed only for standalone and OpenAPI applications",
    MethodDisabled = 23 => "This method was disabled",
    NeedConfirmation = 24 => "Confirmation required",
    NeedTokenConfirmation = 25 => "Token confirmation required",
    GroupAuth = 27 => "Group authorization failed",
    AppAuth = 28 => "Application authorization failed",
    RateLimit = 29 => "Rate limit reached",
    PrivateProfile = 30 => "This profile is private",
    Param = 100 => "One of the parameters specified was missing or invalid",
    ParamApiId = 101 => "Invalid application API ID",
    ParamUserId = 113 => "Invalid user id",
    ParamAlbumId = 114 => "Invalid album id",
    ParamServer = 118 => "Invalid server",
    ParamTitle = 119 => "Invalid title",
    ParamHash = 121 => "Invalid hash",
    ParamPhotos = 122 => "Invalid photos",
    ParamGroupId = 125 => "Invalid group id",
    ParamPhoto = 129 => "Invalid photo",
    ParamPageId = 140 => "Page not found",
    AccessPage = 141 => "Access to page denied",
    AccessMenu = 148 => "Access to the menu of the user denied",
    ParamTimestamp = 150 => "Invalid timestamp",
    FriendsListId = 171 => "Invalid list id",
    FriendsListLimit = 173 => "Reached the maximum number of lists",
    FriendsAddYourself = 174 => "Cannot add user himself as friend",
    FriendsAddInEnemy = 175 => "Cannot add this user to friends as they have put you on their blacklist",
    FriendsAddEnemy = 176 => "Cannot add this user to friends as you put him on blacklist",
    FriendsAddNotFound = 177 => "Cannot add this user to friends as user not found",
    ParamNoteId = 180 => "Note not found",
    AccessNote = 181 => "Access to note denied",
    AccessNoteComment = 182 => "You can't comment this note",
    AccessComment = 183 => "Access to comment denied",
    AccessAlbum = 200 => "Access denied",
    AccessGroup = 203 => "Access to group denied",
    WallAccessPost = 210 => "Access to wall's post denied",
    WallAccessReplies = 211 => "Access to wall's comment denied",
    WallAccessAddReply = 213 => "Access to status replies denied",
    WallAddPost = 214 => "Access to adding post denied",
    WallAdsPublished = 219 => "Advertisement post was recently added",
    WallTooManyRecipients = 220 => "Too many recipients",
    WallLinksForbidden = 222 => "Hyperlinks are forbidden",
    WallAdsPostLimitReached = 224 => "Too many ads posts",
    PollsAccess = 250 => "Access to poll denied",
    PollsPollId = 251 => "Invalid poll id",
    PollsAnswerId = 252 => "Invalid answer id",
    PollsAccessWithoutVote = 253 => "Access denied, please vote first",
    /// Raised when the user's privacy settings hide their communities.
    AccessGroups = 260 => "Access to the groups list is denied due to the user's privacy settings",
    AlbumFull = 300 => "Album is full",
    VotesPermission = 500 => "Permission denied. You must enable votes processing in application settings",
    AdsPermission = 600 => "Permission denied. You have no access to operations specified with given object(s)",
    AdsSpecific = 603 => "Some ads error occurs",
    GroupChangeCreator = 700 => "Cannot edit creator role",
    GroupNotInClub = 701 => "User should be in club",
    GroupTooManyOfficers = 702 => "Too many officers in club",
    AuthParamPassword = 1111 => "Invalid password",
    ParamDocId = 1150 => "Invalid document id",
    ParamDocDeleteAccess = 1151 => "Access to document deleting is denied",
    ParamDocTitle = 1152 => "Invalid document title",
    ParamDocAccess = 1153 => "Access to document is denied",
    TooManyLists = 1170 => "Too many feed lists",
    MarketTooManyItems = 1405 => "Too many items",
}

/// A `key`/`value` pair echoed back by VK in `error.request_params`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestParam {
    pub key: String,
    pub value: String,
}

/// A remote error reported by the VK API inside the response body.
///
/// The fixed description explains the error class; `message` is the
/// server-supplied text for this particular call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: i64,
    kind: ApiErrorKind,
    message: String,
    request_params: Vec<RequestParam>,
}

impl ApiError {
    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Fixed description for known codes, `None` for unclassified ones.
    pub fn description(&self) -> Option<&'static str> {
        self.kind.description()
    }

    /// The message exactly as the server sent it.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn request_params(&self) -> &[RequestParam] {
        &self.request_params
    }

    /// Value of an echoed request parameter, e.g. `method` or `captcha_sid`.
    pub fn request_param(&self, key: &str) -> Option<&str> {
        self.request_params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn is_unclassified(&self) -> bool {
        self.kind == ApiErrorKind::Unclassified
    }

    pub fn with_request_params(mut self, request_params: Vec<RequestParam>) -> Self {
        self.request_params = request_params;
        self
    }

    /// Build an error from a VK `error` object.
    ///
    /// Missing or mistyped fields degrade to code `0` and an empty message
    /// rather than failing, so a carried error is always available.
    pub(crate) fn from_error_value(value: &Value) -> Self {
        let code = match value.get("error_code") {
            Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
            Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        };
        let message = match value.get("error_msg") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let request_params = match value.get("request_params") {
            Some(Value::Array(entries)) => entries.iter().filter_map(request_param).collect(),
            _ => Vec::new(),
        };

        classify(code, message).with_request_params(request_params)
    }
}

/// One echoed parameter. Non-string values are kept in their JSON form;
/// entries without a string `key` are skipped.
fn request_param(entry: &Value) -> Option<RequestParam> {
    let key = entry.get("key")?.as_str()?.to_string();
    let value = match entry.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    Some(RequestParam { key, value })
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(description) => {
                write!(f, "VK API error {} ({description}): {}", self.code, self.message)
            }
            None => write!(f, "VK API error {}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Map a remote error code and server message to a classified `ApiError`.
///
/// Total: codes outside the table yield `ApiErrorKind::Unclassified`.
pub fn classify(code: i64, message: impl Into<String>) -> ApiError {
    ApiError {
        code,
        kind: ApiErrorKind::from_code(code),
        message: message.into(),
        request_params: Vec::new(),
    }
}

/// Errors returned by `VkApiClient`.
#[derive(Debug, Error)]
pub enum VkError {
    /// The VK API answered with an `error` object.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The transport could not deliver the request or read the response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A status line was present and was not `200`, with no `error` object.
    #[error("unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The request could not be built from the given arguments.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request parameters could not be form-encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_urlencoded::ser::Error> for VkError {
    fn from(error: serde_urlencoded::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl VkError {
    /// The classified remote error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Shorthand for matching on the remote error category.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        self.api_error().map(ApiError::kind)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn classify_known_code_uses_table_description() {
        let err = classify(4, "invalid sig");
        assert_eq!(err.code(), 4);
        assert_eq!(err.kind(), ApiErrorKind::Signature);
        assert_eq!(err.description(), Some("Incorrect signature"));
        assert_eq!(err.message(), "invalid sig");
    }

    #[test]
    fn classify_unknown_code_falls_back() {
        let err = classify(999_999, "future code");
        assert_eq!(err.code(), 999_999);
        assert_eq!(err.kind(), ApiErrorKind::Unclassified);
        assert!(err.is_unclassified());
        assert!(err.description().is_none());
        assert_eq!(err.message(), "future code");
    }

    #[test]
    fn classify_is_total_for_extreme_codes() {
        for code in [i64::MIN, -1, 0, 12, 9_999, i64::MAX] {
            let err = classify(code, "x");
            assert_eq!(err.kind(), ApiErrorKind::Unclassified, "code {code}");
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn every_table_entry_classifies_to_itself() {
        for entry in API_ERRORS {
            let err = classify(entry.code, "server says");
            assert_eq!(err.kind(), entry.kind, "code {}", entry.code);
            assert_eq!(err.description(), Some(entry.description), "code {}", entry.code);
            assert_eq!(err.message(), "server says");
            assert_eq!(entry.kind.code(), Some(entry.code));
        }
    }

    #[test]
    fn table_codes_are_unique() {
        let codes: HashSet<i64> = API_ERRORS.iter().map(|e| e.code).collect();
        assert_eq!(codes.len(), API_ERRORS.len());
        assert!(API_ERRORS.len() >= 50);
    }

    #[test]
    fn documented_codes_have_fixed_descriptions() {
        let expected = [
            (4, ApiErrorKind::Signature, "Incorrect signature"),
            (122, ApiErrorKind::ParamPhotos, "Invalid photos"),
            (181, ApiErrorKind::AccessNote, "Access to note denied"),
            (214, ApiErrorKind::WallAddPost, "Access to adding post denied"),
            (222, ApiErrorKind::WallLinksForbidden, "Hyperlinks are forbidden"),
            (251, ApiErrorKind::PollsPollId, "Invalid poll id"),
            (
                260,
                ApiErrorKind::AccessGroups,
                "Access to the groups list is denied due to the user's privacy settings",
            ),
            (
                500,
                ApiErrorKind::VotesPermission,
                "Permission denied. You must enable votes processing in application settings",
            ),
            (701, ApiErrorKind::GroupNotInClub, "User should be in club"),
            (1111, ApiErrorKind::AuthParamPassword, "Invalid password"),
            (1150, ApiErrorKind::ParamDocId, "Invalid document id"),
            (1152, ApiErrorKind::ParamDocTitle, "Invalid document title"),
            (1405, ApiErrorKind::MarketTooManyItems, "Too many items"),
        ];
        for (code, kind, description) in expected {
            assert_eq!(ApiErrorKind::from_code(code), kind);
            assert_eq!(kind.description(), Some(description));
        }
    }

    #[test]
    fn unclassified_has_no_code_or_description() {
        assert_eq!(ApiErrorKind::Unclassified.code(), None);
        assert_eq!(ApiErrorKind::Unclassified.description(), None);
    }

    #[test]
    fn display_includes_description_when_known() {
        let err = classify(1150, "doc_id is invalid");
        assert_eq!(
            err.to_string(),
            "VK API error 1150 (Invalid document id): doc_id is invalid"
        );

        let err = classify(31337, "nope");
        assert_eq!(err.to_string(), "VK API error 31337: nope");
    }

    #[test]
    fn from_error_value_reads_code_message_and_params() {
        let value = json!({
            "error_code": 14,
            "error_msg": "Captcha needed",
            "request_params": [
                {"key": "method", "value": "friends.add"},
                {"key": "captcha_sid", "value": "123"}
            ]
        });
        let err = ApiError::from_error_value(&value);
        assert_eq!(err.kind(), ApiErrorKind::Captcha);
        assert_eq!(err.request_params().len(), 2);
        assert_eq!(err.request_param("captcha_sid"), Some("123"));
        assert_eq!(err.request_param("missing"), None);
    }

    #[test]
    fn from_error_value_keeps_params_with_non_string_values() {
        let value = json!({
            "error_code": 14,
            "error_msg": "Captcha needed",
            "request_params": [
                {"key": "method", "value": "friends.add"},
                {"key": "count", "value": 5},
                {"value": "orphan"},
                "garbage"
            ]
        });
        let err = ApiError::from_error_value(&value);
        assert_eq!(err.request_params().len(), 2);
        assert_eq!(err.request_param("method"), Some("friends.add"));
        assert_eq!(err.request_param("count"), Some("5"));
    }

    #[test]
    fn from_error_value_tolerates_malformed_objects() {
        let err = ApiError::from_error_value(&json!({"error_code": "5"}));
        assert_eq!(err.kind(), ApiErrorKind::Auth);
        assert_eq!(err.message(), "");

        let err = ApiError::from_error_value(&json!("boom"));
        assert_eq!(err.code(), 0);
        assert!(err.is_unclassified());

        let err = ApiError::from_error_value(&json!({"error_code": 6, "error_msg": 42}));
        assert_eq!(err.message(), "42");
    }

    #[test]
    fn vk_error_exposes_api_kind() {
        let err = VkError::from(classify(701, "join first"));
        assert_eq!(err.api_kind(), Some(ApiErrorKind::GroupNotInClub));
        assert_eq!(
            err.to_string(),
            "VK API error 701 (User should be in club): join first"
        );

        let err = VkError::HttpStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(err.api_error().is_none());
        assert_eq!(err.to_string(), "unexpected HTTP status 502: bad gateway");
    }
}
