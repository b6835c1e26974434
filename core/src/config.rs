//! Client configuration.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VkError;

pub const DEFAULT_BASE_URL: &str = "https://api.vk.com";
pub const DEFAULT_API_VERSION: &str = "5.131";

/// Language of the localized strings in API responses (`lang` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "ua")]
    Ukrainian,
    #[serde(rename = "be")]
    Belarusian,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fi")]
    Finnish,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Russian => "ru",
            Language::Ukrainian => "ua",
            Language::Belarusian => "be",
            Language::English => "en",
            Language::Spanish => "es",
            Language::Finnish => "fi",
            Language::German => "de",
            Language::Italian => "it",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = VkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Russian),
            "ua" | "uk" => Ok(Language::Ukrainian),
            "be" => Ok(Language::Belarusian),
            "en" => Ok(Language::English),
            "es" => Ok(Language::Spanish),
            "fi" => Ok(Language::Finnish),
            "de" => Ok(Language::German),
            "it" => Ok(Language::Italian),
            other => Err(VkError::InvalidConfig(format!("unknown language: {other}"))),
        }
    }
}

/// Configuration for `VkApiClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host of the API; methods live under `{base_url}/method/`.
    pub base_url: String,
    /// Value of the `v` parameter sent with every call.
    pub version: String,
    pub language: Option<Language>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            language: None,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Defaults overridden by `VK_API_BASE_URL`, `VK_API_VERSION` and
    /// `VK_API_LANG` when set.
    pub fn from_env() -> Result<Self, VkError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VkError> {
        let mut builder = Self::builder();
        if let Some(base_url) = lookup("VK_API_BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Some(version) = lookup("VK_API_VERSION") {
            builder = builder.version(version);
        }
        if let Some(lang) = lookup("VK_API_LANG") {
            builder = builder.language(lang.parse()?);
        }
        builder.build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    version: Option<String>,
    language: Option<Language>,
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Build the configuration. The base URL loses any trailing slash and
    /// must use `http` or `https`; the version must not be empty.
    pub fn build(self) -> Result<ClientConfig, VkError> {
        let defaults = ClientConfig::default();
        let base_url = self
            .base_url
            .unwrap_or(defaults.base_url)
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(VkError::InvalidConfig(format!(
                "base URL must start with http:// or https://: {base_url}"
            )));
        }
        let version = self.version.unwrap_or(defaults.version);
        if version.trim().is_empty() {
            return Err(VkError::InvalidConfig("API version is empty".to_string()));
        }
        Ok(ClientConfig {
            base_url,
            version,
            language: self.language.or(defaults.language),
        })
    }
}
