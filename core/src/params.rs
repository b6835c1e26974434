//! Request parameters for VK API methods.
//!
//! VK takes every parameter as a flat form field. Lists are sent
//! comma-separated and booleans as `1` / `0`; `ParamValue` does that
//! formatting once so the method façades can pass values through untouched.

use serde_json::Value;

use crate::error::VkError;

/// A single parameter value, already in VK's wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue(String);

impl ParamValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format a JSON value the way VK expects it. Nested objects are sent as
    /// their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self(String::new()),
            Value::Bool(b) => Self::from(*b),
            Value::Number(n) => Self(n.to_string()),
            Value::String(s) => Self(s.clone()),
            Value::Array(items) => Self(
                items
                    .iter()
                    .map(|item| Self::from_json(item).0)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Value::Object(_) => Self(value.to_string()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self(if value { "1" } else { "0" }.to_string())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

macro_rules! impl_numeric_param {
    ($($t:ty),+) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    Self(value.to_string())
                }
            }
        )+
    };
}

impl_numeric_param!(i32, i64, u32, u64, usize, f64);

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self(
            values
                .into_iter()
                .map(|v| v.into().0)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

impl<T: Into<ParamValue> + Clone> From<&[T]> for ParamValue {
    fn from(values: &[T]) -> Self {
        Self::from(values.to_vec())
    }
}

/// Ordered bag of method parameters. Setting a key twice keeps the last value
/// in the first key's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build parameters from a JSON object. `null` members are skipped.
    pub fn from_json(value: &Value) -> Result<Self, VkError> {
        let Value::Object(map) = value else {
            return Err(VkError::InvalidRequest(
                "parameters must be a JSON object".to_string(),
            ));
        };
        let mut params = Self::new();
        for (key, value) in map.iter().filter(|(_, v)| !v.is_null()) {
            params.insert(key.as_str(), ParamValue::from_json(value));
        }
        Ok(params)
    }

    /// Form-encode the parameters as an `application/x-www-form-urlencoded` body.
    pub fn to_form(&self) -> Result<String, VkError> {
        let pairs: Vec<(&str, &str)> = self.iter().collect();
        Ok(serde_urlencoded::to_string(pairs)?)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
