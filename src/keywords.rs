//! Keyword input normalization.

use serde::{Deserialize, Serialize};

/// A single keyword element: free text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordValue {
    Number(f64),
    Text(String),
}

impl KeywordValue {
    fn tokens(&self) -> Vec<String> {
        match self {
            Self::Number(n) => vec![n.to_string()],
            Self::Text(s) => split_keywords(s),
        }
    }
}

impl From<&str> for KeywordValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for KeywordValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for KeywordValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for KeywordValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Raw keyword input as accepted from callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordInput {
    One(KeywordValue),
    Many(Vec<KeywordValue>),
}

impl KeywordInput {
    /// Flattens the input into ordered, non-empty keyword tokens.
    ///
    /// Strings are split on single spaces with empty tokens dropped, numbers
    /// become one token each, and lists are processed element-wise.
    pub fn keywords(&self) -> Vec<String> {
        match self {
            Self::One(value) => value.tokens(),
            Self::Many(values) => values.iter().flat_map(KeywordValue::tokens).collect(),
        }
    }
}

impl From<KeywordValue> for KeywordInput {
    fn from(value: KeywordValue) -> Self {
        Self::One(value)
    }
}

impl From<&str> for KeywordInput {
    fn from(value: &str) -> Self {
        Self::One(value.into())
    }
}

impl From<String> for KeywordInput {
    fn from(value: String) -> Self {
        Self::One(value.into())
    }
}

impl From<i64> for KeywordInput {
    fn from(value: i64) -> Self {
        Self::One(value.into())
    }
}

impl From<f64> for KeywordInput {
    fn from(value: f64) -> Self {
        Self::One(value.into())
    }
}

impl<T: Into<KeywordValue>> FromIterator<T> for KeywordInput {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Many(iter.into_iter().map(Into::into).collect())
    }
}

fn split_keywords(value: &str) -> Vec<String> {
    value
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
