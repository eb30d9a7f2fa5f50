pub mod auth;
pub mod movies;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Display;

/// Payload carried by a request besides its path
pub enum RequestData<T> {
    Empty,
    Query(T),
}

/// A typed backend call: where it goes, how it is sent, and what comes back
pub trait ApiRequest: Serialize {
    type Response: DeserializeOwned;

    const METHOD: Method = Method::GET;

    /// Path relative to the configured base address, starting with `/`
    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<&Self> {
        RequestData::Empty
    }
}

/// Movie identifier as sent by the backend (numeric or string keys)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Number(i64),
    Text(String),
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(id) => id.fmt(f),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        MovieId::Number(id)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        MovieId::Text(id.to_string())
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        MovieId::Text(id)
    }
}
