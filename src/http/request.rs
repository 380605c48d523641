//! Request options and versioned path construction.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Booking-platform API generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ApiVersion::V1),
            "v2" | "2" => Ok(ApiVersion::V2),
            other => Err(format!("unknown API version '{}'", other)),
        }
    }
}

/// Per-call options for [`RequestExecutor::request`](crate::http::RequestExecutor::request).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub params: BTreeMap<String, String>,
    pub api_version: Option<ApiVersion>,
    pub skip_rate_limit: bool,
    pub skip_retry: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (k, v) in params {
            self.params.insert(k.into(), v.to_string());
        }
        self
    }

    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    pub fn skip_rate_limit(mut self) -> Self {
        self.skip_rate_limit = true;
        self
    }

    pub fn skip_retry(mut self) -> Self {
        self.skip_retry = true;
        self
    }
}

/// Strip any leading slash and `v1/`/`v2/` prefix, then prefix `version`.
pub fn build_versioned_path(path: &str, version: ApiVersion) -> String {
    let trimmed = path.trim_start_matches('/');
    let unversioned = ["v1", "v2"]
        .iter()
        .find_map(|prefix| {
            let rest = trimmed.strip_prefix(prefix)?;
            if rest.is_empty() {
                Some("")
            } else {
                rest.strip_prefix('/')
            }
        })
        .unwrap_or(trimmed);

    if unversioned.is_empty() {
        version.as_str().to_string()
    } else {
        format!("{}/{}", version, unversioned)
    }
}
