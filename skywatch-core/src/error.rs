use reqwest::StatusCode;
use serde_json::error::Category;

/// Errors surfaced by the forecast schema and the remote sources.
///
/// Nothing in this crate recovers from these locally; they are returned to the
/// caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A field was present but had a JSON type incompatible with the schema.
    #[error("schema mismatch: {0}")]
    Schema(#[source] serde_json::Error),

    /// The endpoint answered with a non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    Http {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The body was not valid JSON, or not the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// No response was received (timeout, DNS, connection reset, ...).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid base URL '{0}'")]
    InvalidUrl(String),
}

impl SourceError {
    pub(crate) fn network(url: &reqwest::Url, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn decode(url: &reqwest::Url, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.to_string(),
            source,
        }
    }

    /// Split a schema decode failure into a type mismatch (`Schema`) or
    /// text that was never JSON to begin with (`Decode`).
    pub(crate) fn from_schema_json(url: Option<&reqwest::Url>, err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Schema(err),
            Category::Syntax | Category::Eof | Category::Io => Self::Decode {
                url: url.map(ToString::to_string).unwrap_or_default(),
                source: err,
            },
        }
    }

    pub fn is_http_status(&self, status: StatusCode) -> bool {
        matches!(self, Self::Http { status: s, .. } if *s == status)
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
