use std::path::PathBuf;

use thiserror::Error;

/// Upper bound on the response body kept in [`UpstreamError::Status`].
pub const MAX_ERROR_BODY_BYTES: usize = 2048;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Roster loading errors. All of them abort startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read roster {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid account id `{value}` on line {line}: {source}")]
    Parse {
        line: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("account id `{value}` on line {line} is not positive after conversion")]
    NonPositive { line: usize, value: i64 },

    #[error("roster {} contains no account ids", path.display())]
    Empty { path: PathBuf },
}

/// Failures of a single upstream statistics query. Never retried by the client.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request {url} failed: {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    /// Build a status error, keeping at most [`MAX_ERROR_BODY_BYTES`] of the body.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16, body: &[u8]) -> Self {
        let kept = &body[..body.len().min(MAX_ERROR_BODY_BYTES)];
        // A character cut at the limit decodes to U+FFFD, which is wider.
        let mut text = String::from_utf8_lossy(kept).into_owned();
        let mut cut = text.len().min(MAX_ERROR_BODY_BYTES);
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        Self::Status {
            url: url.into(),
            status,
            body: text.trim().to_string(),
        }
    }
}

/// Outbound chat delivery failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Network-level failure; the call may succeed if repeated.
    #[error("delivery transport error: {0}")]
    Transport(String),

    /// The provider answered and refused the call.
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

impl DeliveryError {
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Malformed command argument. Reported back to the requesting chat.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("usage: {usage}")]
pub struct UsageError {
    pub usage: &'static str,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_truncates_body() {
        let body = vec![b'x'; MAX_ERROR_BODY_BYTES + 500];
        match UpstreamError::status("http://host/x", 502, &body) {
            UpstreamError::Status { status, body, .. } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), MAX_ERROR_BODY_BYTES);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn status_error_body_split_inside_character_stays_bounded() {
        let mut body = vec![b'x'; MAX_ERROR_BODY_BYTES - 1];
        body.extend_from_slice("ж".as_bytes());
        match UpstreamError::status("http://host/x", 500, &body) {
            UpstreamError::Status { body, .. } => {
                assert!(body.len() <= MAX_ERROR_BODY_BYTES, "{} bytes", body.len());
                assert!(body.chars().all(|c| c == 'x'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn status_error_trims_whitespace() {
        let err = UpstreamError::status("http://host/x", 404, b"  not found\n");
        assert_eq!(err.to_string(), "request http://host/x failed: 404: not found");
    }

    #[test]
    fn usage_error_display() {
        let err = UsageError {
            usage: "/friends <number>",
        };
        assert_eq!(err.to_string(), "usage: /friends <number>");
    }

    #[test]
    fn delivery_error_classification() {
        assert!(DeliveryError::Transport("timeout".into()).is_transport());
        assert!(!DeliveryError::Rejected("chat not found".into()).is_transport());
    }
}
