// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Enumeration Error Types
 * Failure payloads carried by results, extractor and serialization errors
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use thiserror::Error;

/// Failure reported by a source for one domain query.
///
/// Errors are data at this layer: every variant travels to the consumer
/// inside a failure [`SubdomainResult`](crate::result::SubdomainResult)
/// instead of aborting the enumeration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The cancellation signal fired before a slot or a delivery was obtained
    #[error("operation cancelled")]
    Cancelled,

    /// Connection, TLS, timeout or body read failures
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    HttpStatus {
        status: u16,
        reason: String,
    },

    /// Malformed provider response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Quota message embedded in an otherwise successful response body
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The extractor could not be built for the queried domain
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    #[error("{0}")]
    Other(String),
}

impl SourceError {
    /// True when the failure only reflects cancellation or a departed consumer.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SourceError::Cancelled)
    }

    /// Build an `HttpStatus` failure from a response status code.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        SourceError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown status").to_string(),
        }
    }
}

impl From<&str> for SourceError {
    fn from(message: &str) -> Self {
        SourceError::Other(message.to_string())
    }
}

impl From<String> for SourceError {
    fn from(message: String) -> Self {
        SourceError::Other(message)
    }
}

/// Convert reqwest errors to our error types
impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if err.is_status() => SourceError::from_status(status),
            _ => SourceError::Network(err.without_url().to_string()),
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

/// Extractor construction errors (configuration, not transport)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    #[error("invalid domain for extraction: {0:?}")]
    InvalidDomain(String),

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result rendering errors
#[derive(Error, Debug)]
pub enum ResultError {
    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_classification() {
        assert!(SourceError::Cancelled.is_cancellation());
        assert!(!SourceError::Network("reset".into()).is_cancellation());
        assert!(!SourceError::from("timeout").is_cancellation());
    }

    #[test]
    fn test_status_error_message() {
        let err = SourceError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            err,
            SourceError::HttpStatus {
                status: 429,
                reason: "Too Many Requests".to_string()
            }
        );
        assert_eq!(err.to_string(), "HTTP 429: Too Many Requests");
    }

    #[test]
    fn test_extractor_error_wraps() {
        let err: SourceError = ExtractorError::InvalidDomain("bad domain".into()).into();
        assert!(err.to_string().contains("bad domain"));
    }
}
