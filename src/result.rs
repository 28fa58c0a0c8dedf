// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Enumeration Result
 * Thread-safe tri-state outcome record tagged with a source label and timestamp
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::errors::{ResultError, SourceError};

/// What a single result resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing has been recorded yet
    Pending,
    /// A discovered value, in practice always a host name
    Success(String),
    Failure(SourceError),
}

impl Outcome {
    /// Successful only when the value renders to something.
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Success(value) => !is_blank_value(value),
            _ => false,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }
}

/// A success value that renders empty is not a discovery.
pub fn is_blank_value(value: &str) -> bool {
    value.is_empty()
}

#[derive(Debug, Clone)]
struct ResultState {
    timestamp: DateTime<Utc>,
    label: String,
    outcome: Outcome,
}

/// One outcome produced by a source: a discovered name or a failure.
///
/// Field access is synchronized so the record can be read by the fan-in
/// merger while its producer still holds a handle to it.
pub struct SubdomainResult {
    state: RwLock<ResultState>,
}

impl SubdomainResult {
    /// Create a result stamped with the current UTC time.
    ///
    /// A present `failure` wins over any `success` payload.
    pub fn new(
        label: impl Into<String>,
        success: Option<String>,
        failure: Option<SourceError>,
    ) -> Self {
        let outcome = match (success, failure) {
            (_, Some(err)) => Outcome::Failure(err),
            (Some(value), None) => Outcome::Success(value),
            (None, None) => Outcome::Pending,
        };

        Self {
            state: RwLock::new(ResultState {
                timestamp: Utc::now(),
                label: label.into(),
                outcome,
            }),
        }
    }

    pub fn success(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, Some(value.into()), None)
    }

    pub fn failure(label: impl Into<String>, err: impl Into<SourceError>) -> Self {
        Self::new(label, None, Some(err.into()))
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.state.read().timestamp
    }

    pub fn set_timestamp(&self, timestamp: DateTime<Utc>) {
        self.state.write().timestamp = timestamp;
    }

    /// Producer label, usually the source name
    pub fn label(&self) -> String {
        self.state.read().label.clone()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        self.state.write().label = label.into();
    }

    pub fn outcome(&self) -> Outcome {
        self.state.read().outcome.clone()
    }

    /// The recorded success payload, blank or not.
    pub fn success_value(&self) -> Option<String> {
        match &self.state.read().outcome {
            Outcome::Success(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Replaces whatever outcome was recorded before.
    pub fn set_success(&self, value: impl Into<String>) {
        self.state.write().outcome = Outcome::Success(value.into());
    }

    pub fn failure_error(&self) -> Option<SourceError> {
        match &self.state.read().outcome {
            Outcome::Failure(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Replaces whatever outcome was recorded before.
    pub fn set_failure(&self, err: impl Into<SourceError>) {
        self.state.write().outcome = Outcome::Failure(err.into());
    }

    pub fn is_success(&self) -> bool {
        self.state.read().outcome.is_success()
    }

    pub fn is_failure(&self) -> bool {
        self.state.read().outcome.is_failure()
    }

    pub fn has_type(&self) -> bool {
        !self.state.read().label.is_empty()
    }

    /// Single-line summary: `<timestamp> Type: <label> Success: <value>`,
    /// or `Failure: <error>`, with absent parts omitted.
    pub fn printable(&self) -> String {
        let state = self.state.read();
        let mut line = state.timestamp.to_string();

        if !state.label.is_empty() {
            line.push_str(&format!(" Type: {}", state.label));
        }

        match &state.outcome {
            Outcome::Success(value) if !is_blank_value(value) => {
                line.push_str(&format!(" Success: {}", value));
            }
            Outcome::Failure(err) => {
                line.push_str(&format!(" Failure: {}", err));
            }
            _ => {}
        }

        line.trim().to_string()
    }

    /// The printable form, if there is anything to print.
    pub fn is_printable(&self) -> Option<String> {
        let printable = self.printable();
        if printable.is_empty() {
            None
        } else {
            Some(printable)
        }
    }

    /// Structured snapshot of the result.
    pub fn to_record(&self) -> ResultRecord {
        let state = self.state.read();
        let (success, failure) = match &state.outcome {
            Outcome::Success(value) if !is_blank_value(value) => (Some(value.clone()), None),
            Outcome::Failure(err) => (None, Some(err.to_string())),
            _ => (None, None),
        };

        ResultRecord {
            timestamp: state.timestamp,
            label: state.label.clone(),
            success,
            failure,
        }
    }

    pub fn to_json(&self) -> Result<String, ResultError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }
}

impl Clone for SubdomainResult {
    fn clone(&self) -> Self {
        Self {
            state: RwLock::new(self.state.read().clone()),
        }
    }
}

impl fmt::Debug for SubdomainResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("SubdomainResult")
            .field("timestamp", &state.timestamp)
            .field("label", &state.label)
            .field("outcome", &state.outcome)
            .finish()
    }
}

impl fmt::Display for SubdomainResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.printable())
    }
}

impl Serialize for SubdomainResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// Serialized form of a [`SubdomainResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "type")]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_success_and_failure_are_exclusive() {
        let cases = vec![
            SubdomainResult::success("mock", "a.example.com"),
            SubdomainResult::failure("mock", "timeout"),
            SubdomainResult::new("mock", Some("a.example.com".into()), Some("boom".into())),
            SubdomainResult::new("mock", None, None),
            SubdomainResult::success("mock", ""),
        ];

        for result in &cases {
            assert!(!(result.is_success() && result.is_failure()), "{:?}", result);
        }
    }

    #[test]
    fn test_failure_wins_over_success_payload() {
        let result =
            SubdomainResult::new("mock", Some("a.example.com".into()), Some("boom".into()));
        assert!(result.is_failure());
        assert!(!result.is_success());
        assert_eq!(result.failure_error(), Some(SourceError::Other("boom".into())));
    }

    #[test]
    fn test_blank_success_is_not_a_discovery() {
        let blank = SubdomainResult::success("mock", "");
        assert!(!blank.is_success());
        assert!(!blank.is_failure());
        assert_eq!(blank.success_value(), Some(String::new()));

        let pending = SubdomainResult::new("mock", None, None);
        assert_eq!(pending.outcome(), Outcome::Pending);
        assert!(!pending.is_success());
    }

    #[test]
    fn test_setters_replace_outcome() {
        let result = SubdomainResult::failure("mock", "boom");
        result.set_success("b.example.com");
        assert!(result.is_success());

        result.set_failure(SourceError::Cancelled);
        assert!(result.is_failure());
        assert!(result.success_value().is_none());

        result.set_label("other");
        assert_eq!(result.label(), "other");
    }

    #[test]
    fn test_timestamp_is_set_at_construction() {
        let before = Utc::now();
        let result = SubdomainResult::success("mock", "a.example.com");
        assert!(result.timestamp() >= before);
        assert!(result.timestamp() <= Utc::now());
    }

    #[test]
    fn test_printable_formats() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let ok = SubdomainResult::success("crtsh", "a.example.com");
        ok.set_timestamp(at);
        assert_eq!(
            ok.printable(),
            "2024-03-01 12:00:00 UTC Type: crtsh Success: a.example.com"
        );

        let failed = SubdomainResult::failure("crtsh", SourceError::from("timeout"));
        failed.set_timestamp(at);
        assert_eq!(failed.printable(), "2024-03-01 12:00:00 UTC Type: crtsh Failure: timeout");

        let unlabeled = SubdomainResult::success("", "");
        unlabeled.set_timestamp(at);
        assert_eq!(unlabeled.printable(), "2024-03-01 12:00:00 UTC");
        assert_eq!(unlabeled.to_string(), unlabeled.printable());
        assert!(unlabeled.is_printable().is_some());
    }

    #[test]
    fn test_json_record() {
        let result = SubdomainResult::success("yahoo", "a.example.com");
        let json = result.to_json().unwrap();
        let record: ResultRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record.label, "yahoo");
        assert_eq!(record.success.as_deref(), Some("a.example.com"));
        assert!(record.failure.is_none());
        assert!(!json.contains("failure"));

        let failed = SubdomainResult::failure("yahoo", SourceError::RateLimited("quota".into()));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["type"], "yahoo");
        assert_eq!(value["failure"], "Rate limit exceeded: quota");
        assert!(value.get("success").is_none());
    }

    #[test]
    fn test_concurrent_reads() {
        let result = std::sync::Arc::new(SubdomainResult::success("mock", "a.example.com"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let result = result.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(result.is_success());
                        assert_eq!(result.label(), "mock");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
