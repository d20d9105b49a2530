//! Survey answer model and submission validation.
//!
//! A POST body is decoded in two steps: first into an untyped JSON value (so a
//! syntactically broken body is told apart from a well-formed but invalid one),
//! then into [`SurveySubmission`], whose fields are all optional. Validation
//! turns a submission into a [`SurveyAnswer`], the record that gets persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Lowest accepted rating.
pub const MIN_RATE: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATE: u8 = 5;

/// Raw survey submission as sent by the client.
///
/// Unknown fields are ignored, and so is any client supplied `timestamp`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurveySubmission {
    pub host: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub rate: Option<Number>,
    pub comment: Option<String>,
}

/// Validated survey answer as persisted in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyAnswer {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub rate: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Server receive time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Reasons a submission is rejected with `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Body is not UTF-8, not JSON, or not a JSON object.
    Malformed(String),
    /// A field has the wrong JSON type.
    InvalidField(String),
    /// `host` is absent, null or empty.
    MissingHost,
    /// `rate` is absent, null, non-integral or outside 1..=5.
    InvalidRate,
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::Malformed(detail) => {
                write!(f, "malformed request body: {detail}")
            }
            SubmissionError::InvalidField(detail) => {
                write!(f, "invalid survey answer: {detail}")
            }
            SubmissionError::MissingHost => write!(f, "host is required"),
            SubmissionError::InvalidRate => write!(
                f,
                "rate must be an integer between {MIN_RATE} and {MAX_RATE}"
            ),
        }
    }
}

impl std::error::Error for SubmissionError {}

impl SurveySubmission {
    /// Decode a raw request body.
    ///
    /// # Errors
    ///
    /// [`SubmissionError::Malformed`] when the body is not a JSON object,
    /// [`SubmissionError::InvalidField`] when a known field has the wrong type.
    pub fn from_body(body: &[u8]) -> Result<Self, SubmissionError> {
        let text = std::str::from_utf8(body)
            .map_err(|e| SubmissionError::Malformed(format!("body is not valid UTF-8: {e}")))?;
        let value: Value =
            serde_json::from_str(text).map_err(|e| SubmissionError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(SubmissionError::Malformed(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| SubmissionError::InvalidField(e.to_string()))
    }

    /// Check the required fields and stamp the answer with `timestamp`.
    ///
    /// # Errors
    ///
    /// [`SubmissionError::MissingHost`] or [`SubmissionError::InvalidRate`].
    pub fn validate(self, timestamp: u64) -> Result<SurveyAnswer, SubmissionError> {
        let host = match self.host {
            Some(host) if !host.is_empty() => host,
            _ => return Err(SubmissionError::MissingHost),
        };
        let rate = self
            .rate
            .as_ref()
            .and_then(rate_from_number)
            .ok_or(SubmissionError::InvalidRate)?;
        Ok(SurveyAnswer {
            host,
            username: self.username,
            email: self.email,
            rate,
            comment: self.comment,
            timestamp,
        })
    }
}

/// Accepts `4` and `4.0`, rejects `3.5`, `0`, `6` and negatives.
fn rate_from_number(n: &Number) -> Option<u8> {
    let rate = if let Some(i) = n.as_u64() {
        i
    } else {
        let f = n.as_f64()?;
        if f.fract() != 0.0 || f < 0.0 || f > f64::from(MAX_RATE) {
            return None;
        }
        f as u64
    };
    u8::try_from(rate)
        .ok()
        .filter(|r| (MIN_RATE..=MAX_RATE).contains(r))
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
