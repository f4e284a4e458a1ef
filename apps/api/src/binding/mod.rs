//! Request binding: turns raw path segments, query strings and bodies into typed values
//! following the OpenAPI parameter styles the API declares.
//!
//! Every failure names the offending parameter and ends the request with a 400.

pub mod path;
pub mod query;

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("Invalid format for parameter {param}: {reason}")]
    InvalidFormat { param: &'static str, reason: String },

    #[error("Expected one value for {param}, got {count}")]
    TooManyValues { param: &'static str, count: usize },

    #[error("Query argument {param} is required, but not found")]
    Required { param: &'static str },

    #[error("Path parameter {param} is not bound by the matched route")]
    Unbound { param: &'static str },
}

impl ParamError {
    pub fn param(&self) -> &'static str {
        match self {
            Self::InvalidFormat { param, .. }
            | Self::TooManyValues { param, .. }
            | Self::Required { param }
            | Self::Unbound { param } => param,
        }
    }

    pub(crate) fn invalid(param: &'static str, reason: impl ToString) -> Self {
        Self::InvalidFormat {
            param,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EscapeError {
    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),

    #[error("escaped bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Strict percent-decoding: a `%` must be followed by two hex digits.
pub fn percent_decode(raw: &str) -> Result<String, EscapeError> {
    let bytes = raw.as_bytes();
    let malformed = bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .map(|(i, _)| i)
        .find(|&i| {
            !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
        });
    if let Some(at) = malformed {
        return Err(EscapeError::InvalidEscape(at));
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| EscapeError::InvalidUtf8)
}

/// Decodes a JSON request body into the operation's declared schema type.
pub fn json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode_plain_and_escaped() {
        assert_eq!(percent_decode("abc").unwrap(), "abc");
        assert_eq!(percent_decode("a%20b%2Cc").unwrap(), "a b,c");
        assert_eq!(percent_decode("caf%C3%A9").unwrap(), "café");
    }

    #[test]
    fn test_percent_decode_rejects_bad_escapes() {
        assert_eq!(percent_decode("ab%zz"), Err(EscapeError::InvalidEscape(2)));
        assert_eq!(percent_decode("ab%4"), Err(EscapeError::InvalidEscape(2)));
        assert_eq!(percent_decode("%"), Err(EscapeError::InvalidEscape(0)));
    }

    #[test]
    fn test_percent_decode_escaped_percent_is_literal() {
        assert_eq!(percent_decode("100%25zz").unwrap(), "100%zz");
        assert_eq!(percent_decode("%%41"), Err(EscapeError::InvalidEscape(0)));
    }

    #[test]
    fn test_percent_decode_rejects_invalid_utf8() {
        assert_eq!(percent_decode("%FF"), Err(EscapeError::InvalidUtf8));
    }

    #[test]
    fn test_param_error_messages_name_parameter() {
        let err = ParamError::invalid("id", "bad");
        assert_eq!(err.param(), "id");
        assert_eq!(err.to_string(), "Invalid format for parameter id: bad");
        assert_eq!(
            ParamError::TooManyValues { param: "limit", count: 2 }.to_string(),
            "Expected one value for limit, got 2"
        );
    }

    #[test]
    fn test_json_body_reports_parse_error() {
        let err = json_body::<serde_json::Value>(b"{not json").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
