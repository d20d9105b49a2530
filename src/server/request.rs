use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};

use http::Method;
use may_minihttp::Request;
use tracing::{debug, warn};

use crate::handler::HandlerRequest;
use crate::ids::RequestId;

/// Header clients may use to supply their own correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Why an incoming request could not be handed to the handler.
#[derive(Debug)]
pub enum ParseError {
    /// Method is not a valid HTTP method token.
    InvalidMethod(String),
    /// The body could not be read off the connection.
    ///
    /// Carries the request as parsed so far (with an empty body) so the
    /// response can still pass through middleware.
    BodyRead {
        request: Box<HandlerRequest>,
        source: io::Error,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidMethod(method) => write!(f, "invalid HTTP method: {method}"),
            ParseError::BodyRead { source, .. } => {
                write!(f, "failed to read request body: {source}")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::InvalidMethod(_) => None,
            ParseError::BodyRead { source, .. } => Some(source),
        }
    }
}

/// Read at most `limit` bytes of body.
///
/// Reads one byte past the limit to tell "exactly at the limit" apart from
/// "too large"; the extra byte is dropped. Returns the body and whether it was
/// truncated.
///
/// # Errors
///
/// Propagates read errors from the underlying reader.
pub fn read_body_limited<R: Read>(reader: R, limit: usize) -> io::Result<(Vec<u8>, bool)> {
    let mut body = Vec::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    reader.take(cap).read_to_end(&mut body)?;
    let too_large = body.len() > limit;
    body.truncate(limit);
    Ok((body, too_large))
}

/// Parse an incoming HTTP request into a [`HandlerRequest`]
///
/// Header names are lowercased, the query string is dropped from the path and
/// the body is read raw (it is decoded by the handler, so a malformed body is
/// still a `400` from the handler rather than a transport error).
///
/// # Errors
///
/// [`ParseError::InvalidMethod`] for a bad method token,
/// [`ParseError::BodyRead`] when reading the body fails.
pub fn parse_request(req: Request, max_body_bytes: usize) -> Result<HandlerRequest, ParseError> {
    let method_str = req.method().to_string();
    let method = Method::from_bytes(method_str.as_bytes())
        .map_err(|_| ParseError::InvalidMethod(method_str.clone()))?;
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let request_id =
        RequestId::from_header_or_new(headers.get(REQUEST_ID_HEADER).map(String::as_str));

    let mut request = HandlerRequest {
        method,
        path,
        request_id,
        headers,
        body: Vec::new(),
        body_too_large: false,
    };

    let (body, body_too_large) = match read_body_limited(req.body(), max_body_bytes) {
        Ok(read) => read,
        Err(source) => {
            warn!(request_id = %request.request_id, error = %source, "Request body read failed");
            return Err(ParseError::BodyRead {
                request: Box::new(request),
                source,
            });
        }
    };
    request.body = body;
    request.body_too_large = body_too_large;

    debug!(
        request_id = %request.request_id,
        method = %request.method,
        path = %request.path,
        headers_count = request.headers.len(),
        body_size_bytes = request.body.len(),
        body_too_large,
        "HTTP request parsed"
    );

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_under_limit() {
        let (body, too_large) = read_body_limited(&b"{\"rate\":3}"[..], 64).unwrap();
        assert_eq!(body, b"{\"rate\":3}");
        assert!(!too_large);
    }

    #[test]
    fn test_body_exactly_at_limit() {
        let (body, too_large) = read_body_limited(&b"abcd"[..], 4).unwrap();
        assert_eq!(body, b"abcd");
        assert!(!too_large);
    }

    #[test]
    fn test_body_over_limit_is_truncated_and_flagged() {
        let (body, too_large) = read_body_limited(&b"abcdef"[..], 4).unwrap();
        assert_eq!(body, b"abcd");
        assert!(too_large);
    }

    struct ResetReader;

    impl Read for ResetReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"))
        }
    }

    #[test]
    fn test_body_read_failure_is_an_error() {
        let err = read_body_limited(ResetReader, 64).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn test_parse_error_display() {
        assert_eq!(
            ParseError::InvalidMethod("FO O".into()).to_string(),
            "invalid HTTP method: FO O"
        );
        let err = ParseError::BodyRead {
            request: Box::new(HandlerRequest::new(Method::POST, "/", "")),
            source: io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"),
        };
        assert_eq!(err.to_string(), "failed to read request body: peer reset");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_empty_body() {
        let (body, too_large) = read_body_limited(io::empty(), 16).unwrap();
        assert!(body.is_empty());
        assert!(!too_large);
    }
}
