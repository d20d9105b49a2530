use std::collections::HashMap;

use http::Method;
use serde_json::{json, Value};
use smallvec::SmallVec;

use crate::ids::RequestId;

/// Response headers stored inline before spilling to the heap.
pub const MAX_INLINE_HEADERS: usize = 8;

/// Complete `Name: value` header lines.
///
/// `may_minihttp` writes header lines verbatim and only accepts `&'static str`,
/// so lines are built once (usually as constants) and reused for every response.
pub type HeaderVec = SmallVec<[&'static str; MAX_INLINE_HEADERS]>;

/// Content type line carried by every JSON response.
pub const CONTENT_TYPE_JSON: &str = "Content-Type: application/json";

/// Request data handed to middleware and the survey handler.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// HTTP method
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Correlation id for logs
    pub request_id: RequestId,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Raw request body, at most `max_body_bytes` long
    pub body: Vec<u8>,
    /// Set when the client sent more than `max_body_bytes`
    pub body_too_large: bool,
}

impl HandlerRequest {
    /// Build a request with no headers, mostly useful in tests.
    #[must_use]
    pub fn new(method: Method, path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            path: path.to_string(),
            request_id: RequestId::new(),
            headers: HashMap::new(),
            body: body.into(),
            body_too_large: false,
        }
    }
}

/// Response produced by the handler or a short-circuiting middleware.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: u16,
    /// Header lines, see [`HeaderVec`]
    pub headers: HeaderVec,
    /// JSON body; `Value::Null` means no body
    pub body: Value,
}

impl HandlerResponse {
    /// Create a new response with the given status, headers, and body
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with the content type set
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push(CONTENT_TYPE_JSON);
        Self::new(status, headers, body)
    }

    /// Create an error response of the form `{"error": message}`
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    /// Empty `204 No Content`
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(204, HeaderVec::new(), Value::Null)
    }

    /// Add a header line, replacing any existing line with the same name.
    pub fn set_header(&mut self, line: &'static str) {
        let name = header_name(line);
        self.headers
            .retain(|existing| !header_name(existing).eq_ignore_ascii_case(name));
        self.headers.push(line);
    }

    /// Value of the header `name` (case-insensitive), if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers.iter().copied().find_map(|line: &'static str| {
            let (n, v) = line.split_once(':')?;
            n.trim().eq_ignore_ascii_case(name).then_some(v.trim())
        })
    }
}

fn header_name(line: &str) -> &str {
    line.split_once(':').map_or(line, |(n, _)| n).trim()
}
