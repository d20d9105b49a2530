use std::time::Duration;

use http::Method;

use super::Middleware;
use crate::handler::{HandlerRequest, HandlerResponse};

/// Allow requests from any origin.
pub const ALLOW_ANY_ORIGIN: &str = "Access-Control-Allow-Origin: *";
/// Only the methods the survey endpoint answers.
pub const ALLOW_POST_OPTIONS_METHODS: &str = "Access-Control-Allow-Methods: POST, OPTIONS";
/// Browsers need `Content-Type` allowed to send JSON cross-origin.
pub const ALLOW_CONTENT_TYPE_HEADER: &str = "Access-Control-Allow-Headers: Content-Type";

/// CORS (Cross-Origin Resource Sharing) middleware
///
/// Handles preflight OPTIONS requests and adds CORS headers to responses.
/// The policy is static: header lines are fixed at construction and shared by
/// every response.
#[derive(Debug, Clone, Copy)]
pub struct CorsMiddleware {
    allow_origin: &'static str,
    allow_methods: &'static str,
    allow_headers: &'static str,
}

impl CorsMiddleware {
    /// Create a CORS middleware from complete header lines
    ///
    /// # Example
    ///
    /// ```rust
    /// use survey_intake::middleware::CorsMiddleware;
    ///
    /// let cors = CorsMiddleware::new(
    ///     "Access-Control-Allow-Origin: https://survey.example",
    ///     "Access-Control-Allow-Methods: POST, OPTIONS",
    ///     "Access-Control-Allow-Headers: Content-Type",
    /// );
    /// ```
    #[must_use]
    pub fn new(
        allow_origin: &'static str,
        allow_methods: &'static str,
        allow_headers: &'static str,
    ) -> Self {
        Self {
            allow_origin,
            allow_methods,
            allow_headers,
        }
    }

    /// The three header lines this middleware adds
    #[must_use]
    pub fn header_lines(&self) -> [&'static str; 3] {
        [self.allow_origin, self.allow_methods, self.allow_headers]
    }
}

/// Permissive policy: any origin, `POST, OPTIONS`, `Content-Type`.
impl Default for CorsMiddleware {
    fn default() -> Self {
        Self::new(
            ALLOW_ANY_ORIGIN,
            ALLOW_POST_OPTIONS_METHODS,
            ALLOW_CONTENT_TYPE_HEADER,
        )
    }
}

/// # CORS Flow
///
/// 1. **Preflight (OPTIONS)**: `before()` returns 204 with no body, the handler is skipped
/// 2. **Every response**: `after()` adds the CORS headers, preflight included
impl Middleware for CorsMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        if req.method == Method::OPTIONS {
            Some(HandlerResponse::no_content())
        } else {
            None
        }
    }

    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        for line in self.header_lines() {
            res.set_header(line);
        }
    }
}
