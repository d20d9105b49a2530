use std::io;
use std::sync::Arc;
use std::time::Instant;

use may_minihttp::{HttpService, Request, Response};
use tracing::warn;

use super::request::{parse_request, ParseError};
use super::response::{write_handler_response, write_json_error};
use crate::handler::{HandlerRequest, HandlerResponse, SurveyHandler};
use crate::middleware::{CorsMiddleware, Middleware, TracingMiddleware};

/// Default request body limit in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Error message sent when the request body could not be read.
pub const BODY_READ_FAILED: &str = "failed to read request body";

/// `may_minihttp` service wrapping the survey handler and its middleware.
///
/// Every path is served by the same handler; routing is by method only.
#[derive(Clone)]
pub struct SurveyService {
    pub handler: SurveyHandler,
    pub middlewares: Vec<Arc<dyn Middleware>>,
    pub max_body_bytes: usize,
}

impl SurveyService {
    /// Service with no middleware; see [`SurveyService::with_default_middleware`].
    #[must_use]
    pub fn new(handler: SurveyHandler, max_body_bytes: usize) -> Self {
        Self {
            handler,
            middlewares: Vec::new(),
            max_body_bytes,
        }
    }

    /// Service with tracing and the permissive CORS policy installed.
    #[must_use]
    pub fn with_default_middleware(handler: SurveyHandler, max_body_bytes: usize) -> Self {
        let mut service = Self::new(handler, max_body_bytes);
        service.add_middleware(Arc::new(TracingMiddleware));
        service.add_middleware(Arc::new(CorsMiddleware::default()));
        service
    }

    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Run middleware and the handler for one request.
    #[must_use]
    pub fn process(&self, req: &HandlerRequest) -> HandlerResponse {
        let start = Instant::now();
        let response = self
            .middlewares
            .iter()
            .find_map(|mw| mw.before(req))
            .unwrap_or_else(|| self.handler.handle(req));
        self.finish(req, response, start)
    }

    /// `400` for a request whose body could not be read, with the `after`
    /// hooks applied so CORS headers and the completion log still happen.
    #[must_use]
    pub fn body_read_failed(&self, req: &HandlerRequest) -> HandlerResponse {
        let response = HandlerResponse::error(400, BODY_READ_FAILED);
        self.finish(req, response, Instant::now())
    }

    fn finish(
        &self,
        req: &HandlerRequest,
        mut response: HandlerResponse,
        start: Instant,
    ) -> HandlerResponse {
        let latency = start.elapsed();
        for mw in self.middlewares.iter().rev() {
            mw.after(req, &mut response, latency);
        }
        response
    }
}

impl HttpService for SurveyService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        match parse_request(req, self.max_body_bytes) {
            Ok(handler_request) => {
                let response = self.process(&handler_request);
                write_handler_response(res, &response);
            }
            Err(ParseError::BodyRead { request, .. }) => {
                let response = self.body_read_failed(&request);
                write_handler_response(res, &response);
            }
            Err(ParseError::InvalidMethod(method)) => {
                warn!(method = %method, "Rejected request with invalid method token");
                write_json_error(res, 400, "invalid HTTP method");
            }
        }
        Ok(())
    }
}
