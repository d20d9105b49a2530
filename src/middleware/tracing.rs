use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::Middleware;
use crate::handler::{HandlerRequest, HandlerResponse};

/// Logs request start at `debug` and completion with status and latency.
///
/// Completion is logged at `error` for 5xx, `warn` for 4xx, `info` otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        debug!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            "Request started"
        );
        None
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        match res.status {
            500.. => error!(
                request_id = %req.request_id,
                method = %req.method,
                path = %req.path,
                status = res.status,
                latency_ms,
                "Request completed"
            ),
            400..=499 => warn!(
                request_id = %req.request_id,
                method = %req.method,
                path = %req.path,
                status = res.status,
                latency_ms,
                "Request completed"
            ),
            _ => info!(
                request_id = %req.request_id,
                method = %req.method,
                path = %req.path,
                status = res.status,
                latency_ms,
                "Request completed"
            ),
        }
    }
}
