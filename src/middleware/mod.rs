//! # Middleware Module
//!
//! Cross-cutting request processing around the survey handler.
//!
//! `before` hooks run in registration order and may short-circuit the request
//! by returning a response. `after` hooks run in reverse order on every
//! response, including short-circuited ones.
//!
//! - [`CorsMiddleware`] - answers preflight requests and adds CORS headers
//! - [`TracingMiddleware`] - one structured log line per completed request

mod core;
mod cors;
mod tracing;

pub use self::core::Middleware;
pub use self::cors::{
    CorsMiddleware, ALLOW_ANY_ORIGIN, ALLOW_CONTENT_TYPE_HEADER, ALLOW_POST_OPTIONS_METHODS,
};
pub use self::tracing::TracingMiddleware;
