//! # Handler Module
//!
//! The request/response types shared by the server and middleware, and the
//! survey handler itself.
//!
//! The handler is a plain function of a [`HandlerRequest`] to a
//! [`HandlerResponse`]; it never touches the socket, which keeps it testable
//! without a running server.

mod survey_handler;
mod types;

pub use survey_handler::{SurveyHandler, SUCCESS_MESSAGE};
pub use types::{HandlerRequest, HandlerResponse, HeaderVec, MAX_INLINE_HEADERS};
