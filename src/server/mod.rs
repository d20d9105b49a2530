pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, read_body_limited, ParseError};
pub use response::{write_handler_response, write_json_error};
pub use service::SurveyService;
