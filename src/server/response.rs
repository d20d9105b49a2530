use http::StatusCode;
use may_minihttp::Response;
use serde_json::Value;

use crate::handler::HandlerResponse;

/// Canonical reason phrase for `status`, empty when it has none.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

/// Serialized body for a response, `None` when nothing should be written.
#[must_use]
pub fn encode_body(status: u16, body: &Value) -> Option<Vec<u8>> {
    if status == 204 || body.is_null() {
        return None;
    }
    Some(serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec()))
}

pub fn write_handler_response(res: &mut Response, hr: &HandlerResponse) {
    res.status_code(usize::from(hr.status), status_reason(hr.status));
    for line in hr.headers.iter().copied() {
        res.header(line);
    }
    if let Some(bytes) = encode_body(hr.status, &hr.body) {
        res.body_vec(bytes);
    }
}

/// Write a bare JSON error without going through middleware.
pub fn write_json_error(res: &mut Response, status: u16, message: &str) {
    write_handler_response(res, &HandlerResponse::error(status, message));
}
