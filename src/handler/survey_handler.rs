use std::sync::Arc;

use http::Method;
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::types::{HandlerRequest, HandlerResponse};
use crate::ids::AnswerKey;
use crate::store::KvStore;
use crate::survey::{now_millis, SurveySubmission};

/// Message returned with every stored answer.
pub const SUCCESS_MESSAGE: &str = "survey answer saved";

const ALLOW_HEADER: &str = "Allow: POST, OPTIONS";

/// Method-dispatched survey ingestion handler.
///
/// Stateless apart from the shared store handle; clones are cheap.
#[derive(Clone)]
pub struct SurveyHandler {
    store: Arc<dyn KvStore>,
}

impl SurveyHandler {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Handle one request.
    ///
    /// - `OPTIONS` answers `204` with no body
    /// - `POST` validates and stores a survey answer
    /// - anything else is `405`
    #[must_use]
    pub fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        match req.method {
            Method::POST => self.submit(req),
            Method::OPTIONS => HandlerResponse::no_content(),
            _ => {
                let mut res = HandlerResponse::error(
                    405,
                    &format!("method {} is not allowed", req.method),
                );
                res.set_header(ALLOW_HEADER);
                res
            }
        }
    }

    fn submit(&self, req: &HandlerRequest) -> HandlerResponse {
        debug!(
            request_id = %req.request_id,
            body_size_bytes = req.body.len(),
            "Survey body received"
        );

        if req.body_too_large {
            warn!(request_id = %req.request_id, "Survey body exceeds size limit");
            return HandlerResponse::error(413, "request body too large");
        }

        let answer = match SurveySubmission::from_body(&req.body)
            .and_then(|submission| submission.validate(now_millis()))
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!(request_id = %req.request_id, error = %e, "Survey submission rejected");
                return HandlerResponse::error(400, &e.to_string());
            }
        };

        let key = AnswerKey::new().to_string();
        let value = match serde_json::to_string(&answer) {
            Ok(value) => value,
            Err(e) => {
                error!(request_id = %req.request_id, error = %e, "Survey answer serialization failed");
                return HandlerResponse::error(500, "failed to encode survey answer");
            }
        };

        if let Err(e) = self.store.put(&key, &value) {
            error!(
                request_id = %req.request_id,
                key = %key,
                error = %e,
                "Survey answer store write failed"
            );
            return HandlerResponse::error(500, "failed to store survey answer");
        }

        info!(
            request_id = %req.request_id,
            key = %key,
            host = %answer.host,
            rate = answer.rate,
            "Survey answer stored"
        );
        HandlerResponse::json(200, json!({ "message": SUCCESS_MESSAGE, "key": key }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use crate::survey::SurveyAnswer;
    use serde_json::Value;

    fn handler() -> (SurveyHandler, MemoryStore) {
        let store = MemoryStore::new();
        (SurveyHandler::new(Arc::new(store.clone())), store)
    }

    fn post(handler: &SurveyHandler, body: &str) -> HandlerResponse {
        handler.handle(&HandlerRequest::new(Method::POST, "/", body))
    }

    struct FailingStore;

    impl KvStore for FailingStore {
        fn put(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }
    }

    #[test]
    fn test_valid_post_is_stored_under_returned_key() {
        let (handler, store) = handler();
        let before = now_millis();
        let res = post(&handler, r#"{"host":"example.com","rate":4,"comment":"nice"}"#);
        let after = now_millis();

        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], SUCCESS_MESSAGE);
        let key = res.body["key"].as_str().unwrap();
        assert!(key.parse::<AnswerKey>().is_ok());

        let stored = store.get(key).unwrap().unwrap();
        let answer: SurveyAnswer = serde_json::from_str(&stored).unwrap();
        assert_eq!(answer.host, "example.com");
        assert_eq!(answer.rate, 4);
        assert_eq!(answer.comment.as_deref(), Some("nice"));
        assert_eq!(answer.username, None);
        assert!(answer.timestamp >= before && answer.timestamp <= after);
    }

    #[test]
    fn test_client_timestamp_is_overwritten() {
        let (handler, store) = handler();
        let res = post(&handler, r#"{"host":"h","rate":1,"timestamp":5}"#);
        let key = res.body["key"].as_str().unwrap();
        let stored: Value = serde_json::from_str(&store.get(key).unwrap().unwrap()).unwrap();
        assert_ne!(stored["timestamp"], 5);
    }

    #[test]
    fn test_each_post_gets_a_fresh_key() {
        let (handler, store) = handler();
        let a = post(&handler, r#"{"host":"h","rate":2}"#);
        let b = post(&handler, r#"{"host":"h","rate":2}"#);
        assert_ne!(a.body["key"], b.body["key"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_invalid_posts_are_400_and_store_nothing() {
        let (handler, store) = handler();
        for body in [
            "{not json",
            r#"{"rate":3}"#,
            r#"{"host":"","rate":3}"#,
            r#"{"host":"h"}"#,
            r#"{"host":"h","rate":0}"#,
            r#"{"host":"h","rate":6}"#,
            r#"{"host":"h","rate":3.5}"#,
            r#"{"host":"h","rate":"3"}"#,
        ] {
            let res = post(&handler, body);
            assert_eq!(res.status, 400, "body {body:?}");
            assert!(res.body["error"].is_string());
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_oversize_body_is_413() {
        let (handler, store) = handler();
        let mut req = HandlerRequest::new(Method::POST, "/", r#"{"host":"h","#);
        req.body_too_large = true;
        let res = handler.handle(&req);
        assert_eq!(res.status, 413);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_failure_is_500() {
        let handler = SurveyHandler::new(Arc::new(FailingStore));
        let res = post(&handler, r#"{"host":"h","rate":5}"#);
        assert_eq!(res.status, 500);
        assert_eq!(res.body["error"], "failed to store survey answer");
    }

    #[test]
    fn test_options_is_204() {
        let (handler, _) = handler();
        let res = handler.handle(&HandlerRequest::new(Method::OPTIONS, "/", ""));
        assert_eq!(res.status, 204);
        assert!(res.body.is_null());
    }

    #[test]
    fn test_other_methods_are_405() {
        let (handler, store) = handler();
        for method in [Method::GET, Method::DELETE, Method::PUT, Method::PATCH, Method::HEAD] {
            let res = handler.handle(&HandlerRequest::new(
                method.clone(),
                "/",
                r#"{"host":"h","rate":5}"#,
            ));
            assert_eq!(res.status, 405, "method {method}");
            assert_eq!(res.header("Allow"), Some("POST, OPTIONS"));
            assert!(res.body["error"].is_string());
        }
        assert!(store.is_empty());
    }
}
