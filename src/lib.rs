//! # survey-intake
//!
//! A single-endpoint HTTP service that accepts survey answers, validates them,
//! stamps a server-side timestamp and stores each one under a fresh ULID key
//! in a key-value store.
//!
//! ## Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Cors as CorsMiddleware
//!     participant Handler as SurveyHandler
//!     participant Store as KvStore
//!
//!     Client->>Server: POST / {"host":"example.com","rate":4}
//!     Server->>Server: parse_request<br/>(headers, raw body, size limit)
//!     Server->>Cors: before()
//!     alt OPTIONS preflight
//!         Cors-->>Client: 204 + CORS headers
//!     end
//!     Cors->>Handler: handle()
//!     alt Malformed or invalid body
//!         Handler-->>Client: 400 {"error": ...}
//!     end
//!     Handler->>Store: put(ulid, json)
//!     alt Store failure
//!         Handler-->>Client: 500 {"error": ...}
//!     end
//!     Handler-->>Client: 200 {"message": ..., "key": ulid}
//! ```
//!
//! Any method other than `POST` and `OPTIONS` gets `405`. Every response
//! carries the permissive CORS headers.
//!
//! ## Runtime Considerations
//!
//! The server runs on the `may` coroutine runtime, not tokio. Each connection
//! is served by a coroutine, so the blocking store write parks only that
//! coroutine. Stack size is configurable via `SURVEY_STACK_SIZE`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use survey_intake::cli::build_service;
//! use survey_intake::server::HttpServer;
//! use survey_intake::store::MemoryStore;
//!
//! let service = build_service(Arc::new(MemoryStore::new()), 64 * 1024);
//! let handle = HttpServer(service).start("127.0.0.1:8080").unwrap();
//! handle.join().unwrap();
//! ```

pub mod cli;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod runtime_config;
pub mod server;
pub mod store;
pub mod survey;

pub use handler::{HandlerRequest, HandlerResponse, SurveyHandler};
pub use ids::{AnswerKey, RequestId};
pub use store::{FileStore, KvStore, MemoryStore, StoreError};
pub use survey::{SubmissionError, SurveyAnswer, SurveySubmission};
