//! # CLI Module
//!
//! Command-line entry point for the `survey-intake` binary.
//!
//! Every flag has an environment variable fallback so the service can be
//! configured entirely from a container environment:
//!
//! ```bash
//! survey-intake --addr 0.0.0.0:8080 --store file --data-dir /var/lib/survey
//!
//! # same thing
//! SURVEY_ADDR=0.0.0.0:8080 SURVEY_STORE=file SURVEY_DATA_DIR=/var/lib/survey survey-intake
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{build_service, open_store, run_cli, Cli, StoreKind};
