//! # Runtime Configuration Module
//!
//! Environment-driven tuning of the coroutine runtime.
//!
//! ## Environment Variables
//!
//! ### `SURVEY_STACK_SIZE`
//!
//! Stack size for connection coroutines. Accepts decimal (`16384`) or
//! hexadecimal (`0x4000`). Default: `0x4000` (16 KB).
//!
//! The survey handler is shallow, so the default is plenty; raise it only if
//! a custom store backend needs deep call chains.
//!
//! ```bash
//! export SURVEY_STACK_SIZE=0x8000
//! survey-intake --addr 0.0.0.0:8080
//! ```

use std::env;

/// Default coroutine stack size (16 KB).
pub const DEFAULT_STACK_SIZE: usize = 0x4000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        RuntimeConfig {
            stack_size: parse_stack_size(env::var("SURVEY_STACK_SIZE").ok().as_deref()),
        }
    }

    /// Apply the settings to the `may` runtime. Call before starting the server.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

/// Parse a decimal or `0x` hex stack size, falling back to the default.
#[must_use]
pub fn parse_stack_size(value: Option<&str>) -> usize {
    let parsed = value.map(str::trim).and_then(|val| {
        if let Some(hex) = val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
            usize::from_str_radix(hex, 16).ok()
        } else {
            val.parse().ok()
        }
    });
    match parsed {
        Some(size) if size > 0 => size,
        _ => DEFAULT_STACK_SIZE,
    }
}
