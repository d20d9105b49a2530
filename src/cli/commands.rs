use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use crate::handler::SurveyHandler;
use crate::logging::{init_logging, LogConfig, LogFormat};
use crate::runtime_config::RuntimeConfig;
use crate::server::service::DEFAULT_MAX_BODY_BYTES;
use crate::server::{HttpServer, ServerHandle, SurveyService};
use crate::store::{FileStore, KvStore, MemoryStore};

/// Key-value backend to persist answers in
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// In-process map, lost on restart
    Memory,
    /// One JSON file per answer under `--data-dir`
    File,
}

#[derive(Debug, Parser)]
#[command(name = "survey-intake")]
#[command(about = "Survey answer ingestion service", version, long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "SURVEY_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: String,

    /// Storage backend
    #[arg(long, env = "SURVEY_STORE", value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// Directory for the file store
    #[arg(long, env = "SURVEY_DATA_DIR", default_value = "./data/survey_answers")]
    pub data_dir: PathBuf,

    /// Largest accepted request body in bytes
    #[arg(long, env = "SURVEY_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, env = "SURVEY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "SURVEY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Include source file and line in log records
    #[arg(long, env = "SURVEY_LOG_LOCATION")]
    pub log_location: bool,
}

impl Cli {
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            log_level: self.log_level.clone(),
            format: self.log_format,
            include_location: self.log_location,
            ..LogConfig::default()
        }
    }
}

/// Open the configured store backend.
///
/// # Errors
///
/// Fails if the file store directory cannot be created.
pub fn open_store(kind: StoreKind, data_dir: &Path) -> Result<Arc<dyn KvStore>> {
    let store: Arc<dyn KvStore> = match kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::File => Arc::new(
            FileStore::open(data_dir)
                .with_context(|| format!("failed to open data dir {}", data_dir.display()))?,
        ),
    };
    Ok(store)
}

/// Service with default middleware over the given store.
#[must_use]
pub fn build_service(store: Arc<dyn KvStore>, max_body_bytes: usize) -> SurveyService {
    SurveyService::with_default_middleware(SurveyHandler::new(store), max_body_bytes)
}

pub fn run_cli(cli: Cli) -> Result<()> {
    let _log_guard = init_logging(&cli.log_config())?;

    let runtime = RuntimeConfig::from_env();
    runtime.apply();

    let store = open_store(cli.store, &cli.data_dir)?;
    let service = build_service(store, cli.max_body_bytes);
    info!(
        store = ?cli.store,
        max_body_bytes = cli.max_body_bytes,
        stack_size = runtime.stack_size,
        "Starting survey intake"
    );

    let handle = HttpServer(service)
        .start(cli.addr.as_str())
        .with_context(|| format!("failed to bind {}", cli.addr))?;
    wait_for_shutdown(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server failed: {e:?}"))
}
