//! Meetwatch: background coordinator for the meeting assistant extension.
//!
//! Runs as a browser native messaging host. Stdout carries protocol frames,
//! so logs go to a daily file in the data directory.

mod alarms;
mod app;
mod app_command;
mod backend_client;
mod config;
mod error;
mod native_messaging;
mod storage;
#[cfg(test)]
mod tests;

pub(crate) use {
    alarms::AlarmScheduler,
    app::App,
    app_command::AppCommand,
    backend_client::HttpBackend,
    error::{AppError, Result as AppResult},
    storage::JsonFileStorage,
};

use crate::{
    config::Config,
    native_messaging::{NativeHost, run_reader, run_writer},
};

use meetwatch_core::{Collaborators, Coordinator, SystemClock};

use std::{sync::Arc, time::Duration};

use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "meetwatch=debug,meetwatch_core=debug";
const LOG_FILE_PREFIX: &str = "meetwatch.log";
const OUTBOUND_CHANNEL_CAPACITY: usize = 64;

/// Application entry point.
fn main() {
    // Dropping the guard flushes buffered log lines, so it lives until exit.
    let _log_guard = init_logging();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(run(config));

    // A stdin read parked on a blocking thread would otherwise hold up exit.
    rt.shutdown_timeout(Duration::from_secs(1));

    if let Err(e) = result {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> AppResult<()> {
    let data_dir = Config::data_dir()?;

    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CHANNEL_CAPACITY);
    // Unbounded: the reader must never wait on the coordinator, or a
    // coordinator waiting on a host call would never see the response.
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let host = Arc::new(NativeHost::new(outbound_tx, config.host_call_timeout()));
    let backend = HttpBackend::new(&config.backend.base_url, config.request_timeout())?;
    let storage = JsonFileStorage::in_dir(&data_dir);

    let collaborators = Collaborators {
        browser: host.clone(),
        surface: host.clone(),
        backend: Arc::new(backend),
        storage: Arc::new(storage),
        clock: Arc::new(SystemClock),
    };
    let coordinator = Coordinator::new(
        config.coordinator_settings(),
        collaborators,
        host.clone(),
    );

    let writer_handle = tokio::spawn(run_writer(tokio::io::stdout(), outbound_rx));
    let reader_handle = tokio::spawn(run_reader(
        tokio::io::stdin(),
        host.clone(),
        command_tx.clone(),
    ));

    let scheduler = AlarmScheduler::new(command_tx, config.snapshot_interval());
    let alarm_handle = tokio::spawn(async move {
        if let Err(e) = scheduler.run(shutdown_rx).await {
            error!(error = ?e, "Alarm scheduler error");
        }
    });

    let app = App {
        coordinator,
        host,
        command_rx,
        shutdown_tx,
    };
    let result = app.run().await;

    // Blocked on stdin; nothing left to read for. Its host handle keeps the
    // outbound channel open, so it goes first.
    reader_handle.abort();
    let _ = reader_handle.await;

    match tokio::time::timeout(Duration::from_secs(1), writer_handle).await {
        Ok(Ok(Ok(()))) => info!("Writer stopped cleanly"),
        Ok(Ok(Err(e))) => warn!(error = ?e, "Writer stopped with error"),
        Ok(Err(e)) => error!(error = ?e, "Writer task panicked"),
        Err(_) => info!("Writer did not stop within timeout, will be cleaned up on exit"),
    }

    if let Err(e) = alarm_handle.await {
        warn!(error = ?e, "Alarm task did not finish");
    }

    result
}

/// Log to a daily file in the data directory, or stderr when there is none.
fn init_logging() -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match Config::data_dir() {
        Ok(data_dir) => {
            let appender = tracing_appender::rolling::daily(data_dir.join("logs"), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            warn!("No data directory, logging to stderr");
            None
        }
    }
}
