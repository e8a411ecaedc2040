use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

fn env_filter(debug: bool) -> EnvFilter {
    // When debug logging is disabled we force `info` level regardless of the
    // `RUST_LOG` environment variable.
    let level = if debug { "debug" } else { "info" };
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    }
}

/// Builds the subscriber without installing it. The returned guard must be
/// kept alive for file output to be flushed.
pub fn subscriber(
    debug: bool,
    log_file: Option<&Path>,
) -> Result<(impl tracing::Subscriber + Send + Sync, Option<WorkerGuard>)> {
    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log folder {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        // stdout carries the operator console and stdin the wire protocol
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_ansi(log_file.is_none())
        .with_writer(writer)
        .finish();
    Ok((subscriber, guard))
}

/// Initialise logging. The default level is `info`; `debug` enables debug
/// output which `RUST_LOG` can then refine.
pub fn init(debug: bool, log_file: Option<&Path>) {
    let (subscriber, guard) = match subscriber(debug, log_file) {
        Ok(built) => built,
        Err(err) => {
            eprintln!("log file unavailable, logging to stderr: {err:#}");
            match subscriber(debug, None) {
                Ok(built) => built,
                Err(_) => return,
            }
        }
    };
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        if let Some(guard) = guard {
            let _ = FILE_GUARD.set(guard);
        }
    }
}
