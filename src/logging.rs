use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const FALLBACK_FILTER: &str = "mediation=info";

/// Keeps the non-blocking file writer alive. Dropping it flushes pending lines.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// `RUST_LOG` wins; otherwise the configured directives, then the crate default.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
    })
}

/// Installs the global subscriber. Returns `None` if the log directory cannot
/// be created or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Option<LoggingGuard> {
    let log_dir = config
        .ensure_log_dir()
        .or_else(|_| -> std::io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("mediation").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, &config.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = config.stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(stderr_layer);

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
