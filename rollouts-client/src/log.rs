use std::{fs::File, path::Path, sync::OnceLock};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

pub const LOG_FILE_NAME: &str = "rollouts.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logs to `<log_dir>/rollouts.log`. The terminal is owned by the tree, so
/// nothing is ever logged to stdout or stderr. Calling it twice keeps the
/// first subscriber.
pub fn setup_logger(
    log_dir: &str,
    _endpoint: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let file = File::create(Path::new(log_dir).join(LOG_FILE_NAME))?;
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(non_blocking_writer)
        .with_filter(tracing_subscriber::filter::LevelFilter::from_level(Level::INFO));

    LOG_GUARD.set(guard).ok();
    tracing_subscriber::registry().with(file_layer).try_init()?;

    Ok(())
}

/// Flushing happens when the worker guard drops at exit.
pub fn shutdown() {}
