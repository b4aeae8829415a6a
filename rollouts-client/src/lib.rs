//! Tree view of Argo Rollouts resources for the terminal.
//!
//! A [`watch::TreeSource`] produces a [`tree::ResourceNode`] snapshot, the
//! [`tree::TreeRenderer`] turns it into an aligned, colorized table, and the
//! [`watch::WatchLoop`] repeats that on an interval when watching.

use std::backtrace::Backtrace;
use std::panic;

use tracing::error;

cfg_if::cfg_if! {
    if #[cfg(feature = "telemetry")] {
        use rollouts_telemetry as logging;
    } else {
        mod log;
        use log as logging;
    }
}

pub mod ansi;
pub mod cmd;
pub mod colors;
pub mod completion;
pub mod errors;
pub mod processors;
pub mod resources;
pub mod structs;
pub mod table_format;
pub mod tree;
pub mod utils;
pub mod watch;

pub use completion::{NameCompleter, NameLister, ShellCompDirective};
pub use errors::{CompletionError, FetchError, WatchError};
pub use structs::{ParentKind, RenderOptions};
pub use tree::{render, ResourceNode, TreeRenderer};
pub use watch::{TreeSource, WatchExit, WatchLoop};

/// Sends logs to `log_dir`, plus traces to `endpoint` when built with the
/// `telemetry` feature.
pub fn setup_logger(
    log_dir: &str,
    endpoint: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::setup_logger(log_dir, endpoint)
}

pub fn shutdown_logger() {
    logging::shutdown();
}

/// Logs panics with a backtrace before the default hook runs, so crashes
/// in watch mode leave a trace in the log file.
pub fn install_panic_hook() {
    let default = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let bt = Backtrace::force_capture();
        error!(target: "panic", "panic: {panic_info}\n\nBacktrace:\n{bt}");
        default(panic_info);
    }));
}
