//! Console and log-file output, plus the per-run task summary.

mod logger;
mod subscriber;
mod types;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{DRY_RUN_TARGET, Log, STAGE_TARGET, SUMMARY_TARGET, TaskEntry, TaskStatus};

/// Logger whose log file lives in a fresh temporary directory, with a
/// thread-local subscriber writing to that file so tests can read back what
/// was logged. Keep the returned guard alive for the whole test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let log = Logger::new("test", tmp.path());
    let path = log.log_path().expect("log path").clone();
    let file_layer = subscriber::FileLayer::new(&path, "test").expect("failed to create file layer");
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}
