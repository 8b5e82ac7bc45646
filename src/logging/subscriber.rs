//! Tracing subscriber: console formatter, log-file layer, and initialisation.
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::logger::log_file_path;
use super::types::{DRY_RUN_TARGET, STAGE_TARGET, SUMMARY_TARGET, TaskStatus};

/// The fields of an event this crate emits: the message and, on summary
/// lines, the task status.
#[derive(Default)]
struct EventFields {
    message: String,
    status: Option<TaskStatus>,
}

impl EventFields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = TaskStatus::from_label(value),
            _ => {}
        }
    }
}

/// How an event is presented, independent of the output medium.
enum Line<'a> {
    Stage(&'a str),
    DryRun(&'a str),
    Summary(TaskStatus, &'a str),
    Plain(Level, &'a str),
}

impl<'a> Line<'a> {
    fn classify(level: Level, target: &str, fields: &'a EventFields) -> Self {
        let msg = fields.message.as_str();
        match (target, fields.status) {
            (STAGE_TARGET, _) => Self::Stage(msg),
            (DRY_RUN_TARGET, _) => Self::DryRun(msg),
            (SUMMARY_TARGET, Some(status)) => Self::Summary(status, msg),
            _ => Self::Plain(level, msg),
        }
    }

    /// Uncoloured rendering for the log file.
    fn plain(&self) -> String {
        match self {
            Self::Stage(msg) => format!("==> {msg}"),
            Self::DryRun(msg) => format!("    [dry run] {msg}"),
            Self::Summary(status, msg) => format!("    {} {msg}", status.icon()),
            Self::Plain(Level::ERROR, msg) => format!("    [error] {msg}"),
            Self::Plain(Level::WARN, msg) => format!("    [warn] {msg}"),
            Self::Plain(Level::DEBUG | Level::TRACE, msg) => format!("    [debug] {msg}"),
            Self::Plain(_, msg) => format!("    {msg}"),
        }
    }

    /// Coloured rendering for the terminal.
    fn colored(&self) -> String {
        match self {
            Self::Stage(msg) => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun(msg) => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Self::Summary(status, msg) => {
                let color = match status {
                    TaskStatus::Ok => "\x1b[32m",
                    TaskStatus::NotApplicable => "\x1b[2m",
                    TaskStatus::Skipped => "\x1b[33m",
                    TaskStatus::DryRun => "\x1b[37m",
                    TaskStatus::Failed => "\x1b[31m",
                };
                format!("  {color}{} {msg}\x1b[0m", status.icon())
            }
            Self::Plain(Level::ERROR, msg) => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Plain(Level::WARN, msg) => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Plain(Level::INFO, msg) => format!("  {msg}"),
            Self::Plain(_, msg) => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Layer appending every event to the command's log file with a local
/// timestamp.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path`, write a run header naming `command`, and return a
    /// layer appending to it. `None` if the file cannot be opened.
    pub(super) fn new(path: &Path, command: &str) -> Option<Self> {
        let version =
            option_env!("DOTFILES_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\ndotfiles {version} {command} {}\n{rule}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let fields = EventFields::of(event);
        let line = Line::classify(*metadata.level(), metadata.target(), &fields);
        let ts = chrono::Local::now().format("%H:%M:%S");
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "[{ts}] {}", line.plain()).ok();
        }
    }
}

/// Console event format.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let fields = EventFields::of(event);
        let line = Line::classify(*metadata.level(), metadata.target(), &fields);
        if writer.has_ansi_escapes() {
            writeln!(writer, "{}", line.colored())
        } else {
            writeln!(writer, "  {}", line.plain().trim_start())
        }
    }
}

/// Install the global [`tracing`] subscriber. Call once, before logging.
///
/// Warnings and errors go to stderr, everything else to stdout; debug lines
/// reach the console only when `verbose`. Every event is also appended to
/// `<cache_dir>/<command>.log`.
pub fn init_subscriber(verbose: bool, command: &str, cache_dir: &Path) {
    use std::io::IsTerminal as _;
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt as tfmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = tfmt::layer()
        .event_format(ConsoleFormat)
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = log_file_path(cache_dir, command)
        .and_then(|path| FileLayer::new(&path, command))
        .map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
