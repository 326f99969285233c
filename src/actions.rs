//! Reporting back to the CI runner
//!
//! Log lines become workflow commands (`::error::`, `::warning::`,
//! `::debug::`) so the runner annotates them, and step outputs go to the
//! file named by `GITHUB_OUTPUT`.

use crate::error::{Error, Result};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use tracing::{Event, Level, Subscriber, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Environment variable naming the step output file
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Set by the runner when debug logging is enabled for a re-run
pub const RUNNER_DEBUG_ENV: &str = "RUNNER_DEBUG";

/// Escape a workflow command value.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Workflow command for a log level, `None` for plain lines
pub const fn command_for(level: Level) -> Option<&'static str> {
    match level {
        Level::ERROR => Some("error"),
        Level::WARN => Some("warning"),
        Level::INFO => None,
        Level::DEBUG | Level::TRACE => Some("debug"),
    }
}

/// Formats each event as a single workflow command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowCommandFormat;

impl<S, N> FormatEvent<S, N> for WorkflowCommandFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut line = String::new();
        ctx.format_fields(Writer::new(&mut line), event)?;

        match command_for(*event.metadata().level()) {
            Some(command) => writeln!(writer, "::{command}::{}", escape_data(&line)),
            None => writeln!(writer, "{line}"),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `debug` when
/// `debug` is true and `info` when not, and dependencies at `warn`.
pub fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={level},warn", env!("CARGO_CRATE_NAME"))));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .event_format(WorkflowCommandFormat)
        .try_init();
}

/// Whether the runner asked for debug logs
pub fn runner_debug_enabled() -> bool {
    std::env::var(RUNNER_DEBUG_ENV).is_ok_and(|v| v == "1")
}

/// Append `name=value` to an output file.
pub fn write_output(path: &Path, name: &str, value: &str) -> Result<()> {
    if value.contains('\n') || value.contains('\r') {
        return Err(Error::Config(format!(
            "output '{name}' must be a single line"
        )));
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{name}={value}")?;
    Ok(())
}

/// Set a step output, if the runner provides an output file.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match std::env::var_os(OUTPUT_FILE_ENV) {
        Some(path) => write_output(Path::new(&path), name, value),
        None => {
            debug!(name, value, "no output file, skipping step output");
            Ok(())
        }
    }
}

/// Join PR numbers for a step output
pub fn join_numbers(numbers: &[u64]) -> String {
    let mut out = String::new();
    for (i, n) in numbers.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{n}");
    }
    out
}
