use std::fmt::{self as stdfmt, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use dp_config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

// ---------------------------------------------------------------------------
// DomainFormat — plain-text line layout
// ---------------------------------------------------------------------------

/// Plain-text formatter. The `domain` field becomes a fixed-width column and
/// the `filter` id (set on every diagnostics record) a bracketed prefix:
///
/// ```text
/// 2026-10-18T09:12:44.120Z ERROR pipe [dateparts] DateParts filter error: ... kind="unresolvable_time_field"
/// 2026-10-18T09:12:44.121Z  INFO sys  pipeline finished events=1200 failed=3
/// ```
///
/// Records without a domain (`log` records bridged from `dp-core`) leave the
/// column as `-`. Span context is not rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainFormat;

impl DomainFormat {
    pub fn new() -> Self {
        Self
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "31",
        Level::WARN => "33",
        Level::INFO => "32",
        Level::DEBUG => "34",
        Level::TRACE => "35",
    }
}

impl<S, N> FormatEvent<S, N> for DomainFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> fmt::FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        let mut line = LineFields::default();
        event.record(&mut line);

        let level = *event.metadata().level();
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        if writer.has_ansi_escapes() {
            write!(writer, "{ts} \x1b[{}m{level:>5}\x1b[0m ", level_color(level))?;
        } else {
            write!(writer, "{ts} {level:>5} ")?;
        }
        writeln!(writer, "{}", line.render())
    }
}

// ---------------------------------------------------------------------------
// LineFields — collects one record's fields
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct LineFields {
    domain: Option<String>,
    filter: Option<String>,
    message: String,
    rest: Vec<(&'static str, String)>,
}

impl LineFields {
    fn put(&mut self, name: &'static str, text: String) {
        match name {
            "domain" => self.domain = Some(text),
            "filter" => self.filter = Some(text),
            "message" => self.message = text,
            _ => self.rest.push((name, text)),
        }
    }

    /// Everything after the level column.
    fn render(&self) -> String {
        let mut out = format!("{:<4} ", self.domain.as_deref().unwrap_or("-"));
        if let Some(filter) = &self.filter {
            write!(out, "[{filter}] ").ok();
        }
        out.push_str(&self.message);
        for (name, value) in &self.rest {
            write!(out, " {name}={value}").ok();
        }
        out
    }
}

impl Visit for LineFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            name @ ("domain" | "filter" | "message") => self.put(name, value.to_string()),
            name => self.put(name, format!("{value:?}")),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn stdfmt::Debug) {
        self.put(field.name(), format!("{value:?}"));
    }
}

// ---------------------------------------------------------------------------
// Layer construction
// ---------------------------------------------------------------------------

/// `RUST_LOG` wins over the configured level and module overrides.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if std::env::var("RUST_LOG").is_ok() {
        return Ok(EnvFilter::from_default_env());
    }
    let directives = config.directives();
    EnvFilter::try_new(&directives)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{directives}': {e}"))
}

/// Relative log paths resolve against the config file's directory.
pub fn resolve_log_path(file: &Path, base_dir: &Path) -> PathBuf {
    if file.is_relative() {
        base_dir.join(file)
    } else {
        file.to_path_buf()
    }
}

fn stderr_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Plain => fmt::layer()
            .event_format(DomainFormat::new())
            .with_writer(std::io::stderr)
            .boxed(),
    }
}

fn file_layer(format: LogFormat, writer: NonBlocking) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Plain => fmt::layer()
            .event_format(DomainFormat::new())
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Install the global `tracing` subscriber described by [`LoggingConfig`].
///
/// Returns the file writer's [`WorkerGuard`] when a log file is configured;
/// hold it until exit so buffered lines are flushed. `log` records (the
/// core's diagnostics) are bridged by `tracing-subscriber`.
pub fn init_tracing(config: &LoggingConfig, base_dir: &Path) -> Result<Option<WorkerGuard>> {
    let filter = build_env_filter(config)?;

    let mut layers: Vec<BoxedLayer> = vec![stderr_layer(config.format)];
    let mut guard = None;

    if let Some(file) = &config.file {
        let resolved = resolve_log_path(file, base_dir);
        let dir = resolved
            .parent()
            .ok_or_else(|| anyhow::anyhow!("log file path has no parent directory"))?;
        std::fs::create_dir_all(dir)?;
        let file_name = resolved
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("log file path has no file name"))?;

        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        layers.push(file_layer(config.format, writer));
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers.with_filter(filter))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
