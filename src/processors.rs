//! Built-in processors.
//!
//! These cover the stages a typical pipeline is assembled from. Their names
//! are what the default keep and evict lists refer to:
//!
//! | processor | name | default |
//! |---|---|---|
//! | [`AddLogLevel`] | `add_log_level` | kept |
//! | [`PositionalArgumentsFormatter`] | `PositionalArgumentsFormatter` | kept |
//! | [`ExceptionRenderer`] | `ExceptionRenderer` | kept |
//! | [`MergeContextvars`] | `merge_contextvars` | kept |
//! | [`FilterByLevel`] | `filter_by_level` | evicted |
//! | [`TimeStamper`] | `TimeStamper` | evicted |
//! | [`ConsoleRenderer`] | `ConsoleRenderer` | evicted |
//! | [`JsonRenderer`] | `JsonRenderer` | evicted |
//! | [`TracingForwarder`] | `TracingForwarder` | evicted |
//! | [`AddLoggerName`] | `add_logger_name` | neither |

use std::fmt::Write as _;

use chrono::{Local, SecondsFormat, Utc};
use serde_json::Value;

use crate::contextvars::get_contextvars;
use crate::event::{EventDict, EVENT_KEY, LEVEL_KEY};
use crate::level::{normalize_method_name, Level};
use crate::processor::{LoggerInfo, Processor, Step};

/// Target used for records handed to `tracing` by [`TracingForwarder`].
pub const FORWARD_TARGET: &str = "logcap::forward";

/// Key holding positional formatting arguments.
pub const POSITIONAL_ARGS_KEY: &str = "positional_args";

/// Key holding error details attached by `exception` calls.
pub const EXC_INFO_KEY: &str = "exc_info";

/// Sets `level` from the method name, folding `exception` into `error` and
/// `warn` into `warning`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLogLevel;

impl Processor for AddLogLevel {
    fn name(&self) -> String {
        "add_log_level".to_string()
    }

    fn process(&self, _logger: &LoggerInfo<'_>, method_name: &str, mut event: EventDict) -> Step {
        set_level(&mut event, method_name);
        Step::Continue(event)
    }
}

/// Inserts the normalized level name for `method_name` into `event`.
pub(crate) fn set_level(event: &mut EventDict, method_name: &str) {
    event.insert(LEVEL_KEY.to_string(), Value::from(method_level(method_name)));
}

/// Lowercases `method_name` and folds aliases, so `"Warn"` records as
/// `"warning"`.
pub(crate) fn method_level(method_name: &str) -> String {
    normalize_method_name(&method_name.to_ascii_lowercase()).to_string()
}

/// Sets `logger` to the emitting logger's name, when it has one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLoggerName;

impl Processor for AddLoggerName {
    fn name(&self) -> String {
        "add_logger_name".to_string()
    }

    fn process(&self, logger: &LoggerInfo<'_>, _method_name: &str, mut event: EventDict) -> Step {
        if let Some(name) = logger.name() {
            event.insert("logger".to_string(), Value::from(name));
        }
        Step::Continue(event)
    }
}

/// Merges the thread's ambient context into the event.
///
/// Context fields come first; fields already on the event win.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeContextvars;

impl Processor for MergeContextvars {
    fn name(&self) -> String {
        "merge_contextvars".to_string()
    }

    fn process(&self, _logger: &LoggerInfo<'_>, _method_name: &str, event: EventDict) -> Step {
        let mut merged = get_contextvars();
        merged.extend(event);
        Step::Continue(merged)
    }
}

/// Drops events below a minimum level.
///
/// Method names that do not map to a level are let through.
#[derive(Debug, Clone, Copy)]
pub struct FilterByLevel {
    min: Level,
}

impl FilterByLevel {
    /// Creates a filter that drops everything below `min`.
    pub fn new(min: Level) -> Self {
        Self { min }
    }
}

impl Processor for FilterByLevel {
    fn name(&self) -> String {
        "filter_by_level".to_string()
    }

    fn process(&self, _logger: &LoggerInfo<'_>, method_name: &str, event: EventDict) -> Step {
        match Level::from_method_name(method_name) {
            Some(level) if level < self.min => Step::Drop,
            _ => Step::Continue(event),
        }
    }
}

/// Timestamp representation used by [`TimeStamper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormat {
    /// RFC 3339 with microseconds
    Iso,
    /// Seconds since the Unix epoch, as a float
    Unix,
    /// A `chrono` strftime pattern
    Custom(String),
}

/// Adds the current time to every event.
#[derive(Debug, Clone)]
pub struct TimeStamper {
    format: TimestampFormat,
    utc: bool,
    key: String,
}

impl TimeStamper {
    /// Creates a stamper writing UTC timestamps in `format` under `timestamp`.
    pub fn new(format: TimestampFormat) -> Self {
        Self {
            format,
            utc: true,
            key: "timestamp".to_string(),
        }
    }

    /// Uses local time instead of UTC.
    pub fn local(mut self) -> Self {
        self.utc = false;
        self
    }

    /// Writes the timestamp under `key`.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    fn stamp(&self) -> Value {
        match (&self.format, self.utc) {
            (TimestampFormat::Iso, true) => {
                Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            (TimestampFormat::Iso, false) => {
                Value::from(Local::now().to_rfc3339_opts(SecondsFormat::Micros, false))
            }
            (TimestampFormat::Unix, _) => {
                let now = Utc::now();
                let secs =
                    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6;
                Value::from(secs)
            }
            (TimestampFormat::Custom(pattern), true) => {
                Value::from(Utc::now().format(pattern).to_string())
            }
            (TimestampFormat::Custom(pattern), false) => {
                Value::from(Local::now().format(pattern).to_string())
            }
        }
    }
}

impl Default for TimeStamper {
    fn default() -> Self {
        Self::new(TimestampFormat::Iso)
    }
}

impl Processor for TimeStamper {
    fn process(&self, _logger: &LoggerInfo<'_>, _method_name: &str, mut event: EventDict) -> Step {
        event.insert(self.key.clone(), self.stamp());
        Step::Continue(event)
    }
}

/// Applies `%`-style positional arguments to the event message.
///
/// Arguments are read from `positional_args` (a JSON array). Supported
/// conversions are `%s`, `%d`, `%i`, `%r`, `%f` with an optional precision
/// (`%.2f`), and `%%`. Placeholders without a matching argument are left as
/// they are.
#[derive(Debug, Clone, Copy)]
pub struct PositionalArgumentsFormatter {
    remove_positional_args: bool,
}

impl PositionalArgumentsFormatter {
    /// Creates a formatter that removes `positional_args` once applied.
    pub fn new() -> Self {
        Self {
            remove_positional_args: true,
        }
    }

    /// Keeps `positional_args` on the event after formatting.
    pub fn keep_positional_args(mut self) -> Self {
        self.remove_positional_args = false;
        self
    }
}

impl Default for PositionalArgumentsFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for PositionalArgumentsFormatter {
    fn process(&self, _logger: &LoggerInfo<'_>, _method_name: &str, mut event: EventDict) -> Step {
        let args = match event.get(POSITIONAL_ARGS_KEY) {
            Some(Value::Array(args)) if !args.is_empty() => args.clone(),
            _ => return Step::Continue(event),
        };
        if let Some(Value::String(message)) = event.get(EVENT_KEY) {
            let formatted = percent_format(message, &args);
            event.insert(EVENT_KEY.to_string(), Value::from(formatted));
        }
        if self.remove_positional_args {
            event.remove(POSITIONAL_ARGS_KEY);
        }
        Step::Continue(event)
    }
}

fn percent_format(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut spec = String::from("%");
        let mut precision = None;
        if chars.peek() == Some(&'.') {
            spec.push('.');
            chars.next();
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            spec.push_str(&digits);
            precision = digits.parse::<usize>().ok();
        }
        let Some(conv) = chars.next() else {
            out.push_str(&spec);
            break;
        };
        if conv == '%' && precision.is_none() {
            out.push('%');
            continue;
        }
        spec.push(conv);
        let rendered = match conv {
            's' | 'd' | 'i' | 'r' | 'f' => args.next().and_then(|arg| convert(conv, precision, arg)),
            _ => None,
        };
        out.push_str(rendered.as_deref().unwrap_or(&spec));
    }
    out
}

fn convert(conv: char, precision: Option<usize>, arg: &Value) -> Option<String> {
    match conv {
        's' => Some(match arg {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        'r' => Some(arg.to_string()),
        'd' | 'i' => arg
            .as_i64()
            .or_else(|| arg.as_f64().map(|f| f.trunc() as i64))
            .map(|n| n.to_string()),
        'f' => arg
            .as_f64()
            .map(|f| format!("{:.*}", precision.unwrap_or(6), f)),
        _ => None,
    }
}

/// Renders error details attached by `exception` calls.
///
/// Takes `exc_info` off the event and stores a readable `exception` string.
/// An array of messages is treated as an error followed by its causes. A
/// boolean `exc_info` carries no details and is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionRenderer;

impl Processor for ExceptionRenderer {
    fn process(&self, _logger: &LoggerInfo<'_>, _method_name: &str, mut event: EventDict) -> Step {
        let rendered = match event.get(EXC_INFO_KEY) {
            Some(Value::Array(chain)) => Some(render_chain(chain)),
            Some(Value::String(message)) => Some(message.clone()),
            _ => None,
        };
        if let Some(rendered) = rendered {
            event.remove(EXC_INFO_KEY);
            event.insert("exception".to_string(), Value::from(rendered));
        }
        Step::Continue(event)
    }
}

fn render_chain(chain: &[Value]) -> String {
    let mut out = String::new();
    for (i, link) in chain.iter().enumerate() {
        let text = match link {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if i == 0 {
            out.push_str(&text);
        } else {
            let _ = write!(out, "\nCaused by: {text}");
        }
    }
    out
}

/// Serializes the event to a single JSON line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    sort_keys: bool,
}

impl JsonRenderer {
    /// Creates a renderer keeping field order.
    pub fn new() -> Self {
        Self { sort_keys: false }
    }

    /// Sorts keys alphabetically in the output.
    pub fn sorted(mut self) -> Self {
        self.sort_keys = true;
        self
    }
}

impl Processor for JsonRenderer {
    fn process(&self, _logger: &LoggerInfo<'_>, _method_name: &str, mut event: EventDict) -> Step {
        if self.sort_keys {
            event.sort_keys();
        }
        Step::Render(Value::Object(event).to_string())
    }
}

/// Renders the event as a human-readable console line:
/// `timestamp [level] message key=value ...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer;

impl Processor for ConsoleRenderer {
    fn process(&self, _logger: &LoggerInfo<'_>, method_name: &str, mut event: EventDict) -> Step {
        let mut line = String::new();
        if let Some(ts) = event.remove("timestamp") {
            let _ = write!(line, "{} ", plain(&ts));
        }
        let level = event
            .remove(LEVEL_KEY)
            .map(|l| plain(&l))
            .unwrap_or_else(|| method_level(method_name));
        let _ = write!(line, "[{level:<8}] ");
        if let Some(message) = event.remove(EVENT_KEY) {
            line.push_str(&plain(&message));
        }
        for (key, value) in &event {
            let _ = write!(line, " {key}={value}");
        }
        Step::Render(line.trim_end().to_string())
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Hands events to `tracing` instead of the logging host's own output.
///
/// The record is emitted with target [`FORWARD_TARGET`], the message as the
/// `tracing` message and the remaining fields as one JSON string. The
/// pipeline ends here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingForwarder;

impl Processor for TracingForwarder {
    fn process(&self, logger: &LoggerInfo<'_>, method_name: &str, mut event: EventDict) -> Step {
        let message = event.remove(EVENT_KEY).map(|m| plain(&m)).unwrap_or_default();
        let fields = Value::Object(event).to_string();
        let logger = logger.name().unwrap_or("");

        macro_rules! forward {
            ($level:expr) => {
                tracing::event!(
                    target: FORWARD_TARGET,
                    $level,
                    logger = logger,
                    fields = %fields,
                    "{}",
                    message
                )
            };
        }

        match Level::from_method_name(method_name) {
            Some(Level::Debug) | Some(Level::NotSet) => forward!(tracing::Level::DEBUG),
            Some(Level::Warning) => forward!(tracing::Level::WARN),
            Some(Level::Error) | Some(Level::Critical) => forward!(tracing::Level::ERROR),
            Some(Level::Info) | None => forward!(tracing::Level::INFO),
        }
        Step::Drop
    }
}
