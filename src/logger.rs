use std::error::Error as StdError;

use serde_json::Value;

use crate::event::{with_message, EventDict, IntoFields};
use crate::host::LoggingHost;
use crate::level::{level_to_name, LevelSpec};
use crate::processors::EXC_INFO_KEY;

/// A logger carrying bound context, tied to a [`LoggingHost`].
///
/// Binding returns a new logger and leaves the original untouched. Fields
/// passed at call time override bound fields of the same name.
///
/// ```
/// use logcap::{fields, LoggingHost};
///
/// let host = LoggingHost::new();
/// let log = host.named_logger("svc").bind(fields! { "request_id" => "r-1" });
/// log.info("handled", fields! { "status" => 200 });
/// ```
#[derive(Debug, Clone)]
pub struct BoundLogger<'h> {
    host: &'h LoggingHost,
    name: Option<String>,
    context: EventDict,
}

impl<'h> BoundLogger<'h> {
    pub(crate) fn new(host: &'h LoggingHost, name: Option<String>) -> Self {
        Self {
            host,
            name,
            context: EventDict::new(),
        }
    }

    /// Returns the logger name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the bound context.
    pub fn context(&self) -> &EventDict {
        &self.context
    }

    /// Returns a logger with `fields` added to the bound context.
    pub fn bind(&self, fields: impl IntoFields) -> Self {
        let mut logger = self.clone();
        logger.context.extend(fields.into_fields());
        logger
    }

    /// Returns a logger with `keys` removed from the bound context.
    pub fn unbind<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut logger = self.clone();
        for key in keys {
            logger.context.remove(key.as_ref());
        }
        logger
    }

    /// Returns a logger whose bound context is exactly `fields`.
    pub fn new_context(&self, fields: impl IntoFields) -> Self {
        Self {
            host: self.host,
            name: self.name.clone(),
            context: fields.into_fields(),
        }
    }

    /// Logs through the method called `method_name`.
    pub fn msg(&self, method_name: &str, event: &str, fields: impl IntoFields) {
        let mut merged = self.context.clone();
        merged.extend(fields.into_fields());
        self.host
            .emit(self.name.as_deref(), method_name, with_message(event, merged));
    }

    /// Logs at a level given by name or number.
    pub fn log(&self, level: impl Into<LevelSpec>, event: &str, fields: impl IntoFields) {
        let method = level_to_name(level);
        self.msg(&method, event, fields);
    }

    /// Logs at debug level.
    pub fn debug(&self, event: &str, fields: impl IntoFields) {
        self.msg("debug", event, fields);
    }

    /// Logs at info level.
    pub fn info(&self, event: &str, fields: impl IntoFields) {
        self.msg("info", event, fields);
    }

    /// Logs at warning level.
    pub fn warning(&self, event: &str, fields: impl IntoFields) {
        self.msg("warning", event, fields);
    }

    /// Logs at warning level through the `warn` alias.
    pub fn warn(&self, event: &str, fields: impl IntoFields) {
        self.msg("warn", event, fields);
    }

    /// Logs at error level.
    pub fn error(&self, event: &str, fields: impl IntoFields) {
        self.msg("error", event, fields);
    }

    /// Logs at critical level.
    pub fn critical(&self, event: &str, fields: impl IntoFields) {
        self.msg("critical", event, fields);
    }

    /// Logs an error at error level, attaching it and its causes as
    /// `exc_info`.
    pub fn exception(
        &self,
        event: &str,
        err: &(dyn StdError + 'static),
        fields: impl IntoFields,
    ) {
        let mut chain = Vec::new();
        let mut current = Some(err);
        while let Some(e) = current {
            chain.push(Value::from(e.to_string()));
            current = e.source();
        }
        let mut fields = fields.into_fields();
        fields.insert(EXC_INFO_KEY.to_string(), Value::Array(chain));
        self.msg("exception", event, fields);
    }
}

/// Returns an unnamed logger on the process-wide host.
pub fn get_logger() -> BoundLogger<'static> {
    LoggingHost::global().logger()
}

/// Returns a named logger on the process-wide host.
pub fn get_named_logger(name: impl Into<String>) -> BoundLogger<'static> {
    LoggingHost::global().named_logger(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::host::{MemoryOutput, Output};
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failure")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "division by zero")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    impl StdError for Inner {}

    fn host() -> (LoggingHost, MemoryOutput) {
        let out = MemoryOutput::new();
        (LoggingHost::with_output(Output::Memory(out.clone())), out)
    }

    #[test]
    fn bind_and_unbind_return_new_loggers() {
        let (host, _) = host();
        let base = host.logger();
        let bound = base.bind([("k", "v")]);
        assert!(base.context().is_empty());
        assert_eq!(bound.context().len(), 1);
        assert!(bound.unbind(["k"]).context().is_empty());
        assert_eq!(bound.new_context([("x", 1)]).context().len(), 1);
    }

    #[test]
    fn call_fields_override_bound_fields() {
        let (host, out) = host();
        host.logger()
            .bind(fields! { "k" => "bound", "other" => 1 })
            .info("hello", fields! { "k" => "call" });
        assert_eq!(
            out.lines(),
            vec![r#"{"event":"hello","k":"call","other":1}"#.to_string()]
        );
    }

    #[test]
    fn exception_attaches_error_chain() {
        let (host, out) = host();
        host.logger().exception("event_name", &Outer(Inner), ());
        assert_eq!(
            out.lines(),
            vec![r#"{"event":"event_name","exc_info":["outer failure","division by zero"]}"#.to_string()]
        );
    }

    #[test]
    fn named_logger_keeps_name() {
        let (host, _) = host();
        assert_eq!(host.named_logger("svc").bind(()).name(), Some("svc"));
        assert_eq!(host.logger().name(), None);
    }
}
