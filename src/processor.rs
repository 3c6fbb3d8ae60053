//! Pipeline stages and their stable names.
//!
//! A [`Processor`] receives every event in turn, may rewrite it, and decides
//! what happens next through the [`Step`] it returns. Each processor has a
//! stable name; keep/evict decisions are made by name, so the name must not
//! depend on where or how the processor was constructed.

use std::any::type_name;
use std::fmt;

use crate::event::EventDict;

/// What the logger that emitted an event looks like to a processor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerInfo<'a> {
    name: Option<&'a str>,
}

impl<'a> LoggerInfo<'a> {
    /// Creates logger info for a logger with the given name.
    pub fn new(name: Option<&'a str>) -> Self {
        Self { name }
    }

    /// Returns the logger name, if the logger has one.
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }
}

/// Result of running one processor on one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Hand the (possibly rewritten) event to the next processor.
    Continue(EventDict),
    /// The event was rendered to text; stop and write the line to the output.
    Render(String),
    /// Stop processing this event. Nothing is written.
    Drop,
}

/// One stage of the log-processing pipeline.
///
/// The default [`name`](Processor::name) is the implementing type's short
/// name (`TimeStamper`, not `logcap::processors::TimeStamper`). Function-like
/// processors built with [`processor_fn`] report the name they were
/// registered under instead.
pub trait Processor: Send + Sync {
    /// Returns the stable name used for keep/evict decisions.
    fn name(&self) -> String {
        short_type_name(type_name::<Self>()).to_string()
    }

    /// Processes one event emitted through `method_name` (`"info"`,
    /// `"exception"`, ...).
    fn process(&self, logger: &LoggerInfo<'_>, method_name: &str, event: EventDict) -> Step;
}

/// Returns the stable name of a processor.
pub fn processor_name(processor: &dyn Processor) -> String {
    processor.name()
}

/// Strips module paths and generic arguments from a type name.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A processor backed by a plain function or closure, registered under an
/// explicit name.
pub struct FnProcessor<F> {
    name: String,
    func: F,
}

impl<F> fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor").field("name", &self.name).finish()
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(&LoggerInfo<'_>, &str, EventDict) -> Step + Send + Sync,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn process(&self, logger: &LoggerInfo<'_>, method_name: &str, event: EventDict) -> Step {
        (self.func)(logger, method_name, event)
    }
}

/// Registers a function as a processor under `name`.
///
/// # Examples
///
/// ```
/// use logcap::{processor_fn, Processor, Step};
///
/// let nerf = processor_fn("password_nerf", |_logger, _method, mut event| {
///     event.remove("password");
///     Step::Continue(event)
/// });
/// assert_eq!(nerf.name(), "password_nerf");
/// ```
pub fn processor_fn<F>(name: impl Into<String>, func: F) -> FnProcessor<F>
where
    F: Fn(&LoggerInfo<'_>, &str, EventDict) -> Step + Send + Sync,
{
    FnProcessor {
        name: name.into(),
        func,
    }
}

/// Registers a method-like function as a processor named `Owner.method`.
pub fn processor_method<F>(owner: &str, method: &str, func: F) -> FnProcessor<F>
where
    F: Fn(&LoggerInfo<'_>, &str, EventDict) -> Step + Send + Sync,
{
    processor_fn(format!("{owner}.{method}"), func)
}

/// A processor with some fields applied ahead of time.
///
/// The bound fields are added to each event (without overwriting fields the
/// event already has) before the wrapped processor runs. For keep/evict
/// purposes a `Partial` is named after the processor it wraps, never after
/// itself.
#[derive(Debug)]
pub struct Partial<P> {
    inner: P,
    bound: EventDict,
}

impl<P: Processor> Partial<P> {
    /// Wraps `inner`, pre-applying `bound` to every event.
    pub fn new(inner: P, bound: EventDict) -> Self {
        Self { inner, bound }
    }

    /// Returns the wrapped processor.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Processor> Processor for Partial<P> {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn process(&self, logger: &LoggerInfo<'_>, method_name: &str, mut event: EventDict) -> Step {
        for (key, value) in &self.bound {
            if !event.contains_key(key) {
                event.insert(key.clone(), value.clone());
            }
        }
        self.inner.process(logger, method_name, event)
    }
}
