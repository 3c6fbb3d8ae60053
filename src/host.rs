//! The logging host: the live processor pipeline and where its output goes.
//!
//! Application code logs through a [`BoundLogger`] tied to a host. The
//! host runs each event through its configured processors in order and
//! writes whatever survives to its [`Output`]. A capture session swaps the
//! pipeline for the duration of a test and locks [`LoggingHost::configure`]
//! so that code under test cannot replace it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use serde_json::Value;

use crate::event::EventDict;
use crate::logger::BoundLogger;
use crate::processor::{processor_name, LoggerInfo, Processor, Step};
use crate::session::SessionState;

/// A shared, ordered list of pipeline stages.
pub type Pipeline = Vec<Arc<dyn Processor>>;

/// Where lines leaving the pipeline are written.
#[derive(Debug, Clone, Default)]
pub enum Output {
    /// Standard error, through the test harness's output capture
    #[default]
    Stderr,
    /// An in-memory buffer
    Memory(MemoryOutput),
    /// Nowhere
    Discard,
}

/// In-memory output buffer, cloneable so a test can keep a handle on it.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryOutput {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the lines written so far.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    /// Returns whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        lock(&self.lines).is_empty()
    }

    fn push(&self, line: String) {
        lock(&self.lines).push(line);
    }
}

#[derive(Debug, Clone, Copy)]
struct SessionSlot {
    state: SessionState,
    owner: Option<ThreadId>,
}

/// The live log-processing pipeline.
pub struct LoggingHost {
    processors: RwLock<Pipeline>,
    configured: AtomicBool,
    locked: AtomicBool,
    output: Output,
    session_lock: Mutex<()>,
    session: Mutex<SessionSlot>,
}

impl LoggingHost {
    /// Creates an unconfigured host writing to standard error.
    pub fn new() -> Self {
        Self::with_output(Output::Stderr)
    }

    /// Creates an unconfigured host writing to `output`.
    pub fn with_output(output: Output) -> Self {
        Self {
            processors: RwLock::new(Vec::new()),
            configured: AtomicBool::new(false),
            locked: AtomicBool::new(false),
            output,
            session_lock: Mutex::new(()),
            session: Mutex::new(SessionSlot {
                state: SessionState::Idle,
                owner: None,
            }),
        }
    }

    /// Returns the process-wide host used by [`get_logger`](crate::get_logger)
    /// and [`capture`](crate::capture).
    pub fn global() -> &'static LoggingHost {
        static GLOBAL: OnceLock<LoggingHost> = OnceLock::new();
        GLOBAL.get_or_init(LoggingHost::new)
    }

    /// Returns a snapshot of the configured processors, in order.
    pub fn processors(&self) -> Pipeline {
        self.processors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the names of the configured processors, in order.
    pub fn processor_names(&self) -> Vec<String> {
        self.processors()
            .iter()
            .map(|p| processor_name(p.as_ref()))
            .collect()
    }

    /// Installs a new pipeline.
    ///
    /// While a capture session is active this does nothing, so code under
    /// test cannot displace the capturing pipeline.
    pub fn configure(&self, processors: Pipeline) {
        if self.is_locked() {
            tracing::debug!(
                stages = processors.len(),
                "ignoring configure call during capture"
            );
            return;
        }
        self.install(processors);
    }

    /// Installs a pipeline only if the host has never been configured.
    ///
    /// Like [`configure`](Self::configure), this does nothing during capture.
    pub fn configure_once(&self, processors: Pipeline) {
        if self.is_locked() {
            tracing::debug!("ignoring configure_once call during capture");
            return;
        }
        if self.is_configured() {
            tracing::debug!("host already configured; configure_once ignored");
            return;
        }
        self.install(processors);
    }

    /// Returns whether a pipeline has ever been installed.
    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    /// Returns whether configuration is locked by a capture session.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// Returns the state of this host's capture session.
    pub fn session_state(&self) -> SessionState {
        lock(&self.session).state
    }

    /// Returns a logger without a name.
    pub fn logger(&self) -> BoundLogger<'_> {
        BoundLogger::new(self, None)
    }

    /// Returns a logger with the given name.
    pub fn named_logger(&self, name: impl Into<String>) -> BoundLogger<'_> {
        BoundLogger::new(self, Some(name.into()))
    }

    /// Runs one event through the pipeline.
    pub fn emit(&self, logger_name: Option<&str>, method_name: &str, event: EventDict) {
        let processors = self.processors();
        let logger = LoggerInfo::new(logger_name);
        let mut event = event;
        for processor in &processors {
            match processor.process(&logger, method_name, event) {
                Step::Continue(next) => event = next,
                Step::Render(line) => {
                    self.write(line);
                    return;
                }
                Step::Drop => return,
            }
        }
        self.write(Value::Object(event).to_string());
    }

    fn write(&self, line: String) {
        match &self.output {
            Output::Stderr => eprintln!("{line}"),
            Output::Memory(buffer) => buffer.push(line),
            Output::Discard => {}
        }
    }

    /// Installs `processors` regardless of the configuration lock.
    pub(crate) fn install(&self, processors: Pipeline) {
        *self
            .processors
            .write()
            .unwrap_or_else(PoisonError::into_inner) = processors;
        self.configured.store(true, Ordering::SeqCst);
    }

    pub(crate) fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    /// Serializes capture sessions on this host.
    ///
    /// A test that panics while holding the lock poisons it; the next
    /// session takes it over, since teardown already restored the host.
    pub(crate) fn lock_session(&self) -> MutexGuard<'_, ()> {
        lock(&self.session_lock)
    }

    pub(crate) fn session_owner(&self) -> Option<ThreadId> {
        lock(&self.session).owner
    }

    pub(crate) fn set_session_state(&self, state: SessionState) {
        let mut slot = lock(&self.session);
        slot.state = state;
        slot.owner = match state {
            SessionState::Idle => None,
            _ => Some(thread::current().id()),
        };
    }
}

impl fmt::Debug for LoggingHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingHost")
            .field("processors", &self.processor_names())
            .field("locked", &self.is_locked())
            .field("output", &self.output)
            .field("session", &self.session_state())
            .finish()
    }
}

impl Default for LoggingHost {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::processor::processor_fn;
    use crate::processors::{AddLogLevel, JsonRenderer};

    fn memory_host() -> (LoggingHost, MemoryOutput) {
        let out = MemoryOutput::new();
        (LoggingHost::with_output(Output::Memory(out.clone())), out)
    }

    #[test]
    fn unconfigured_host_writes_raw_event() {
        let (host, out) = memory_host();
        host.emit(None, "info", fields! { "event" => "hi" });
        assert_eq!(out.lines(), vec![r#"{"event":"hi"}"#.to_string()]);
        assert!(!host.is_configured());
    }

    #[test]
    fn processors_run_in_order_until_render() {
        let (host, out) = memory_host();
        let never = processor_fn("never", |_, _, _| panic!("stage after renderer ran"));
        host.configure(vec![
            Arc::new(AddLogLevel),
            Arc::new(JsonRenderer::new()),
            Arc::new(never),
        ]);
        host.emit(None, "warn", fields! { "event" => "hi" });
        assert_eq!(out.lines(), vec![r#"{"event":"hi","level":"warning"}"#.to_string()]);
    }

    #[test]
    fn dropped_events_are_not_written() {
        let (host, out) = memory_host();
        host.configure(vec![Arc::new(processor_fn("drop_all", |_, _, _| Step::Drop))]);
        host.emit(None, "info", fields! { "event" => "hi" });
        assert!(out.is_empty());
    }

    #[test]
    fn locked_host_ignores_configure() {
        let host = LoggingHost::with_output(Output::Discard);
        host.configure(vec![Arc::new(AddLogLevel)]);
        host.set_locked(true);
        host.configure(Vec::new());
        host.configure_once(Vec::new());
        assert_eq!(host.processor_names(), vec!["add_log_level"]);

        host.set_locked(false);
        host.configure(Vec::new());
        assert!(host.processors().is_empty());
    }

    #[test]
    fn configure_once_only_configures_once() {
        let host = LoggingHost::with_output(Output::Discard);
        host.configure_once(vec![Arc::new(AddLogLevel)]);
        host.configure_once(Vec::new());
        assert_eq!(host.processor_names(), vec!["add_log_level"]);
    }

    #[test]
    fn session_state_tracks_owner() {
        let host = LoggingHost::with_output(Output::Discard);
        assert_eq!(host.session_state(), SessionState::Idle);
        host.set_session_state(SessionState::Capturing);
        assert_eq!(host.session_owner(), Some(thread::current().id()));
        host.set_session_state(SessionState::Idle);
        assert_eq!(host.session_owner(), None);
    }
}
