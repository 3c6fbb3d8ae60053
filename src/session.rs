//! Capture sessions.
//!
//! A session diverts a host's pipeline for the duration of a test:
//!
//! 1. the configured processors are filtered through the keep/evict
//!    [`Settings`] and a [`LogCapture`] is appended as the final stage
//! 2. configuration is locked, so `configure` calls from the code under
//!    test do nothing
//! 3. when the session is dropped, including while unwinding from a failed
//!    assertion, the original pipeline is put back
//!
//! ```
//! use logcap::{fields, CaptureSession, LoggingHost, Settings};
//!
//! let host = LoggingHost::new();
//! let session = CaptureSession::builder(&host)
//!     .settings(Settings::new())
//!     .start()
//!     .unwrap();
//! host.logger().info("hello", fields! { "n" => 1 });
//! assert_eq!(session.events(), vec![session.info("hello", fields! { "n" => 1 })]);
//! ```

use std::fmt;
use std::sync::{Arc, MutexGuard, Once};
use std::thread;

use crate::capture::LogCapture;
use crate::contextvars::clear_contextvars;
use crate::error::Error;
use crate::event::{EventDict, IntoFields};
use crate::events::EventList;
use crate::host::{LoggingHost, Pipeline};
use crate::level::LevelSpec;
use crate::processor::processor_name;
use crate::report::{events_report, settings_report};
use crate::settings::{Mode, Settings};

const LEVEL_INJECTOR: &str = "add_log_level";

static SETTINGS_REPORTED: Once = Once::new();

/// Where a host is in the capture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No session
    #[default]
    Idle,
    /// Building the capturing pipeline
    Installing,
    /// Capturing events
    Capturing,
    /// Putting the original pipeline back
    Restoring,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Installing => "installing",
            SessionState::Capturing => "capturing",
            SessionState::Restoring => "restoring",
        };
        f.write_str(s)
    }
}

/// Configures and starts a [`CaptureSession`].
#[derive(Debug)]
#[must_use = "a builder does nothing until started"]
pub struct CaptureSessionBuilder<'h> {
    host: &'h LoggingHost,
    settings: Option<Settings>,
    keep: Vec<String>,
    evict: Vec<String>,
}

impl<'h> CaptureSessionBuilder<'h> {
    /// Uses `settings` instead of the process-wide settings.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Keeps these processors for this session only.
    pub fn keep<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep.extend(names.into_iter().map(Into::into));
        self
    }

    /// Evicts these processors for this session only.
    pub fn evict<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evict.extend(names.into_iter().map(Into::into));
        self
    }

    /// Installs the capturing pipeline.
    ///
    /// Blocks while another thread holds a session on the same host.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionActive`] if this thread already holds a session on
    ///   the host
    /// - [`Error::MutuallyExclusive`] if keep and evict names were both
    ///   given, here or in the loaded configuration
    /// - [`Error::Config`] if the process-wide configuration is invalid
    pub fn start(self) -> Result<CaptureSession<'h>, Error> {
        let host = self.host;
        if host.session_owner() == Some(thread::current().id()) {
            return Err(Error::SessionActive);
        }

        let mut settings = match self.settings {
            Some(settings) => settings,
            None => Settings::global()?.clone(),
        };
        if !self.keep.is_empty() {
            settings = settings.with_override(Mode::Keep, self.keep)?;
        }
        if !self.evict.is_empty() {
            settings = settings.with_override(Mode::Evict, self.evict)?;
        }

        let guard = host.lock_session();
        host.set_session_state(SessionState::Installing);

        let original = host.processors();
        report_settings(&settings, &original, &SETTINGS_REPORTED, |line| eprintln!("{line}"));

        let mut diverted: Pipeline = Vec::with_capacity(original.len() + 1);
        for processor in &original {
            let name = processor_name(processor.as_ref());
            let verdict = settings.use_processor(&name);
            tracing::debug!(processor = %name, verdict = %verdict, "filtering processor");
            if verdict.keep {
                diverted.push(processor.clone());
            }
        }
        let capture = LogCapture::with_level(settings.use_processor(LEVEL_INJECTOR).keep);
        diverted.push(Arc::new(capture.clone()));
        host.install(diverted);

        host.set_locked(true);
        clear_contextvars();
        host.set_session_state(SessionState::Capturing);
        tracing::debug!(mode = %settings.mode(), stages = original.len(), "capture started");

        Ok(CaptureSession {
            host,
            capture,
            original,
            settings,
            _guard: guard,
        })
    }
}

/// An active capture on a [`LoggingHost`].
///
/// Dropping the session restores the host's original pipeline. If the
/// thread is panicking at that point, the captured events are written to
/// standard error so they show up in the failing test's output.
#[must_use = "capture stops as soon as the session is dropped"]
pub struct CaptureSession<'h> {
    host: &'h LoggingHost,
    capture: LogCapture,
    original: Pipeline,
    settings: Settings,
    _guard: MutexGuard<'h, ()>,
}

impl<'h> CaptureSession<'h> {
    /// Returns a builder for a session on `host`.
    pub fn builder(host: &'h LoggingHost) -> CaptureSessionBuilder<'h> {
        CaptureSessionBuilder {
            host,
            settings: None,
            keep: Vec::new(),
            evict: Vec::new(),
        }
    }

    /// Returns the capturing stage.
    pub fn capture(&self) -> &LogCapture {
        &self.capture
    }

    /// Returns a snapshot of the events captured so far.
    pub fn events(&self) -> EventList {
        self.capture.events()
    }

    /// Calls `f` with the captured events without copying them.
    pub fn with_events<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EventList) -> R,
    {
        self.capture.with_events(f)
    }

    /// Returns whether any captured event has this message and these fields.
    pub fn has(&self, message: &str, fields: impl IntoFields) -> bool {
        self.capture.has(message, fields)
    }

    /// Counts captured events with this message and these fields.
    pub fn count(&self, message: &str, fields: impl IntoFields) -> usize {
        self.capture.count(message, fields)
    }

    /// Builds the event a call at `level` is expected to capture.
    pub fn log(&self, level: impl Into<LevelSpec>, event: &str, fields: impl IntoFields) -> EventDict {
        self.capture.log(level, event, fields)
    }

    /// Builds an expected debug event.
    pub fn debug(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.capture.debug(event, fields)
    }

    /// Builds an expected info event.
    pub fn info(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.capture.info(event, fields)
    }

    /// Builds an expected warning event.
    pub fn warning(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.capture.warning(event, fields)
    }

    /// Builds an expected error event.
    pub fn error(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.capture.error(event, fields)
    }

    /// Builds an expected critical event.
    pub fn critical(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.capture.critical(event, fields)
    }

    /// Installs `processors` even though configuration is locked.
    ///
    /// For tests that need a pipeline other than the filtered one. The
    /// pipeline from before the session is still what gets restored.
    pub fn original_configure(&self, processors: Pipeline) {
        tracing::debug!(stages = processors.len(), "original_configure during capture");
        self.host.install(processors);
    }

    /// Returns the settings this session filtered with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the host's session state.
    pub fn state(&self) -> SessionState {
        self.host.session_state()
    }

    /// Renders the captured events as a report section.
    pub fn report(&self) -> String {
        self.capture.with_events(events_report)
    }
}

impl fmt::Debug for CaptureSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("captured", &self.capture.len())
            .field("original_stages", &self.original.len())
            .field("mode", &self.settings.mode())
            .finish()
    }
}

impl Drop for CaptureSession<'_> {
    fn drop(&mut self) {
        self.host.set_session_state(SessionState::Restoring);
        clear_contextvars();
        if thread::panicking() {
            eprintln!("{}", self.report());
        }
        self.host.set_locked(false);
        self.host.configure(std::mem::take(&mut self.original));
        self.host.set_session_state(SessionState::Idle);
        tracing::debug!(captured = self.capture.len(), "capture finished");
    }
}

/// Writes the settings report through `write` the first time `reported`
/// is passed, if the settings ask for a report at all.
fn report_settings<W>(settings: &Settings, processors: &Pipeline, reported: &Once, mut write: W)
where
    W: FnMut(&str),
{
    if !settings.should_report() {
        return;
    }
    reported.call_once(|| {
        for line in settings_report(settings, processors, settings.verbosity()) {
            write(&line);
        }
    });
}

/// Starts a session on the process-wide host with the process-wide
/// settings.
///
/// # Errors
///
/// See [`CaptureSessionBuilder::start`].
pub fn try_capture() -> Result<CaptureSession<'static>, Error> {
    CaptureSession::builder(LoggingHost::global()).start()
}

/// Starts a session on the process-wide host.
///
/// # Panics
///
/// Panics if the session cannot start; in a test this fails the test with
/// the configuration error.
pub fn capture() -> CaptureSession<'static> {
    match try_capture() {
        Ok(session) => session,
        Err(err) => panic!("logcap: {err}"),
    }
}
