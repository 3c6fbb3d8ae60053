use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::event::{with_message, EventDict, IntoFields, LEVEL_KEY};
use crate::events::EventList;
use crate::level::{level_to_name, LevelSpec};
use crate::processor::{LoggerInfo, Processor, Step};
use crate::processors::set_level;

/// The terminal pipeline stage of a capture session.
///
/// Every event reaching it is recorded and then dropped, so nothing
/// downstream renders or writes it. Clones share the same recording.
#[derive(Debug, Clone)]
pub struct LogCapture {
    events: Arc<Mutex<EventList>>,
    add_level: bool,
}

impl LogCapture {
    /// Creates an empty capture that stamps `level` on each event.
    pub fn new() -> Self {
        Self::with_level(true)
    }

    /// Creates an empty capture; `add_level` controls whether `level` is
    /// stamped from the method name.
    pub fn with_level(add_level: bool) -> Self {
        Self {
            events: Arc::new(Mutex::new(EventList::new())),
            add_level,
        }
    }

    fn lock(&self) -> MutexGuard<'_, EventList> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of the events captured so far.
    pub fn events(&self) -> EventList {
        self.lock().clone()
    }

    /// Calls `f` with the captured events without copying them.
    pub fn with_events<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EventList) -> R,
    {
        f(&self.lock())
    }

    /// Returns the number of captured events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns whether any captured event has this message and these fields.
    ///
    /// Events may carry extra fields the pattern doesn't mention.
    pub fn has(&self, message: &str, fields: impl IntoFields) -> bool {
        self.count(message, fields) > 0
    }

    /// Counts captured events with this message and these fields.
    pub fn count(&self, message: &str, fields: impl IntoFields) -> usize {
        let pattern = with_message(message, fields.into_fields());
        self.lock().count_matching(&pattern)
    }

    /// Builds the event a call at `level` is expected to capture.
    pub fn log(&self, level: impl Into<LevelSpec>, event: &str, fields: impl IntoFields) -> EventDict {
        let mut expected = with_message(event, fields.into_fields());
        expected.insert(LEVEL_KEY.to_string(), Value::from(level_to_name(level)));
        expected
    }

    /// Builds an expected debug event.
    pub fn debug(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.log("debug", event, fields)
    }

    /// Builds an expected info event.
    pub fn info(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.log("info", event, fields)
    }

    /// Builds an expected warning event.
    pub fn warning(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.log("warning", event, fields)
    }

    /// Builds an expected error event.
    pub fn error(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.log("error", event, fields)
    }

    /// Builds an expected critical event.
    pub fn critical(&self, event: &str, fields: impl IntoFields) -> EventDict {
        self.log("critical", event, fields)
    }
}

impl Default for LogCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for LogCapture {
    fn name(&self) -> String {
        "LogCapture".to_string()
    }

    fn process(&self, _logger: &LoggerInfo<'_>, method_name: &str, mut event: EventDict) -> Step {
        if self.add_level {
            set_level(&mut event, method_name);
        }
        self.lock().push(event);
        Step::Drop
    }
}
