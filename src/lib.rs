//! Capture structured log events during a test and assert on them.
//!
//! A [`CaptureSession`] diverts a [`LoggingHost`]'s processor pipeline so
//! that events are recorded instead of rendered. Tests then compare the
//! recorded events against expected ones with partial, ordered matching.
//!
//! # Core Types
//!
//! - [`LoggingHost`]: the live pipeline that application code logs through
//! - [`CaptureSession`]: RAII guard that captures events and restores the
//!   pipeline on drop
//! - [`EventList`]: captured events with subsequence comparisons
//! - [`Settings`]: which configured processors stay in the pipeline during
//!   capture
//!
//! # Examples
//!
//! ```
//! use logcap::{fields, CaptureSession, LoggingHost, Settings};
//!
//! let host = LoggingHost::new();
//! let log = host.named_logger("billing");
//!
//! let session = CaptureSession::builder(&host)
//!     .settings(Settings::new())
//!     .start()
//!     .expect("capture starts");
//!
//! log.info("charged", fields! { "amount" => 12.5 });
//! log.warning("retrying", fields! { "attempt" => 2 });
//!
//! // Ordered comparison against whole events, gaps allowed.
//! assert!(session.events().contains_subsequence(&[
//!     session.warning("retrying", fields! { "attempt" => 2 }),
//! ]));
//! // Lookup by message, leaving out fields that don't matter.
//! assert!(session.has("charged", ()));
//! assert_eq!(session.count("retrying", ()), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bridge;
mod capture;
pub mod contextvars;
mod error;
mod event;
mod events;
mod host;
mod level;
mod logger;
mod matching;
mod processor;
pub mod processors;
mod report;
mod session;
pub mod settings;

pub use bridge::{bridge_subscriber, CaptureLayer};
pub use capture::LogCapture;
pub use error::Error;
pub use event::{EventDict, IntoFields, EVENT_KEY, LEVEL_KEY};
pub use events::EventList;
pub use host::{LoggingHost, MemoryOutput, Output, Pipeline};
pub use level::{level_to_name, normalize_method_name, Level, LevelSpec};
pub use logger::{get_logger, get_named_logger, BoundLogger};
pub use matching::{is_submap, is_subseq};
pub use processor::{
    processor_fn, processor_method, processor_name, FnProcessor, LoggerInfo, Partial, Processor,
    Step,
};
pub use report::{events_report, settings_report};
pub use session::{capture, try_capture, CaptureSession, CaptureSessionBuilder, SessionState};
pub use settings::{Mode, Options, ReportMode, Settings, Source, Verdict};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::json;
}
