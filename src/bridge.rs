//! Feeds `tracing` events into a [`LoggingHost`].
//!
//! Code that logs through `tracing` can be captured like any other: install
//! [`bridge_subscriber`] for the test and each `tracing` event is run
//! through the host's pipeline. The `message` field becomes `event`, the
//! target becomes the logger name and the level becomes the method name.
//! Records produced by this crate, including those handed over by
//! [`TracingForwarder`](crate::processors::TracingForwarder), are ignored so
//! a forwarding pipeline cannot loop.

use std::fmt;

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::event::{EventDict, EVENT_KEY};
use crate::host::LoggingHost;
use crate::level::Level;
use crate::processors::FORWARD_TARGET;

const MESSAGE_FIELD: &str = "message";
const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

struct FieldVisitor {
    fields: EventDict,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        let key = match field.name() {
            MESSAGE_FIELD => EVENT_KEY,
            name => name,
        };
        self.fields.insert(key.to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}

/// A `tracing_subscriber` layer that emits every event through a host.
#[derive(Clone, Copy)]
pub struct CaptureLayer {
    host: &'static LoggingHost,
}

impl CaptureLayer {
    /// Creates a layer feeding `host`.
    pub fn new(host: &'static LoggingHost) -> Self {
        Self { host }
    }
}

impl fmt::Debug for CaptureLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_internal(metadata.target()) {
            return;
        }
        let mut visitor = FieldVisitor {
            fields: EventDict::new(),
        };
        event.record(&mut visitor);

        let method = Level::from(*metadata.level()).name();
        self.host
            .emit(Some(metadata.target()), method, visitor.fields);
    }
}

fn is_internal(target: &str) -> bool {
    target == FORWARD_TARGET
        || target
            .strip_prefix(CRATE_TARGET)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Returns a subscriber that routes `tracing` events into `host`.
///
/// ```
/// use logcap::{bridge_subscriber, CaptureSession, LoggingHost, Settings};
///
/// let host: &'static LoggingHost = Box::leak(Box::new(LoggingHost::new()));
/// let session = CaptureSession::builder(host).settings(Settings::new()).start().unwrap();
/// tracing::subscriber::with_default(bridge_subscriber(host), || {
///     tracing::info!(user = "ada", "logged in");
/// });
/// assert!(session.has("logged in", logcap::fields! { "user" => "ada" }));
/// ```
pub fn bridge_subscriber(host: &'static LoggingHost) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(CaptureLayer::new(host))
}
