//! The structured event record and helpers for building one.

use serde_json::{Map, Value};

/// One structured log record: an insertion-ordered map of field names to
/// JSON values.
///
/// Every emitted event carries its message under `event`. Unless the level
/// injector is evicted, the capture processor adds `level` as well.
pub type EventDict = Map<String, Value>;

/// Key holding the event message.
pub const EVENT_KEY: &str = "event";

/// Key holding the lowercase level name.
pub const LEVEL_KEY: &str = "level";

/// Conversion into a set of event fields.
///
/// Implemented for `()` (no fields), [`EventDict`], and arrays or vectors of
/// `(key, value)` pairs whose values convert into [`Value`]. Use the
/// [`fields!`](crate::fields) macro when the values have different types.
pub trait IntoFields {
    /// Converts `self` into an event field map.
    fn into_fields(self) -> EventDict;
}

impl IntoFields for () {
    fn into_fields(self) -> EventDict {
        EventDict::new()
    }
}

impl IntoFields for EventDict {
    fn into_fields(self) -> EventDict {
        self
    }
}

impl<K, V, const N: usize> IntoFields for [(K, V); N]
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> EventDict {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, V> IntoFields for Vec<(K, V)>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> EventDict {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

/// Builds an [`EventDict`] from `key => value` pairs of mixed types.
///
/// Values go through [`serde_json::json!`], so anything serializable works.
///
/// # Examples
///
/// ```
/// use logcap::fields;
///
/// let f = fields! { "user" => "wim", "attempts" => 3, "admin" => false };
/// assert_eq!(f["attempts"], 3);
/// assert_eq!(f.len(), 3);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::EventDict::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::EventDict::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::__private::json!($value),
            );
        )+
        map
    }};
}

/// Builds an event with `event` set to `message` followed by `fields`.
///
/// A field named `event` in `fields` is replaced by `message`.
pub(crate) fn with_message(message: &str, fields: EventDict) -> EventDict {
    let mut event = EventDict::with_capacity(fields.len() + 1);
    event.insert(EVENT_KEY.to_string(), Value::from(message));
    for (key, value) in fields {
        if key != EVENT_KEY {
            event.insert(key, value);
        }
    }
    event
}
