//! Partial matching primitives.
//!
//! Assertions on captured events are built from two predicates:
//! - [`is_submap`]: every field of a pattern is present, with an equal value
//! - [`is_subseq`]: a sequence embeds into another in order, gaps allowed

use crate::event::EventDict;

/// Returns whether every `(key, value)` pair of `pattern` is also in `event`.
///
/// Order does not matter and extra keys in `event` are ignored. A key that
/// is absent from `event` never matches, not even a pattern value of JSON
/// `null`.
///
/// # Examples
///
/// ```
/// use logcap::{fields, is_submap};
/// use serde_json::Value;
///
/// let event = fields! { "event" => "login", "user" => "wim", "level" => "info" };
/// assert!(is_submap(&fields! { "user" => "wim" }, &event));
/// assert!(!is_submap(&fields! { "user" => "bob" }, &event));
/// assert!(!is_submap(&fields! { "missing" => Value::Null }, &event));
/// ```
pub fn is_submap(pattern: &EventDict, event: &EventDict) -> bool {
    pattern
        .iter()
        .all(|(key, value)| event.get(key) == Some(value))
}

/// Returns whether `needle` is an ordered, not necessarily contiguous,
/// subsequence of `haystack`.
///
/// Each needle element consumes the first equal element after the previous
/// match, so repeated needle elements need as many repeats in `haystack`.
/// The empty sequence is a subsequence of everything.
///
/// # Examples
///
/// ```
/// use logcap::is_subseq;
///
/// assert!(is_subseq(&[1, 3], &[1, 2, 3]));
/// assert!(!is_subseq(&[3, 1], &[1, 2, 3]));
/// assert!(!is_subseq(&[1, 1], &[1, 2]));
/// ```
pub fn is_subseq<T: PartialEq>(needle: &[T], haystack: &[T]) -> bool {
    let mut rest = haystack.iter();
    needle
        .iter()
        .all(|wanted| rest.by_ref().any(|candidate| candidate == wanted))
}
