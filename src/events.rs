//! Ordered collection of captured events.

use std::fmt;
use std::ops::Deref;

use crate::event::EventDict;
use crate::matching::{is_submap, is_subseq};

/// An ordered, append-only list of captured events.
///
/// Equality is ordinary sequence equality: same events, same order, same
/// length. The containment comparisons are subsequence checks instead of
/// lexicographic ones:
///
/// | comparison | meaning |
/// |---|---|
/// | [`is_subsequence_of(b)`](Self::is_subsequence_of) | `self` embeds in order into `b` |
/// | [`is_strict_subsequence_of(b)`](Self::is_strict_subsequence_of) | as above and `self` is shorter |
/// | [`contains_subsequence(b)`](Self::contains_subsequence) | `b` embeds in order into `self` |
/// | [`strictly_contains_subsequence(b)`](Self::strictly_contains_subsequence) | as above and `self` is longer |
///
/// Equality is defined on its own and is not derived from the containment
/// comparisons.
///
/// # Example
///
/// ```
/// use logcap::{fields, EventList};
///
/// let a = fields! { "event" => "a" };
/// let b = fields! { "event" => "b" };
///
/// let events = EventList::from(vec![a.clone(), b.clone(), a.clone()]);
/// assert!(events.contains_subsequence(&[a.clone(), a.clone()]));
/// assert!(!events.contains_subsequence(&[b.clone(), b.clone()]));
/// assert_eq!(events, vec![a.clone(), b, a]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventList {
    events: Vec<EventDict>,
}

impl EventList {
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event. Events are never reordered or deduplicated.
    pub(crate) fn push(&mut self, event: EventDict) {
        self.events.push(event);
    }

    /// Returns the events as a slice.
    pub fn as_slice(&self) -> &[EventDict] {
        &self.events
    }

    /// Consumes the list and returns the events.
    pub fn into_vec(self) -> Vec<EventDict> {
        self.events
    }

    /// Returns whether every event of `self` appears in `other`, in order.
    pub fn is_subsequence_of(&self, other: &[EventDict]) -> bool {
        is_subseq(&self.events, other)
    }

    /// Returns whether `self` is a subsequence of `other` and shorter than it.
    pub fn is_strict_subsequence_of(&self, other: &[EventDict]) -> bool {
        self.len() < other.len() && is_subseq(&self.events, other)
    }

    /// Returns whether every event of `other` appears in `self`, in order.
    pub fn contains_subsequence(&self, other: &[EventDict]) -> bool {
        is_subseq(other, &self.events)
    }

    /// Returns whether `other` is a subsequence of `self` and shorter than it.
    pub fn strictly_contains_subsequence(&self, other: &[EventDict]) -> bool {
        self.len() > other.len() && is_subseq(other, &self.events)
    }

    /// Counts the events that contain every field of `pattern`.
    pub fn count_matching(&self, pattern: &EventDict) -> usize {
        self.events.iter().filter(|e| is_submap(pattern, e)).count()
    }

    /// Returns whether any event contains every field of `pattern`.
    pub fn any_matching(&self, pattern: &EventDict) -> bool {
        self.events.iter().any(|e| is_submap(pattern, e))
    }
}

impl Deref for EventList {
    type Target = [EventDict];

    fn deref(&self) -> &[EventDict] {
        &self.events
    }
}

impl AsRef<[EventDict]> for EventList {
    fn as_ref(&self) -> &[EventDict] {
        &self.events
    }
}

impl From<Vec<EventDict>> for EventList {
    fn from(events: Vec<EventDict>) -> Self {
        Self { events }
    }
}

impl FromIterator<EventDict> for EventList {
    fn from_iter<I: IntoIterator<Item = EventDict>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EventList {
    type Item = EventDict;
    type IntoIter = std::vec::IntoIter<EventDict>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventList {
    type Item = &'a EventDict;
    type IntoIter = std::slice::Iter<'a, EventDict>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl PartialEq<Vec<EventDict>> for EventList {
    fn eq(&self, other: &Vec<EventDict>) -> bool {
        self.events == *other
    }
}

impl PartialEq<[EventDict]> for EventList {
    fn eq(&self, other: &[EventDict]) -> bool {
        self.events.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[EventDict; N]> for EventList {
    fn eq(&self, other: &[EventDict; N]) -> bool {
        self.events.as_slice() == other.as_slice()
    }
}

impl PartialEq<EventList> for Vec<EventDict> {
    fn eq(&self, other: &EventList) -> bool {
        *self == other.events
    }
}

/// One event per line, each rendered as compact JSON.
impl fmt::Display for EventList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", serde_json::Value::Object(event.clone()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    fn ev(name: &str) -> EventDict {
        fields! { "event" => name, "level" => "info" }
    }

    fn sample() -> (EventDict, EventDict, EventDict, EventList) {
        let d0 = fields! { "event" => "dbg", "k" => "v", "level" => "debug" };
        let d1 = fields! { "event" => "inf", "k" => "v", "level" => "info", "kk" => "more context" };
        let d2 = fields! { "event" => "uh-oh", "level" => "warning" };
        let list = EventList::from(vec![d0.clone(), d1.clone(), d2.clone()]);
        (d0, d1, d2, list)
    }

    #[test]
    fn starts_empty() {
        let list = EventList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn membership_is_exact() {
        let (d0, _, _, list) = sample();
        assert!(list.contains(&d0));
        assert!(!list.contains(&fields! { "event" => "dbg" }));
    }

    #[test]
    fn contains_single_and_multi() {
        let (d0, d1, d2, list) = sample();
        assert!(list.contains_subsequence(&[d0.clone()]));
        assert!(list.contains_subsequence(&[d0.clone(), d2.clone()]));
        assert!(list.contains_subsequence(&[d0.clone(), d1.clone(), d2.clone()]));
    }

    #[test]
    fn containment_respects_order() {
        let (d0, _, d2, list) = sample();
        assert!(!list.contains_subsequence(&[d2, d0]));
    }

    #[test]
    fn strict_containment_needs_length_difference() {
        let (d0, d1, d2, list) = sample();
        assert!(!list.strictly_contains_subsequence(&[d0.clone(), d1.clone(), d2.clone()]));
        assert!(list.strictly_contains_subsequence(&[d0, d1]));
    }

    #[test]
    fn subsequence_of_longer_list() {
        let (d0, d1, d2, list) = sample();
        let longer = vec![d0.clone(), d1.clone(), d2.clone(), EventDict::new()];
        assert!(list.is_subsequence_of(&longer));
        assert!(list.is_strict_subsequence_of(&longer));

        let same = vec![d0, d1, d2];
        assert!(list.is_subsequence_of(&same));
        assert!(!list.is_strict_subsequence_of(&same));
    }

    #[test]
    fn equality_is_elementwise() {
        let (d0, d1, d2, list) = sample();
        assert_eq!(list, vec![d0.clone(), d1.clone(), d2.clone()]);
        assert_eq!(list, [d0.clone(), d1.clone(), d2.clone()]);
        assert_ne!(list, vec![d0, EventDict::new(), d1, d2]);
    }

    #[test]
    fn equality_is_independent_of_containment() {
        let x = ev("x");
        let y = ev("y");

        let a = EventList::from(vec![x.clone(), y.clone()]);
        let b = vec![y.clone(), x.clone(), x.clone()];
        assert_ne!(a, b);
        assert!(!a.is_subsequence_of(&b));
        assert!(!a.contains_subsequence(&b));
        assert!(a.contains_subsequence(&[y.clone()]));

        // Lists of equal length that contain each other are the same list.
        let c = EventList::from(vec![x.clone(), y.clone()]);
        let d = vec![x, y];
        assert!(c.is_subsequence_of(&d) && c.contains_subsequence(&d));
        assert_eq!(c, d);
    }

    #[test]
    fn duplicates_are_consumed() {
        let list = EventList::from(vec![ev("a"), ev("a"), ev("b")]);
        assert!(list.contains_subsequence(&[ev("a")]));
        assert!(list.contains_subsequence(&[ev("a"), ev("b")]));
        assert!(list.contains_subsequence(&[ev("a"), ev("a"), ev("b")]));
        assert!(!list.contains_subsequence(&[ev("a"), ev("a"), ev("a"), ev("b")]));
        assert_eq!(list.count_matching(&ev("a")), 2);
    }

    #[test]
    fn display_is_one_event_per_line() {
        let list = EventList::from(vec![ev("a"), ev("b")]);
        assert_eq!(
            list.to_string(),
            "{\"event\":\"a\",\"level\":\"info\"}\n{\"event\":\"b\",\"level\":\"info\"}"
        );
    }
}
