//! Property tests for the matching laws that event assertions rely on.

use logcap::{is_submap, is_subseq, EventDict, EventList};
use proptest::prelude::*;
use serde_json::Value;

// Strategy: small field maps drawn from a narrow key/value space so that
// overlaps between generated maps are common
fn arb_event() -> impl Strategy<Value = EventDict> {
    prop::collection::btree_map(
        prop_oneof![Just("event"), Just("level"), Just("k"), Just("n")],
        prop_oneof![
            (0i64..3).prop_map(Value::from),
            prop_oneof![Just("a"), Just("b")].prop_map(Value::from),
            Just(Value::Null),
        ],
        0..4,
    )
    .prop_map(|m| m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn arb_events() -> impl Strategy<Value = Vec<EventDict>> {
    prop::collection::vec(arb_event(), 0..6)
}

// Strategy: a sequence plus a random subset of its indices, in order
fn arb_seq_with_mask() -> impl Strategy<Value = (Vec<u8>, Vec<bool>)> {
    prop::collection::vec(0u8..4, 0..10).prop_flat_map(|seq| {
        let len = seq.len();
        (Just(seq), prop::collection::vec(any::<bool>(), len))
    })
}

proptest! {
    /// Property: the empty pattern matches every event
    #[test]
    fn proptest_empty_pattern_matches(event in arb_event()) {
        prop_assert!(is_submap(&EventDict::new(), &event));
    }

    /// Property: every event matches itself and any of its sub-maps
    #[test]
    fn proptest_submap_of_self(event in arb_event(), drop_keys in prop::collection::vec(any::<bool>(), 4)) {
        prop_assert!(is_submap(&event, &event));
        let pattern: EventDict = event
            .iter()
            .zip(drop_keys.iter().cycle())
            .filter(|(_, drop)| !**drop)
            .map(|((k, v), _)| (k.clone(), v.clone()))
            .collect();
        prop_assert!(is_submap(&pattern, &event));
    }

    /// Property: a pattern value of null never matches a missing key
    #[test]
    fn proptest_null_does_not_match_missing(event in arb_event()) {
        let mut pattern = EventDict::new();
        pattern.insert("absent".to_string(), Value::Null);
        prop_assert!(!is_submap(&pattern, &event));
    }

    /// Property: any in-order selection of a sequence is a subsequence of it
    #[test]
    fn proptest_selection_is_subsequence((seq, mask) in arb_seq_with_mask()) {
        let picked: Vec<u8> = seq
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(x, _)| *x)
            .collect();
        prop_assert!(is_subseq(&picked, &seq));
        prop_assert!(is_subseq(&[] as &[u8], &seq));
        prop_assert!(is_subseq(&seq, &seq));
    }

    /// Property: a subsequence is never longer than its supersequence
    #[test]
    fn proptest_subsequence_not_longer(a in prop::collection::vec(0u8..3, 0..8), b in prop::collection::vec(0u8..3, 0..8)) {
        if is_subseq(&a, &b) {
            prop_assert!(a.len() <= b.len());
        }
        if is_subseq(&a, &b) && is_subseq(&b, &a) {
            prop_assert_eq!(a, b);
        }
    }

    /// Property: strict containment is containment plus a length difference
    #[test]
    fn proptest_strict_containment(a in arb_events(), b in arb_events()) {
        let list = EventList::from(a.clone());
        prop_assert_eq!(
            list.strictly_contains_subsequence(&b),
            list.contains_subsequence(&b) && a.len() > b.len()
        );
        prop_assert_eq!(
            list.is_strict_subsequence_of(&b),
            list.is_subsequence_of(&b) && a.len() < b.len()
        );
        prop_assert_eq!(list.contains_subsequence(&b), is_subseq(&b, &a));
    }

    /// Property: count_matching agrees with filtering by is_submap, and
    /// reading never changes the list
    #[test]
    fn proptest_count_matching(events in arb_events(), pattern in arb_event()) {
        let list = EventList::from(events.clone());
        let expected = events.iter().filter(|e| is_submap(&pattern, e)).count();
        prop_assert_eq!(list.count_matching(&pattern), expected);
        prop_assert_eq!(list.any_matching(&pattern), expected > 0);
        prop_assert_eq!(list, events);
    }
}
