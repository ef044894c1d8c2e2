use openlabel::model::FrameIntervals;
use proptest::prelude::*;

mod proptest_helpers;
use proptest_helpers::{arb_frame_intervals, frame_set, MAX_FRAME};

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn union_is_commutative(a in arb_frame_intervals(5), b in arb_frame_intervals(5)) {
        prop_assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn self_intersection_is_identity(a in arb_frame_intervals(5)) {
        prop_assert_eq!(a.intersection(&a), a);
    }

    #[test]
    fn equals_iff_mutual_containment(a in arb_frame_intervals(4), b in arb_frame_intervals(4)) {
        prop_assert_eq!(a.equals(&b), a.contains(&b) && b.contains(&a));
        prop_assert_eq!(a.equals(&b), a == b);
    }

    #[test]
    fn operations_match_set_semantics(a in arb_frame_intervals(5), b in arb_frame_intervals(5)) {
        let sa = frame_set(&a);
        let sb = frame_set(&b);

        prop_assert_eq!(frame_set(&a.union(&b)), sa.union(&sb).copied().collect());
        prop_assert_eq!(frame_set(&a.intersection(&b)), sa.intersection(&sb).copied().collect());
        prop_assert_eq!(frame_set(&a.difference(&b)), sa.difference(&sb).copied().collect());
        prop_assert_eq!(a.length(), sa.len() as u64);
        prop_assert_eq!(a.contains(&b), sb.is_subset(&sa));
        prop_assert_eq!(b.is_contained_by(&a), sb.is_subset(&sa));
    }

    #[test]
    fn has_frame_matches_membership(a in arb_frame_intervals(5), frame in 0..=MAX_FRAME + 2) {
        prop_assert_eq!(a.has_frame(frame), frame_set(&a).contains(&frame));
    }

    #[test]
    fn results_are_canonical(a in arb_frame_intervals(6), b in arb_frame_intervals(6)) {
        for fis in [a.union(&b), a.intersection(&b), a.difference(&b)] {
            for pair in fis.as_slice().windows(2) {
                // sorted, and separated by at least one missing frame
                prop_assert!(pair[0].end + 1 < pair[1].start);
            }
        }
    }

    #[test]
    fn remove_frame_drops_exactly_one(a in arb_frame_intervals(5), frame in 0..=MAX_FRAME) {
        let mut expected = frame_set(&a);
        expected.remove(&frame);
        prop_assert_eq!(frame_set(&a.remove_frame(frame)), expected);
    }

    #[test]
    fn json_form_roundtrips(a in arb_frame_intervals(5)) {
        let json = serde_json::to_string(&a).expect("serialize");
        let back: FrameIntervals = serde_json::from_str(&json).expect("parse");
        prop_assert_eq!(back, a);
    }
}

#[test]
fn reference_construction() {
    let fis = FrameIntervals::from_pairs(&[(0, 10), (26, 29)]).unwrap();
    assert_eq!(fis.interval_count(), 2);
    assert_eq!(fis.length(), 15);
}
