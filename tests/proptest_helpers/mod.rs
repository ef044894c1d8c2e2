#![allow(dead_code)]

use std::collections::BTreeSet;

use openlabel::model::{FrameInterval, FrameIntervals};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub const MAX_FRAME: u64 = 60;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Up to `max_ranges` arbitrary (possibly overlapping or adjacent) ranges
/// within `0..=MAX_FRAME`, fused by construction.
pub fn arb_frame_intervals(max_ranges: usize) -> BoxedStrategy<FrameIntervals> {
    prop::collection::vec((0..=MAX_FRAME, 0u64..8), 0..=max_ranges)
        .prop_map(|ranges| {
            FrameIntervals::from_intervals(ranges.into_iter().map(|(start, len)| FrameInterval {
                start,
                end: (start + len).min(MAX_FRAME),
            }))
        })
        .boxed()
}

pub fn non_empty_frame_intervals(max_ranges: usize) -> BoxedStrategy<FrameIntervals> {
    arb_frame_intervals(max_ranges)
        .prop_filter("non-empty", |fis| !fis.is_empty())
        .boxed()
}

/// The frame set a value stands for, as a plain set.
pub fn frame_set(fis: &FrameIntervals) -> BTreeSet<u64> {
    fis.frames().collect()
}

/// Direction vectors in the codec's clockwise order starting at "right".
const STEPS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// A polyline whose consecutive edges run along one of the eight chain-code
/// directions and never continue in the same direction, so every interior
/// point is a turn.
pub fn arb_chain_polygon(max_edges: usize) -> BoxedStrategy<Vec<i64>> {
    (
        (-50i64..50, -50i64..50),
        prop::collection::vec((0usize..8, 1i64..20), 0..=max_edges),
    )
        .prop_map(|((x0, y0), edges)| {
            let mut points = vec![x0, y0];
            let (mut x, mut y) = (x0, y0);
            let mut last: Option<usize> = None;
            for (direction, length) in edges {
                let direction = if last == Some(direction) {
                    (direction + 1) % 8
                } else {
                    direction
                };
                let (dx, dy) = STEPS[direction];
                x += dx * length;
                y += dy * length;
                points.push(x);
                points.push(y);
                last = Some(direction);
            }
            points
        })
        .boxed()
}
