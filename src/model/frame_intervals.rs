//! Frame-interval algebra.
//!
//! A [`FrameIntervals`] value is a sorted list of inclusive `[start, end]`
//! ranges in which no two ranges overlap or touch. Every constructor fuses
//! its input into that canonical form, so two values describing the same
//! set of frames are always structurally equal. The empty value means
//! "static": no frame restriction at all.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::VcdError;

/// Largest frame number accepted from documents and range constructors.
pub const MAX_FRAME_NUMBER: u64 = u64::MAX - 1;

/// A single inclusive range of frames.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameInterval {
    #[serde(rename = "frame_start")]
    pub start: u64,
    #[serde(rename = "frame_end")]
    pub end: u64,
}

impl FrameInterval {
    /// Creates a new interval, rejecting `start > end` and frames past
    /// [`MAX_FRAME_NUMBER`].
    pub fn new(start: u64, end: u64) -> Result<Self, VcdError> {
        if end > MAX_FRAME_NUMBER {
            return Err(VcdError::InvalidFrameInterval(format!(
                "frame_end {} is past the last frame number {}",
                end, MAX_FRAME_NUMBER
            )));
        }
        if start > end {
            return Err(VcdError::InvalidFrameInterval(format!(
                "frame_start {} is greater than frame_end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// An interval covering exactly one frame.
    #[inline]
    pub fn single(frame: u64) -> Self {
        Self {
            start: frame,
            end: frame,
        }
    }

    /// Number of frames covered (`end - start + 1`), saturating at `u64::MAX`.
    #[inline]
    pub fn length(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    #[inline]
    pub fn has_frame(&self, frame: u64) -> bool {
        self.start <= frame && frame <= self.end
    }

    /// True if the two ranges share a frame or are consecutive.
    #[inline]
    fn touches(&self, other: &FrameInterval) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
            || self.end.saturating_add(1) == other.start
            || other.end.saturating_add(1) == self.start
    }
}

impl fmt::Debug for FrameInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl fmt::Display for FrameInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A canonical (sorted, fused) set of frame intervals.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FrameIntervals(Vec<FrameInterval>);

impl FrameIntervals {
    /// The empty (static) value.
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// A single frame.
    pub fn from_frame(frame: u64) -> Self {
        Self(vec![FrameInterval::single(frame)])
    }

    /// A single `[start, end]` range.
    pub fn from_range(start: u64, end: u64) -> Result<Self, VcdError> {
        Ok(Self(vec![FrameInterval::new(start, end)?]))
    }

    /// A list of `(start, end)` pairs, in any order, possibly overlapping.
    pub fn from_pairs(pairs: &[(u64, u64)]) -> Result<Self, VcdError> {
        let intervals = pairs
            .iter()
            .map(|&(start, end)| FrameInterval::new(start, end))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_intervals(intervals))
    }

    /// Fuses arbitrary (already individually valid) intervals.
    pub fn from_intervals(intervals: impl IntoIterator<Item = FrameInterval>) -> Self {
        Self(fuse(intervals.into_iter().collect()))
    }

    /// Builds a value from any of the JSON shapes accepted on the wire or
    /// from callers: `null`, a frame number, a `[start, end]` pair, a list of
    /// pairs, a `{frame_start, frame_end}` object or a list of such objects.
    pub fn from_value(value: &Value) -> Result<Self, VcdError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Number(_) => Ok(Self::from_frame(frame_number(value)?)),
            Value::Object(_) => Ok(Self(vec![interval_from_object(value)?])),
            Value::Array(items) if items.is_empty() => Ok(Self::new()),
            Value::Array(items) => {
                if items.iter().all(Value::is_number) {
                    return Ok(Self(vec![interval_from_pair(items)?]));
                }
                if items.iter().all(Value::is_array) {
                    let intervals = items
                        .iter()
                        .map(|item| match item {
                            Value::Array(pair) => interval_from_pair(pair),
                            _ => unreachable!("checked above"),
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    return Ok(Self::from_intervals(intervals));
                }
                if items.iter().all(Value::is_object) {
                    let intervals = items
                        .iter()
                        .map(interval_from_object)
                        .collect::<Result<Vec<_>, _>>()?;
                    return Ok(Self::from_intervals(intervals));
                }
                Err(VcdError::InvalidFrameInterval(format!(
                    "mixed element types in frame interval list: {}",
                    value
                )))
            }
            other => Err(VcdError::InvalidFrameInterval(format!(
                "unsupported frame interval value: {}",
                other
            ))),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of frames covered.
    pub fn length(&self) -> u64 {
        self.0
            .iter()
            .map(FrameInterval::length)
            .fold(0, u64::saturating_add)
    }

    /// Number of disjoint ranges.
    #[inline]
    pub fn interval_count(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[FrameInterval] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameInterval> {
        self.0.iter()
    }

    /// Iterates every frame number, in ascending order.
    pub fn frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().flat_map(|fi| fi.start..=fi.end)
    }

    pub fn has_frame(&self, frame: u64) -> bool {
        self.0
            .binary_search_by(|fi| {
                if fi.end < frame {
                    std::cmp::Ordering::Less
                } else if fi.start > frame {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// The smallest single range enclosing every frame, if any.
    pub fn outer(&self) -> Option<FrameInterval> {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => Some(FrameInterval {
                start: first.start,
                end: last.end,
            }),
            _ => None,
        }
    }

    pub fn union(&self, other: &FrameIntervals) -> FrameIntervals {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut all = Vec::with_capacity(self.0.len() + other.0.len());
        all.extend_from_slice(&self.0);
        all.extend_from_slice(&other.0);
        Self(fuse(all))
    }

    pub fn intersection(&self, other: &FrameIntervals) -> FrameIntervals {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            let a = self.0[i];
            let b = other.0[j];
            let start = a.start.max(b.start);
            let end = a.end.min(b.end);
            if start <= end {
                out.push(FrameInterval { start, end });
            }
            if a.end < b.end {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self(out)
    }

    /// Frames of `self` that are not in `other`.
    pub fn difference(&self, other: &FrameIntervals) -> FrameIntervals {
        let mut out = Vec::new();
        let mut j = 0;
        for a in &self.0 {
            let mut cursor = a.start;
            let mut exhausted = false;
            while j < other.0.len() && other.0[j].end < cursor {
                j += 1;
            }
            let mut k = j;
            while k < other.0.len() && other.0[k].start <= a.end {
                let b = other.0[k];
                if b.start > cursor {
                    out.push(FrameInterval {
                        start: cursor,
                        end: b.start - 1,
                    });
                }
                if b.end >= a.end {
                    exhausted = true;
                    break;
                }
                cursor = b.end + 1;
                k += 1;
            }
            if !exhausted {
                out.push(FrameInterval {
                    start: cursor,
                    end: a.end,
                });
            }
        }
        Self(out)
    }

    /// Set equality. Both sides are canonical, so this is structural.
    pub fn equals(&self, other: &FrameIntervals) -> bool {
        self == other
    }

    /// True if every frame of `other` is also in `self`.
    pub fn contains(&self, other: &FrameIntervals) -> bool {
        other.difference(self).is_empty()
    }

    pub fn is_contained_by(&self, other: &FrameIntervals) -> bool {
        other.contains(self)
    }

    /// Returns a copy without `frame`: an interior frame splits its range,
    /// an edge frame shrinks it, a single-frame range disappears.
    pub fn remove_frame(&self, frame: u64) -> FrameIntervals {
        let mut out = Vec::with_capacity(self.0.len() + 1);
        for fi in &self.0 {
            if !fi.has_frame(frame) {
                out.push(*fi);
                continue;
            }
            if fi.start < frame {
                out.push(FrameInterval {
                    start: fi.start,
                    end: frame - 1,
                });
            }
            if frame < fi.end {
                out.push(FrameInterval {
                    start: frame + 1,
                    end: fi.end,
                });
            }
        }
        Self(out)
    }
}

/// Sorts once and sweeps, merging ranges that overlap or are consecutive.
fn fuse(mut intervals: Vec<FrameInterval>) -> Vec<FrameInterval> {
    if intervals.len() < 2 {
        return intervals;
    }
    intervals.sort_unstable();
    let mut out: Vec<FrameInterval> = Vec::with_capacity(intervals.len());
    for fi in intervals {
        match out.last_mut() {
            Some(last) if last.touches(&fi) => {
                last.end = last.end.max(fi.end);
            }
            _ => out.push(fi),
        }
    }
    out
}

fn frame_number(value: &Value) -> Result<u64, VcdError> {
    match value.as_u64() {
        Some(frame) if frame <= MAX_FRAME_NUMBER => Ok(frame),
        Some(frame) => Err(VcdError::InvalidFrameInterval(format!(
            "frame {} is past the last frame number {}",
            frame, MAX_FRAME_NUMBER
        ))),
        None => Err(VcdError::InvalidFrameInterval(format!(
            "frame bounds must be non-negative integers, got {}",
            value
        ))),
    }
}

fn interval_from_pair(pair: &[Value]) -> Result<FrameInterval, VcdError> {
    if pair.len() != 2 {
        return Err(VcdError::InvalidFrameInterval(format!(
            "expected a [start, end] pair, got {} value(s)",
            pair.len()
        )));
    }
    FrameInterval::new(frame_number(&pair[0])?, frame_number(&pair[1])?)
}

fn interval_from_object(value: &Value) -> Result<FrameInterval, VcdError> {
    let start = value.get("frame_start").ok_or_else(|| {
        VcdError::InvalidFrameInterval(format!("missing frame_start in {}", value))
    })?;
    let end = value
        .get("frame_end")
        .ok_or_else(|| VcdError::InvalidFrameInterval(format!("missing frame_end in {}", value)))?;
    FrameInterval::new(frame_number(start)?, frame_number(end)?)
}

impl<'de> Deserialize<'de> for FrameIntervals {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FrameIntervals::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl From<u64> for FrameIntervals {
    fn from(frame: u64) -> Self {
        FrameIntervals::from_frame(frame)
    }
}

impl From<FrameInterval> for FrameIntervals {
    fn from(fi: FrameInterval) -> Self {
        FrameIntervals(vec![fi])
    }
}

impl TryFrom<(u64, u64)> for FrameIntervals {
    type Error = VcdError;

    fn try_from((start, end): (u64, u64)) -> Result<Self, Self::Error> {
        FrameIntervals::from_range(start, end)
    }
}

impl<'a> IntoIterator for &'a FrameIntervals {
    type Item = &'a FrameInterval;
    type IntoIter = std::slice::Iter<'a, FrameInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Debug for FrameIntervals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for FrameIntervals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "static");
        }
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(", "))
    }
}
