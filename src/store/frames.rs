//! The per-frame index and the document extent.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::Vcd;
use crate::model::{ElementType, FrameInterval, FrameIntervals, Uid};

impl Vcd {
    /// Recomputes the document's frame intervals from its content, deletes
    /// frames that fell out of it and adds static elements to frames that
    /// entered it.
    pub(super) fn settle(&mut self) {
        let extent = self.content_extent();
        if extent == self.document.frame_intervals {
            return;
        }
        let old = std::mem::replace(&mut self.document.frame_intervals, extent.clone());

        let gone = old.difference(&extent);
        for interval in gone.iter() {
            let doomed: Vec<u64> = self
                .document
                .frames
                .range(interval.start..=interval.end)
                .map(|(n, _)| *n)
                .collect();
            for n in doomed {
                self.document.frames.remove(&n);
            }
        }

        let added = extent.difference(&old);
        if !added.is_empty() {
            let statics: Vec<(ElementType, Uid)> = self
                .document
                .elements
                .iter()
                .filter(|(t, _, el)| t.propagates_when_static() && el.is_static())
                .map(|(t, uid, _)| (t, *uid))
                .collect();
            for frame in added.frames() {
                self.document.frames.entry(frame).or_default();
                for (element_type, uid) in &statics {
                    self.frame_entry(*element_type, *uid, frame);
                }
            }
        }

        debug!(from = %old, to = %extent, "document frame intervals changed");
    }

    /// Union of every dynamic element's frames and every frame that carries
    /// frame properties.
    fn content_extent(&self) -> FrameIntervals {
        let dynamic = self
            .document
            .elements
            .iter()
            .flat_map(|(_, _, el)| el.frames().iter().copied());
        let with_properties = self
            .document
            .frames
            .iter()
            .filter(|(_, frame)| frame.has_properties())
            .map(|(n, _)| FrameInterval::single(*n));
        FrameIntervals::from_intervals(dynamic.chain(with_properties))
    }

    /// Makes sure `uid` has an entry at `frame`, creating the frame if
    /// needed. Existing frame-local data is kept.
    pub(super) fn frame_entry(&mut self, element_type: ElementType, uid: Uid, frame: u64) {
        if let Some(elements) = self
            .document
            .frames
            .entry(frame)
            .or_default()
            .elements_mut(element_type)
        {
            elements.entry(uid).or_default();
        }
    }

    /// Drops `uid`'s entries, with any frame-local data, from the given
    /// frames. Emptied frames are left for [`Vcd::settle`] to prune.
    pub(super) fn strip_frames(&mut self, element_type: ElementType, uid: &Uid, frames: &FrameIntervals) {
        for interval in frames {
            for (_, frame) in self.document.frames.range_mut(interval.start..=interval.end) {
                if let Some(elements) = frame.elements_mut(element_type) {
                    elements.remove(uid);
                }
            }
        }
    }

    /// Sets properties of a frame, creating it if needed. A frame with
    /// properties is part of the document extent even when no element is
    /// present there.
    pub fn add_frame_properties(
        &mut self,
        frame: u64,
        timestamp: Option<&str>,
        properties: Option<Map<String, Value>>,
    ) {
        let target = self
            .document
            .frames
            .entry(frame)
            .or_default()
            .frame_properties
            .get_or_insert_with(Map::new);
        if let Some(timestamp) = timestamp {
            target.insert("timestamp".to_string(), Value::String(timestamp.to_string()));
        }
        if let Some(properties) = properties {
            target.extend(properties);
        }
        self.settle();
    }

    /// Removes a frame's properties. The frame itself goes away when no
    /// dynamic element covers it.
    pub fn rm_frame_properties(&mut self, frame: u64) -> bool {
        let removed = self
            .document
            .frames
            .get_mut(&frame)
            .and_then(|f| f.frame_properties.take())
            .is_some();
        if !removed {
            warn!(frame, "frame has no properties to remove");
            return false;
        }
        self.settle();
        if self.document.frames.get(&frame).is_some_and(|f| f.is_empty()) {
            self.document.frames.remove(&frame);
        }
        true
    }
}
