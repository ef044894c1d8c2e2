//! Element data: values attached to elements, either once at the element
//! root (static) or per frame, and the pointers that record where each
//! named value lives.

use tracing::warn;

use super::{SetMode, Vcd};
use crate::error::VcdError;
use crate::model::payload::invalid;
use crate::model::{DataPointer, ElementData, ElementType, FrameIntervals, Uid};

impl Vcd {
    /// Writes `data` onto an element.
    ///
    /// With empty `frame_intervals` the value is static and stored at the
    /// element root. Otherwise it is stored in each listed frame and the
    /// element grows to cover those frames. In [`SetMode::Replace`] the value
    /// ends up in exactly the given frames; in [`SetMode::Union`] the given
    /// frames are added to wherever it already was. Union on static data is
    /// applied as replace (see [`SetMode::for_data`]).
    ///
    /// Returns `Ok(false)` if the element does not exist.
    ///
    /// # Errors
    /// Rejects malformed payloads, unnamed data on anything but tags, frame
    /// intervals on tag data and undeclared coordinate systems, all before
    /// any mutation.
    pub fn set_element_data(
        &mut self,
        element_type: ElementType,
        uid: &Uid,
        data: ElementData,
        frame_intervals: FrameIntervals,
        mode: SetMode,
    ) -> Result<bool, VcdError> {
        data.validate()?;
        if element_type.is_static_only() && !frame_intervals.is_empty() {
            return Err(VcdError::StaticOnly(element_type));
        }
        self.require_coordinate_system(data.coordinate_system.as_deref())?;

        let Some(element) = self.document.element_mut(element_type, uid) else {
            warn!(%element_type, %uid, "cannot set data on a non-existing element");
            return Ok(false);
        };
        if element_type.is_static_only() {
            element.data.upsert(data);
            return Ok(true);
        }
        let Some(name) = data.name.clone() else {
            return Err(invalid(
                data.kind(),
                format!("{} data must be named", element_type),
            ));
        };

        let kind = data.kind();
        let attributes = data.attribute_kinds();
        let previous = element
            .data_pointers
            .get(&name)
            .map(|p| p.frame_intervals.clone())
            .unwrap_or_default();

        let recorded = match (mode.for_data(&frame_intervals, kind), frame_intervals.is_empty()) {
            (SetMode::Replace, false) => {
                element.data.remove_named(&name);
                self.extend_element(element_type, *uid, &frame_intervals);
                self.drop_frame_data(element_type, uid, &name, &previous.difference(&frame_intervals));
                self.write_frame_data(element_type, *uid, &data, &frame_intervals);
                frame_intervals
            }
            (SetMode::Replace, true) => {
                element.data.upsert(data);
                self.drop_frame_data(element_type, uid, &name, &previous);
                FrameIntervals::new()
            }
            (SetMode::Union, false) => {
                self.extend_element(element_type, *uid, &frame_intervals);
                self.write_frame_data(element_type, *uid, &data, &frame_intervals);
                previous.union(&frame_intervals)
            }
            (SetMode::Union, true) => {
                element.data.upsert(data);
                previous
            }
        };

        if let Some(element) = self.document.element_mut(element_type, uid) {
            element.data_pointers.insert(
                name,
                DataPointer {
                    kind,
                    frame_intervals: recorded,
                    attributes,
                },
            );
        }
        Ok(true)
    }

    /// Removes the named value from an element's root, from every frame
    /// it occurs in, and drops its pointer.
    pub fn rm_element_data(&mut self, element_type: ElementType, uid: &Uid, name: &str) -> bool {
        let Some(element) = self.document.element_mut(element_type, uid) else {
            warn!(%element_type, %uid, "cannot remove data of a non-existing element");
            return false;
        };
        let at_root = element.data.remove_named(name);
        let pointer = element.data_pointers.remove(name);
        let had_pointer = pointer.is_some();
        if let Some(pointer) = pointer {
            self.drop_frame_data(element_type, uid, name, &pointer.frame_intervals);
        }
        if !(at_root || had_pointer) {
            warn!(%element_type, %uid, name, "element has no data with this name");
        }
        at_root || had_pointer
    }

    /// Grows an element so that it covers `frames`.
    fn extend_element(&mut self, element_type: ElementType, uid: Uid, frames: &FrameIntervals) {
        let Some(element) = self.document.element(element_type, &uid) else {
            return;
        };
        let old = element.frames().clone();
        if !old.is_empty() && old.contains(frames) {
            return;
        }
        let grown = old.union(frames);
        self.retime(element_type, uid, true, &old, grown);
    }

    fn write_frame_data(
        &mut self,
        element_type: ElementType,
        uid: Uid,
        data: &ElementData,
        frames: &FrameIntervals,
    ) {
        for frame in frames.frames() {
            let entry = self
                .document
                .frames
                .entry(frame)
                .or_default()
                .elements_mut(element_type)
                .map(|elements| elements.entry(uid).or_default());
            if let Some(entry) = entry {
                entry.data.upsert(data.clone());
            }
        }
    }

    /// Removes the named value from the given frames, keeping the element's
    /// presence entries.
    fn drop_frame_data(
        &mut self,
        element_type: ElementType,
        uid: &Uid,
        name: &str,
        frames: &FrameIntervals,
    ) {
        for interval in frames {
            for (_, frame) in self.document.frames.range_mut(interval.start..=interval.end) {
                if let Some(entry) = frame.elements_mut(element_type).and_then(|e| e.get_mut(uid)) {
                    entry.data.remove_named(name);
                }
            }
        }
    }
}
