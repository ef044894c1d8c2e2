//! Read accessors.

use std::collections::BTreeMap;

use super::Vcd;
use crate::model::{DataPointer, Element, ElementData, ElementType, Frame, FrameIntervals, Uid};

impl Vcd {
    pub fn has(&self, element_type: ElementType, uid: &Uid) -> bool {
        self.document.elements.of(element_type).contains_key(uid)
    }

    pub fn get_element(&self, element_type: ElementType, uid: &Uid) -> Option<&Element> {
        self.document.element(element_type, uid)
    }

    pub fn get_all(&self, element_type: ElementType) -> &BTreeMap<Uid, Element> {
        self.document.elements.of(element_type)
    }

    pub fn get_frame(&self, frame: u64) -> Option<&Frame> {
        self.document.frames.get(&frame)
    }

    /// The document extent.
    pub fn get_frame_intervals(&self) -> &FrameIntervals {
        &self.document.frame_intervals
    }

    /// An element's frame intervals; empty for static elements.
    pub fn get_element_frame_intervals(&self, element_type: ElementType, uid: &Uid) -> Option<&FrameIntervals> {
        self.get_element(element_type, uid).map(Element::frames)
    }

    /// Looks up a named value.
    ///
    /// Without a frame only the element root is searched. With a frame the
    /// element must exist there (static elements exist everywhere); the
    /// frame-local value wins and the root value is the fallback.
    pub fn get_element_data(
        &self,
        element_type: ElementType,
        uid: &Uid,
        name: &str,
        frame: Option<u64>,
    ) -> Option<&ElementData> {
        let element = self.get_element(element_type, uid)?;
        let Some(frame) = frame else {
            return element.data.find(name);
        };
        if !element.is_static() && !element.frames().has_frame(frame) {
            return None;
        }
        self.document
            .frames
            .get(&frame)
            .and_then(|f| f.element(element_type, uid))
            .and_then(|entry| entry.data.find(name))
            .or_else(|| element.data.find(name))
    }

    pub fn get_element_data_pointer(
        &self,
        element_type: ElementType,
        uid: &Uid,
        name: &str,
    ) -> Option<&DataPointer> {
        self.get_element(element_type, uid)?.data_pointers.get(name)
    }

    pub fn get_element_data_frame_intervals(
        &self,
        element_type: ElementType,
        uid: &Uid,
        name: &str,
    ) -> Option<&FrameIntervals> {
        self.get_element_data_pointer(element_type, uid, name)
            .map(|p| &p.frame_intervals)
    }

    /// UIDs of the elements with the given semantic type.
    pub fn get_elements_of_type(&self, element_type: ElementType, semantic_type: &str) -> Vec<Uid> {
        self.get_all(element_type)
            .iter()
            .filter(|(_, el)| el.semantic_type == semantic_type)
            .map(|(uid, _)| *uid)
            .collect()
    }

    /// UIDs of the elements holding a value called `name`, at the root or
    /// in any frame.
    pub fn get_elements_with_element_data_name(&self, element_type: ElementType, name: &str) -> Vec<Uid> {
        self.get_all(element_type)
            .iter()
            .filter(|(_, el)| el.data_pointers.contains_key(name) || el.data.contains_name(name))
            .map(|(uid, _)| *uid)
            .collect()
    }

    /// The first element (in UID order) with the given name.
    pub fn get_element_uid_by_name(&self, element_type: ElementType, name: &str) -> Option<Uid> {
        self.get_all(element_type)
            .iter()
            .find(|(_, el)| el.name == name)
            .map(|(uid, _)| *uid)
    }

    pub fn get_num_elements(&self, element_type: ElementType) -> usize {
        self.get_all(element_type).len()
    }

    /// Every element present at `frame`.
    pub fn get_frame_elements(&self, frame: u64) -> Vec<(ElementType, Uid)> {
        let Some(frame) = self.get_frame(frame) else {
            return Vec::new();
        };
        ElementType::FRAMED
            .into_iter()
            .flat_map(move |t| {
                frame
                    .elements(t)
                    .into_iter()
                    .flat_map(move |elements| elements.keys().map(move |uid| (t, *uid)))
            })
            .collect()
    }
}
