//! Per-frame index: which elements (and which frame-local data) exist at a
//! given frame.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::data::DataMap;
use super::kinds::ElementType;
use super::uid::Uid;

/// An element's entry in a frame: a bare presence marker, or the element's
/// data at that frame.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FrameElement {
    #[serde(
        default,
        rename = "object_data",
        alias = "action_data",
        alias = "event_data",
        alias = "context_data",
        alias = "relation_data"
    )]
    pub data: DataMap,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub objects: BTreeMap<Uid, FrameElement>,
    #[serde(default)]
    pub actions: BTreeMap<Uid, FrameElement>,
    #[serde(default)]
    pub events: BTreeMap<Uid, FrameElement>,
    #[serde(default)]
    pub contexts: BTreeMap<Uid, FrameElement>,
    #[serde(default)]
    pub relations: BTreeMap<Uid, FrameElement>,
    #[serde(default)]
    pub frame_properties: Option<Map<String, Value>>,
}

impl Frame {
    /// Elements of one type present at this frame. Tags never have frame
    /// entries.
    pub fn elements(&self, element_type: ElementType) -> Option<&BTreeMap<Uid, FrameElement>> {
        match element_type {
            ElementType::Object => Some(&self.objects),
            ElementType::Action => Some(&self.actions),
            ElementType::Event => Some(&self.events),
            ElementType::Context => Some(&self.contexts),
            ElementType::Relation => Some(&self.relations),
            ElementType::Tag => None,
        }
    }

    pub(crate) fn elements_mut(
        &mut self,
        element_type: ElementType,
    ) -> Option<&mut BTreeMap<Uid, FrameElement>> {
        match element_type {
            ElementType::Object => Some(&mut self.objects),
            ElementType::Action => Some(&mut self.actions),
            ElementType::Event => Some(&mut self.events),
            ElementType::Context => Some(&mut self.contexts),
            ElementType::Relation => Some(&mut self.relations),
            ElementType::Tag => None,
        }
    }

    pub fn contains(&self, element_type: ElementType, uid: &Uid) -> bool {
        self.elements(element_type)
            .is_some_and(|elements| elements.contains_key(uid))
    }

    pub fn element(&self, element_type: ElementType, uid: &Uid) -> Option<&FrameElement> {
        self.elements(element_type)?.get(uid)
    }

    #[inline]
    pub fn has_properties(&self) -> bool {
        self.frame_properties.is_some()
    }

    /// Number of element entries across all types.
    pub fn element_count(&self) -> usize {
        ElementType::FRAMED
            .iter()
            .filter_map(|t| self.elements(*t))
            .map(BTreeMap::len)
            .sum()
    }

    /// True if the frame holds neither element entries nor properties.
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0 && !self.has_properties()
    }
}

struct TypedFrameElement<'a>(ElementType, &'a FrameElement);

impl Serialize for TypedFrameElement<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.1.data.is_empty() {
            map.serialize_entry(self.0.data_key(), &self.1.data)?;
        }
        map.end()
    }
}

struct TypedFrameElements<'a>(ElementType, &'a BTreeMap<Uid, FrameElement>);

impl Serialize for TypedFrameElements<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.1.len()))?;
        for (uid, entry) in self.1 {
            map.serialize_entry(uid, &TypedFrameElement(self.0, entry))?;
        }
        map.end()
    }
}

impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for element_type in ElementType::FRAMED {
            if let Some(elements) = self.elements(element_type).filter(|e| !e.is_empty()) {
                map.serialize_entry(
                    element_type.plural(),
                    &TypedFrameElements(element_type, elements),
                )?;
            }
        }
        if let Some(properties) = &self.frame_properties {
            map.serialize_entry("frame_properties", properties)?;
        }
        map.end()
    }
}
