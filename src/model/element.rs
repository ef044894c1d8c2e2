//! Element records: the per-element summary kept at the document root.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::data::DataMap;
use super::frame_intervals::FrameIntervals;
use super::kinds::{DataKind, ElementType};
use super::uid::Uid;

/// Where a named datum of an element is defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPointer {
    #[serde(rename = "type")]
    pub kind: DataKind,
    /// Empty when the datum is static (stored at the element root).
    #[serde(default)]
    pub frame_intervals: FrameIntervals,
    /// Attribute name to attribute kind.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, DataKind>,
}

/// One endpoint of a relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfRef {
    pub uid: Uid,
    #[serde(rename = "type")]
    pub element_type: ElementType,
}

/// Which end of a relation an RDF reference is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RdfRole {
    Subject,
    Object,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub semantic_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ontology_uid: Option<String>,
    #[serde(default)]
    pub resource_uid: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub coordinate_system: Option<String>,
    /// `None` for elements that have never been dynamic.
    #[serde(default)]
    pub frame_intervals: Option<FrameIntervals>,
    #[serde(
        default,
        rename = "object_data",
        alias = "action_data",
        alias = "event_data",
        alias = "context_data",
        alias = "relation_data",
        alias = "tag_data"
    )]
    pub data: DataMap,
    #[serde(
        default,
        rename = "object_data_pointers",
        alias = "action_data_pointers",
        alias = "event_data_pointers",
        alias = "context_data_pointers",
        alias = "relation_data_pointers",
        alias = "tag_data_pointers"
    )]
    pub data_pointers: BTreeMap<String, DataPointer>,
    #[serde(default)]
    pub rdf_subjects: Vec<RdfRef>,
    #[serde(default)]
    pub rdf_objects: Vec<RdfRef>,
}

static STATIC_FRAMES: FrameIntervals = FrameIntervals::new();

impl Element {
    pub fn new(name: impl Into<String>, semantic_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            semantic_type: semantic_type.into(),
            ..Self::default()
        }
    }

    /// The element's frame intervals; empty for static elements.
    pub fn frames(&self) -> &FrameIntervals {
        self.frame_intervals.as_ref().unwrap_or(&STATIC_FRAMES)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.frames().is_empty()
    }

    pub fn rdf(&self, role: RdfRole) -> &[RdfRef] {
        match role {
            RdfRole::Subject => &self.rdf_subjects,
            RdfRole::Object => &self.rdf_objects,
        }
    }

    pub(crate) fn rdf_mut(&mut self, role: RdfRole) -> &mut Vec<RdfRef> {
        match role {
            RdfRole::Subject => &mut self.rdf_subjects,
            RdfRole::Object => &mut self.rdf_objects,
        }
    }

    /// True if any RDF endpoint of this element refers to `target`.
    pub fn references(&self, target: RdfRef) -> bool {
        self.rdf_subjects.contains(&target) || self.rdf_objects.contains(&target)
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or integer uid, got {}",
            other
        ))),
    }
}

/// An element serialized with the key names of its type.
pub(crate) struct TypedElement<'a>(pub ElementType, pub &'a Element);

impl Serialize for TypedElement<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let TypedElement(element_type, el) = *self;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &el.name)?;
        map.serialize_entry("type", &el.semantic_type)?;
        if let Some(ontology_uid) = &el.ontology_uid {
            map.serialize_entry("ontology_uid", ontology_uid)?;
        }
        if let Some(resource_uid) = &el.resource_uid {
            map.serialize_entry("resource_uid", resource_uid)?;
        }
        if let Some(cs) = &el.coordinate_system {
            map.serialize_entry("coordinate_system", cs)?;
        }
        if let Some(fis) = &el.frame_intervals {
            map.serialize_entry("frame_intervals", fis)?;
        }
        if !el.data.is_empty() {
            map.serialize_entry(element_type.data_key(), &el.data)?;
        }
        if !el.data_pointers.is_empty() {
            map.serialize_entry(element_type.pointers_key(), &el.data_pointers)?;
        }
        if element_type == ElementType::Relation {
            map.serialize_entry("rdf_subjects", &el.rdf_subjects)?;
            map.serialize_entry("rdf_objects", &el.rdf_objects)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::data::ElementData;
    use serde_json::json;

    #[test]
    fn test_typed_serialization_uses_type_keys() {
        let mut el = Element::new("marcos", "Person");
        el.data.upsert(ElementData::text("color", "Pink"));
        el.data_pointers.insert(
            "color".into(),
            DataPointer {
                kind: DataKind::Text,
                frame_intervals: FrameIntervals::new(),
                attributes: BTreeMap::new(),
            },
        );
        let value = serde_json::to_value(TypedElement(ElementType::Action, &el)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "marcos",
                "type": "Person",
                "action_data": {"text": [{"name": "color", "val": "Pink"}]},
                "action_data_pointers": {"color": {"type": "text", "frame_intervals": []}}
            })
        );
    }

    #[test]
    fn test_relation_always_has_rdf_lists() {
        let el = Element::new("r", "isNear");
        let value = serde_json::to_value(TypedElement(ElementType::Relation, &el)).unwrap();
        assert_eq!(value["rdf_subjects"], json!([]));
        assert_eq!(value["rdf_objects"], json!([]));
    }

    #[test]
    fn test_deserialize_with_aliases() {
        let el: Element = serde_json::from_value(json!({
            "name": "walk",
            "type": "Walking",
            "ontology_uid": 0,
            "frame_intervals": [{"frame_start": 0, "frame_end": 5}],
            "context_data": {"num": [{"name": "speed", "val": 1.5}]}
        }))
        .unwrap();
        assert_eq!(el.ontology_uid.as_deref(), Some("0"));
        assert_eq!(el.frames().length(), 6);
        assert!(el.data.get(DataKind::Num, "speed").is_some());
    }

    #[test]
    fn test_static_element_has_empty_frames() {
        let el = Element::new("a", "b");
        assert!(el.is_static());
        assert!(el.frame_intervals.is_none());
    }
}
