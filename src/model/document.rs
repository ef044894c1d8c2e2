//! The document tree.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::element::{Element, TypedElement};
use super::frame::Frame;
use super::frame_intervals::FrameIntervals;
use super::kinds::ElementType;
use super::registry::{CoordinateSystem, Metadata, Ontology, Stream};
use super::uid::Uid;

/// Root key and schema-version convention of a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `{"openlabel": {...}}`
    #[default]
    OpenLabel,
    /// `{"vcd": {...}}`
    Vcd,
}

impl Dialect {
    pub fn root_key(&self) -> &'static str {
        match self {
            Dialect::OpenLabel => "openlabel",
            Dialect::Vcd => "vcd",
        }
    }

    pub fn default_schema_version(&self) -> &'static str {
        match self {
            Dialect::OpenLabel => "1.0.0",
            Dialect::Vcd => "4.3.1",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_key())
    }
}

/// One element map per element type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Elements {
    pub objects: BTreeMap<Uid, Element>,
    pub actions: BTreeMap<Uid, Element>,
    pub events: BTreeMap<Uid, Element>,
    pub contexts: BTreeMap<Uid, Element>,
    pub relations: BTreeMap<Uid, Element>,
    pub tags: BTreeMap<Uid, Element>,
}

impl Elements {
    pub fn of(&self, element_type: ElementType) -> &BTreeMap<Uid, Element> {
        match element_type {
            ElementType::Object => &self.objects,
            ElementType::Action => &self.actions,
            ElementType::Event => &self.events,
            ElementType::Context => &self.contexts,
            ElementType::Relation => &self.relations,
            ElementType::Tag => &self.tags,
        }
    }

    pub(crate) fn of_mut(&mut self, element_type: ElementType) -> &mut BTreeMap<Uid, Element> {
        match element_type {
            ElementType::Object => &mut self.objects,
            ElementType::Action => &mut self.actions,
            ElementType::Event => &mut self.events,
            ElementType::Context => &mut self.contexts,
            ElementType::Relation => &mut self.relations,
            ElementType::Tag => &mut self.tags,
        }
    }

    /// Every element of every type.
    pub fn iter(&self) -> impl Iterator<Item = (ElementType, &Uid, &Element)> + '_ {
        ElementType::ALL
            .into_iter()
            .flat_map(move |t| self.of(t).iter().map(move |(uid, el)| (t, uid, el)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    pub metadata: Metadata,
    pub ontologies: BTreeMap<u64, Ontology>,
    pub resources: BTreeMap<u64, String>,
    pub streams: BTreeMap<String, Stream>,
    pub coordinate_systems: BTreeMap<String, CoordinateSystem>,
    pub elements: Elements,
    pub frame_intervals: FrameIntervals,
    pub frames: BTreeMap<u64, Frame>,
}

/// Wire layout of a document body, element maps inline.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    ontologies: BTreeMap<u64, Ontology>,
    #[serde(default)]
    resources: BTreeMap<u64, String>,
    #[serde(default)]
    streams: BTreeMap<String, Stream>,
    #[serde(default)]
    coordinate_systems: BTreeMap<String, CoordinateSystem>,
    #[serde(default)]
    objects: BTreeMap<Uid, Element>,
    #[serde(default)]
    actions: BTreeMap<Uid, Element>,
    #[serde(default)]
    events: BTreeMap<Uid, Element>,
    #[serde(default)]
    contexts: BTreeMap<Uid, Element>,
    #[serde(default)]
    relations: BTreeMap<Uid, Element>,
    #[serde(default)]
    tags: BTreeMap<Uid, Element>,
    #[serde(default)]
    frame_intervals: FrameIntervals,
    #[serde(default)]
    frames: BTreeMap<u64, Frame>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        Document {
            metadata: raw.metadata,
            ontologies: raw.ontologies,
            resources: raw.resources,
            streams: raw.streams,
            coordinate_systems: raw.coordinate_systems,
            elements: Elements {
                objects: raw.objects,
                actions: raw.actions,
                events: raw.events,
                contexts: raw.contexts,
                relations: raw.relations,
                tags: raw.tags,
            },
            frame_intervals: raw.frame_intervals,
            frames: raw.frames,
        }
    }
}

impl Document {
    pub fn element(&self, element_type: ElementType, uid: &Uid) -> Option<&Element> {
        self.elements.of(element_type).get(uid)
    }

    pub(crate) fn element_mut(&mut self, element_type: ElementType, uid: &Uid) -> Option<&mut Element> {
        self.elements.of_mut(element_type).get_mut(uid)
    }
}

struct TypedElements<'a>(ElementType, &'a BTreeMap<Uid, Element>);

impl Serialize for TypedElements<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.1.len()))?;
        for (uid, el) in self.1 {
            map.serialize_entry(uid, &TypedElement(self.0, el))?;
        }
        map.end()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("metadata", &self.metadata)?;
        if !self.ontologies.is_empty() {
            map.serialize_entry("ontologies", &self.ontologies)?;
        }
        if !self.resources.is_empty() {
            map.serialize_entry("resources", &self.resources)?;
        }
        if !self.streams.is_empty() {
            map.serialize_entry("streams", &self.streams)?;
        }
        if !self.coordinate_systems.is_empty() {
            map.serialize_entry("coordinate_systems", &self.coordinate_systems)?;
        }
        for element_type in ElementType::ALL {
            let elements = self.elements.of(element_type);
            if !elements.is_empty() {
                map.serialize_entry(element_type.plural(), &TypedElements(element_type, elements))?;
            }
        }
        if !self.frame_intervals.is_empty() {
            map.serialize_entry("frame_intervals", &self.frame_intervals)?;
        }
        if !self.frames.is_empty() {
            map.serialize_entry("frames", &self.frames)?;
        }
        map.end()
    }
}

/// A document together with the root key it is serialized under.
pub struct Envelope<'a> {
    pub dialect: Dialect,
    pub document: &'a Document,
}

impl Serialize for Envelope<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.dialect.root_key(), self.document)?;
        map.end()
    }
}

#[derive(Deserialize)]
pub(crate) struct RawEnvelope {
    #[serde(default)]
    openlabel: Option<Document>,
    #[serde(default)]
    vcd: Option<Document>,
}

impl RawEnvelope {
    pub(crate) fn into_parts(self) -> Result<(Dialect, Document), String> {
        match (self.openlabel, self.vcd) {
            (Some(doc), None) => Ok((Dialect::OpenLabel, doc)),
            (None, Some(doc)) => Ok((Dialect::Vcd, doc)),
            (Some(_), Some(_)) => Err("document has both 'openlabel' and 'vcd' roots".to_string()),
            (None, None) => Err("document has neither an 'openlabel' nor a 'vcd' root".to_string()),
        }
    }
}
