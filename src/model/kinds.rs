//! Closed enumerations of element types and element-data kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six element families of the annotation model.
///
/// Each type owns one top-level map in the document and (except tags) one
/// per-frame map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Object,
    Action,
    Event,
    Context,
    Relation,
    Tag,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Object,
        ElementType::Action,
        ElementType::Event,
        ElementType::Context,
        ElementType::Relation,
        ElementType::Tag,
    ];

    /// Element types that may appear inside frames.
    pub const FRAMED: [ElementType; 5] = [
        ElementType::Object,
        ElementType::Action,
        ElementType::Event,
        ElementType::Context,
        ElementType::Relation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Object => "object",
            ElementType::Action => "action",
            ElementType::Event => "event",
            ElementType::Context => "context",
            ElementType::Relation => "relation",
            ElementType::Tag => "tag",
        }
    }

    /// Key of the document (and frame) map holding elements of this type.
    pub fn plural(&self) -> &'static str {
        match self {
            ElementType::Object => "objects",
            ElementType::Action => "actions",
            ElementType::Event => "events",
            ElementType::Context => "contexts",
            ElementType::Relation => "relations",
            ElementType::Tag => "tags",
        }
    }

    /// Key of the data map inside an element record or frame entry.
    pub fn data_key(&self) -> &'static str {
        match self {
            ElementType::Object => "object_data",
            ElementType::Action => "action_data",
            ElementType::Event => "event_data",
            ElementType::Context => "context_data",
            ElementType::Relation => "relation_data",
            ElementType::Tag => "tag_data",
        }
    }

    pub fn pointers_key(&self) -> &'static str {
        match self {
            ElementType::Object => "object_data_pointers",
            ElementType::Action => "action_data_pointers",
            ElementType::Event => "event_data_pointers",
            ElementType::Context => "context_data_pointers",
            ElementType::Relation => "relation_data_pointers",
            ElementType::Tag => "tag_data_pointers",
        }
    }

    /// Tags never carry frame intervals.
    #[inline]
    pub fn is_static_only(&self) -> bool {
        matches!(self, ElementType::Tag)
    }

    /// Static elements of this type are listed in every document frame.
    /// Relations and tags are not.
    #[inline]
    pub fn propagates_when_static(&self) -> bool {
        !matches!(self, ElementType::Relation | ElementType::Tag)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            ElementType::Object => 0,
            ElementType::Action => 1,
            ElementType::Event => 2,
            ElementType::Context => 3,
            ElementType::Relation => 4,
            ElementType::Tag => 5,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        ElementType::ALL
            .into_iter()
            .find(|t| t.as_str() == text || t.plural() == text)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payload kinds an element datum can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Bbox,
    Rbbox,
    Num,
    Text,
    Boolean,
    Vec,
    Point2d,
    Point3d,
    Poly2d,
    Poly3d,
    Cuboid,
    Image,
    Binary,
    Mat,
    LineReference,
    AreaReference,
    Mesh,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Bbox => "bbox",
            DataKind::Rbbox => "rbbox",
            DataKind::Num => "num",
            DataKind::Text => "text",
            DataKind::Boolean => "boolean",
            DataKind::Vec => "vec",
            DataKind::Point2d => "point2d",
            DataKind::Point3d => "point3d",
            DataKind::Poly2d => "poly2d",
            DataKind::Poly3d => "poly3d",
            DataKind::Cuboid => "cuboid",
            DataKind::Image => "image",
            DataKind::Binary => "binary",
            DataKind::Mat => "mat",
            DataKind::LineReference => "line_reference",
            DataKind::AreaReference => "area_reference",
            DataKind::Mesh => "mesh",
        }
    }

    /// Kinds allowed inside an `attributes` map.
    #[inline]
    pub fn is_attribute_kind(&self) -> bool {
        matches!(
            self,
            DataKind::Boolean | DataKind::Num | DataKind::Text | DataKind::Vec
        )
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
