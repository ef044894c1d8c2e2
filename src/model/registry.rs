//! Document-level registries: metadata, ontologies, resources, streams and
//! coordinate systems.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Free-form properties.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// An ontology reference: a bare URI or a richer description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ontology {
    Uri(String),
    Described(Map<String, Value>),
}

impl Ontology {
    pub fn uri(&self) -> Option<&str> {
        match self {
            Ontology::Uri(uri) => Some(uri),
            Ontology::Described(map) => map.get("uri").and_then(Value::as_str),
        }
    }
}

impl From<&str> for Ontology {
    fn from(uri: &str) -> Self {
        Ontology::Uri(uri.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    #[serde(rename = "type", default)]
    pub stream_type: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub stream_properties: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    #[serde(rename = "type", default)]
    pub cs_type: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose_wrt_parent: Option<Vec<f64>>,
    #[serde(default)]
    pub children: Vec<String>,
}
