//! Mesh payload: vertices plus edges and areas that reference them by id.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::data::DataMap;
use super::kinds::DataKind;
use crate::error::VcdError;

/// A named 3D vertex of a mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    pub name: String,
    pub val: [f64; 3],
    #[serde(default, skip_serializing_if = "DataMap::is_empty")]
    pub attributes: DataMap,
}

/// An edge (list of vertex ids) or area (list of edge ids) of a mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshReference {
    pub name: String,
    pub val: Vec<u64>,
    pub reference_type: DataKind,
    #[serde(default, skip_serializing_if = "DataMap::is_empty")]
    pub attributes: DataMap,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub point3d: BTreeMap<u64, MeshPoint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub line_reference: BTreeMap<u64, MeshReference>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub area_reference: BTreeMap<u64, MeshReference>,
}

fn next_id<V>(map: &BTreeMap<u64, V>) -> u64 {
    map.keys().next_back().map_or(0, |last| last + 1)
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a vertex. Without an explicit id the next free id
    /// (one past the largest) is used.
    pub fn add_vertex(&mut self, name: impl Into<String>, val: [f64; 3], id: Option<u64>) -> u64 {
        let id = id.unwrap_or_else(|| next_id(&self.point3d));
        self.point3d.insert(
            id,
            MeshPoint {
                name: name.into(),
                val,
                attributes: DataMap::default(),
            },
        );
        id
    }

    /// Adds or replaces an edge between two existing vertices.
    pub fn add_edge(
        &mut self,
        name: impl Into<String>,
        vertices: [u64; 2],
        id: Option<u64>,
    ) -> Result<u64, VcdError> {
        if let Some(missing) = vertices.iter().find(|v| !self.point3d.contains_key(*v)) {
            return Err(VcdError::InvalidData {
                kind: DataKind::Mesh,
                message: format!("edge references unknown vertex {}", missing),
            });
        }
        let id = id.unwrap_or_else(|| next_id(&self.line_reference));
        self.line_reference.insert(
            id,
            MeshReference {
                name: name.into(),
                val: vertices.to_vec(),
                reference_type: DataKind::Point3d,
                attributes: DataMap::default(),
            },
        );
        Ok(id)
    }

    /// Adds or replaces an area bounded by existing edges.
    pub fn add_area(
        &mut self,
        name: impl Into<String>,
        edges: Vec<u64>,
        id: Option<u64>,
    ) -> Result<u64, VcdError> {
        if let Some(missing) = edges.iter().find(|e| !self.line_reference.contains_key(*e)) {
            return Err(VcdError::InvalidData {
                kind: DataKind::Mesh,
                message: format!("area references unknown edge {}", missing),
            });
        }
        let id = id.unwrap_or_else(|| next_id(&self.area_reference));
        self.area_reference.insert(
            id,
            MeshReference {
                name: name.into(),
                val: edges,
                reference_type: DataKind::LineReference,
                attributes: DataMap::default(),
            },
        );
        Ok(id)
    }

    pub(crate) fn validate(&self) -> Result<(), VcdError> {
        for point in self.point3d.values() {
            if point.val.iter().any(|v| !v.is_finite()) {
                return Err(VcdError::InvalidData {
                    kind: DataKind::Mesh,
                    message: format!("vertex '{}' has non-finite coordinates", point.name),
                });
            }
            point.attributes.validate_attributes()?;
        }
        for edge in self.line_reference.values() {
            if edge.val.len() != 2 {
                return Err(VcdError::InvalidData {
                    kind: DataKind::Mesh,
                    message: format!(
                        "edge '{}' must reference 2 vertices, got {}",
                        edge.name,
                        edge.val.len()
                    ),
                });
            }
            edge.attributes.validate_attributes()?;
        }
        for area in self.area_reference.values() {
            area.attributes.validate_attributes()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increment() {
        let mut mesh = Mesh::new();
        assert_eq!(mesh.add_vertex("v0", [0.0, 0.0, 0.0], None), 0);
        assert_eq!(mesh.add_vertex("v1", [1.0, 0.0, 0.0], None), 1);
        assert_eq!(mesh.add_vertex("v5", [1.0, 1.0, 0.0], Some(5)), 5);
        assert_eq!(mesh.add_vertex("v6", [0.0, 1.0, 0.0], None), 6);
        assert_eq!(mesh.add_edge("e0", [0, 1], None).unwrap(), 0);
        assert_eq!(mesh.add_edge("e1", [1, 5], None).unwrap(), 1);
        assert_eq!(mesh.add_area("a0", vec![0, 1], None).unwrap(), 0);
    }

    #[test]
    fn test_dangling_references_rejected() {
        let mut mesh = Mesh::new();
        mesh.add_vertex("v0", [0.0, 0.0, 0.0], None);
        assert!(mesh.add_edge("e0", [0, 9], None).is_err());
        assert!(mesh.add_area("a0", vec![3], None).is_err());
    }

    #[test]
    fn test_wire_shape() {
        let mut mesh = Mesh::new();
        mesh.add_vertex("v0", [0.0, 1.0, 2.0], None);
        let json = serde_json::to_value(&mesh).unwrap();
        assert_eq!(json["point3d"]["0"]["name"], "v0");
        assert!(json.get("line_reference").is_none());
        let back: Mesh = serde_json::from_value(json).unwrap();
        assert_eq!(back, mesh);
    }
}
