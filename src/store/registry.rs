//! Metadata, ontologies, resources, streams and coordinate systems.

use serde_json::{Map, Value};
use tracing::warn;

use super::Vcd;
use crate::error::VcdError;
use crate::model::{CoordinateSystem, Metadata, Ontology, Stream};

impl Vcd {
    pub fn metadata(&self) -> &Metadata {
        &self.document.metadata
    }

    pub fn add_name(&mut self, name: &str) {
        self.document.metadata.name = Some(name.to_string());
    }

    pub fn add_annotator(&mut self, annotator: &str) {
        self.document.metadata.annotator = Some(annotator.to_string());
    }

    pub fn add_comment(&mut self, comment: &str) {
        self.document.metadata.comment = Some(comment.to_string());
    }

    /// Merges free-form properties into the metadata, overwriting keys that
    /// already exist.
    pub fn add_metadata_properties(&mut self, properties: Map<String, Value>) {
        self.document.metadata.properties.extend(properties);
    }

    /// Registers an ontology and returns its index, or `None` if the same
    /// ontology is already registered.
    pub fn add_ontology(&mut self, ontology: impl Into<Ontology>) -> Option<u64> {
        let ontology = ontology.into();
        if self.document.ontologies.values().any(|o| *o == ontology) {
            warn!(?ontology, "ontology is already registered");
            return None;
        }
        let index = next_index(self.document.ontologies.keys());
        self.document.ontologies.insert(index, ontology);
        Some(index)
    }

    pub fn get_ontology(&self, index: u64) -> Option<&Ontology> {
        self.document.ontologies.get(&index)
    }

    /// Registers a resource URI and returns its index, or `None` if it is
    /// already registered.
    pub fn add_resource(&mut self, uri: &str) -> Option<u64> {
        if self.document.resources.values().any(|r| r == uri) {
            warn!(uri, "resource is already registered");
            return None;
        }
        let index = next_index(self.document.resources.keys());
        self.document.resources.insert(index, uri.to_string());
        Some(index)
    }

    pub fn get_resource(&self, index: u64) -> Option<&str> {
        self.document.resources.get(&index).map(String::as_str)
    }

    /// Declares (or redeclares) a sensor stream.
    pub fn add_stream(&mut self, name: &str, uri: &str, description: &str, stream_type: &str) {
        let stream = self.document.streams.entry(name.to_string()).or_default();
        stream.uri = uri.to_string();
        stream.description = description.to_string();
        stream.stream_type = stream_type.to_string();
    }

    pub fn add_stream_properties(&mut self, name: &str, properties: Map<String, Value>) -> bool {
        let Some(stream) = self.document.streams.get_mut(name) else {
            warn!(stream = name, "stream is not declared");
            return false;
        };
        stream.stream_properties.extend(properties);
        true
    }

    pub fn get_stream(&self, name: &str) -> Option<&Stream> {
        self.document.streams.get(name)
    }

    /// Declares a coordinate system and links it under its parent.
    ///
    /// An empty `parent` declares a root. Redeclaring a system moves it to
    /// the new parent and keeps its own children.
    ///
    /// # Errors
    /// Returns [`VcdError::UnknownCoordinateSystem`] if the parent is not
    /// declared.
    pub fn add_coordinate_system(
        &mut self,
        name: &str,
        cs_type: &str,
        parent: &str,
        pose_wrt_parent: Option<Vec<f64>>,
    ) -> Result<(), VcdError> {
        if !parent.is_empty() {
            self.require_coordinate_system(Some(parent))?;
        }

        let systems = &mut self.document.coordinate_systems;
        let previous_parent = systems.get(name).map(|cs| cs.parent.clone());
        if let Some(old) = previous_parent.filter(|old| !old.is_empty() && old != parent) {
            if let Some(old) = systems.get_mut(&old) {
                old.children.retain(|child| child != name);
            }
        }

        let entry = systems
            .entry(name.to_string())
            .or_insert_with(CoordinateSystem::default);
        entry.cs_type = cs_type.to_string();
        entry.parent = parent.to_string();
        entry.pose_wrt_parent = pose_wrt_parent;

        if let Some(parent) = systems.get_mut(parent) {
            if !parent.children.iter().any(|child| child == name) {
                parent.children.push(name.to_string());
            }
        }
        Ok(())
    }

    pub fn has_coordinate_system(&self, name: &str) -> bool {
        self.document.coordinate_systems.contains_key(name)
    }

    pub fn get_coordinate_system(&self, name: &str) -> Option<&CoordinateSystem> {
        self.document.coordinate_systems.get(name)
    }
}

fn next_index<'a>(keys: impl Iterator<Item = &'a u64>) -> u64 {
    keys.max().map_or(0, |last| last + 1)
}
