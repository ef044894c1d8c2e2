//! The document store: an owned annotation document plus the bookkeeping
//! needed to keep its three views in sync.
//!
//! Every element lives in three places at once: its record at the document
//! root, its entries in the per-frame index and the document-level frame
//! intervals. Callers never touch the frame maps directly. All mutations go
//! through [`Vcd`], whose element and element-data operations finish with a
//! single reconciliation step so that after any public call:
//!
//! - the document's frame intervals are the union of every dynamic element's
//!   intervals and every frame carrying frame properties;
//! - a dynamic element appears in exactly the frames of its intervals;
//! - a static element appears in every document frame (relations and tags
//!   excepted);
//! - every data pointer's intervals lie inside its element's intervals;
//! - no empty frame survives.
//!
//! Referential misses (unknown element, unknown relation endpoint) are not
//! errors: they log a warning and return `false` or `None`. Malformed input
//! is rejected with an error before anything is touched.

mod element_data;
mod elements;
mod frames;
mod query;
mod registry;
mod uid_registry;

pub use uid_registry::{UidMode, UidRegistry};

use std::collections::BTreeMap;
use std::path::Path;

use tracing::warn;

use crate::error::VcdError;
use crate::model::{io_json, DataKind, Dialect, Document, FrameIntervals, Uid};
use crate::sanity::SchemaValidator;

/// How a new set of frame intervals combines with the existing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SetMode {
    /// Extend: the result is the union of old and new.
    #[default]
    Union,
    /// Overwrite: the result is exactly the new intervals.
    Replace,
}

impl SetMode {
    /// The mode actually applied to element data.
    ///
    /// Static data cannot be unioned with itself, so an empty interval set in
    /// union mode is treated as replace. Meshes are exempt because they mix
    /// static and per-frame parts.
    pub fn for_data(self, frame_intervals: &FrameIntervals, kind: DataKind) -> SetMode {
        match self {
            SetMode::Union if frame_intervals.is_empty() && kind != DataKind::Mesh => SetMode::Replace,
            mode => mode,
        }
    }
}

/// Construction-time configuration of a store.
#[derive(Clone, Debug, Default)]
pub struct StoreOptions {
    pub dialect: Dialect,
    pub uid_mode: UidMode,
    /// Overrides the dialect's default schema version.
    pub schema_version: Option<String>,
}

/// Arguments of [`Vcd::set_element`].
///
/// Fields left as `None` keep their current value when the element already
/// exists.
#[derive(Clone, Debug, Default)]
pub struct ElementArgs {
    pub name: Option<String>,
    pub semantic_type: Option<String>,
    pub frame_intervals: FrameIntervals,
    pub uid: Option<Uid>,
    pub ontology_uid: Option<String>,
    pub coordinate_system: Option<String>,
    pub resource_uid: Option<BTreeMap<String, String>>,
    pub mode: SetMode,
}

impl ElementArgs {
    pub fn new(name: impl Into<String>, semantic_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            semantic_type: Some(semantic_type.into()),
            ..Self::default()
        }
    }

    /// Arguments that only touch an existing element's frame intervals.
    pub fn for_uid(uid: Uid) -> Self {
        Self {
            uid: Some(uid),
            ..Self::default()
        }
    }

    pub fn frames(mut self, frame_intervals: FrameIntervals) -> Self {
        self.frame_intervals = frame_intervals;
        self
    }

    pub fn uid(mut self, uid: impl Into<Uid>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn ontology(mut self, ontology_uid: impl ToString) -> Self {
        self.ontology_uid = Some(ontology_uid.to_string());
        self
    }

    pub fn coordinate_system(mut self, coordinate_system: impl Into<String>) -> Self {
        self.coordinate_system = Some(coordinate_system.into());
        self
    }

    pub fn resource(mut self, resource_uid: BTreeMap<String, String>) -> Self {
        self.resource_uid = Some(resource_uid);
        self
    }

    pub fn mode(mut self, mode: SetMode) -> Self {
        self.mode = mode;
        self
    }
}

/// An annotation document under construction.
#[derive(Clone, Debug, Default)]
pub struct Vcd {
    document: Document,
    dialect: Dialect,
    uids: UidRegistry,
}

impl Vcd {
    /// An empty OpenLABEL document with integer UIDs.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        let mut document = Document::default();
        document.metadata.schema_version = options
            .schema_version
            .unwrap_or_else(|| options.dialect.default_schema_version().to_string());
        Self {
            document,
            dialect: options.dialect,
            uids: UidRegistry::new(options.uid_mode),
        }
    }

    /// Wraps an existing document, recomputing the UID counters from its
    /// keys. The document is taken as is; use [`crate::sanity`] to check it.
    pub fn from_document(dialect: Dialect, document: Document) -> Self {
        let uids = UidRegistry::from_document(&document, UidMode::Integer);
        Self {
            document,
            dialect,
            uids,
        }
    }

    pub fn load(path: &Path) -> Result<Self, VcdError> {
        let (dialect, document) = io_json::read_document(path)?;
        Ok(Self::from_document(dialect, document))
    }

    pub fn from_json_str(json: &str) -> Result<Self, VcdError> {
        let (dialect, document) = io_json::from_json_str(json)?;
        Ok(Self::from_document(dialect, document))
    }

    pub fn save(&self, path: &Path, pretty: bool) -> Result<(), VcdError> {
        io_json::write_document(path, self.dialect, &self.document, pretty)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String, VcdError> {
        io_json::to_json_string(self.dialect, &self.document, pretty)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, VcdError> {
        io_json::to_json_value(self.dialect, &self.document)
    }

    /// Runs an external schema validator over the serialized document.
    ///
    /// # Errors
    /// Returns [`VcdError::SchemaViolation`] carrying the validator's
    /// messages when it reports any.
    pub fn validate_with(&self, validator: &dyn SchemaValidator) -> Result<(), VcdError> {
        let value = self.to_json_value()?;
        let messages = validator.validate(&value);
        if messages.is_empty() {
            Ok(())
        } else {
            Err(VcdError::SchemaViolation { messages })
        }
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Changes the root key used when serializing.
    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    #[inline]
    pub fn uid_mode(&self) -> UidMode {
        self.uids.mode()
    }

    pub fn set_uid_mode(&mut self, mode: UidMode) {
        self.uids.set_mode(mode);
    }

    pub(crate) fn require_coordinate_system(&self, name: Option<&str>) -> Result<(), VcdError> {
        match name {
            Some(name) if !self.document.coordinate_systems.contains_key(name) => {
                warn!(coordinate_system = name, "coordinate system is not declared");
                Err(VcdError::UnknownCoordinateSystem(name.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_on_static_data_becomes_replace() {
        let empty = FrameIntervals::new();
        assert_eq!(SetMode::Union.for_data(&empty, DataKind::Bbox), SetMode::Replace);
        assert_eq!(SetMode::Union.for_data(&empty, DataKind::Mesh), SetMode::Union);
        assert_eq!(
            SetMode::Union.for_data(&FrameIntervals::from_frame(3), DataKind::Bbox),
            SetMode::Union
        );
        assert_eq!(SetMode::Replace.for_data(&empty, DataKind::Mesh), SetMode::Replace);
    }

    #[test]
    fn test_options() {
        let vcd = Vcd::with_options(StoreOptions {
            dialect: Dialect::Vcd,
            uid_mode: UidMode::Uuid,
            schema_version: None,
        });
        assert_eq!(vcd.document().metadata.schema_version, "4.3.1");
        assert_eq!(vcd.uid_mode(), UidMode::Uuid);
        assert!(vcd.to_json_string(false).unwrap().starts_with("{\"vcd\":"));
    }

    #[test]
    fn test_validate_with_surfaces_messages() {
        let vcd = Vcd::new();
        let reject = |_: &serde_json::Value| vec!["nope".to_string()];
        let err = vcd.validate_with(&reject).unwrap_err();
        assert!(matches!(err, VcdError::SchemaViolation { ref messages } if messages == &["nope"]));
        let accept = |_: &serde_json::Value| Vec::new();
        assert!(vcd.validate_with(&accept).is_ok());
    }

    #[test]
    fn test_unknown_coordinate_system() {
        let vcd = Vcd::new();
        assert!(vcd.require_coordinate_system(None).is_ok());
        assert!(matches!(
            vcd.require_coordinate_system(Some("lidar")),
            Err(VcdError::UnknownCoordinateSystem(_))
        ));
    }
}
