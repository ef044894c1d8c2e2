//! Value types and wire format of annotation documents.
//!
//! This module holds the data model only: frame intervals, UIDs, element
//! and data kinds, element records, frames and the document tree, plus JSON
//! I/O. Keeping the per-element summary, the per-frame index and the
//! document-level frame intervals consistent is the job of
//! [`crate::store::Vcd`].

pub mod data;
pub mod document;
pub mod element;
pub mod frame;
pub mod frame_intervals;
pub mod io_json;
pub mod kinds;
pub mod mesh;
pub mod payload;
pub mod registry;
pub mod uid;

pub use data::{DataMap, ElementData};
pub use document::{Dialect, Document, Elements};
pub use element::{DataPointer, Element, RdfRef, RdfRole};
pub use frame::{Frame, FrameElement};
pub use frame_intervals::{FrameInterval, FrameIntervals, MAX_FRAME_NUMBER};
pub use kinds::{DataKind, ElementType};
pub use mesh::{Mesh, MeshPoint, MeshReference};
pub use payload::{
    Bbox, Binary, Boolean, Cuboid, GeometricReference, Image, Mat, Num, Payload, Point2d, Point3d,
    Poly2d, Poly2dValue, Poly3d, Rbbox, Text, VecData, VecValue,
};
pub use registry::{CoordinateSystem, Metadata, Ontology, Stream};
pub use uid::Uid;
