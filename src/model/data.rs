//! Element data: named, typed values attached to elements, and the
//! per-kind buckets that hold them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::kinds::DataKind;
use super::mesh::Mesh;
use super::payload::*;
use crate::error::VcdError;
use crate::poly2d::Poly2dMode;

/// One named, typed value.
///
/// `attributes` may only hold `boolean`, `num`, `text` and `vec` data.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementData {
    pub name: Option<String>,
    pub payload: Payload,
    pub coordinate_system: Option<String>,
    pub attributes: DataMap,
}

impl ElementData {
    pub fn new(name: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            name: Some(name.into()),
            payload: payload.into(),
            coordinate_system: None,
            attributes: DataMap::default(),
        }
    }

    /// A datum without a name. Each write of an unnamed datum appends.
    pub fn unnamed(payload: impl Into<Payload>) -> Self {
        Self {
            name: None,
            payload: payload.into(),
            coordinate_system: None,
            attributes: DataMap::default(),
        }
    }

    pub fn bbox(name: impl Into<String>, val: [f64; 4]) -> Self {
        Self::new(name, Bbox { val })
    }

    pub fn rbbox(name: impl Into<String>, val: [f64; 5]) -> Self {
        Self::new(name, Rbbox { val })
    }

    pub fn num(name: impl Into<String>, val: f64) -> Self {
        Self::new(name, Num { val })
    }

    pub fn text(name: impl Into<String>, val: impl Into<String>) -> Self {
        Self::new(name, Text { val: val.into() })
    }

    pub fn boolean(name: impl Into<String>, val: bool) -> Self {
        Self::new(name, Boolean { val })
    }

    pub fn vec_numbers(name: impl Into<String>, val: Vec<f64>) -> Self {
        Self::new(
            name,
            VecData {
                val: VecValue::Numbers(val),
                vec_type: None,
            },
        )
    }

    pub fn vec_strings(name: impl Into<String>, val: Vec<String>) -> Self {
        Self::new(
            name,
            VecData {
                val: VecValue::Strings(val),
                vec_type: None,
            },
        )
    }

    pub fn point2d(name: impl Into<String>, val: [f64; 2]) -> Self {
        Self::new(name, Point2d { val, id: None })
    }

    pub fn point3d(name: impl Into<String>, val: [f64; 3]) -> Self {
        Self::new(name, Point3d { val, id: None })
    }

    pub fn poly2d(
        name: impl Into<String>,
        points: &[f64],
        mode: Poly2dMode,
        closed: bool,
    ) -> Result<Self, VcdError> {
        Ok(Self::new(name, Poly2d::new(points, mode, closed)?))
    }

    pub fn poly3d(name: impl Into<String>, val: Vec<f64>, closed: bool) -> Result<Self, VcdError> {
        Self::checked(name, Poly3d { val, closed })
    }

    pub fn cuboid(name: impl Into<String>, val: Vec<f64>) -> Result<Self, VcdError> {
        Self::checked(name, Cuboid { val })
    }

    pub fn image(
        name: impl Into<String>,
        val: impl Into<String>,
        mime_type: impl Into<String>,
        encoding: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            Image {
                val: val.into(),
                mime_type: mime_type.into(),
                encoding: encoding.into(),
            },
        )
    }

    pub fn binary(
        name: impl Into<String>,
        val: impl Into<String>,
        data_type: impl Into<String>,
        encoding: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            Binary {
                val: val.into(),
                data_type: data_type.into(),
                encoding: encoding.into(),
            },
        )
    }

    pub fn mat(
        name: impl Into<String>,
        val: Vec<f64>,
        channels: u32,
        width: u32,
        height: u32,
        data_type: impl Into<String>,
    ) -> Result<Self, VcdError> {
        Self::checked(
            name,
            Mat {
                val,
                channels,
                width,
                height,
                data_type: data_type.into(),
            },
        )
    }

    pub fn line_reference(name: impl Into<String>, val: Vec<u64>, reference_type: DataKind) -> Self {
        Self::new(
            name,
            Payload::LineReference(GeometricReference {
                val,
                reference_type,
            }),
        )
    }

    pub fn area_reference(name: impl Into<String>, val: Vec<u64>, reference_type: DataKind) -> Self {
        Self::new(
            name,
            Payload::AreaReference(GeometricReference {
                val,
                reference_type,
            }),
        )
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::new(name, mesh)
    }

    fn checked(name: impl Into<String>, payload: impl Into<Payload>) -> Result<Self, VcdError> {
        let data = Self::new(name, payload);
        data.payload.validate()?;
        Ok(data)
    }

    pub fn with_coordinate_system(mut self, coordinate_system: impl Into<String>) -> Self {
        self.coordinate_system = Some(coordinate_system.into());
        self
    }

    pub fn with_attribute(mut self, attribute: ElementData) -> Result<Self, VcdError> {
        self.add_attribute(attribute)?;
        Ok(self)
    }

    /// Adds an attribute, replacing a same-named one of the same kind.
    pub fn add_attribute(&mut self, attribute: ElementData) -> Result<(), VcdError> {
        let kind = attribute.kind();
        if !kind.is_attribute_kind() {
            return Err(invalid(
                kind,
                "attributes must be boolean, num, text or vec".to_string(),
            ));
        }
        if attribute.name.is_none() {
            return Err(invalid(kind, "attributes must be named".to_string()));
        }
        attribute.payload.validate()?;
        self.attributes.upsert(attribute);
        Ok(())
    }

    #[inline]
    pub fn kind(&self) -> DataKind {
        self.payload.kind()
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Attribute name to kind, as recorded in data pointers.
    pub fn attribute_kinds(&self) -> BTreeMap<String, DataKind> {
        self.attributes
            .iter()
            .filter_map(|(kind, attr)| attr.name.clone().map(|name| (name, kind)))
            .collect()
    }

    /// Validates the payload and every attribute.
    pub fn validate(&self) -> Result<(), VcdError> {
        self.payload.validate()?;
        self.attributes.validate_attributes()
    }

    /// Reads a datum of the given kind from its JSON object form.
    pub fn from_value(kind: DataKind, value: Value) -> Result<Self, VcdError> {
        let Value::Object(mut fields) = value else {
            return Err(invalid(kind, format!("expected an object, got {}", value)));
        };
        let name = optional_string(kind, "name", fields.remove("name"))?;
        let coordinate_system =
            optional_string(kind, "coordinate_system", fields.remove("coordinate_system"))?;
        let attributes = match fields.remove("attributes") {
            None | Some(Value::Null) => DataMap::default(),
            Some(v) => serde_json::from_value(v).map_err(|e| invalid(kind, e.to_string()))?,
        };

        let rest = Value::Object(fields);
        let payload = match kind {
            DataKind::Bbox => Payload::Bbox(parse(kind, rest)?),
            DataKind::Rbbox => Payload::Rbbox(parse(kind, rest)?),
            DataKind::Num => Payload::Num(parse(kind, rest)?),
            DataKind::Text => Payload::Text(parse(kind, rest)?),
            DataKind::Boolean => Payload::Boolean(parse(kind, rest)?),
            DataKind::Vec => Payload::Vec(parse(kind, rest)?),
            DataKind::Point2d => Payload::Point2d(parse(kind, rest)?),
            DataKind::Point3d => Payload::Point3d(parse(kind, rest)?),
            DataKind::Poly2d => Payload::Poly2d(parse(kind, rest)?),
            DataKind::Poly3d => Payload::Poly3d(parse(kind, rest)?),
            DataKind::Cuboid => Payload::Cuboid(parse(kind, rest)?),
            DataKind::Image => Payload::Image(parse(kind, rest)?),
            DataKind::Binary => Payload::Binary(parse(kind, rest)?),
            DataKind::Mat => Payload::Mat(parse(kind, rest)?),
            DataKind::LineReference => Payload::LineReference(parse(kind, rest)?),
            DataKind::AreaReference => Payload::AreaReference(parse(kind, rest)?),
            DataKind::Mesh => Payload::Mesh(parse(kind, rest)?),
        };

        let data = ElementData {
            name,
            payload,
            coordinate_system,
            attributes,
        };
        data.validate()?;
        Ok(data)
    }
}

fn parse<P: DeserializeOwned>(kind: DataKind, value: Value) -> Result<P, VcdError> {
    serde_json::from_value(value).map_err(|e| invalid(kind, e.to_string()))
}

fn optional_string(
    kind: DataKind,
    field: &str,
    value: Option<Value>,
) -> Result<Option<String>, VcdError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(invalid(
            kind,
            format!("'{}' must be a string, got {}", field, other),
        )),
    }
}

/// Serialized form: `name`, then the kind's own fields, then
/// `coordinate_system` and `attributes`.
#[derive(Serialize)]
struct ItemRef<'a, P: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(flatten)]
    payload: &'a P,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinate_system: Option<&'a str>,
    #[serde(skip_serializing_if = "DataMap::is_empty")]
    attributes: &'a DataMap,
}

impl Serialize for ElementData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        macro_rules! item {
            ($payload:expr) => {
                ItemRef {
                    name: self.name.as_deref(),
                    payload: $payload,
                    coordinate_system: self.coordinate_system.as_deref(),
                    attributes: &self.attributes,
                }
                .serialize(serializer)
            };
        }
        match &self.payload {
            Payload::Bbox(p) => item!(p),
            Payload::Rbbox(p) => item!(p),
            Payload::Num(p) => item!(p),
            Payload::Text(p) => item!(p),
            Payload::Boolean(p) => item!(p),
            Payload::Vec(p) => item!(p),
            Payload::Point2d(p) => item!(p),
            Payload::Point3d(p) => item!(p),
            Payload::Poly2d(p) => item!(p),
            Payload::Poly3d(p) => item!(p),
            Payload::Cuboid(p) => item!(p),
            Payload::Image(p) => item!(p),
            Payload::Binary(p) => item!(p),
            Payload::Mat(p) => item!(p),
            Payload::LineReference(p) => item!(p),
            Payload::AreaReference(p) => item!(p),
            Payload::Mesh(p) => item!(p),
        }
    }
}

/// Element data grouped into one bucket per kind.
///
/// Within a bucket a name occurs at most once; unnamed entries may repeat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataMap(BTreeMap<DataKind, Vec<ElementData>>);

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of data entries across all buckets.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn bucket(&self, kind: DataKind) -> &[ElementData] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn kinds(&self) -> impl Iterator<Item = DataKind> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DataKind, &ElementData)> + '_ {
        self.0
            .iter()
            .flat_map(|(kind, items)| items.iter().map(move |item| (*kind, item)))
    }

    pub fn get(&self, kind: DataKind, name: &str) -> Option<&ElementData> {
        self.bucket(kind).iter().find(|d| d.name() == Some(name))
    }

    /// Finds a datum by name in any bucket.
    pub fn find(&self, name: &str) -> Option<&ElementData> {
        self.0
            .values()
            .flat_map(|items| items.iter())
            .find(|d| d.name() == Some(name))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Inserts `data`, replacing a same-named entry of the same kind in
    /// place. Unnamed data is appended.
    pub fn upsert(&mut self, data: ElementData) {
        let bucket = self.0.entry(data.kind()).or_default();
        if let Some(name) = data.name.as_deref() {
            if let Some(slot) = bucket.iter_mut().find(|d| d.name() == Some(name)) {
                *slot = data;
                return;
            }
        }
        bucket.push(data);
    }

    /// Removes every entry called `name` from all buckets, pruning empty
    /// buckets. Returns true if anything was removed.
    pub fn remove_named(&mut self, name: &str) -> bool {
        let before = self.len();
        for items in self.0.values_mut() {
            items.retain(|d| d.name() != Some(name));
        }
        self.0.retain(|_, items| !items.is_empty());
        self.len() != before
    }

    pub(crate) fn validate_attributes(&self) -> Result<(), VcdError> {
        for (kind, attribute) in self.iter() {
            if !kind.is_attribute_kind() {
                return Err(invalid(
                    kind,
                    "attributes must be boolean, num, text or vec".to_string(),
                ));
            }
            attribute.validate()?;
        }
        Ok(())
    }

    /// Buckets holding more than one entry with the same name.
    pub fn duplicate_names(&self) -> Vec<(DataKind, String)> {
        let mut duplicates = Vec::new();
        for (kind, items) in &self.0 {
            let mut seen = std::collections::BTreeSet::new();
            for name in items.iter().filter_map(ElementData::name) {
                if !seen.insert(name) {
                    duplicates.push((*kind, name.to_string()));
                }
            }
        }
        duplicates
    }
}

impl Serialize for DataMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<DataKind, Vec<Value>>::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for (kind, items) in raw {
            let parsed = items
                .into_iter()
                .map(|item| ElementData::from_value(kind, item))
                .collect::<Result<Vec<_>, _>>()
                .map_err(serde::de::Error::custom)?;
            if !parsed.is_empty() {
                map.insert(kind, parsed);
            }
        }
        Ok(DataMap(map))
    }
}
