//! Kind-specific payload fields of element data.
//!
//! Each struct holds exactly the fields that sit next to `name`,
//! `coordinate_system` and `attributes` in a serialized datum.

use serde::{Deserialize, Serialize};

use super::kinds::DataKind;
use super::mesh::Mesh;
use crate::error::VcdError;
use crate::poly2d::{self, ChainCode, Poly2dMode};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    /// `[x_center, y_center, width, height]`
    pub val: [f64; 4],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rbbox {
    /// `[x_center, y_center, width, height, alpha]`
    pub val: [f64; 5],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Num {
    pub val: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub val: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boolean {
    pub val: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VecValue {
    Numbers(Vec<f64>),
    Strings(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VecData {
    pub val: VecValue,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub vec_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point2d {
    pub val: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub val: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// `val` of a 2D polygon: a flat coordinate list in absolute mode, or
/// `[xinit, yinit, rest, code]` strings in chain-code mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Poly2dValue {
    Points(Vec<f64>),
    Encoded(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poly2d {
    pub val: Poly2dValue,
    pub mode: Poly2dMode,
    pub closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Vec<i64>>,
}

impl Poly2d {
    /// Builds a polygon from flat `[x0, y0, x1, y1, ...]` coordinates.
    ///
    /// In chain-code mode the coordinates are rounded to integers first.
    pub fn new(points: &[f64], mode: Poly2dMode, closed: bool) -> Result<Self, VcdError> {
        check_finite(DataKind::Poly2d, points)?;
        if points.len() % 2 != 0 {
            return Err(invalid(
                DataKind::Poly2d,
                format!("expected x, y pairs, got {} value(s)", points.len()),
            ));
        }
        let val = match mode {
            Poly2dMode::Absolute => Poly2dValue::Points(points.to_vec()),
            Poly2dMode::Srf6dcc => {
                let rounded = points
                    .iter()
                    .enumerate()
                    .map(|(i, v)| round_coordinate(i, *v))
                    .collect::<Result<Vec<i64>, _>>()?;
                Poly2dValue::Encoded(poly2d::encode(&rounded)?.to_strings())
            }
        };
        Ok(Self {
            val,
            mode,
            closed,
            hierarchy: None,
        })
    }

    /// The chain code, when stored in chain-code mode.
    pub fn chain_code(&self) -> Option<Result<ChainCode, VcdError>> {
        match &self.val {
            Poly2dValue::Encoded(parts) => Some(ChainCode::from_strings(parts)),
            Poly2dValue::Points(_) => None,
        }
    }

    /// Absolute coordinates, decoding the chain code if needed.
    pub fn points(&self) -> Result<Vec<f64>, VcdError> {
        match &self.val {
            Poly2dValue::Points(points) => Ok(points.clone()),
            Poly2dValue::Encoded(parts) => {
                let chain_code = ChainCode::from_strings(parts)?;
                Ok(poly2d::decode(&chain_code)?
                    .into_iter()
                    .map(|v| v as f64)
                    .collect())
            }
        }
    }

    fn validate(&self) -> Result<(), VcdError> {
        match (&self.val, self.mode) {
            (Poly2dValue::Points(points), Poly2dMode::Absolute) => {
                check_finite(DataKind::Poly2d, points)?;
                if points.len() % 2 != 0 {
                    return Err(invalid(
                        DataKind::Poly2d,
                        format!("expected x, y pairs, got {} value(s)", points.len()),
                    ));
                }
                Ok(())
            }
            (Poly2dValue::Encoded(parts), Poly2dMode::Srf6dcc) => {
                let chain_code = ChainCode::from_strings(parts)?;
                poly2d::decode(&chain_code).map(|_| ())
            }
            (Poly2dValue::Points(points), Poly2dMode::Srf6dcc) if points.is_empty() => Err(
                invalid(DataKind::Poly2d, "empty chain code value".to_string()),
            ),
            (_, mode) => Err(invalid(
                DataKind::Poly2d,
                format!("val does not match mode {}", mode),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poly3d {
    pub val: Vec<f64>,
    pub closed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    /// Position, rotation and size: 9 values with Euler angles, 10 with a
    /// quaternion.
    pub val: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub val: String,
    pub mime_type: String,
    pub encoding: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub val: String,
    pub data_type: String,
    pub encoding: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat {
    pub val: Vec<f64>,
    pub channels: u32,
    pub width: u32,
    pub height: u32,
    pub data_type: String,
}

/// A list of ids of other geometric items (points for lines, lines for
/// areas).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometricReference {
    pub val: Vec<u64>,
    pub reference_type: DataKind,
}

/// The typed content of one element datum.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Bbox(Bbox),
    Rbbox(Rbbox),
    Num(Num),
    Text(Text),
    Boolean(Boolean),
    Vec(VecData),
    Point2d(Point2d),
    Point3d(Point3d),
    Poly2d(Poly2d),
    Poly3d(Poly3d),
    Cuboid(Cuboid),
    Image(Image),
    Binary(Binary),
    Mat(Mat),
    LineReference(GeometricReference),
    AreaReference(GeometricReference),
    Mesh(Mesh),
}

impl Payload {
    pub fn kind(&self) -> DataKind {
        match self {
            Payload::Bbox(_) => DataKind::Bbox,
            Payload::Rbbox(_) => DataKind::Rbbox,
            Payload::Num(_) => DataKind::Num,
            Payload::Text(_) => DataKind::Text,
            Payload::Boolean(_) => DataKind::Boolean,
            Payload::Vec(_) => DataKind::Vec,
            Payload::Point2d(_) => DataKind::Point2d,
            Payload::Point3d(_) => DataKind::Point3d,
            Payload::Poly2d(_) => DataKind::Poly2d,
            Payload::Poly3d(_) => DataKind::Poly3d,
            Payload::Cuboid(_) => DataKind::Cuboid,
            Payload::Image(_) => DataKind::Image,
            Payload::Binary(_) => DataKind::Binary,
            Payload::Mat(_) => DataKind::Mat,
            Payload::LineReference(_) => DataKind::LineReference,
            Payload::AreaReference(_) => DataKind::AreaReference,
            Payload::Mesh(_) => DataKind::Mesh,
        }
    }

    /// Checks arity and value constraints that the field types alone do not
    /// enforce.
    pub fn validate(&self) -> Result<(), VcdError> {
        let kind = self.kind();
        match self {
            Payload::Bbox(b) => check_finite(kind, &b.val),
            Payload::Rbbox(b) => check_finite(kind, &b.val),
            Payload::Num(n) => check_finite(kind, &[n.val]),
            Payload::Point2d(p) => check_finite(kind, &p.val),
            Payload::Point3d(p) => check_finite(kind, &p.val),
            Payload::Vec(v) => match &v.val {
                VecValue::Numbers(numbers) => check_finite(kind, numbers),
                VecValue::Strings(_) => Ok(()),
            },
            Payload::Poly2d(p) => p.validate(),
            Payload::Poly3d(p) => {
                check_finite(kind, &p.val)?;
                if p.val.len() % 3 != 0 {
                    return Err(invalid(
                        kind,
                        format!("expected x, y, z triples, got {} value(s)", p.val.len()),
                    ));
                }
                Ok(())
            }
            Payload::Cuboid(c) => {
                check_finite(kind, &c.val)?;
                if !matches!(c.val.len(), 9 | 10) {
                    return Err(invalid(
                        kind,
                        format!("expected 9 or 10 values, got {}", c.val.len()),
                    ));
                }
                Ok(())
            }
            Payload::Mat(m) => {
                check_finite(kind, &m.val)?;
                let expected = m.width as usize * m.height as usize * m.channels as usize;
                if m.val.len() != expected {
                    return Err(invalid(
                        kind,
                        format!(
                            "expected {}x{}x{} = {} values, got {}",
                            m.width,
                            m.height,
                            m.channels,
                            expected,
                            m.val.len()
                        ),
                    ));
                }
                Ok(())
            }
            Payload::Mesh(mesh) => mesh.validate(),
            Payload::Text(_)
            | Payload::Boolean(_)
            | Payload::Image(_)
            | Payload::Binary(_)
            | Payload::LineReference(_)
            | Payload::AreaReference(_) => Ok(()),
        }
    }
}

macro_rules! payload_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Payload::$variant(value)
                }
            }
        )*
    };
}

payload_from!(
    Bbox(Bbox),
    Rbbox(Rbbox),
    Num(Num),
    Text(Text),
    Boolean(Boolean),
    Vec(VecData),
    Point2d(Point2d),
    Point3d(Point3d),
    Poly2d(Poly2d),
    Poly3d(Poly3d),
    Cuboid(Cuboid),
    Image(Image),
    Binary(Binary),
    Mat(Mat),
    Mesh(Mesh),
);

pub(crate) fn invalid(kind: DataKind, message: String) -> VcdError {
    VcdError::InvalidData { kind, message }
}

fn round_coordinate(index: usize, value: f64) -> Result<i64, VcdError> {
    let rounded = value.round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(invalid(
            DataKind::Poly2d,
            format!("value {} at index {} does not fit an integer coordinate", value, index),
        ))
    }
}

fn check_finite(kind: DataKind, values: &[f64]) -> Result<(), VcdError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(invalid(
            kind,
            format!("value at index {} is not a finite number", i),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poly2d_chain_code_mode() {
        let points = [5.0, 5.0, 10.0, 5.0, 11.0, 6.0, 11.0, 8.0, 9.0, 10.0, 5.0, 10.0, 3.0, 8.0, 3.0, 6.0, 4.0, 5.0];
        let poly = Poly2d::new(&points, Poly2dMode::Srf6dcc, true).unwrap();
        assert_eq!(
            poly.val,
            Poly2dValue::Encoded(vec!["5".into(), "5".into(), "1".into(), "mBIIOIII".into()])
        );
        assert_eq!(poly.points().unwrap(), points.to_vec());
    }

    #[test]
    fn test_poly2d_chain_code_rejects_out_of_range_coordinates() {
        let err = Poly2d::new(&[0.0, 0.0, 1e19, 0.0], Poly2dMode::Srf6dcc, false).unwrap_err();
        assert!(matches!(err, VcdError::InvalidData { kind: DataKind::Poly2d, .. }));
        assert!(Poly2d::new(&[-1e19, 0.0, 0.0, 0.0], Poly2dMode::Srf6dcc, false).is_err());
        // Absolute mode keeps floats as they are.
        assert!(Poly2d::new(&[0.0, 0.0, 1e19, 0.0], Poly2dMode::Absolute, false).is_ok());
    }

    #[test]
    fn test_poly2d_overflowing_chain_code_fails_validation() {
        let poly = Poly2d {
            val: Poly2dValue::Encoded(vec![
                "0".into(),
                "9223372036854775806".into(),
                "0".into(),
                "H".into(),
            ]),
            mode: Poly2dMode::Srf6dcc,
            closed: false,
            hierarchy: None,
        };
        assert!(Payload::Poly2d(poly).validate().is_err());
    }

    #[test]
    fn test_poly2d_mode_mismatch() {
        let poly = Poly2d {
            val: Poly2dValue::Encoded(vec!["1".into()]),
            mode: Poly2dMode::Absolute,
            closed: false,
            hierarchy: None,
        };
        assert!(Payload::Poly2d(poly).validate().is_err());
    }

    #[test]
    fn test_arity_checks() {
        assert!(Payload::Cuboid(Cuboid { val: vec![0.0; 8] }).validate().is_err());
        assert!(Payload::Cuboid(Cuboid { val: vec![0.0; 10] }).validate().is_ok());
        assert!(Payload::Poly3d(Poly3d {
            val: vec![0.0; 4],
            closed: false
        })
        .validate()
        .is_err());
        let mat = Mat {
            val: vec![0.0; 5],
            channels: 1,
            width: 2,
            height: 3,
            data_type: "float".into(),
        };
        assert!(Payload::Mat(mat).validate().is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let bbox = Bbox {
            val: [0.0, f64::NAN, 1.0, 1.0],
        };
        assert!(Payload::Bbox(bbox).validate().is_err());
    }
}
