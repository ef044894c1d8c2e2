use openlabel::model::{DataKind, ElementData, Payload, Poly2dValue};
use openlabel::poly2d::{self, ChainCode, Poly2dMode};
use proptest::prelude::*;

mod proptest_helpers;
use proptest_helpers::arb_chain_polygon;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn decode_inverts_encode(points in arb_chain_polygon(12)) {
        let code = poly2d::encode(&points).expect("encode");
        let decoded = poly2d::decode(&code).expect("decode");
        prop_assert_eq!(decoded, points);
    }

    #[test]
    fn string_form_roundtrips(points in arb_chain_polygon(12)) {
        let code = poly2d::encode(&points).expect("encode");
        let parsed = ChainCode::from_strings(&code.to_strings()).expect("parse strings");
        prop_assert_eq!(parsed, code);
    }

    #[test]
    fn corrupt_code_never_panics(
        code in "[A-Za-z0-9+/=!]{0,12}",
        rest in 0usize..4,
        xinit in any::<i64>(),
        yinit in any::<i64>(),
    ) {
        let chain = ChainCode { xinit, yinit, rest, code };
        let _ = poly2d::decode(&chain);
    }

    #[test]
    fn extreme_coordinates_never_panic(
        points in prop::collection::vec(
            prop_oneof![
                Just(i64::MIN),
                Just(i64::MAX),
                Just(0i64),
                -(1i64 << 30)..(1i64 << 30),
                any::<i64>(),
            ],
            1..6,
        )
        .prop_map(|mut points| {
            if points.len() % 2 != 0 {
                points.push(0);
            }
            points
        })
    ) {
        if let Ok(code) = poly2d::encode(&points) {
            prop_assert!(poly2d::decode(&code).is_ok());
        }
    }

    #[test]
    fn roundtrips_near_coordinate_limits(
        points in arb_chain_polygon(12),
        offset in prop_oneof![Just(i64::MAX - 1000), Just(i64::MIN + 1000)],
    ) {
        let shifted: Vec<i64> = points.iter().map(|p| p + offset).collect();
        let code = poly2d::encode(&shifted).expect("encode");
        prop_assert_eq!(poly2d::decode(&code).expect("decode"), shifted);
    }
}

#[test]
fn reference_polygon_literal() {
    let points = [5, 5, 10, 5, 11, 6, 11, 8, 9, 10, 5, 10, 3, 8, 3, 6, 4, 5];
    let code = poly2d::encode(&points).unwrap();
    assert_eq!(code.to_strings(), vec!["5", "5", "1", "mBIIOIII"]);
    assert_eq!(poly2d::decode(&code).unwrap(), points);
}

#[test]
fn out_of_range_element_data_is_rejected() {
    assert!(ElementData::poly2d("contour", &[0.0, 0.0, 1e19, 0.0], Poly2dMode::Srf6dcc, true).is_err());
    assert!(ElementData::poly2d("contour", &[0.0, 0.0, 1e9, 0.0], Poly2dMode::Srf6dcc, true).is_err());
}

#[test]
fn compressed_element_data() {
    let points = [5.0, 5.0, 10.0, 5.0, 11.0, 6.0, 11.0, 8.0, 9.0, 10.0, 5.0, 10.0, 3.0, 8.0, 3.0, 6.0, 4.0, 5.0];
    let data = ElementData::poly2d("contour", &points, Poly2dMode::Srf6dcc, true).unwrap();
    assert_eq!(data.kind(), DataKind::Poly2d);

    let Payload::Poly2d(poly) = &data.payload else {
        panic!("expected a poly2d payload");
    };
    assert!(matches!(poly.val, Poly2dValue::Encoded(_)));
    assert_eq!(poly.points().unwrap(), points.to_vec());

    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["mode"], "MODE_POLY2D_SRF6DCC");
    assert_eq!(json["val"], serde_json::json!(["5", "5", "1", "mBIIOIII"]));
}
