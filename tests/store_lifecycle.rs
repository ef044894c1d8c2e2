//! End-to-end element lifecycle scenarios through the public store API.

use openlabel::model::{DataKind, Dialect, ElementType, FrameIntervals, Payload, RdfRef, Uid};
use openlabel::sanity::check_document;
use openlabel::{ElementArgs, ElementData, SetMode, StoreOptions, Vcd};
use serde_json::json;

fn fis(pairs: &[(u64, u64)]) -> FrameIntervals {
    FrameIntervals::from_pairs(pairs).unwrap()
}

fn text_at(vcd: &Vcd, uid: &Uid, name: &str, frame: Option<u64>) -> Option<String> {
    vcd.get_element_data(ElementType::Object, uid, name, frame)
        .and_then(|data| match &data.payload {
            Payload::Text(text) => Some(text.val.clone()),
            _ => None,
        })
}

fn assert_pointers_inside_elements(vcd: &Vcd) {
    for (element_type, uid, element) in vcd.document().elements.iter() {
        for (name, pointer) in &element.data_pointers {
            assert!(
                pointer.frame_intervals.is_contained_by(element.frames()),
                "{} {} pointer '{}' spans {} outside {}",
                element_type,
                uid,
                name,
                pointer.frame_intervals,
                element.frames()
            );
        }
    }
}

#[test]
fn marcos_document_roundtrips_byte_identically() {
    let mut vcd = Vcd::new();
    let marcos = vcd.add_object("marcos", "#Person").unwrap();
    assert_eq!(marcos, Uid::Int(0));

    for (name, val) in [("head", [10.0, 10.0, 30.0, 30.0]), ("body", [0.0, 0.0, 60.0, 120.0])] {
        let written = vcd
            .set_element_data(
                ElementType::Object,
                &marcos,
                ElementData::bbox(name, val),
                FrameIntervals::new(),
                SetMode::Union,
            )
            .unwrap();
        assert!(written);
    }

    let object = vcd.get_element(ElementType::Object, &Uid::Int(0)).unwrap();
    let first = &object.data.bucket(DataKind::Bbox)[0];
    assert_eq!(
        serde_json::to_value(first).unwrap(),
        json!({"name": "head", "val": [10.0, 10.0, 30.0, 30.0]})
    );

    let value = vcd.to_json_value().unwrap();
    assert_eq!(value["openlabel"]["metadata"]["schema_version"], "1.0.0");
    assert_eq!(value["openlabel"]["objects"]["0"]["name"], "marcos");

    let first_pass = vcd.to_json_string(false).unwrap();
    let reloaded = Vcd::from_json_str(&first_pass).unwrap();
    assert_eq!(reloaded.to_json_string(false).unwrap(), first_pass);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marcos.json");
    vcd.save(&path, true).unwrap();
    let from_disk = Vcd::load(&path).unwrap();
    assert_eq!(from_disk.to_json_string(false).unwrap(), first_pass);
    assert_eq!(from_disk.document(), vcd.document());
}

#[test]
fn static_element_becomes_dynamic_and_keeps_root_data() {
    let mut vcd = Vcd::new();
    let uid = vcd.add_object("ball", "Ball").unwrap();
    vcd.set_element_data(
        ElementType::Object,
        &uid,
        ElementData::text("FavouriteColor", "Pink"),
        FrameIntervals::new(),
        SetMode::Union,
    )
    .unwrap();
    assert_eq!(text_at(&vcd, &uid, "FavouriteColor", None).as_deref(), Some("Pink"));

    vcd.set_element(ElementType::Object, ElementArgs::for_uid(uid).frames(fis(&[(5, 10)])))
        .unwrap();

    assert_eq!(text_at(&vcd, &uid, "FavouriteColor", Some(3)), None);
    assert_eq!(text_at(&vcd, &uid, "FavouriteColor", Some(8)).as_deref(), Some("Pink"));
    assert_eq!(vcd.get_frame_intervals(), &fis(&[(5, 10)]));
    assert_pointers_inside_elements(&vcd);
    assert!(check_document(&vcd).is_ok());
}

#[test]
fn replacing_with_static_drops_frame_data() {
    let mut vcd = Vcd::new();
    let uid = vcd.add_object("car", "Car").unwrap();
    vcd.set_element_data(
        ElementType::Object,
        &uid,
        ElementData::text("light", "red"),
        fis(&[(8, 8)]),
        SetMode::Union,
    )
    .unwrap();
    assert_eq!(text_at(&vcd, &uid, "light", Some(8)).as_deref(), Some("red"));

    vcd.set_element(
        ElementType::Object,
        ElementArgs::for_uid(uid).mode(SetMode::Replace),
    )
    .unwrap();

    assert_eq!(text_at(&vcd, &uid, "light", Some(8)), None);
    assert_eq!(text_at(&vcd, &uid, "light", None), None);
    assert!(vcd.get_element_data_pointer(ElementType::Object, &uid, "light").is_none());
    assert!(vcd.get_frame(8).is_none());
    assert!(vcd.get_frame_intervals().is_empty());
    assert!(check_document(&vcd).is_ok());
}

#[test]
fn pointers_follow_element_through_shrink_and_grow() {
    let mut vcd = Vcd::new();
    let uid = vcd
        .add_element(ElementType::Object, "ped", "Pedestrian", fis(&[(0, 20)]))
        .unwrap();
    vcd.set_element_data(
        ElementType::Object,
        &uid,
        ElementData::bbox("box", [1.0, 1.0, 2.0, 2.0]),
        fis(&[(0, 5), (15, 20)]),
        SetMode::Union,
    )
    .unwrap();
    assert_pointers_inside_elements(&vcd);

    vcd.set_element(
        ElementType::Object,
        ElementArgs::for_uid(uid).frames(fis(&[(3, 16)])).mode(SetMode::Replace),
    )
    .unwrap();
    assert_pointers_inside_elements(&vcd);
    assert_eq!(
        vcd.get_element_data_frame_intervals(ElementType::Object, &uid, "box"),
        Some(&fis(&[(3, 5), (15, 16)]))
    );
    assert_eq!(vcd.get_frame_intervals(), &fis(&[(3, 16)]));

    vcd.set_element_data(
        ElementType::Object,
        &uid,
        ElementData::bbox("box", [1.0, 1.0, 2.0, 2.0]),
        fis(&[(30, 31)]),
        SetMode::Union,
    )
    .unwrap();
    assert_eq!(
        vcd.get_element_frame_intervals(ElementType::Object, &uid),
        Some(&fis(&[(3, 16), (30, 31)]))
    );
    assert_pointers_inside_elements(&vcd);
    assert!(check_document(&vcd).is_ok_strict(), "{}", check_document(&vcd));
}

#[test]
fn static_objects_fill_every_frame_and_leave_with_it() {
    let mut vcd = Vcd::new();
    let road = vcd.add_object("road", "Road").unwrap();
    let car = vcd
        .add_element(ElementType::Object, "car", "Car", fis(&[(0, 2)]))
        .unwrap();
    for frame in 0..=2 {
        let present = vcd.get_frame_elements(frame);
        assert!(present.contains(&(ElementType::Object, road)));
        assert!(present.contains(&(ElementType::Object, car)));
    }

    assert!(vcd.rm_element(ElementType::Object, &car));
    assert!(vcd.get_frame_intervals().is_empty());
    assert!(vcd.document().frames.is_empty());
    assert!(vcd.has(ElementType::Object, &road));
    assert!(check_document(&vcd).is_ok());
}

#[test]
fn relations_and_uuid_mode() {
    let mut vcd = Vcd::with_options(StoreOptions {
        dialect: Dialect::Vcd,
        uid_mode: openlabel::UidMode::Uuid,
        schema_version: None,
    });
    let a = vcd.add_object("a", "Car").unwrap();
    let b = vcd.add_object("b", "Car").unwrap();
    assert!(a.is_uuid() && b.is_uuid());

    let relation = vcd
        .add_relation_subject_object(
            "follows",
            "isFollowing",
            RdfRef { uid: a, element_type: ElementType::Object },
            RdfRef { uid: b, element_type: ElementType::Object },
        )
        .unwrap()
        .unwrap();
    let record = vcd.get_element(ElementType::Relation, &relation).unwrap();
    assert_eq!(record.rdf_subjects.len(), 1);
    assert_eq!(record.rdf_objects.len(), 1);

    let value = vcd.to_json_value().unwrap();
    assert_eq!(value["vcd"]["metadata"]["schema_version"], "4.3.1");

    assert!(vcd.rm_element(ElementType::Object, &b));
    let record = vcd.get_element(ElementType::Relation, &relation).unwrap();
    assert!(record.rdf_objects.is_empty());
    assert!(check_document(&vcd).is_ok());
}

#[test]
fn chain_code_walking_off_the_coordinate_range_is_rejected_on_load() {
    let document = json!({
        "openlabel": {
            "metadata": {"schema_version": "1.0.0"},
            "objects": {
                "0": {
                    "name": "lane",
                    "type": "Lane",
                    "object_data": {
                        "poly2d": [{
                            "name": "edge",
                            "val": ["0", "9223372036854775806", "0", "H"],
                            "mode": "MODE_POLY2D_SRF6DCC",
                            "closed": false
                        }]
                    }
                }
            }
        }
    });
    let text = document.to_string();
    assert!(Vcd::from_json_str(&text).is_err());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lane.json");
    std::fs::write(&path, &text).unwrap();
    assert!(Vcd::load(&path).is_err());
}
