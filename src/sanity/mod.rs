//! Coherence checks for annotation documents.
//!
//! A document built through [`crate::store::Vcd`] is coherent by
//! construction. Documents read from disk are taken as they are, so this
//! module inspects a finished document and reports:
//! - the document extent against the union of its content
//! - per-frame presence of dynamic and static elements
//! - data pointers against their elements and the data they name
//! - duplicate or malformed data, undeclared coordinate systems
//! - empty frames and dangling relation endpoints

mod report;
mod schema;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};
pub use schema::SchemaValidator;

use crate::model::{DataMap, Document, Element, ElementType, FrameInterval, FrameIntervals, Uid};
use crate::store::Vcd;

/// Options for checking.
#[derive(Clone, Debug, Default)]
pub struct CheckOptions {
    /// Treat warnings as failures.
    pub strict: bool,
}

/// Checks a store's document and returns every issue found.
pub fn check_document(vcd: &Vcd) -> ValidationReport {
    let document = vcd.document();
    let mut report = ValidationReport::new();

    check_extent(document, &mut report);
    for (element_type, uid, element) in document.elements.iter() {
        let context = IssueContext::Element { element_type, uid: *uid };
        check_presence(document, element_type, uid, element, &context, &mut report);
        check_pointers(document, element_type, uid, element, &context, &mut report);
        check_data(document, &element.data, &context, &mut report);
        if let Some(cs) = &element.coordinate_system {
            check_coordinate_system(document, cs, &context, &mut report);
        }
        if element_type == ElementType::Relation {
            check_rdf(document, element, &context, &mut report);
        }
    }
    check_frames(document, &mut report);

    report
}

/// Returns true if `report` passes under `options`.
pub fn passes(report: &ValidationReport, options: &CheckOptions) -> bool {
    if options.strict {
        report.is_ok_strict()
    } else {
        report.is_ok()
    }
}

fn check_extent(document: &Document, report: &mut ValidationReport) {
    let dynamic = document
        .elements
        .iter()
        .flat_map(|(_, _, el)| el.frames().iter().copied());
    let with_properties = document
        .frames
        .iter()
        .filter(|(_, f)| f.has_properties())
        .map(|(n, _)| FrameInterval::single(*n));
    let expected = FrameIntervals::from_intervals(dynamic.chain(with_properties));

    if expected != document.frame_intervals {
        report.add(ValidationIssue::error(
            IssueCode::DocumentIntervalMismatch,
            format!(
                "document frame intervals are {} but content spans {}",
                document.frame_intervals, expected
            ),
            IssueContext::Document,
        ));
    }

    for frame in document.frames.keys() {
        if !document.frame_intervals.has_frame(*frame) {
            report.add(ValidationIssue::error(
                IssueCode::FrameOutsideDocument,
                "frame is outside the document frame intervals",
                IssueContext::Frame { frame: *frame },
            ));
        }
    }
}

fn check_presence(
    document: &Document,
    element_type: ElementType,
    uid: &Uid,
    element: &Element,
    context: &IssueContext,
    report: &mut ValidationReport,
) {
    if element_type.is_static_only() {
        return;
    }

    let present: Vec<u64> = document
        .frames
        .iter()
        .filter(|(_, f)| f.contains(element_type, uid))
        .map(|(n, _)| *n)
        .collect();
    let present = FrameIntervals::from_intervals(present.into_iter().map(FrameInterval::single));

    let (expected, missing_code) = if !element.is_static() {
        (element.frames().clone(), IssueCode::MissingFramePresence)
    } else if element_type.propagates_when_static() {
        let all: Vec<FrameInterval> = document.frames.keys().map(|n| FrameInterval::single(*n)).collect();
        (FrameIntervals::from_intervals(all), IssueCode::StaticElementMissingFromFrame)
    } else {
        (FrameIntervals::new(), IssueCode::UnexpectedFramePresence)
    };

    let missing = expected.difference(&present);
    if !missing.is_empty() {
        report.add(ValidationIssue::error(
            missing_code,
            format!("absent from frames {}", missing),
            context.clone(),
        ));
    }

    let unexpected = present.difference(&expected);
    if !unexpected.is_empty() {
        report.add(ValidationIssue::error(
            IssueCode::UnexpectedFramePresence,
            format!("present in frames {} outside its frame intervals", unexpected),
            context.clone(),
        ));
    }
}

fn check_pointers(
    document: &Document,
    element_type: ElementType,
    uid: &Uid,
    element: &Element,
    context: &IssueContext,
    report: &mut ValidationReport,
) {
    for (name, pointer) in &element.data_pointers {
        if !pointer.frame_intervals.is_contained_by(element.frames()) {
            report.add(ValidationIssue::error(
                IssueCode::PointerOutsideElement,
                format!(
                    "pointer '{}' spans {} but the element spans {}",
                    name,
                    pointer.frame_intervals,
                    element.frames()
                ),
                context.clone(),
            ));
        }

        let at_root = element.data.get(pointer.kind, name).is_some();
        let unresolved: Vec<u64> = pointer
            .frame_intervals
            .frames()
            .filter(|n| {
                let in_frame = document
                    .frames
                    .get(n)
                    .and_then(|f| f.element(element_type, uid))
                    .is_some_and(|entry| entry.data.get(pointer.kind, name).is_some());
                !in_frame && !at_root
            })
            .collect();
        if pointer.frame_intervals.is_empty() && !at_root {
            report.add(ValidationIssue::warning(
                IssueCode::DanglingDataPointer,
                format!("static pointer '{}' has no {} at the element root", name, pointer.kind),
                context.clone(),
            ));
        } else if !unresolved.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::DanglingDataPointer,
                format!(
                    "pointer '{}' names {} frame(s) without a {} value",
                    name,
                    unresolved.len(),
                    pointer.kind
                ),
                context.clone(),
            ));
        }
    }
}

fn check_data(document: &Document, data: &DataMap, context: &IssueContext, report: &mut ValidationReport) {
    for (kind, name) in data.duplicate_names() {
        report.add(ValidationIssue::error(
            IssueCode::DuplicateDataName,
            format!("{} '{}' occurs more than once", kind, name),
            context.clone(),
        ));
    }
    for (_, datum) in data.iter() {
        if let Err(err) = datum.validate() {
            report.add(ValidationIssue::error(
                IssueCode::InvalidData,
                err.to_string(),
                context.clone(),
            ));
        }
        if let Some(cs) = &datum.coordinate_system {
            check_coordinate_system(document, cs, context, report);
        }
    }
}

fn check_coordinate_system(document: &Document, name: &str, context: &IssueContext, report: &mut ValidationReport) {
    if !document.coordinate_systems.contains_key(name) {
        report.add(ValidationIssue::warning(
            IssueCode::UnknownCoordinateSystem,
            format!("coordinate system '{}' is not declared", name),
            context.clone(),
        ));
    }
}

fn check_rdf(document: &Document, relation: &Element, context: &IssueContext, report: &mut ValidationReport) {
    if relation.rdf_subjects.is_empty() || relation.rdf_objects.is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::IncompleteRelation,
            format!(
                "relation has {} subject(s) and {} object(s)",
                relation.rdf_subjects.len(),
                relation.rdf_objects.len()
            ),
            context.clone(),
        ));
    }
    for endpoint in relation.rdf_subjects.iter().chain(&relation.rdf_objects) {
        if document.element(endpoint.element_type, &endpoint.uid).is_none() {
            report.add(ValidationIssue::warning(
                IssueCode::DanglingRdf,
                format!("endpoint {} {} does not exist", endpoint.element_type, endpoint.uid),
                context.clone(),
            ));
        }
    }
}

fn check_frames(document: &Document, report: &mut ValidationReport) {
    for (n, frame) in &document.frames {
        let context = IssueContext::Frame { frame: *n };
        if frame.is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::EmptyFrame,
                "frame holds no elements and no properties",
                context.clone(),
            ));
        }
        for element_type in ElementType::FRAMED {
            let Some(elements) = frame.elements(element_type) else {
                continue;
            };
            for (uid, entry) in elements {
                if document.element(element_type, uid).is_none() {
                    report.add(ValidationIssue::error(
                        IssueCode::UnknownFrameElement,
                        format!("{} {} is not declared", element_type, uid),
                        context.clone(),
                    ));
                }
                check_data(document, &entry.data, &context, report);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementData, RdfRef};
    use crate::store::SetMode;

    fn codes(report: &ValidationReport) -> Vec<IssueCode> {
        report.issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_store_built_document_is_clean() {
        let mut vcd = Vcd::new();
        let car = vcd
            .add_element(ElementType::Object, "car", "Car", FrameIntervals::from_range(0, 4).unwrap())
            .unwrap();
        let road = vcd.add_object("road", "Road").unwrap();
        vcd.set_element_data(
            ElementType::Object,
            &car,
            ElementData::bbox("box", [0.0, 0.0, 2.0, 2.0]),
            FrameIntervals::from_range(1, 2).unwrap(),
            SetMode::Union,
        )
        .unwrap();
        vcd.add_relation_subject_object(
            "on",
            "isOn",
            RdfRef { uid: car, element_type: ElementType::Object },
            RdfRef { uid: road, element_type: ElementType::Object },
        )
        .unwrap();
        vcd.add_frame_properties(9, Some("t9"), None);

        let report = check_document(&vcd);
        assert!(report.is_ok_strict(), "{}", report);
    }

    #[test]
    fn test_reports_broken_loaded_document() {
        let json = r#"{"openlabel":{"metadata":{"schema_version":"1.0.0"},
            "objects":{
                "0":{"name":"car","type":"Car","frame_intervals":[{"frame_start":0,"frame_end":2}],
                     "object_data_pointers":{"box":{"type":"bbox","frame_intervals":[{"frame_start":0,"frame_end":5}]}}},
                "1":{"name":"road","type":"Road"}
            },
            "relations":{"0":{"name":"r","type":"isNear","rdf_subjects":[{"uid":"7","type":"object"}],"rdf_objects":[]}},
            "frame_intervals":[{"frame_start":0,"frame_end":1}],
            "frames":{"0":{"objects":{"0":{},"1":{}}},"1":{"objects":{"0":{},"3":{}}},"4":{}}
        }}"#;
        let vcd = Vcd::from_json_str(json).unwrap();
        let report = check_document(&vcd);
        let found = codes(&report);

        for code in [
            IssueCode::DocumentIntervalMismatch,
            IssueCode::FrameOutsideDocument,
            IssueCode::MissingFramePresence,
            IssueCode::StaticElementMissingFromFrame,
            IssueCode::PointerOutsideElement,
            IssueCode::DanglingDataPointer,
            IssueCode::DanglingRdf,
            IssueCode::IncompleteRelation,
            IssueCode::UnknownFrameElement,
            IssueCode::EmptyFrame,
        ] {
            assert!(found.contains(&code), "missing {:?} in {}", code, report);
        }
        assert!(!report.is_ok());
    }

    #[test]
    fn test_strict_option() {
        let mut report = ValidationReport::new();
        report.add(ValidationIssue::warning(
            IssueCode::IncompleteRelation,
            "x",
            IssueContext::Document,
        ));
        assert!(passes(&report, &CheckOptions::default()));
        assert!(!passes(&report, &CheckOptions { strict: true }));
    }
}
