//! Document statistics.

mod report;

pub use report::{DataKindCount, ElementTypeCount, LabelCount, LabelsSection, StatsReport, SummarySection};

use std::collections::{BTreeMap, HashMap};

use crate::model::{DataKind, Document, ElementType};
use crate::store::Vcd;

#[derive(Clone, Debug)]
pub struct StatsOptions {
    /// Number of semantic types to list.
    pub top_labels: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self { top_labels: 10 }
    }
}

/// Computes a statistics report for a store's document.
pub fn stats_document(vcd: &Vcd, opts: &StatsOptions) -> StatsReport {
    let document = vcd.document();
    StatsReport {
        summary: compute_summary(vcd),
        elements: compute_element_counts(document),
        labels: compute_labels(document, opts.top_labels),
        data_kinds: compute_data_kinds(document),
    }
}

fn compute_summary(vcd: &Vcd) -> SummarySection {
    let document = vcd.document();
    SummarySection {
        root_key: vcd.dialect().root_key().to_string(),
        schema_version: document.metadata.schema_version.clone(),
        elements: document.elements.iter().count(),
        frames: document.frames.len(),
        frame_intervals: document.frame_intervals.to_string(),
        ontologies: document.ontologies.len(),
        coordinate_systems: document.coordinate_systems.len(),
        streams: document.streams.len(),
    }
}

fn compute_element_counts(document: &Document) -> Vec<ElementTypeCount> {
    ElementType::ALL
        .into_iter()
        .map(|t| {
            let elements = document.elements.of(t);
            ElementTypeCount {
                element_type: t.plural().to_string(),
                total: elements.len(),
                dynamic: elements.values().filter(|el| !el.is_static()).count(),
            }
        })
        .collect()
}

fn compute_labels(document: &Document, top_n: usize) -> LabelsSection {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, _, el) in document.elements.iter() {
        *counts.entry(el.semantic_type.as_str()).or_insert(0) += 1;
    }

    let mut entries: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    // Descending count, then label for a stable order.
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    let total_distinct = entries.len();
    let other_count = entries.iter().skip(top_n).map(|e| e.count).sum();
    entries.truncate(top_n);

    LabelsSection {
        top_n,
        total_distinct,
        entries,
        other_count,
    }
}

fn compute_data_kinds(document: &Document) -> Vec<DataKindCount> {
    let mut counts: BTreeMap<DataKind, (usize, usize)> = BTreeMap::new();
    for (_, _, el) in document.elements.iter() {
        for (kind, _) in el.data.iter() {
            counts.entry(kind).or_default().0 += 1;
        }
    }
    for frame in document.frames.values() {
        for t in ElementType::FRAMED {
            for entry in frame.elements(t).into_iter().flat_map(|e| e.values()) {
                for (kind, _) in entry.data.iter() {
                    counts.entry(kind).or_default().1 += 1;
                }
            }
        }
    }
    counts
        .into_iter()
        .map(|(kind, (at_root, in_frames))| DataKindCount {
            kind: kind.to_string(),
            at_root,
            in_frames,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementData, FrameIntervals};
    use crate::store::SetMode;

    #[test]
    fn test_counts() {
        let mut vcd = Vcd::new();
        let car = vcd
            .add_element(ElementType::Object, "car", "Car", FrameIntervals::from_range(0, 2).unwrap())
            .unwrap();
        vcd.add_object("bus", "Car").unwrap();
        vcd.add_object("road", "Road").unwrap();
        vcd.set_element_data(
            ElementType::Object,
            &car,
            ElementData::num("speed", 1.0),
            FrameIntervals::from_range(0, 1).unwrap(),
            SetMode::Union,
        )
        .unwrap();

        let report = stats_document(&vcd, &StatsOptions { top_labels: 1 });
        assert_eq!(report.summary.elements, 3);
        assert_eq!(report.summary.frames, 3);
        assert_eq!(report.elements[0].total, 3);
        assert_eq!(report.elements[0].dynamic, 1);
        assert_eq!(report.labels.entries[0].label, "Car");
        assert_eq!(report.labels.entries[0].count, 2);
        assert_eq!(report.labels.other_count, 1);
        assert_eq!(report.data_kinds[0].kind, "num");
        assert_eq!(report.data_kinds[0].in_frames, 2);

        let text = report.to_string();
        assert!(text.contains("Frames:"));
        assert!(text.contains("objects"));
    }
}
