//! Stats report types and terminal formatting.

use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, Serialize)]
pub struct StatsReport {
    pub summary: SummarySection,
    /// One row per element type, in document order.
    pub elements: Vec<ElementTypeCount>,
    /// Most frequent semantic types across all elements.
    pub labels: LabelsSection,
    /// Data values per kind, counting root and per-frame copies.
    pub data_kinds: Vec<DataKindCount>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SummarySection {
    pub root_key: String,
    pub schema_version: String,
    pub elements: usize,
    pub frames: usize,
    /// Document frame intervals, e.g. `[0, 9], [20, 29]`; `static` when empty.
    pub frame_intervals: String,
    pub ontologies: usize,
    pub coordinate_systems: usize,
    pub streams: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ElementTypeCount {
    pub element_type: String,
    pub total: usize,
    pub dynamic: usize,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct LabelsSection {
    pub top_n: usize,
    pub total_distinct: usize,
    pub entries: Vec<LabelCount>,
    /// Sum of counts for labels not in the top N.
    pub other_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct DataKindCount {
    pub kind: String,
    pub at_root: usize,
    pub in_frames: usize,
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_summary(f)?;
        writeln!(f)?;
        self.fmt_elements(f)?;
        if !self.labels.entries.is_empty() {
            writeln!(f)?;
            self.fmt_labels(f)?;
        }
        if !self.data_kinds.is_empty() {
            writeln!(f)?;
            self.fmt_data_kinds(f)?;
        }
        Ok(())
    }
}

impl StatsReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Summary")?;
        writeln!(f, "  Root:               {}", s.root_key)?;
        writeln!(f, "  Schema version:     {}", s.schema_version)?;
        writeln!(f, "  Elements:           {:>8}", s.elements)?;
        writeln!(f, "  Frames:             {:>8}", s.frames)?;
        writeln!(f, "  Frame intervals:    {}", s.frame_intervals)?;
        if s.ontologies > 0 {
            writeln!(f, "  Ontologies:         {:>8}", s.ontologies)?;
        }
        if s.coordinate_systems > 0 {
            writeln!(f, "  Coordinate systems: {:>8}", s.coordinate_systems)?;
        }
        if s.streams > 0 {
            writeln!(f, "  Streams:            {:>8}", s.streams)?;
        }
        Ok(())
    }

    fn fmt_elements(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Elements")?;
        writeln!(f, "  {:<12} {:>8} {:>8}", "type", "total", "dynamic")?;
        for row in &self.elements {
            writeln!(f, "  {:<12} {:>8} {:>8}", row.element_type, row.total, row.dynamic)?;
        }
        Ok(())
    }

    fn fmt_labels(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l = &self.labels;
        writeln!(f, "Semantic types (top {} of {})", l.top_n.min(l.total_distinct), l.total_distinct)?;
        let width = l.entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
        for entry in &l.entries {
            writeln!(f, "  {:<width$} {:>8}", entry.label, entry.count, width = width)?;
        }
        if l.other_count > 0 {
            writeln!(f, "  {:<width$} {:>8}", "(other)", l.other_count, width = width)?;
        }
        Ok(())
    }

    fn fmt_data_kinds(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Element data")?;
        writeln!(f, "  {:<16} {:>8} {:>10}", "kind", "root", "in frames")?;
        for row in &self.data_kinds {
            writeln!(f, "  {:<16} {:>8} {:>10}", row.kind, row.at_root, row.in_frames)?;
        }
        Ok(())
    }
}
