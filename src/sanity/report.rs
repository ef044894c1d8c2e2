//! Report types for document coherence checks.
//!
//! A report collects every issue found in one pass so that a caller can
//! print it, serialize it or decide on an exit status.

use std::fmt;

use serde::Serialize;

use crate::model::{ElementType, Uid};

/// The result of checking a document.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// All issues found, in the order they were detected.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// True if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// True if there are neither errors nor warnings.
    pub fn is_ok_strict(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues carrying `code`.
    pub fn with_code(&self, code: IssueCode) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Check passed: document is coherent");
        }

        writeln!(
            f,
            "Check completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single issue.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    #[serde(serialize_with = "context_as_string")]
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Suspicious but consistent content.
    Warning,
    /// A broken invariant.
    Error,
}

/// Stable identifiers for the kinds of issue a check can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Document extent
    /// The document's frame intervals differ from the union of its content.
    DocumentIntervalMismatch,
    /// A frame exists outside the document's frame intervals.
    FrameOutsideDocument,

    // Per-frame presence
    /// A dynamic element is missing from a frame inside its intervals.
    MissingFramePresence,
    /// An element appears in a frame outside its intervals.
    UnexpectedFramePresence,
    /// A static element is missing from a document frame.
    StaticElementMissingFromFrame,
    /// A frame lists an element that does not exist.
    UnknownFrameElement,

    // Data
    /// A data pointer covers frames its element does not exist in.
    PointerOutsideElement,
    /// A data pointer names data that cannot be found.
    DanglingDataPointer,
    /// Two data entries in one bucket share a name.
    DuplicateDataName,
    /// An element data value is malformed.
    InvalidData,
    /// A data entry refers to an undeclared coordinate system.
    UnknownCoordinateSystem,

    // Structure
    /// A frame holds neither elements nor properties.
    EmptyFrame,
    /// A relation endpoint refers to a missing element.
    DanglingRdf,
    /// A relation has no subject or no object.
    IncompleteRelation,
}

/// Where an issue was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueContext {
    Document,
    Element { element_type: ElementType, uid: Uid },
    Frame { frame: u64 },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Document => write!(f, "document"),
            IssueContext::Element { element_type, uid } => write!(f, "{} {}", element_type, uid),
            IssueContext::Frame { frame } => write!(f, "frame {}", frame),
        }
    }
}

fn context_as_string<S: serde::Serializer>(
    context: &IssueContext,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(context)
}
