//! Resolution diagnostics.
//!
//! Every phase of the prebuild core reports failures as structured
//! diagnostics rather than bare strings. Each diagnostic carries a kind
//! (categorizing which consistency rule was violated), a severity, and a
//! human-readable message naming the offending standard name, scheme, or
//! module. Phases accumulate diagnostics in a `Vec` and fail fast at
//! phase boundaries; warnings survive a successful run.

use std::fmt;

/// Category of resolution diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Container string could not be decoded.
    MalformedContainer,
    /// A record's container lacks the mandatory module segment.
    MissingModuleSegment,
    /// A requested standard name has no defining record.
    MissingDefinition,
    /// A suite invokes a scheme absent from the scheme tables.
    MissingScheme,
    /// More than one defining record for a standard name.
    AmbiguousDefinition,
    /// Type/kind/rank mismatch between requester and definer.
    IncompatibleAttributes,
    /// No registered conversion between two unit strings.
    UnknownUnit,
    /// A defining container carries a segment kind with no storage meaning.
    UnknownSegmentKind,
    /// Naming-convention table names a module but not the specific type.
    ConfigurationGap,
    /// A dimension expression chain refers back to itself.
    CyclicDimension,
    /// Optional/active attributes disagree between the two sides.
    AllocationMismatch,
}

impl DiagnosticKind {
    /// Human-readable name for this diagnostic kind.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::MalformedContainer => "malformed container",
            DiagnosticKind::MissingModuleSegment => "missing module segment",
            DiagnosticKind::MissingDefinition => "missing definition",
            DiagnosticKind::MissingScheme => "missing scheme",
            DiagnosticKind::AmbiguousDefinition => "ambiguous definition",
            DiagnosticKind::IncompatibleAttributes => "incompatible attributes",
            DiagnosticKind::UnknownUnit => "unknown unit",
            DiagnosticKind::UnknownSegmentKind => "unknown segment kind",
            DiagnosticKind::ConfigurationGap => "configuration gap",
            DiagnosticKind::CyclicDimension => "cyclic dimension reference",
            DiagnosticKind::AllocationMismatch => "allocation mismatch",
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Suspicious but not fatal; the run continues.
    Warning,
    /// Fatal for the run.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One resolution diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Creates a fatal diagnostic.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Creates a non-fatal diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.kind.name(), self.message)
    }
}

impl std::error::Error for Diagnostic {}

impl From<stratus_meta::ContainerError> for Diagnostic {
    fn from(err: stratus_meta::ContainerError) -> Self {
        Diagnostic::error(DiagnosticKind::MalformedContainer, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let diag = Diagnostic::error(
            DiagnosticKind::MissingDefinition,
            "variable 'air_temperature' not provided by the model",
        );
        let rendered = diag.to_string();
        assert!(rendered.contains("error"));
        assert!(rendered.contains("missing definition"));
        assert!(rendered.contains("air_temperature"));
    }

    #[test]
    fn test_warning_is_not_error() {
        let diag = Diagnostic::warning(DiagnosticKind::AllocationMismatch, "x");
        assert!(!diag.is_error());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_container_error_converts() {
        let err = stratus_meta::Container::decode("MODULE_host SCHEME_foo").unwrap_err();
        let diag: Diagnostic = err.into();
        assert_eq!(diag.kind, DiagnosticKind::MalformedContainer);
        assert!(diag.message.contains("SCHEME"));
    }
}
