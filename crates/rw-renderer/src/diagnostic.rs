//! Build diagnostics reported while parsing a document.

use std::fmt;

/// Severity of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Recoverable issue; output is still complete.
    Warning,
    /// An invocation failed and was replaced by its raw source.
    Error,
}

/// Problem found while building the document tree.
///
/// Diagnostics are local to a single directive or role invocation: one
/// failing invocation never aborts the rest of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Severity of the problem.
    pub severity: Severity,
    /// Source line (1-indexed) of the offending invocation.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Create a warning.
    #[must_use]
    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            line,
            message: message.into(),
        }
    }

    /// Create an error.
    #[must_use]
    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            line,
            message: message.into(),
        }
    }

    /// Whether this diagnostic is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::error(12, "unknown option `foo`");
        assert_eq!(diagnostic.to_string(), "line 12: unknown option `foo`");
    }

    #[test]
    fn test_severity() {
        assert!(Diagnostic::error(1, "x").is_error());
        assert!(!Diagnostic::warning(1, "x").is_error());
    }
}
