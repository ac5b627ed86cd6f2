//! Structured diagnostic messages with severity, codes, context and notes.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Descriptor models carry no source spans, so a diagnostic is located by a
/// free-form context path instead (for example
/// `component acme:ip:uart:1.0 / memory map regs`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where in the model or on disk the issue was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Explanatory footnotes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Actionable suggestions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with an explicit severity.
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates a new informational note.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, code, message)
    }

    /// Sets the location context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Validation, 1);
        let diag = Diagnostic::error(code, "Invalid name specified for register within block");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(format!("{}", diag.code), "V001");
        assert!(diag.context.is_none());
    }

    #[test]
    fn create_warning_and_note() {
        let code = DiagnosticCode::new(Category::Generation, 101);
        assert_eq!(Diagnostic::warning(code, "w").severity, Severity::Warning);
        assert_eq!(Diagnostic::note(code, "n").severity, Severity::Note);
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Generation, 2);
        let diag = Diagnostic::error(code, "bus definition not found")
            .with_context("design acme:soc:top:1.0")
            .with_note("looked up acme:bus:axi4:1.0")
            .with_help("add the definition to the library");
        assert_eq!(diag.context.as_deref(), Some("design acme:soc:top:1.0"));
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }
}
