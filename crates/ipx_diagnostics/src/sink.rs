//! Thread-safe diagnostic accumulator.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe accumulator for diagnostics.
///
/// Multiple threads can emit diagnostics concurrently via [`emit`](Self::emit).
/// The error and warning counts are tracked atomically for fast checks
/// without locking the diagnostic vector.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
    warning_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
            warning_count: AtomicUsize::new(0),
        }
    }

    /// Emits a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
            Severity::Warning => {
                self.warning_count.fetch_add(1, Ordering::Relaxed);
            }
            Severity::Note | Severity::Help => {}
        }
        self.lock().push(diag);
    }

    /// Emits an error with the given code and message.
    pub fn error(&self, code: DiagnosticCode, message: impl Into<String>) {
        self.emit(Diagnostic::error(code, message));
    }

    /// Emits a warning with the given code and message.
    pub fn warning(&self, code: DiagnosticCode, message: impl Into<String>) {
        self.emit(Diagnostic::warning(code, message));
    }

    /// Emits an informational note with the given code and message.
    pub fn note(&self, code: DiagnosticCode, message: impl Into<String>) {
        self.emit(Diagnostic::note(code, message));
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns the number of warning-severity diagnostics emitted so far.
    pub fn warning_count(&self) -> usize {
        self.warning_count.load(Ordering::Relaxed)
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    const CODE: DiagnosticCode = DiagnosticCode::new(Category::Validation, 1);

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.error_count(), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn emit_error() {
        let sink = DiagnosticSink::new();
        sink.error(CODE, "bad name");
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn warnings_and_notes_are_not_errors() {
        let sink = DiagnosticSink::new();
        sink.warning(CODE, "width mismatch");
        sink.note(CODE, "stage done");
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(sink.diagnostics().len(), 2);
    }

    #[test]
    fn take_all_drains() {
        let sink = DiagnosticSink::new();
        sink.error(CODE, "a");
        sink.warning(CODE, "b");
        let all = sink.take_all();
        assert_eq!(all.len(), 2);
        assert!(sink.take_all().is_empty());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn preserves_emission_order() {
        let sink = DiagnosticSink::new();
        sink.note(CODE, "first");
        sink.note(CODE, "second");
        let messages: Vec<_> = sink.diagnostics().into_iter().map(|d| d.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let sink = Arc::clone(&sink);
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    sink.error(CODE, "e");
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(sink.error_count(), 400);
        assert_eq!(sink.diagnostics().len(), 400);
    }
}
