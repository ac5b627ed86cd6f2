//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[V001]: Name regs of memory maps in component acme:ip:uart:1.0 is not unique.
///   --> component acme:ip:uart:1.0
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        if self.color {
            out.push_str(&format!(
                "{}{}[{}]\x1b[0m: {}\n",
                diag.severity.ansi(),
                diag.severity,
                diag.code,
                diag.message
            ));
        } else {
            out.push_str(&format!(
                "{}[{}]: {}\n",
                diag.severity, diag.code, diag.message
            ));
        }

        if let Some(context) = &diag.context {
            out.push_str(&format!("  --> {context}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Renders each diagnostic as a single-line JSON object.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        match serde_json::to_string(diag) {
            Ok(json) => format!("{json}\n"),
            Err(e) => format!("{{\"severity\":\"error\",\"message\":\"{e}\"}}\n"),
        }
    }
}
