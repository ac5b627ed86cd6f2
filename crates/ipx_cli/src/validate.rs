//! `ipx validate`: checks component descriptors.
//!
//! Files named on the command line are checked; without any, every document
//! in the project's library is. Files are validated in parallel and reported
//! in path order.

use std::path::{Path, PathBuf};

use ipx_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ipx_model::Document;
use ipx_validate::ValidationEngine;
use rayon::prelude::*;

use crate::pipeline::{count, discover_documents, load_project, render_diagnostics};
use crate::{GlobalArgs, ReportFormat, ValidateArgs};

const READ_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Library, 1);
const PARSE_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Library, 2);

/// Outcome of checking one file.
struct FileReport {
    diagnostics: Vec<Diagnostic>,
    is_component: bool,
}

/// Runs the `ipx validate` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors (or warnings, when
/// warnings count as errors).
pub fn run(args: &ValidateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (files, config_strict) = if args.files.is_empty() {
        let (project_dir, config) = load_project(global)?;
        let root = project_dir.join(&config.library.root);
        if !root.is_dir() {
            return Err(format!("library directory {} does not exist", root.display()).into());
        }
        (discover_documents(&root)?, config.validate.warnings_as_errors)
    } else {
        let strict = load_project(global)
            .map(|(_, config)| config.validate.warnings_as_errors)
            .unwrap_or(false);
        (args.files.iter().map(PathBuf::from).collect(), strict)
    };
    let warnings_as_errors = args.warnings_as_errors || config_strict;

    if files.is_empty() {
        if !global.quiet {
            eprintln!("warning: no documents to validate");
        }
        return Ok(0);
    }

    let reports: Vec<FileReport> = files.par_iter().map(|path| check_file(path)).collect();

    let checked = reports.iter().filter(|r| r.is_component).count();
    let diagnostics: Vec<Diagnostic> = reports.into_iter().flat_map(|r| r.diagnostics).collect();
    render_diagnostics(&diagnostics, args.format, global);

    let (errors, warnings) = count(&diagnostics);
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Checked {checked} component(s): {errors} error(s), {warnings} warning(s)"
        );
    }

    if errors > 0 || (warnings_as_errors && warnings > 0) {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Validates one descriptor file. Documents other than components are skipped.
fn check_file(path: &Path) -> FileReport {
    let context = path.display().to_string();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return FileReport {
                diagnostics: vec![Diagnostic::error(READ_FAILED, format!("failed to read file: {e}"))
                    .with_context(context)],
                is_component: false,
            }
        }
    };
    let component = match serde_json::from_str::<Document>(&content) {
        Ok(Document::Component(component)) => component,
        Ok(_) => {
            return FileReport {
                diagnostics: Vec::new(),
                is_component: false,
            }
        }
        Err(e) => {
            return FileReport {
                diagnostics: vec![Diagnostic::error(PARSE_FAILED, format!("not a valid document: {e}"))
                    .with_context(context)],
                is_component: false,
            }
        }
    };

    let sink = DiagnosticSink::new();
    ValidationEngine::new().validate_component(&component, &sink);
    FileReport {
        diagnostics: sink.take_all(),
        is_component: true,
    }
}
