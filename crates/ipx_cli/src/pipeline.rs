//! Shared pipeline helpers for CLI commands.
//!
//! Project root resolution, library document discovery and diagnostic
//! rendering used by `validate`, `generate` and `decode`.

use std::path::{Path, PathBuf};

use ipx_config::{ProjectConfig, CONFIG_FILE_NAME};
use ipx_diagnostics::{Diagnostic, DiagnosticRenderer, JsonRenderer, Severity, TerminalRenderer};

use crate::{GlobalArgs, ReportFormat};

/// Walks up from `start` looking for the nearest directory containing `ipx.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project directory: the directory holding the `--config` file
/// (or the `--config` directory itself), else the nearest `ipx.toml` above
/// the working directory.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Loads the project configuration and returns it with its directory.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = ipx_config::load_config(&project_dir)?;
    Ok((project_dir, config))
}

/// Finds every `.json` document below `dir`, sorted by path.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns the lowest severity printed for the given flags.
pub fn threshold(global: &GlobalArgs) -> Severity {
    if global.quiet {
        Severity::Error
    } else if global.verbose {
        Severity::Note
    } else {
        Severity::Warning
    }
}

/// Prints `diagnostics` at or above the verbosity threshold.
///
/// Text goes to stderr; JSON, one object per line, to stdout.
pub fn render_diagnostics(diagnostics: &[Diagnostic], format: ReportFormat, global: &GlobalArgs) {
    let min = threshold(global);
    let shown = diagnostics.iter().filter(|d| d.severity >= min);
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in shown {
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            for diag in shown {
                print!("{}", JsonRenderer.render(diag));
            }
        }
    }
}

/// Counts errors and warnings.
pub fn count(diagnostics: &[Diagnostic]) -> (usize, usize) {
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    (errors, warnings)
}
