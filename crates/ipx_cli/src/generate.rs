//! `ipx generate`: builds an interconnect and wires it into its design.
//!
//! The pipeline:
//!
//! 1. Find the project root and load `ipx.toml`
//! 2. Load the interconnect configuration JSON
//! 3. Resolve the skeleton plugin for the output format
//! 4. Run the generator against the on-disk library
//! 5. Render diagnostics

use std::path::PathBuf;

use ipx_diagnostics::DiagnosticSink;
use ipx_interconnect::InterconnectGenerator;
use ipx_model::FileLibrary;
use ipx_rtl::{FabricWriter, PluginRegistry};

use crate::pipeline::{count, load_project, render_diagnostics};
use crate::{GenerateArgs, GlobalArgs, ReportFormat};

/// Runs the `ipx generate` command.
///
/// Returns exit code 0 when the documents were saved, 1 when generation
/// reported errors. Aborts are returned as errors after their diagnostics
/// are printed.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, project) = load_project(global)?;
    let config = ipx_config::load_interconnect_config(&PathBuf::from(&args.interconnect))?;

    if !global.quiet {
        eprintln!(
            "   Generating {} for {}",
            config.vlnvs.interconnect, config.vlnvs.design
        );
    }

    let mut library = FileLibrary::new(project_dir.join(&project.library.root));
    let sink = DiagnosticSink::new();
    let mut generator = InterconnectGenerator::new(&mut library, &sink);
    if !args.no_rtl {
        let format = args
            .output_format
            .as_deref()
            .unwrap_or(&project.generate.output_format);
        let writer = FabricWriter::new(
            &PluginRegistry::with_builtins(),
            format,
            &project.generate.clock_port,
            &project.generate.reset_port,
        )?;
        let output_dir = args
            .output
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| project_dir.join(&project.generate.output_dir));
        std::fs::create_dir_all(&output_dir)?;
        generator = generator.with_rtl(writer, output_dir);
    }

    let result = generator.generate(&config);
    let stage = generator.stage();
    let diagnostics = sink.take_all();
    render_diagnostics(&diagnostics, args.format, global);
    let generated = result.map_err(|e| format!("generation stopped after stage '{stage}': {e}"))?;

    let (errors, warnings) = count(&diagnostics);
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "    Finished {} with {} interface(s): {errors} error(s), {warnings} warning(s)",
            generated.component.vlnv,
            generated.component.bus_interfaces.len()
        );
        if let Some(path) = &generated.rtl_file {
            eprintln!("       Wrote {}", path.display());
        }
    }

    Ok(if errors > 0 { 1 } else { 0 })
}
