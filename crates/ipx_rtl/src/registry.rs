//! Generator plugins and the registry they are looked up in.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ipx_model::{Component, ExpressionParser, LiteralExpressionParser, Port};

use crate::error::EmitError;

/// Produces an HDL file for a component.
///
/// The fabric writer asks a plugin for the module skeleton and then extends
/// the skeleton with the crossbar body.
pub trait GeneratorPlugin: Send + Sync {
    /// Human-readable plugin name.
    fn name(&self) -> &str;

    /// Output format key this plugin answers to, e.g. `verilog`.
    fn output_format(&self) -> &str;

    /// Writes the file for `component` into `dir` and returns its path.
    fn generate(&self, component: &Component, dir: &Path) -> Result<PathBuf, EmitError>;
}

/// Plugins by output format.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn GeneratorPlugin>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in plugins.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(VerilogSkeletonPlugin));
        registry
    }

    /// Adds a plugin; later registrations shadow earlier ones for the same format.
    pub fn register(&mut self, plugin: Arc<dyn GeneratorPlugin>) {
        self.plugins.push(plugin);
    }

    /// Returns the plugin for `format`, compared case-insensitively.
    pub fn find_by_output_format(&self, format: &str) -> Option<Arc<dyn GeneratorPlugin>> {
        self.plugins
            .iter()
            .rev()
            .find(|p| p.output_format().eq_ignore_ascii_case(format))
            .cloned()
    }

    /// Returns the registered output formats in registration order.
    pub fn formats(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.output_format()).collect()
    }
}

/// Writes a Verilog module header with the component's ports and an empty body.
pub struct VerilogSkeletonPlugin;

impl VerilogSkeletonPlugin {
    fn range(parser: &dyn ExpressionParser, port: &Port) -> String {
        if !port.is_vector() {
            return String::new();
        }
        let bound = |expr: &str| {
            parser
                .parse_expression(expr)
                .unwrap_or_else(|| expr.to_string())
        };
        format!("[{}:{}] ", bound(&port.left_bound), bound(&port.right_bound))
    }

    fn write_module<W: Write>(out: &mut W, component: &Component) -> std::io::Result<()> {
        let parser = LiteralExpressionParser::with_parameters(&component.parameters);
        let ports: Vec<(&str, &Port)> = component
            .ports
            .iter()
            .filter_map(|p| p.direction.verilog_keyword().map(|k| (k, p)))
            .collect();

        writeln!(out, "// Module skeleton for {}", component.vlnv)?;
        writeln!(out, "module {} (", component.vlnv.name)?;
        for (i, (keyword, port)) in ports.iter().enumerate() {
            let separator = if i + 1 == ports.len() { "" } else { "," };
            writeln!(
                out,
                "  {keyword:<6} logic {}{}{separator}",
                Self::range(&parser, port),
                port.name
            )?;
        }
        writeln!(out, ");")?;
        writeln!(out)?;
        writeln!(out, "endmodule")?;
        Ok(())
    }
}

impl GeneratorPlugin for VerilogSkeletonPlugin {
    fn name(&self) -> &str {
        "Verilog skeleton"
    }

    fn output_format(&self) -> &str {
        "verilog"
    }

    fn generate(&self, component: &Component, dir: &Path) -> Result<PathBuf, EmitError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.v", component.vlnv.name));
        let mut out = BufWriter::new(File::create(&path)?);
        Self::write_module(&mut out, component)?;
        out.flush()?;
        Ok(path)
    }
}
