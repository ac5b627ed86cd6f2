//! Writes the crossbar fabric: the plugin's module skeleton followed by the
//! generated decode table, crossbar instance and port assignments.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ipx_config::InterconnectConfig;
use ipx_diagnostics::{Category, DiagnosticCode, DiagnosticSink};
use ipx_model::{Component, Direction};

use crate::decode::DecodeTable;
use crate::error::EmitError;
use crate::protocol::{Protocol, Signal, SignalWidth};
use crate::registry::{GeneratorPlugin, PluginRegistry};

const NO_TARGETS: DiagnosticCode = DiagnosticCode::new(Category::Rtl, 1);
const WROTE_FILE: DiagnosticCode = DiagnosticCode::new(Category::Rtl, 2);
const RULE_COUNT_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Rtl, 3);

/// Side of the crossbar a bundle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Ports the initiators connect to.
    Initiator,
    /// Ports the targets connect to.
    Target,
}

impl Side {
    fn prefix(self) -> &'static str {
        match self {
            Side::Initiator => "initiator",
            Side::Target => "target",
        }
    }

    fn count_param(self) -> &'static str {
        match self {
            Side::Initiator => "NoInitiators",
            Side::Target => "NoTargets",
        }
    }

    /// Splits a fabric interface name such as `target_3` into side and index.
    fn of_interface(name: &str) -> Option<(Side, usize)> {
        let (side, index) = if let Some(index) = name.strip_prefix("initiator_") {
            (Side::Initiator, index)
        } else {
            (Side::Target, name.strip_prefix("target_")?)
        };
        Some((side, index.parse().ok()?))
    }

    /// Whether the crossbar receives `signal` on this side.
    fn is_input(self, signal: &Signal) -> bool {
        match self {
            Side::Initiator => signal.from_initiator,
            Side::Target => !signal.from_initiator,
        }
    }
}

fn width_decl(side: Side, width: SignalWidth) -> String {
    match width {
        SignalWidth::Bit => String::new(),
        SignalWidth::Address => "[AddrWidth-1:0] ".to_string(),
        SignalWidth::Data => "[DataWidth-1:0] ".to_string(),
        SignalWidth::Strobe => "[DataWidth/8-1:0] ".to_string(),
        SignalWidth::Id => match side {
            Side::Initiator => "[IdWidth-1:0] ".to_string(),
            Side::Target => "[IdWidthAtInitiators-1:0] ".to_string(),
        },
        SignalWidth::User => "[UserWidth-1:0] ".to_string(),
        SignalWidth::Fixed(1) => String::new(),
        SignalWidth::Fixed(bits) => format!("[{}:0] ", bits - 1),
    }
}

/// Extends a plugin-generated module skeleton into a crossbar fabric.
///
/// The plugin is resolved once, when the writer is built.
pub struct FabricWriter {
    plugin: Arc<dyn GeneratorPlugin>,
    clock_port: String,
    reset_port: String,
}

impl FabricWriter {
    /// Resolves the plugin for `output_format` and records the clock and
    /// reset port names used by the crossbar instance.
    pub fn new(
        registry: &PluginRegistry,
        output_format: &str,
        clock_port: impl Into<String>,
        reset_port: impl Into<String>,
    ) -> Result<Self, EmitError> {
        let plugin = registry
            .find_by_output_format(output_format)
            .ok_or_else(|| EmitError::PluginNotFound(output_format.to_string()))?;
        Ok(Self {
            plugin,
            clock_port: clock_port.into(),
            reset_port: reset_port.into(),
        })
    }

    /// Name of the resolved plugin.
    pub fn plugin_name(&self) -> &str {
        self.plugin.name()
    }

    /// Writes `<componentName>.v` into `dir` and returns its path.
    ///
    /// The skeleton is produced first. With no targets configured, a warning
    /// is emitted, the skeleton is left as it is and
    /// [`EmitError::NoTargetsConfigured`] is returned. A rule table shorter
    /// than `NoAddrRules` is reported as an error, also leaving the skeleton.
    pub fn write(
        &self,
        component: &Component,
        config: &InterconnectConfig,
        dir: &Path,
        sink: &DiagnosticSink,
    ) -> Result<PathBuf, EmitError> {
        let skeleton_path = self.plugin.generate(component, dir)?;

        let table = match DecodeTable::compute(config) {
            Err(EmitError::NoTargetsConfigured) => {
                sink.warning(
                    NO_TARGETS,
                    format!(
                        "no targets configured for {}; address decode emission skipped",
                        component.vlnv
                    ),
                );
                return Err(EmitError::NoTargetsConfigured);
            }
            other => other?,
        };
        if !table.is_consistent() {
            let err = EmitError::RuleCountMismatch {
                rules: table.rules.len(),
                expected: table.no_addr_rules,
            };
            sink.error(
                RULE_COUNT_MISMATCH,
                format!("{err}; address decode for {} not emitted", component.vlnv),
            );
            return Err(err);
        }

        let skeleton = fs::read_to_string(&skeleton_path)?;
        let header = port_list_header(&skeleton).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} has no port list terminator", skeleton_path.display()),
            )
        })?;

        let path = dir.join(format!("{}.v", component.vlnv.name));
        let mut out = BufWriter::new(File::create(&path)?);
        out.write_all(header.as_bytes())?;
        self.write_body(&mut out, component, config, &table)?;
        out.flush()?;

        sink.note(WROTE_FILE, format!("wrote {}", path.display()));
        Ok(path)
    }

    fn write_body<W: Write>(
        &self,
        out: &mut W,
        component: &Component,
        config: &InterconnectConfig,
        table: &DecodeTable,
    ) -> io::Result<()> {
        let protocol = Protocol::from_bus_type(&config.bus_type());

        writeln!(out)?;
        writeln!(out, "  localparam int unsigned NoInitiators = {};", table.no_initiators)?;
        writeln!(out, "  localparam int unsigned NoTargets = {};", table.no_targets)?;
        writeln!(out, "  localparam int unsigned NoAddrRules = {};", table.no_addr_rules)?;
        writeln!(out, "  localparam int unsigned AddrWidth = {};", table.address_width)?;
        writeln!(out, "  localparam int unsigned DataWidth = {};", config.max_data_width())?;
        writeln!(out, "  localparam int unsigned IdWidth = {};", table.id_width)?;
        writeln!(
            out,
            "  localparam int unsigned IdWidthAtInitiators = {};",
            table.id_width_at_initiators
        )?;
        writeln!(out, "  localparam int unsigned UserWidth = {};", config.user_width)?;

        for side in [Side::Initiator, Side::Target] {
            writeln!(out)?;
            writeln!(out, "  // {} bundles", side.prefix())?;
            for signal in protocol.signals() {
                writeln!(
                    out,
                    "  logic {}{}_{} [{}];",
                    width_decl(side, signal.width),
                    side.prefix(),
                    signal.name,
                    side.count_param()
                )?;
            }
        }

        writeln!(out)?;
        writeln!(out, "  typedef struct packed {{")?;
        writeln!(out, "    int unsigned idx;")?;
        writeln!(out, "    logic [AddrWidth-1:0] start_addr;")?;
        writeln!(out, "    logic [AddrWidth-1:0] end_addr;")?;
        writeln!(out, "  }} rule_t;")?;
        writeln!(out)?;
        writeln!(out, "  localparam rule_t [NoAddrRules-1:0] AddrMap = '{{")?;
        for (i, rule) in table.rules.iter().enumerate() {
            let separator = if i + 1 == table.rules.len() { "" } else { "," };
            writeln!(
                out,
                "    '{{idx: 32'd{}, start_addr: {}, end_addr: {}}}{separator}",
                rule.target_index,
                table.literal(rule.start),
                table.literal(rule.end)
            )?;
        }
        writeln!(out, "  }};")?;

        writeln!(out)?;
        writeln!(out, "  localparam xbar_cfg_t xbar_cfg = '{{")?;
        writeln!(out, "    NoInitiatorPorts:   NoInitiators,")?;
        writeln!(out, "    NoTargetPorts:      NoTargets,")?;
        writeln!(out, "    MaxTargetTrans:     8,")?;
        writeln!(out, "    MaxInitiatorTrans:  8,")?;
        writeln!(out, "    FallThrough:        1'b0,")?;
        writeln!(out, "    IdWidthInitiators:  IdWidth,")?;
        writeln!(out, "    IdUsedInitiators:   IdWidth,")?;
        writeln!(out, "    AddrWidth:          AddrWidth,")?;
        writeln!(out, "    DataWidth:          DataWidth,")?;
        writeln!(out, "    NoAddrRules:        NoAddrRules")?;
        writeln!(out, "  }};")?;

        writeln!(out)?;
        writeln!(out, "  {} #(", protocol.crossbar_module())?;
        writeln!(out, "    .Cfg    (xbar_cfg),")?;
        writeln!(out, "    .rule_t (rule_t)")?;
        writeln!(out, "  ) i_xbar (")?;
        writeln!(out, "    .clk_i  ({}),", self.clock_port)?;
        writeln!(out, "    .rst_ni ({}),", self.reset_port)?;
        writeln!(out, "    .test_i (1'b0),")?;
        for side in [Side::Initiator, Side::Target] {
            for signal in protocol.signals() {
                let suffix = if side.is_input(signal) { "i" } else { "o" };
                writeln!(
                    out,
                    "    .{0}_{1}_{suffix} ({0}_{1}),",
                    side.prefix(),
                    signal.name
                )?;
            }
        }
        writeln!(out, "    .addr_map_i            (AddrMap),")?;
        writeln!(out, "    .en_default_target_i   ('0),")?;
        writeln!(out, "    .default_target_port_i ('0)")?;
        writeln!(out, "  );")?;

        for bus in &component.bus_interfaces {
            let Some((side, index)) = Side::of_interface(&bus.name) else {
                continue;
            };
            writeln!(out)?;
            writeln!(out, "  // {}", bus.name)?;
            for physical in bus.physical_ports() {
                let (Some(logical), Some(port)) =
                    (bus.logical_port_of(physical), component.port(physical))
                else {
                    continue;
                };
                let Some(signal) = protocol.signal(logical) else {
                    continue;
                };
                let bundle = format!("{}_{}[{index}]", side.prefix(), signal.name);
                match port.direction {
                    Direction::In => writeln!(out, "  assign {bundle} = {physical};")?,
                    Direction::Out => writeln!(out, "  assign {physical} = {bundle};")?,
                    Direction::InOut | Direction::Phantom => {}
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "endmodule")?;
        Ok(())
    }
}

/// Returns the skeleton up to and including the first line starting with `);`.
fn port_list_header(skeleton: &str) -> Option<&str> {
    let mut end = 0;
    for line in skeleton.split_inclusive('\n') {
        end += line.len();
        if line.trim_start().starts_with(");") {
            return Some(&skeleton[..end]);
        }
    }
    None
}
