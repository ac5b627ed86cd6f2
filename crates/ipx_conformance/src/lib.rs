//! Conformance test helpers for the ipx toolchain.
//!
//! Builds a small system-on-chip library (a top component with its design,
//! an AXI4 abstraction, one initiator and several targets) and runs the
//! generator over it, returning structured results for assertion in
//! integration tests.

#![warn(missing_docs)]

use std::path::Path;

use ipx_common::Vlnv;
use ipx_config::InterconnectConfig;
use ipx_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use ipx_interconnect::{GenerateError, Generated, InterconnectGenerator};
use ipx_model::{
    AbstractionDefinition, BusInterface, Component, Design, Direction, Document, InterfaceMode,
    Library, MemoryMap, Port, PortAbstraction, Revision, WireMode,
};
use ipx_rtl::{FabricWriter, PluginRegistry};

/// Result of one generation run.
pub struct GenerationResult {
    /// The generated documents, or why the run stopped.
    pub outcome: Result<Generated, GenerateError>,
    /// All diagnostics emitted during the run.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

/// Returns a VLNV in the `acme:soc` library.
pub fn soc_vlnv(name: &str) -> Vlnv {
    Vlnv::new("acme", "soc", name, "1.0")
}

/// Returns the AXI4 abstraction used by every fixture.
pub fn axi_abstraction() -> AbstractionDefinition {
    let signal = |name: &str, from_initiator: bool, width: &str| {
        let (on_initiator, on_target) = if from_initiator {
            (Direction::Out, Direction::In)
        } else {
            (Direction::In, Direction::Out)
        };
        PortAbstraction {
            logical_name: name.to_string(),
            on_initiator: Some(WireMode::new(on_initiator, width)),
            on_target: Some(WireMode::new(on_target, width)),
            ..PortAbstraction::default()
        }
    };
    AbstractionDefinition {
        vlnv: Vlnv::new("acme", "bus", "axi4.absDef", "1.0"),
        bus_type: Vlnv::new("acme", "bus", "axi4", "1.0"),
        logical_ports: vec![
            signal("AWADDR", true, "32"),
            signal("AWVALID", true, "1"),
            signal("AWREADY", false, "1"),
            signal("WDATA", true, ""),
        ],
        description: String::new(),
    }
}

/// Builds a component with one AXI4 interface named `axi` in `mode`.
///
/// Targets also get a memory map `regs` with the given address unit bits.
pub fn peripheral(name: &str, mode: InterfaceMode, address_unit_bits: &str) -> Component {
    let abstraction = axi_abstraction();
    let mut component = Component::new(soc_vlnv(name), Revision::Std22);
    let mut bus = BusInterface::new("axi", mode, abstraction.bus_type.clone())
        .with_abstraction(abstraction.vlnv.clone());
    let side = mode.wire_side();
    for logical in &abstraction.logical_ports {
        let Some(wire) = logical.wire(side) else {
            continue;
        };
        let physical = logical.logical_name.to_lowercase();
        let port = match wire.width.as_str() {
            "" => Port::new(&physical, wire.direction).with_bounds("63", "0"),
            "1" => Port::new(&physical, wire.direction),
            width => {
                let left = width.parse::<u32>().map_or(0, |w| w.saturating_sub(1));
                Port::new(&physical, wire.direction).with_bounds(left.to_string(), "0")
            }
        };
        component.ports.push(port);
        bus = bus.with_port_map(&logical.logical_name, physical);
    }
    if mode.is_target() {
        let mut map = MemoryMap::new("regs");
        map.address_unit_bits = address_unit_bits.to_string();
        component.memory_maps.push(map);
        bus.memory_map_ref = Some("regs".to_string());
    }
    component.bus_interfaces.push(bus);
    component
}

/// Stores the `top` component, its design with instances `cpu_0` and
/// `mem_<n>` for each target, and the abstraction into `library`.
pub fn populate_soc(library: &mut dyn Library, targets: usize) {
    let mut top = Component::new(soc_vlnv("top"), Revision::Std22);
    top.design_ref = Some(soc_vlnv("top.design"));
    let mut design = Design::new(soc_vlnv("top.design"), Revision::Std22);
    design.add_instance("cpu_0", soc_vlnv("cpu"));

    let mut documents = vec![
        Document::from(top),
        Document::from(peripheral("cpu", InterfaceMode::Initiator, "")),
        Document::AbstractionDefinition(axi_abstraction()),
    ];
    for n in 0..targets {
        design.add_instance(format!("mem_{n}"), soc_vlnv(&format!("mem{n}")));
        documents.push(Document::from(peripheral(&format!("mem{n}"), InterfaceMode::Target, "8")));
    }
    documents.push(Document::from(design));

    for document in &documents {
        library
            .save(document)
            .unwrap_or_else(|e| panic!("fixture {} not stored: {e}", document.vlnv()));
    }
}

/// Builds a configuration with one initiator and a target per `(start, end)`
/// region, End inclusive, bound to `mem_<n>`.
pub fn soc_config(regions: &[(&str, &str)], id_width: u32) -> InterconnectConfig {
    let targets: Vec<String> = regions
        .iter()
        .enumerate()
        .map(|(n, (start, end))| {
            format!(
                r#"{{"Index": {n}, "Name": "mem{n}", "Instance": "mem_{n}", "Bus interface": "axi",
                    "Address regions": [{{"Start": "{start}", "End": "{end}"}}]}}"#
            )
        })
        .collect();
    let json = format!(
        r#"{{
            "VLNVs": {{"Design": "acme:soc:top:1.0", "Interconnect": "acme:soc:xbar:1.0",
                      "Bus": "acme:bus:axi4.absDef:1.0"}},
            "Address width": 32, "ID width": {id_width}, "User width": 1,
            "Initiators": [{{"Index": 0, "Name": "cpu", "Instance": "cpu_0", "Bus interface": "axi"}}],
            "Targets": [{targets}]
        }}"#,
        targets = targets.join(",")
    );
    ipx_config::load_interconnect_config_from_str(&json)
        .unwrap_or_else(|e| panic!("fixture configuration rejected: {e}"))
}

/// Runs the generator, emitting Verilog into `output_dir` when given.
pub fn run_generation(
    library: &mut dyn Library,
    config: &InterconnectConfig,
    output_dir: Option<&Path>,
) -> GenerationResult {
    let sink = DiagnosticSink::new();
    let mut generator = InterconnectGenerator::new(library, &sink);
    if let Some(dir) = output_dir {
        let writer = FabricWriter::new(&PluginRegistry::with_builtins(), "verilog", "clk_i", "rst_ni")
            .unwrap_or_else(|e| panic!("built-in plugin missing: {e}"));
        generator = generator.with_rtl(writer, dir);
    }
    let outcome = generator.generate(config);
    let diagnostics = sink.take_all();
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    GenerationResult {
        outcome,
        diagnostics,
        error_count,
        warning_count,
    }
}

/// Serializes `document` the way the file library stores it and parses it back.
pub fn roundtrip(document: &Document) -> Document {
    let json = serde_json::to_string_pretty(document)
        .unwrap_or_else(|e| panic!("document not serializable: {e}"));
    serde_json::from_str(&json).unwrap_or_else(|e| panic!("document not parseable: {e}"))
}
