//! The staged interconnect generator.
//!
//! A run reads the design component, its design and the components of every
//! named instance from the library, builds a fabric component with one bus
//! interface per connected interface, wires the fabric into the design and
//! saves both documents. Nothing is saved unless every stage before
//! persistence succeeded.

use std::collections::HashMap;
use std::path::PathBuf;

use ipx_common::{format_ipxact_hex, AddressRegion, MemoryReserve, Vlnv};
use ipx_config::InterconnectConfig;
use ipx_diagnostics::{Category, DiagnosticCode, DiagnosticSink, Severity};
use ipx_model::{
    AbstractionDefinition, ActiveInterface, AddressSpace, BusInterface, Channel, Component,
    Design, Direction, Document, ExpressionParser, InterfaceEnd, InterfaceMode, Interconnection,
    Library, LibraryError, LiteralExpressionParser, Parameter, Port, PortMap, Revision, WireMode,
    WireSide,
};
use ipx_rtl::{EmitError, FabricWriter};
use ipx_validate::ValidationEngine;

use crate::error::GenerateError;
use crate::request::{GenerationRequest, InterfaceRef};
use crate::stage::Stage;

const STAGE_REACHED: DiagnosticCode = DiagnosticCode::new(Category::Generation, 1);
const INTERFACE_CREATED: DiagnosticCode = DiagnosticCode::new(Category::Generation, 2);
const DOCUMENT_SAVED: DiagnosticCode = DiagnosticCode::new(Category::Generation, 3);
const TARGET_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Generation, 101);
const BUS_TYPE_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Generation, 102);
const LOGICAL_PORT_SKIPPED: DiagnosticCode = DiagnosticCode::new(Category::Generation, 103);
const ALREADY_CONNECTED: DiagnosticCode = DiagnosticCode::new(Category::Generation, 104);
const SAVE_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Generation, 201);

const DEFAULT_ADDRESS_UNIT_BITS: u64 = 8;
const CLOCK_INTERFACE: &str = "clk";
const RESET_INTERFACE: &str = "rst";
const CHANNEL_NAME: &str = "channel";

/// The result of a completed run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// The fabric component as saved.
    pub component: Component,
    /// The design as saved, including the fabric instance.
    pub design: Design,
    /// The emitted RTL file, when an emitter was configured and targets exist.
    pub rtl_file: Option<PathBuf>,
}

/// Builds an interconnect component and wires it into a design.
///
/// The generator borrows the library and the diagnostic sink for its
/// lifetime. Progress is reported as notes, recoverable inconsistencies as
/// warnings.
pub struct InterconnectGenerator<'a> {
    library: &'a mut dyn Library,
    sink: &'a DiagnosticSink,
    rtl: Option<(FabricWriter, PathBuf)>,
    stage: Stage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Endpoint(usize),
    StartingPoint(usize),
}

/// A requested interface with the component that owns it.
struct Selected {
    role: Role,
    instance: String,
    is_top: bool,
    owner: Component,
    bus: BusInterface,
}

/// A requested interface with its name and mode on the fabric.
struct Planned {
    selected: Selected,
    name: String,
    mode: InterfaceMode,
}

struct Loaded {
    design: Design,
    bus: AbstractionDefinition,
    clock: Option<AbstractionDefinition>,
    reset: Option<AbstractionDefinition>,
    selected: Vec<Selected>,
}

impl<'a> InterconnectGenerator<'a> {
    /// Creates a generator reading from and saving to `library`.
    pub fn new(library: &'a mut dyn Library, sink: &'a DiagnosticSink) -> Self {
        Self {
            library,
            sink,
            rtl: None,
            stage: Stage::Idle,
        }
    }

    /// Emits RTL with `writer` into `output_dir` after the documents are saved.
    pub fn with_rtl(mut self, writer: FabricWriter, output_dir: impl Into<PathBuf>) -> Self {
        self.rtl = Some((writer, output_dir.into()));
        self
    }

    /// Returns the last stage the run completed.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs every stage for `config`.
    ///
    /// Configuration, library and structural failures abort before anything
    /// is saved. RTL emission with no targets configured only warns.
    pub fn generate(&mut self, config: &InterconnectConfig) -> Result<Generated, GenerateError> {
        self.stage = Stage::Idle;
        let request = GenerationRequest::from_config(config)?;

        let Loaded {
            mut design,
            bus,
            clock,
            reset,
            selected,
        } = self.load(config, &request)?;
        self.advance(Stage::DesignLoaded);

        let revision = design.revision;
        let planned = self.classify(config, selected, &bus, revision)?;
        self.advance(Stage::InterfacesClassified);

        let mut fabric = Component::new(config.vlnvs.interconnect.clone(), revision);
        fabric.description = format!("Interconnect generated for {}", config.vlnvs.design);
        fabric.parameters = config
            .parameters
            .iter()
            .map(|p| Parameter::new(&p.name, &p.value))
            .collect();
        for plan in &planned {
            self.synthesize(&mut fabric, plan, config, &bus);
        }
        for (name, abstraction) in [(RESET_INTERFACE, reset.as_ref()), (CLOCK_INTERFACE, clock.as_ref())] {
            if let Some(abstraction) = abstraction {
                fabric
                    .bus_interfaces
                    .push(system_interface(&mut fabric.ports, name, abstraction, revision));
                self.sink.note(
                    INTERFACE_CREATED,
                    format!("created {name} interface from {}", abstraction.vlnv),
                );
            }
        }
        self.advance(Stage::BusesSynthesized);

        let regions = endpoint_spans(&planned, &request);
        self.compute_address_space(&mut fabric, &planned, config, &request)?;
        self.advance(Stage::AddressSpaceComputed);

        finalize(&mut fabric, &planned, &regions, config.is_channel);
        ValidationEngine::with_severity(Severity::Warning).validate_component(&fabric, self.sink);

        self.connect(&mut design, &fabric, &planned);
        self.persist(&fabric, &design)?;
        self.advance(Stage::Finalized);

        let rtl_file = match &self.rtl {
            Some((writer, dir)) => match writer.write(&fabric, config, dir, self.sink) {
                Ok(path) => Some(path),
                Err(EmitError::NoTargetsConfigured) => None,
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        Ok(Generated {
            component: fabric,
            design,
            rtl_file,
        })
    }

    fn advance(&mut self, to: Stage) {
        debug_assert_eq!(self.stage.next(), Some(to));
        self.stage = to;
        self.sink.note(STAGE_REACHED, format!("stage: {to}"));
    }

    fn load(
        &self,
        config: &InterconnectConfig,
        request: &GenerationRequest,
    ) -> Result<Loaded, GenerateError> {
        let top_vlnv = &config.vlnvs.design;
        let top = self
            .library
            .load_component(top_vlnv)
            .map_err(missing("component", top_vlnv))?;
        let design_vlnv = top.design_ref.clone().ok_or_else(|| GenerateError::MissingDefinition {
            kind: "design of component",
            vlnv: top_vlnv.clone(),
        })?;
        let design = self
            .library
            .load_design(&design_vlnv)
            .map_err(missing("design", &design_vlnv))?;

        let bus = self.load_abstraction(&config.vlnvs.bus)?;
        let clock = config
            .vlnvs
            .clock
            .as_ref()
            .map(|v| self.load_abstraction(v))
            .transpose()?;
        let reset = config
            .vlnvs
            .reset
            .as_ref()
            .map(|v| self.load_abstraction(v))
            .transpose()?;

        let mut components: HashMap<String, Component> = HashMap::new();
        let roles = request
            .endpoints
            .iter()
            .enumerate()
            .map(|(i, e)| (Role::Endpoint(i), &e.interface))
            .chain(
                request
                    .starting_points
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (Role::StartingPoint(i), &s.interface)),
            );

        let mut selected = Vec::new();
        for (role, interface) in roles {
            let is_top = interface.instance == top.vlnv.name;
            let owner = if is_top {
                top.clone()
            } else if let Some(component) = components.get(&interface.instance) {
                component.clone()
            } else {
                let instance = design.instance(&interface.instance).ok_or_else(|| {
                    GenerateError::MissingInstance {
                        instance: interface.instance.clone(),
                        design: design.vlnv.clone(),
                    }
                })?;
                let component = self
                    .library
                    .load_component(&instance.component_ref)
                    .map_err(missing("component", &instance.component_ref))?;
                components.insert(interface.instance.clone(), component.clone());
                component
            };
            let bus_interface = find_bus_interface(&owner, interface)?;
            selected.push(Selected {
                role,
                instance: interface.instance.clone(),
                is_top,
                owner,
                bus: bus_interface,
            });
        }

        Ok(Loaded {
            design,
            bus,
            clock,
            reset,
            selected,
        })
    }

    fn load_abstraction(&self, vlnv: &Vlnv) -> Result<AbstractionDefinition, GenerateError> {
        self.library
            .load_abstraction(vlnv)
            .map_err(missing("abstraction definition", vlnv))
    }

    /// Picks each interface's fabric name and mode.
    ///
    /// Endpoints become initiator-facing interfaces on the fabric and starting
    /// points target-facing ones; interfaces of the top component keep their
    /// mode. Names are indexed per role in encounter order.
    fn classify(
        &self,
        config: &InterconnectConfig,
        selected: Vec<Selected>,
        abstraction: &AbstractionDefinition,
        revision: Revision,
    ) -> Result<Vec<Planned>, GenerateError> {
        let mut planned = Vec::with_capacity(selected.len());
        let mut targets = 0usize;
        let mut initiators = 0usize;

        for selected in selected {
            let current = selected.bus.mode;
            let (name, mode) = match selected.role {
                Role::Endpoint(_) => {
                    if !selected.is_top && !current.is_target() {
                        return Err(topology(&selected, "a target interface is required"));
                    }
                    let mode = if config.is_channel {
                        InterfaceMode::mirrored_target(revision)
                    } else {
                        InterfaceMode::initiator(revision)
                    };
                    let name = format!("target_{targets}");
                    targets += 1;
                    (name, mode)
                }
                Role::StartingPoint(_) => {
                    if !selected.is_top && !(current.is_initiator() || current.is_mirrored_target()) {
                        return Err(topology(&selected, "an initiator interface is required"));
                    }
                    let mode = if config.is_channel {
                        InterfaceMode::mirrored_initiator(revision)
                    } else {
                        InterfaceMode::target(revision)
                    };
                    let name = format!("initiator_{initiators}");
                    initiators += 1;
                    (name, mode)
                }
            };
            let mode = if selected.is_top { current } else { mode };

            if abstraction.bus_type != Vlnv::default() && selected.bus.bus_type != abstraction.bus_type {
                self.sink.warning(
                    BUS_TYPE_MISMATCH,
                    format!(
                        "bus interface {}.{} is of bus type {}, expected {}",
                        selected.instance, selected.bus.name, selected.bus.bus_type, abstraction.bus_type
                    ),
                );
            }

            planned.push(Planned {
                selected,
                name,
                mode,
            });
        }
        Ok(planned)
    }

    /// Adds the fabric interface for `plan` with its cloned ports.
    fn synthesize(
        &self,
        fabric: &mut Component,
        plan: &Planned,
        config: &InterconnectConfig,
        abstraction: &AbstractionDefinition,
    ) {
        let source = &plan.selected;
        let side = plan.mode.wire_side();
        let parser = LiteralExpressionParser::with_parameters(&source.owner.parameters);
        let mut interface = BusInterface::new(&plan.name, plan.mode, source.bus.bus_type.clone())
            .with_abstraction(config.vlnvs.bus.clone());
        interface.description = format!("Connects {}.{}", source.instance, source.bus.name);

        for map in &source.bus.port_maps {
            let Some(wire) = abstraction
                .logical_port(&map.logical_port)
                .and_then(|p| p.wire(side))
            else {
                self.sink.warning(
                    LOGICAL_PORT_SKIPPED,
                    format!(
                        "logical port {} of {}.{} is not part of {} in {} mode; not connected",
                        map.logical_port, source.instance, source.bus.name, abstraction.vlnv, plan.mode
                    ),
                );
                continue;
            };
            let physical = format!("{}_{}", plan.name, map.physical_port);
            interface.port_maps.push(PortMap {
                logical_range: map.logical_range.clone(),
                physical_range: map.physical_range.clone(),
                ..PortMap::new(&map.logical_port, &physical)
            });
            if fabric.port(&physical).is_some() {
                continue;
            }
            let port = match source.owner.port(&map.physical_port) {
                Some(original) => clone_port(original, physical, wire, source.is_top, &parser),
                None => port_from_wire(physical, wire, &parser),
            };
            fabric.ports.push(port);
        }

        self.sink.note(
            INTERFACE_CREATED,
            format!(
                "created {} interface {} for {}.{}",
                plan.mode, plan.name, source.instance, source.bus.name
            ),
        );
        fabric.bus_interfaces.push(interface);
    }

    /// Checks the endpoint regions for overlap and, for a crossbar, adds the
    /// global address space.
    fn compute_address_space(
        &self,
        fabric: &mut Component,
        planned: &[Planned],
        config: &InterconnectConfig,
        request: &GenerationRequest,
    ) -> Result<(), GenerateError> {
        let mut reserve = MemoryReserve::new();
        for endpoint in &request.endpoints {
            for region in &endpoint.regions {
                reserve.add_region(&endpoint.name, *region);
            }
        }
        if let Some((first, second)) = reserve.first_overlap() {
            return Err(GenerateError::Overlap {
                first: first.to_string(),
                second: second.to_string(),
            });
        }

        let unit_bits = self.check_target_consistency(planned, request);
        if config.is_channel {
            return Ok(());
        }
        let Some(span) = reserve.span() else {
            return Ok(());
        };

        let name = format!("{}_global_space", config.bus_type());
        let mut space = AddressSpace::new(
            &name,
            format_ipxact_hex(span.len()),
            config.address_width.to_string(),
        );
        if unit_bits != DEFAULT_ADDRESS_UNIT_BITS {
            space.address_unit_bits = unit_bits.to_string();
        }
        fabric.address_spaces.push(space);

        for plan in planned {
            if matches!(plan.selected.role, Role::Endpoint(_)) && plan.mode.is_initiator() {
                if let Some(interface) = fabric.bus_interfaces.iter_mut().find(|b| b.name == plan.name) {
                    interface.address_space_ref = Some(name.clone());
                }
            }
        }
        Ok(())
    }

    /// Warns about targets whose address unit bits or data width differ from
    /// the first target's; returns the first target's address unit bits.
    fn check_target_consistency(&self, planned: &[Planned], request: &GenerationRequest) -> u64 {
        let mut first: Option<(&str, u64, u32)> = None;
        for plan in planned {
            let Role::Endpoint(index) = plan.selected.role else {
                continue;
            };
            let endpoint = &request.endpoints[index];
            let unit_bits = address_unit_bits_of(&plan.selected);
            let Some((first_name, first_bits, first_width)) = first else {
                first = Some((&endpoint.name, unit_bits, endpoint.data_width));
                continue;
            };
            if unit_bits != first_bits {
                self.sink.warning(
                    TARGET_MISMATCH,
                    format!(
                        "target {} uses {unit_bits} address unit bits; keeping {first_bits} from {first_name}",
                        endpoint.name
                    ),
                );
            }
            if endpoint.data_width != first_width {
                self.sink.warning(
                    TARGET_MISMATCH,
                    format!(
                        "target {} has data width {}; keeping {first_width} from {first_name}",
                        endpoint.name, endpoint.data_width
                    ),
                );
            }
        }
        first.map_or(DEFAULT_ADDRESS_UNIT_BITS, |(_, bits, _)| bits)
    }

    /// Adds the fabric instance and one interconnection per fabric interface.
    ///
    /// An instance left by an earlier run under the same name is replaced
    /// together with its connections.
    fn connect(&self, design: &mut Design, fabric: &Component, planned: &[Planned]) {
        let fabric_instance = fabric.vlnv.name.clone();
        design
            .component_instances
            .retain(|i| i.instance_name != fabric_instance);
        design.interconnections.retain(|c| {
            c.start.instance != fabric_instance
                && !matches!(&c.end, InterfaceEnd::Active(end) if end.instance == fabric_instance)
        });
        design.add_instance(&fabric_instance, fabric.vlnv.clone());

        for plan in planned {
            let source = &plan.selected;
            let connection = if source.is_top {
                Interconnection {
                    name: format!("{fabric_instance}_{}_to_{}", plan.name, source.bus.name),
                    start: ActiveInterface {
                        instance: fabric_instance.clone(),
                        bus: plan.name.clone(),
                    },
                    end: InterfaceEnd::Hierarchical {
                        bus: source.bus.name.clone(),
                    },
                }
            } else {
                if design.is_interface_connected(&source.instance, &source.bus.name) {
                    self.sink.warning(
                        ALREADY_CONNECTED,
                        format!(
                            "bus interface {}.{} is already connected in design {}",
                            source.instance, source.bus.name, design.vlnv
                        ),
                    );
                }
                Interconnection {
                    name: format!(
                        "{}_{}_to_{fabric_instance}_{}",
                        source.instance, source.bus.name, plan.name
                    ),
                    start: ActiveInterface {
                        instance: source.instance.clone(),
                        bus: source.bus.name.clone(),
                    },
                    end: InterfaceEnd::Active(ActiveInterface {
                        instance: fabric_instance.clone(),
                        bus: plan.name.clone(),
                    }),
                }
            };
            design.interconnections.push(connection);
        }
    }

    fn persist(&mut self, fabric: &Component, design: &Design) -> Result<(), GenerateError> {
        for document in [Document::from(fabric.clone()), Document::from(design.clone())] {
            if let Err(e) = self.library.save(&document) {
                self.sink.error(SAVE_FAILED, "Error saving design to disk.");
                return Err(e.into());
            }
            self.sink.note(
                DOCUMENT_SAVED,
                format!("saved {} {}", document.kind(), document.vlnv()),
            );
        }
        Ok(())
    }
}

fn missing<'v>(
    kind: &'static str,
    vlnv: &'v Vlnv,
) -> impl FnOnce(LibraryError) -> GenerateError + 'v {
    move |e| match e {
        LibraryError::NotFound(_) | LibraryError::WrongKind { .. } => {
            GenerateError::MissingDefinition {
                kind,
                vlnv: vlnv.clone(),
            }
        }
        other => other.into(),
    }
}

fn find_bus_interface(owner: &Component, interface: &InterfaceRef) -> Result<BusInterface, GenerateError> {
    owner
        .bus_interface(&interface.bus_interface)
        .cloned()
        .ok_or_else(|| GenerateError::MissingBusInterface {
            instance: interface.instance.clone(),
            bus: interface.bus_interface.clone(),
        })
}

fn topology(selected: &Selected, requirement: &str) -> GenerateError {
    GenerateError::Topology {
        reason: format!(
            "bus interface {}.{} has mode {}; {requirement}",
            selected.instance, selected.bus.name, selected.bus.mode
        ),
    }
}

fn address_unit_bits_of(selected: &Selected) -> u64 {
    let parser = LiteralExpressionParser::with_parameters(&selected.owner.parameters);
    selected
        .bus
        .memory_map_ref
        .as_deref()
        .and_then(|name| selected.owner.memory_map(name))
        .map(|map| map.address_unit_bits.trim())
        .filter(|aub| !aub.is_empty())
        .and_then(|aub| parser.resolve_u64(aub))
        .unwrap_or(DEFAULT_ADDRESS_UNIT_BITS)
}

/// Returns the decoded span of each endpoint-derived fabric interface.
fn endpoint_spans(planned: &[Planned], request: &GenerationRequest) -> HashMap<String, AddressRegion> {
    planned
        .iter()
        .filter_map(|plan| match plan.selected.role {
            Role::Endpoint(index) => request.endpoints[index]
                .span()
                .map(|span| (plan.name.clone(), span)),
            Role::StartingPoint(_) => None,
        })
        .collect()
}

/// Sets bridges, base and remap addresses, and the channel.
fn finalize(
    fabric: &mut Component,
    planned: &[Planned],
    regions: &HashMap<String, AddressRegion>,
    is_channel: bool,
) {
    let initiators: Vec<String> = fabric
        .bus_interfaces
        .iter()
        .filter(|b| b.mode.is_initiator())
        .map(|b| b.name.clone())
        .collect();

    for interface in &mut fabric.bus_interfaces {
        if interface.name == CLOCK_INTERFACE || interface.name == RESET_INTERFACE {
            continue;
        }
        if interface.mode.is_target() && !interface.mode.is_mirrored() {
            interface.transparent_bridges = initiators.clone();
        }
        let Some(region) = regions.get(&interface.name) else {
            continue;
        };
        if interface.mode.is_initiator() {
            interface.base_address = format_ipxact_hex(region.start);
        } else if interface.mode.is_mirrored_target() {
            interface.remap_address = format_ipxact_hex(region.start);
            interface.range = format_ipxact_hex(region.len());
        }
    }

    if is_channel {
        fabric.channels.push(Channel {
            name: CHANNEL_NAME.to_string(),
            bus_interface_refs: planned.iter().map(|p| p.name.clone()).collect(),
        });
    }
}

/// Builds a `clk` or `rst` interface whose ports are the abstraction's
/// target-side wires.
fn system_interface(
    ports: &mut Vec<Port>,
    name: &str,
    abstraction: &AbstractionDefinition,
    revision: Revision,
) -> BusInterface {
    let parser = LiteralExpressionParser::new();
    let mut interface = BusInterface::new(name, InterfaceMode::target(revision), abstraction.bus_type.clone())
        .with_abstraction(abstraction.vlnv.clone());
    for (logical, wire) in abstraction.ports_for(WireSide::Target) {
        interface = interface.with_port_map(&logical.logical_name, &logical.logical_name);
        if ports.iter().any(|p| p.name == logical.logical_name) {
            continue;
        }
        let mut port = port_from_wire(logical.logical_name.clone(), wire, &parser);
        port.default_value = logical.default_value.clone();
        ports.push(port);
    }
    interface
}

fn clone_port(
    original: &Port,
    name: String,
    wire: &WireMode,
    is_top: bool,
    parser: &dyn ExpressionParser,
) -> Port {
    let direction = if is_top {
        original.direction
    } else {
        original.direction.mirrored()
    };
    let (left_bound, right_bound) = match width_of(wire) {
        Some(width) => bounds_for_width(width, parser),
        None => (or_zero(&original.left_bound), or_zero(&original.right_bound)),
    };
    Port {
        name,
        direction,
        left_bound,
        right_bound,
        default_value: original.default_value.clone(),
        description: original.description.clone(),
    }
}

fn port_from_wire(name: String, wire: &WireMode, parser: &dyn ExpressionParser) -> Port {
    let (left, right) = width_of(wire)
        .map(|width| bounds_for_width(width, parser))
        .unwrap_or_else(|| ("0".to_string(), "0".to_string()));
    let direction = match wire.direction {
        Direction::Phantom => Direction::In,
        other => other,
    };
    Port::new(name, direction).with_bounds(left, right)
}

fn width_of(wire: &WireMode) -> Option<&str> {
    Some(wire.width.trim()).filter(|w| !w.is_empty())
}

/// `1` gives `[0:0]`; any other width `w` gives `[w-1:0]`, folded when `w`
/// resolves.
fn bounds_for_width(width: &str, parser: &dyn ExpressionParser) -> (String, String) {
    if width == "1" {
        return ("0".to_string(), "0".to_string());
    }
    let left = match parser.resolve_u64(width) {
        Some(w) => w.saturating_sub(1).to_string(),
        None => format!("{width}-1"),
    };
    (left, "0".to_string())
}

fn or_zero(bound: &str) -> String {
    if bound.trim().is_empty() {
        "0".to_string()
    } else {
        bound.to_string()
    }
}
