//! Whole-component validation, split into sections.

use std::collections::HashMap;

use ipx_model::{Component, ExpressionParser, Port};
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

use crate::helpers::{find_duplicate_name_errors, has_valid_name};
use crate::validators::address_space::AddressSpaceValidator;
use crate::validators::memory_map::MemoryMapValidator;
use crate::validators::parameter::ParameterValidator;
use crate::validators::power_domain::PowerDomainValidator;
use crate::validators::remap_state::RemapStateValidator;
use crate::Validator;

/// A group of component checks reported under one diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentSection {
    /// The component VLNV.
    Identity,
    /// Component parameters.
    Parameters,
    /// Physical ports.
    Ports,
    /// Bus interfaces and their references.
    BusInterfaces,
    /// Channels.
    Channels,
    /// Address spaces and segments.
    AddressSpaces,
    /// Memory maps and everything below them.
    MemoryMaps,
    /// Power domains.
    PowerDomains,
    /// Remap states.
    RemapStates,
}

impl ComponentSection {
    /// Every section, in the order they are checked.
    pub const ALL: [ComponentSection; 9] = [
        ComponentSection::Identity,
        ComponentSection::Parameters,
        ComponentSection::Ports,
        ComponentSection::BusInterfaces,
        ComponentSection::Channels,
        ComponentSection::AddressSpaces,
        ComponentSection::MemoryMaps,
        ComponentSection::PowerDomains,
        ComponentSection::RemapStates,
    ];

    /// Returns the kebab-case name of this section.
    pub fn name(self) -> &'static str {
        match self {
            ComponentSection::Identity => "identity",
            ComponentSection::Parameters => "parameters",
            ComponentSection::Ports => "ports",
            ComponentSection::BusInterfaces => "bus-interfaces",
            ComponentSection::Channels => "channels",
            ComponentSection::AddressSpaces => "address-spaces",
            ComponentSection::MemoryMaps => "memory-maps",
            ComponentSection::PowerDomains => "power-domains",
            ComponentSection::RemapStates => "remap-states",
        }
    }
}

/// Runs every section of checks over a component.
pub struct ComponentValidator<'a> {
    parser: &'a dyn ExpressionParser,
}

impl<'a> ComponentValidator<'a> {
    /// Creates a validator resolving expressions through `parser`.
    pub fn new(parser: &'a dyn ExpressionParser) -> Self {
        Self { parser }
    }

    /// Appends the problems of one section of `component`.
    pub fn find_errors_in_section(
        &self,
        errors: &mut Vec<String>,
        component: &Component,
        section: ComponentSection,
        context: &str,
    ) {
        match section {
            ComponentSection::Identity => {
                if !component.vlnv.is_valid() {
                    errors.push(format!(
                        "Invalid VLNV {} set for component within {context}",
                        component.vlnv
                    ));
                }
            }
            ComponentSection::Parameters => {
                ParameterValidator::new(self.parser).find_errors_in_all(
                    errors,
                    &component.parameters,
                    context,
                );
            }
            ComponentSection::Ports => self.find_errors_in_ports(errors, &component.ports, context),
            ComponentSection::BusInterfaces => {
                self.find_errors_in_bus_interfaces(errors, component, context)
            }
            ComponentSection::Channels => self.find_errors_in_channels(errors, component, context),
            ComponentSection::AddressSpaces => {
                find_duplicate_name_errors(
                    errors,
                    component.address_spaces.iter().map(|a| a.name.as_str()),
                    "address spaces",
                    context,
                );
                let validator = AddressSpaceValidator::new(self.parser);
                for space in &component.address_spaces {
                    validator.find_errors_in(errors, space, context);
                }
            }
            ComponentSection::MemoryMaps => {
                find_duplicate_name_errors(
                    errors,
                    component.memory_maps.iter().map(|m| m.name.as_str()),
                    "memory maps",
                    context,
                );
                let validator = MemoryMapValidator::new(
                    self.parser,
                    &component.remap_states,
                    &component.bus_interfaces,
                    &component.address_spaces,
                );
                for map in &component.memory_maps {
                    validator.find_errors_in(errors, map, context);
                }
            }
            ComponentSection::PowerDomains => {
                self.find_errors_in_power_domains(errors, component, context)
            }
            ComponentSection::RemapStates => {
                find_duplicate_name_errors(
                    errors,
                    component.remap_states.iter().map(|r| r.name.as_str()),
                    "remap states",
                    context,
                );
                let validator = RemapStateValidator::new(self.parser, &component.ports);
                for state in &component.remap_states {
                    validator.find_errors_in(errors, state, context);
                }
            }
        }
    }

    fn find_errors_in_ports(&self, errors: &mut Vec<String>, ports: &[Port], context: &str) {
        find_duplicate_name_errors(errors, ports.iter().map(|p| p.name.as_str()), "ports", context);
        for port in ports {
            let name = &port.name;
            if !has_valid_name(name) {
                errors.push(format!("Invalid name specified for port {name} within {context}"));
            }
            if port.is_vector() {
                if self.parser.resolve_i64(&port.left_bound).is_none() {
                    errors.push(format!("Invalid left bound set for port {name} within {context}"));
                }
                if self.parser.resolve_i64(&port.right_bound).is_none() {
                    errors.push(format!("Invalid right bound set for port {name} within {context}"));
                }
            }
        }
    }

    fn find_errors_in_bus_interfaces(
        &self,
        errors: &mut Vec<String>,
        component: &Component,
        context: &str,
    ) {
        find_duplicate_name_errors(
            errors,
            component.bus_interfaces.iter().map(|b| b.name.as_str()),
            "bus interfaces",
            context,
        );
        for bus in &component.bus_interfaces {
            let name = &bus.name;
            if !has_valid_name(name) {
                errors.push(format!(
                    "Invalid name specified for bus interface {name} within {context}"
                ));
            }
            if !bus.bus_type.is_valid() {
                errors.push(format!(
                    "Invalid bus type set for bus interface {name} within {context}"
                ));
            }
            if !bus.mode.is_valid_for(component.revision) {
                errors.push(format!(
                    "Invalid interface mode {} set for bus interface {name} within {context}",
                    bus.mode
                ));
            }
            for physical in bus.physical_ports() {
                if component.port(physical).is_none() {
                    errors.push(format!(
                        "Physical port {physical} mapped by bus interface {name} does not exist within {context}"
                    ));
                }
            }
            if let Some(map) = &bus.memory_map_ref {
                if component.memory_map(map).is_none() {
                    errors.push(format!(
                        "Invalid memory map reference {map} set for bus interface {name} within {context}"
                    ));
                }
            }
            if let Some(space) = &bus.address_space_ref {
                if component.address_space(space).is_none() {
                    errors.push(format!(
                        "Invalid address space reference {space} set for bus interface {name} within {context}"
                    ));
                }
            }
            for bridge in &bus.transparent_bridges {
                let reaches_initiator = component
                    .bus_interface(bridge)
                    .is_some_and(|b| b.mode.is_initiator());
                if !reaches_initiator {
                    errors.push(format!(
                        "Invalid transparent bridge {bridge} set for bus interface {name} within {context}"
                    ));
                }
            }
        }
    }

    fn find_errors_in_channels(&self, errors: &mut Vec<String>, component: &Component, context: &str) {
        find_duplicate_name_errors(
            errors,
            component.channels.iter().map(|c| c.name.as_str()),
            "channels",
            context,
        );
        for channel in &component.channels {
            let name = &channel.name;
            if !has_valid_name(name) {
                errors.push(format!("Invalid name specified for channel {name} within {context}"));
            }
            for reference in &channel.bus_interface_refs {
                if component.bus_interface(reference).is_none() {
                    errors.push(format!(
                        "Bus interface {reference} referenced by channel {name} does not exist within {context}"
                    ));
                }
            }
        }
    }

    fn find_errors_in_power_domains(
        &self,
        errors: &mut Vec<String>,
        component: &Component,
        context: &str,
    ) {
        let domains = &component.power_domains;
        find_duplicate_name_errors(
            errors,
            domains.iter().map(|d| d.name.as_str()),
            "power domains",
            context,
        );
        let validator = PowerDomainValidator::new(self.parser, domains);
        for domain in domains {
            validator.find_errors_in(errors, domain, context);
        }

        let mut graph = DiGraph::<usize, ()>::new();
        let mut nodes = HashMap::new();
        for (index, domain) in domains.iter().enumerate() {
            nodes.entry(domain.name.as_str()).or_insert_with(|| graph.add_node(index));
        }
        for domain in domains {
            let Some(parent) = domain.sub_domain_of.as_deref() else {
                continue;
            };
            // Self references are reported by the domain validator.
            if parent == domain.name {
                continue;
            }
            if let (Some(&child), Some(&parent)) = (nodes.get(domain.name.as_str()), nodes.get(parent)) {
                graph.update_edge(child, parent, ());
            }
        }
        let mut cycles: Vec<usize> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .filter_map(|scc| scc.iter().map(|n| graph[*n]).min())
            .collect();
        cycles.sort_unstable();
        for first in cycles {
            errors.push(format!(
                "Power domains of {context} form a cycle through {}",
                domains[first].name
            ));
        }
    }
}

impl Validator<Component> for ComponentValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, component: &Component, context: &str) {
        for section in ComponentSection::ALL {
            self.find_errors_in_section(errors, component, section, context);
        }
    }
}
