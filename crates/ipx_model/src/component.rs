//! Components: the unit a library stores and a design instantiates.

use crate::address_space::AddressSpace;
use crate::bus::{BusInterface, Channel};
use crate::memory::MemoryMap;
use crate::parameter::Parameter;
use crate::port::Port;
use crate::power::PowerDomain;
use crate::remap::RemapState;
use ipx_common::Vlnv;
use serde::{Deserialize, Serialize};

/// Descriptor standard revision; selects the interface-mode vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Revision {
    /// IEEE 1685-2014.
    Std14,
    /// IEEE 1685-2022.
    #[default]
    Std22,
}

/// A hardware component description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Component {
    /// Identifier of this component.
    pub vlnv: Vlnv,
    /// Descriptor revision.
    #[serde(default)]
    pub revision: Revision,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Component parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Physical ports in declaration order.
    #[serde(default)]
    pub ports: Vec<Port>,
    /// Bus interfaces in declaration order.
    #[serde(default)]
    pub bus_interfaces: Vec<BusInterface>,
    /// Channels joining mirrored interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<Channel>,
    /// Address spaces of initiator interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_spaces: Vec<AddressSpace>,
    /// Memory maps of target interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memory_maps: Vec<MemoryMap>,
    /// Power domains.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub power_domains: Vec<PowerDomain>,
    /// Remap states.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remap_states: Vec<RemapState>,
    /// Design describing this component's internals, if hierarchical.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_ref: Option<Vlnv>,
}

impl Component {
    /// Creates an empty component.
    pub fn new(vlnv: Vlnv, revision: Revision) -> Self {
        Self {
            vlnv,
            revision,
            ..Self::default()
        }
    }

    /// Looks up a bus interface by name.
    pub fn bus_interface(&self, name: &str) -> Option<&BusInterface> {
        self.bus_interfaces.iter().find(|b| b.name == name)
    }

    /// Looks up a port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Looks up an address space by name.
    pub fn address_space(&self, name: &str) -> Option<&AddressSpace> {
        self.address_spaces.iter().find(|a| a.name == name)
    }

    /// Looks up a memory map by name.
    pub fn memory_map(&self, name: &str) -> Option<&MemoryMap> {
        self.memory_maps.iter().find(|m| m.name == name)
    }

    /// Returns the ports mapped by `bus`, in port map order.
    pub fn ports_of_interface(&self, bus: &BusInterface) -> Vec<&Port> {
        bus.physical_ports()
            .into_iter()
            .filter_map(|name| self.port(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::InterfaceMode;
    use crate::port::Direction;

    #[test]
    fn lookups() {
        let mut component = Component::new(Vlnv::new("acme", "ip", "ram", "1.0"), Revision::Std22);
        component.ports.push(Port::new("s_addr", Direction::In));
        component.ports.push(Port::new("s_data", Direction::Out));
        component.bus_interfaces.push(
            BusInterface::new("s", InterfaceMode::Target, Vlnv::default())
                .with_port_map("DATA", "s_data")
                .with_port_map("ADDR", "s_addr")
                .with_port_map("GONE", "s_missing"),
        );
        let bus = component.bus_interface("s").unwrap();
        let names: Vec<_> = component.ports_of_interface(bus).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["s_data", "s_addr"]);
        assert!(component.bus_interface("m").is_none());
    }

    #[test]
    fn default_revision_is_2022() {
        let component: Component = serde_json::from_str(r#"{"vlnv": "a:b:c:1"}"#).unwrap();
        assert_eq!(component.revision, Revision::Std22);
        assert!(component.ports.is_empty());
    }
}
