//! Bus interfaces, interface modes, port maps and channels.

use crate::component::Revision;
use ipx_common::Vlnv;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The role a bus interface plays on its bus.
///
/// The first seven variants are the 2014 vocabulary, the four after them the
/// 2022 one. `System`, `MirroredSystem` and `Monitor` exist in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterfaceMode {
    /// Initiates transactions (2014).
    Master,
    /// Responds to transactions (2014).
    Slave,
    /// System signals such as clock or reset.
    System,
    /// Mirror of a master, used by interconnect components (2014).
    MirroredMaster,
    /// Mirror of a slave, used by interconnect components (2014).
    MirroredSlave,
    /// Mirror of a system interface.
    MirroredSystem,
    /// Passive observer.
    Monitor,
    /// Initiates transactions (2022).
    Initiator,
    /// Responds to transactions (2022).
    Target,
    /// Mirror of an initiator (2022).
    MirroredInitiator,
    /// Mirror of a target (2022).
    MirroredTarget,
}

/// Which side of an abstraction definition a mode draws its wires from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireSide {
    /// Initiator-side wires.
    Initiator,
    /// Target-side wires.
    Target,
    /// System wires: the union of both sides.
    System,
}

impl InterfaceMode {
    /// Returns the initiator mode for `revision`.
    pub fn initiator(revision: Revision) -> Self {
        match revision {
            Revision::Std14 => InterfaceMode::Master,
            Revision::Std22 => InterfaceMode::Initiator,
        }
    }

    /// Returns the target mode for `revision`.
    pub fn target(revision: Revision) -> Self {
        match revision {
            Revision::Std14 => InterfaceMode::Slave,
            Revision::Std22 => InterfaceMode::Target,
        }
    }

    /// Returns the mirrored initiator mode for `revision`.
    pub fn mirrored_initiator(revision: Revision) -> Self {
        match revision {
            Revision::Std14 => InterfaceMode::MirroredMaster,
            Revision::Std22 => InterfaceMode::MirroredInitiator,
        }
    }

    /// Returns the mirrored target mode for `revision`.
    pub fn mirrored_target(revision: Revision) -> Self {
        match revision {
            Revision::Std14 => InterfaceMode::MirroredSlave,
            Revision::Std22 => InterfaceMode::MirroredTarget,
        }
    }

    /// Returns `true` for modes that receive transactions on the owning component.
    ///
    /// Mirrored initiators count as targets: they face an initiator.
    pub fn is_target(self) -> bool {
        matches!(
            self,
            InterfaceMode::Target
                | InterfaceMode::Slave
                | InterfaceMode::MirroredInitiator
                | InterfaceMode::MirroredMaster
        )
    }

    /// Returns `true` for plain initiator modes of either revision.
    pub fn is_initiator(self) -> bool {
        matches!(self, InterfaceMode::Initiator | InterfaceMode::Master)
    }

    /// Returns `true` for mirrored target modes of either revision.
    pub fn is_mirrored_target(self) -> bool {
        matches!(self, InterfaceMode::MirroredTarget | InterfaceMode::MirroredSlave)
    }

    /// Returns `true` for mirrored modes.
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            InterfaceMode::MirroredMaster
                | InterfaceMode::MirroredSlave
                | InterfaceMode::MirroredSystem
                | InterfaceMode::MirroredInitiator
                | InterfaceMode::MirroredTarget
        )
    }

    /// Returns which abstraction wires belong to this mode.
    pub fn wire_side(self) -> WireSide {
        match self {
            InterfaceMode::Master
            | InterfaceMode::Initiator
            | InterfaceMode::MirroredMaster
            | InterfaceMode::MirroredInitiator => WireSide::Initiator,
            InterfaceMode::Slave
            | InterfaceMode::Target
            | InterfaceMode::MirroredSlave
            | InterfaceMode::MirroredTarget => WireSide::Target,
            InterfaceMode::System | InterfaceMode::MirroredSystem | InterfaceMode::Monitor => {
                WireSide::System
            }
        }
    }

    /// Returns `true` if the mode belongs to the vocabulary of `revision`.
    pub fn is_valid_for(self, revision: Revision) -> bool {
        match self {
            InterfaceMode::System | InterfaceMode::MirroredSystem | InterfaceMode::Monitor => true,
            InterfaceMode::Master
            | InterfaceMode::Slave
            | InterfaceMode::MirroredMaster
            | InterfaceMode::MirroredSlave => revision == Revision::Std14,
            InterfaceMode::Initiator
            | InterfaceMode::Target
            | InterfaceMode::MirroredInitiator
            | InterfaceMode::MirroredTarget => revision == Revision::Std22,
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterfaceMode::Master => "master",
            InterfaceMode::Slave => "slave",
            InterfaceMode::System => "system",
            InterfaceMode::MirroredMaster => "mirroredMaster",
            InterfaceMode::MirroredSlave => "mirroredSlave",
            InterfaceMode::MirroredSystem => "mirroredSystem",
            InterfaceMode::Monitor => "monitor",
            InterfaceMode::Initiator => "initiator",
            InterfaceMode::Target => "target",
            InterfaceMode::MirroredInitiator => "mirroredInitiator",
            InterfaceMode::MirroredTarget => "mirroredTarget",
        };
        f.write_str(name)
    }
}

/// A `[left:right]` part select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitRange {
    /// Left bound expression.
    pub left: String,
    /// Right bound expression.
    pub right: String,
}

/// Binds a physical port to a logical port of the bus abstraction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortMap {
    /// Logical port name from the abstraction definition.
    pub logical_port: String,
    /// Part of the logical port, if not all of it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_range: Option<BitRange>,
    /// Physical port name on the component.
    pub physical_port: String,
    /// Part of the physical port, if not all of it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_range: Option<BitRange>,
}

impl PortMap {
    /// Maps a whole logical port onto a whole physical port.
    pub fn new(logical_port: impl Into<String>, physical_port: impl Into<String>) -> Self {
        Self {
            logical_port: logical_port.into(),
            physical_port: physical_port.into(),
            ..Self::default()
        }
    }
}

/// A named group of ports conforming to a bus abstraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusInterface {
    /// Interface name.
    pub name: String,
    /// Role on the bus.
    pub mode: InterfaceMode,
    /// Bus definition.
    pub bus_type: Vlnv,
    /// Abstraction definition the port maps refer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstraction_ref: Option<Vlnv>,
    /// Logical-to-physical port bindings.
    #[serde(default)]
    pub port_maps: Vec<PortMap>,
    /// Memory map exposed by a target interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_map_ref: Option<String>,
    /// Address space reached by an initiator interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_space_ref: Option<String>,
    /// Base address of an initiator interface.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_address: String,
    /// Remap address of a mirrored target interface.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remap_address: String,
    /// Range of a mirrored target interface.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub range: String,
    /// Initiator interfaces a target interface bridges to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transparent_bridges: Vec<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl BusInterface {
    /// Creates an interface without port maps.
    pub fn new(name: impl Into<String>, mode: InterfaceMode, bus_type: Vlnv) -> Self {
        Self {
            name: name.into(),
            mode,
            bus_type,
            abstraction_ref: None,
            port_maps: Vec::new(),
            memory_map_ref: None,
            address_space_ref: None,
            base_address: String::new(),
            remap_address: String::new(),
            range: String::new(),
            transparent_bridges: Vec::new(),
            description: String::new(),
        }
    }

    /// Sets the abstraction definition.
    pub fn with_abstraction(mut self, abstraction: Vlnv) -> Self {
        self.abstraction_ref = Some(abstraction);
        self
    }

    /// Appends a port map.
    pub fn with_port_map(mut self, logical: impl Into<String>, physical: impl Into<String>) -> Self {
        self.port_maps.push(PortMap::new(logical, physical));
        self
    }

    /// Returns the physical ports this interface maps, in map order, without repeats.
    pub fn physical_ports(&self) -> Vec<&str> {
        let mut ports: Vec<&str> = Vec::new();
        for map in &self.port_maps {
            if !ports.contains(&map.physical_port.as_str()) {
                ports.push(&map.physical_port);
            }
        }
        ports
    }

    /// Returns the logical port bound to `physical`, if any.
    pub fn logical_port_of(&self, physical: &str) -> Option<&str> {
        self.port_maps
            .iter()
            .find(|m| m.physical_port == physical)
            .map(|m| m.logical_port.as_str())
    }
}

/// A shared bus joining several mirrored interfaces of one component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name.
    pub name: String,
    /// Joined bus interfaces.
    pub bus_interface_refs: Vec<String>,
}
