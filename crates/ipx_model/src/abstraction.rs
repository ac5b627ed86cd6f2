//! Bus and abstraction definitions.

use crate::bus::WireSide;
use crate::port::Direction;
use ipx_common::Vlnv;
use serde::{Deserialize, Serialize};

/// Whether a logical port must appear on an interface of a given side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Must be mapped.
    Required,
    /// May be mapped.
    #[default]
    Optional,
    /// Must not be mapped.
    Illegal,
}

/// Properties of a logical port on one side of the bus.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireMode {
    /// Direction seen from an interface on this side.
    pub direction: Direction,
    /// Width expression; empty when the width is left to the component.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub width: String,
    /// Presence requirement.
    #[serde(default)]
    pub presence: Presence,
}

impl WireMode {
    /// Creates a wire of the given direction and width.
    pub fn new(direction: Direction, width: impl Into<String>) -> Self {
        Self {
            direction,
            width: width.into(),
            presence: Presence::Optional,
        }
    }
}

/// One logical port of an abstraction definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortAbstraction {
    /// Logical port name.
    pub logical_name: String,
    /// Wire seen by initiator-side interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_initiator: Option<WireMode>,
    /// Wire seen by target-side interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_target: Option<WireMode>,
    /// Value driven when unconnected.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_value: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl PortAbstraction {
    /// Returns the wire for `side`, skipping wires marked illegal.
    ///
    /// System interfaces see the initiator wire when there is one, otherwise
    /// the target wire.
    pub fn wire(&self, side: WireSide) -> Option<&WireMode> {
        let wire = match side {
            WireSide::Initiator => self.on_initiator.as_ref(),
            WireSide::Target => self.on_target.as_ref(),
            WireSide::System => self.on_initiator.as_ref().or(self.on_target.as_ref()),
        };
        wire.filter(|w| w.presence != Presence::Illegal)
    }
}

/// The logical signal set of a bus.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbstractionDefinition {
    /// Identifier of this definition.
    pub vlnv: Vlnv,
    /// Bus definition this abstraction implements.
    pub bus_type: Vlnv,
    /// Logical ports in declaration order.
    #[serde(default)]
    pub logical_ports: Vec<PortAbstraction>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl AbstractionDefinition {
    /// Looks up a logical port by name.
    pub fn logical_port(&self, name: &str) -> Option<&PortAbstraction> {
        self.logical_ports.iter().find(|p| p.logical_name == name)
    }

    /// Returns the logical ports present on `side` with their wires.
    pub fn ports_for(&self, side: WireSide) -> impl Iterator<Item = (&PortAbstraction, &WireMode)> {
        self.logical_ports
            .iter()
            .filter_map(move |p| p.wire(side).map(|w| (p, w)))
    }
}

/// A bus type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusDefinition {
    /// Identifier of this definition.
    pub vlnv: Vlnv,
    /// Whether an initiator may connect directly to a target.
    #[serde(default)]
    pub direct_connection: bool,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abstraction() -> AbstractionDefinition {
        AbstractionDefinition {
            vlnv: Vlnv::new("acme", "bus", "simple.absDef", "1.0"),
            bus_type: Vlnv::new("acme", "bus", "simple", "1.0"),
            logical_ports: vec![
                PortAbstraction {
                    logical_name: "ADDR".to_string(),
                    on_initiator: Some(WireMode::new(Direction::Out, "32")),
                    on_target: Some(WireMode::new(Direction::In, "32")),
                    ..PortAbstraction::default()
                },
                PortAbstraction {
                    logical_name: "IRQ".to_string(),
                    on_initiator: Some(WireMode {
                        presence: Presence::Illegal,
                        ..WireMode::new(Direction::In, "1")
                    }),
                    on_target: Some(WireMode::new(Direction::Out, "1")),
                    ..PortAbstraction::default()
                },
            ],
            description: String::new(),
        }
    }

    #[test]
    fn ports_per_side() {
        let abs = abstraction();
        let initiator: Vec<_> = abs.ports_for(WireSide::Initiator).map(|(p, _)| p.logical_name.as_str()).collect();
        let target: Vec<_> = abs.ports_for(WireSide::Target).map(|(p, _)| p.logical_name.as_str()).collect();
        assert_eq!(initiator, vec!["ADDR"]);
        assert_eq!(target, vec!["ADDR", "IRQ"]);
    }

    #[test]
    fn system_side_prefers_initiator_wire() {
        let abs = abstraction();
        let addr = abs.logical_port("ADDR").unwrap();
        assert_eq!(addr.wire(WireSide::System).unwrap().direction, Direction::Out);
    }

    #[test]
    fn lookup_missing_port() {
        assert!(abstraction().logical_port("DATA").is_none());
    }
}
