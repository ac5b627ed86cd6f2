//! Designs: instances of components and the wiring between them.

use crate::component::Revision;
use ipx_common::Vlnv;
use serde::{Deserialize, Serialize};

/// One instantiated component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// Instance name, unique within the design.
    pub instance_name: String,
    /// Instantiated component.
    pub component_ref: Vlnv,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A bus interface on an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveInterface {
    /// Instance name.
    pub instance: String,
    /// Bus interface name on that instance.
    pub bus: String,
}

/// The second end of an interconnection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterfaceEnd {
    /// An interface of another instance.
    Active(ActiveInterface),
    /// An interface of the component the design describes.
    Hierarchical {
        /// Bus interface name on the enclosing component.
        bus: String,
    },
}

/// A bus-level connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interconnection {
    /// Connection name.
    pub name: String,
    /// First end; always an instance interface.
    pub start: ActiveInterface,
    /// Second end.
    pub end: InterfaceEnd,
}

/// One end of an ad-hoc connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortReference {
    /// Instance owning the port; `None` for a top-level port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Port name.
    pub port: String,
}

/// A port-level connection outside any bus interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdHocConnection {
    /// Connection name.
    pub name: String,
    /// Connected ports.
    pub port_refs: Vec<PortReference>,
}

/// A design document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Design {
    /// Identifier of this design.
    pub vlnv: Vlnv,
    /// Descriptor revision.
    #[serde(default)]
    pub revision: Revision,
    /// Instances in declaration order.
    #[serde(default)]
    pub component_instances: Vec<ComponentInstance>,
    /// Bus connections.
    #[serde(default)]
    pub interconnections: Vec<Interconnection>,
    /// Port connections.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ad_hoc_connections: Vec<AdHocConnection>,
}

impl Design {
    /// Creates an empty design.
    pub fn new(vlnv: Vlnv, revision: Revision) -> Self {
        Self {
            vlnv,
            revision,
            ..Self::default()
        }
    }

    /// Looks up an instance by name.
    pub fn instance(&self, name: &str) -> Option<&ComponentInstance> {
        self.component_instances
            .iter()
            .find(|i| i.instance_name == name)
    }

    /// Adds an instance.
    pub fn add_instance(&mut self, instance_name: impl Into<String>, component_ref: Vlnv) {
        self.component_instances.push(ComponentInstance {
            instance_name: instance_name.into(),
            component_ref,
            description: String::new(),
        });
    }

    /// Returns `true` if some interconnection already uses `bus` on `instance`.
    pub fn is_interface_connected(&self, instance: &str, bus: &str) -> bool {
        self.interconnections.iter().any(|c| {
            (c.start.instance == instance && c.start.bus == bus)
                || matches!(&c.end, InterfaceEnd::Active(end) if end.instance == instance && end.bus == bus)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_and_connections() {
        let mut design = Design::new(Vlnv::new("acme", "soc", "top.design", "1.0"), Revision::Std22);
        design.add_instance("cpu_0", Vlnv::new("acme", "ip", "cpu", "1.0"));
        design.interconnections.push(Interconnection {
            name: "cpu_0_m_to_top".to_string(),
            start: ActiveInterface {
                instance: "cpu_0".to_string(),
                bus: "m".to_string(),
            },
            end: InterfaceEnd::Hierarchical {
                bus: "ext".to_string(),
            },
        });
        assert_eq!(design.instance("cpu_0").unwrap().component_ref.name, "cpu");
        assert!(design.is_interface_connected("cpu_0", "m"));
        assert!(!design.is_interface_connected("cpu_0", "s"));
    }

    #[test]
    fn serde_roundtrip() {
        let mut design = Design::new(Vlnv::new("a", "b", "c", "1"), Revision::Std14);
        design.ad_hoc_connections.push(AdHocConnection {
            name: "irq".to_string(),
            port_refs: vec![PortReference {
                instance: None,
                port: "irq_o".to_string(),
            }],
        });
        let json = serde_json::to_string(&design).unwrap();
        let back: Design = serde_json::from_str(&json).unwrap();
        assert_eq!(design, back);
    }
}
