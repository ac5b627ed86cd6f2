//! Remap states: port conditions that select alternative memory layouts.

use serde::{Deserialize, Serialize};

/// One port condition of a remap state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemapPort {
    /// Referenced component port.
    pub port_ref: String,
    /// Bit index into the port, if only one bit is compared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_index: Option<String>,
    /// Value the port must carry.
    pub value: String,
}

/// A named combination of port values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemapState {
    /// State name.
    pub name: String,
    /// Port conditions in declaration order.
    #[serde(default)]
    pub remap_ports: Vec<RemapPort>,
}

impl RemapState {
    /// Creates a state without conditions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remap_ports: Vec::new(),
        }
    }

    /// Appends a port condition.
    pub fn with_port(mut self, port_ref: impl Into<String>, port_index: Option<&str>, value: impl Into<String>) -> Self {
        self.remap_ports.push(RemapPort {
            port_ref: port_ref.into(),
            port_index: port_index.map(str::to_string),
            value: value.into(),
        });
        self
    }
}
