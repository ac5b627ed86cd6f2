//! The JSON configuration consumed by interconnect generation.
//!
//! Field names follow the configuration document exactly (`"Address width"`,
//! `"Targets"`, ...). Addresses stay as strings here; they are parsed by the
//! stage that uses them so a malformed address surfaces as an address parse
//! failure of that stage rather than as a load failure.

use ipx_common::Vlnv;
use serde::{Deserialize, Serialize};

/// VLNVs of the documents taking part in a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VlnvTable {
    /// Component whose design receives the interconnect.
    #[serde(rename = "Design")]
    pub design: Vlnv,
    /// VLNV given to the generated interconnect component.
    #[serde(rename = "Interconnect")]
    pub interconnect: Vlnv,
    /// Abstraction definition of the bus being interconnected.
    #[serde(rename = "Bus")]
    pub bus: Vlnv,
    /// Abstraction definition of the clock interface, if one is wanted.
    #[serde(rename = "Clock", default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<Vlnv>,
    /// Abstraction definition of the reset interface, if one is wanted.
    #[serde(rename = "Reset", default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<Vlnv>,
}

/// One address region of a target; `End` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPair {
    /// First address, hexadecimal.
    #[serde(rename = "Start")]
    pub start: String,
    /// Last address, hexadecimal, inclusive.
    #[serde(rename = "End")]
    pub end: String,
}

/// An initiator port of the fabric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatorConfig {
    /// Crossbar port index.
    #[serde(rename = "Index")]
    pub index: u32,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Data width in bits.
    #[serde(rename = "Data width", default = "default_data_width")]
    pub data_width: u32,
    /// Design instance owning the initiator bus interface.
    #[serde(rename = "Instance", default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Bus interface on that instance.
    #[serde(rename = "Bus interface", default, skip_serializing_if = "Option::is_none")]
    pub bus_interface: Option<String>,
}

/// A target port of the fabric with the address regions it decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Crossbar port index.
    #[serde(rename = "Index")]
    pub index: u32,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Data width in bits.
    #[serde(rename = "Data width", default = "default_data_width")]
    pub data_width: u32,
    /// Design instance owning the target bus interface.
    #[serde(rename = "Instance", default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Bus interface on that instance.
    #[serde(rename = "Bus interface", default, skip_serializing_if = "Option::is_none")]
    pub bus_interface: Option<String>,
    /// Decoded regions in table order.
    #[serde(rename = "Address regions", default)]
    pub address_regions: Vec<AddressPair>,
}

/// A parameter copied onto the generated component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Parameter name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Parameter value expression.
    #[serde(rename = "Value")]
    pub value: String,
}

/// The complete interconnect generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterconnectConfig {
    /// Participating documents.
    #[serde(rename = "VLNVs")]
    pub vlnvs: VlnvTable,
    /// Bus protocol name; derived from the bus VLNV when absent.
    #[serde(rename = "Bus type", default, skip_serializing_if = "Option::is_none")]
    pub bus_type: Option<String>,
    /// Build a shared channel instead of a crossbar.
    #[serde(rename = "Channel", default)]
    pub is_channel: bool,
    /// Address bus width in bits.
    #[serde(rename = "Address width", default = "default_address_width")]
    pub address_width: u32,
    /// Transaction ID width in bits at the initiators' ports.
    #[serde(rename = "ID width", default = "default_id_width")]
    pub id_width: u32,
    /// User signal width in bits.
    #[serde(rename = "User width", default = "default_user_width")]
    pub user_width: u32,
    /// Initiators in crossbar port order.
    #[serde(rename = "Initiators", default)]
    pub initiators: Vec<InitiatorConfig>,
    /// Targets in crossbar port order.
    #[serde(rename = "Targets", default)]
    pub targets: Vec<TargetConfig>,
    /// Extra parameters for the generated component.
    #[serde(rename = "Parameters", default)]
    pub parameters: Vec<ParameterConfig>,
}

impl InterconnectConfig {
    /// Returns the bus protocol name.
    ///
    /// An explicit `"Bus type"` wins; otherwise the bus abstraction name is
    /// used up to its `.abs` suffix (`axi4.absDef` becomes `axi4`).
    pub fn bus_type(&self) -> String {
        if let Some(bus_type) = self.bus_type.as_ref().filter(|t| !t.trim().is_empty()) {
            return bus_type.trim().to_string();
        }
        let name = &self.vlnvs.bus.name;
        match name.find(".abs") {
            Some(pos) => name[..pos].to_string(),
            None => name.clone(),
        }
    }

    /// Returns the largest data width across all initiators and targets.
    pub fn max_data_width(&self) -> u32 {
        self.initiators
            .iter()
            .map(|i| i.data_width)
            .chain(self.targets.iter().map(|t| t.data_width))
            .max()
            .unwrap_or_else(default_data_width)
    }
}

fn default_data_width() -> u32 {
    32
}

fn default_address_width() -> u32 {
    32
}

fn default_id_width() -> u32 {
    8
}

fn default_user_width() -> u32 {
    1
}
