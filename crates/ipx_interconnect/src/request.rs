//! The interfaces a generation run connects, taken from the configuration.

use crate::error::GenerateError;
use ipx_common::{parse_hex_address, AddressRegion};
use ipx_config::{ConfigError, InterconnectConfig};
use ipx_rtl::fits_width;

/// A bus interface of a design instance, named in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRef {
    /// Instance name; the design component's own name selects the top level.
    pub instance: String,
    /// Bus interface name on that instance.
    pub bus_interface: String,
}

/// An initiator the fabric must serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartingPoint {
    /// Display name from the configuration.
    pub name: String,
    /// The connected interface.
    pub interface: InterfaceRef,
}

/// A target the fabric decodes addresses for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Display name from the configuration.
    pub name: String,
    /// The connected interface.
    pub interface: InterfaceRef,
    /// Data width in bits.
    pub data_width: u32,
    /// Decoded regions as half-open intervals.
    pub regions: Vec<AddressRegion>,
}

impl Endpoint {
    /// Returns the smallest region covering every decoded region.
    pub fn span(&self) -> Option<AddressRegion> {
        let start = self.regions.iter().map(|r| r.start).min()?;
        let end = self.regions.iter().map(|r| r.end).max()?;
        Some(AddressRegion::new(start, end))
    }
}

/// Everything a generation run needs from the configuration, parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationRequest {
    /// Initiators in configuration order.
    pub starting_points: Vec<StartingPoint>,
    /// Targets in configuration order.
    pub endpoints: Vec<Endpoint>,
}

impl GenerationRequest {
    /// Extracts and parses the connected interfaces of `config`.
    ///
    /// Every initiator and target must name its instance and bus interface.
    /// Region `End` addresses are inclusive in the configuration and become
    /// exclusive here.
    pub fn from_config(config: &InterconnectConfig) -> Result<Self, GenerateError> {
        let starting_points = config
            .initiators
            .iter()
            .enumerate()
            .map(|(i, init)| {
                let interface = interface_ref(
                    init.instance.as_deref(),
                    init.bus_interface.as_deref(),
                    "Initiators",
                    i,
                )?;
                Ok(StartingPoint {
                    name: init.name.clone(),
                    interface,
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;

        let mut endpoints = Vec::with_capacity(config.targets.len());
        for (i, target) in config.targets.iter().enumerate() {
            let interface = interface_ref(
                target.instance.as_deref(),
                target.bus_interface.as_deref(),
                "Targets",
                i,
            )?;
            let mut regions = Vec::with_capacity(target.address_regions.len());
            for pair in &target.address_regions {
                let start = parse_address(&target.name, &pair.start)?;
                let end = parse_address(&target.name, &pair.end)?;
                if !fits_width(end, config.address_width) {
                    return Err(ConfigError::ValidationError(format!(
                        "address region {}..{} of target '{}' exceeds the {}-bit address width",
                        pair.start, pair.end, target.name, config.address_width
                    ))
                    .into());
                }
                if end < start {
                    return Err(ConfigError::ValidationError(format!(
                        "address region {}..{} of target '{}' ends before it starts",
                        pair.start, pair.end, target.name
                    ))
                    .into());
                }
                regions.push(AddressRegion::new(start, end.saturating_add(1)));
            }
            endpoints.push(Endpoint {
                name: target.name.clone(),
                interface,
                data_width: target.data_width,
                regions,
            });
        }

        if starting_points.is_empty() && endpoints.is_empty() {
            return Err(GenerateError::Topology {
                reason: "no initiators or targets to connect".to_string(),
            });
        }

        Ok(Self {
            starting_points,
            endpoints,
        })
    }
}

fn interface_ref(
    instance: Option<&str>,
    bus_interface: Option<&str>,
    list: &str,
    position: usize,
) -> Result<InterfaceRef, GenerateError> {
    let instance = instance
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingField(format!("{list}[{position}].Instance")))?;
    let bus_interface = bus_interface
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingField(format!("{list}[{position}].Bus interface")))?;
    Ok(InterfaceRef {
        instance: instance.to_string(),
        bus_interface: bus_interface.to_string(),
    })
}

fn parse_address(target: &str, text: &str) -> Result<u64, GenerateError> {
    parse_hex_address(text).map_err(|source| GenerateError::AddressParse {
        target: target.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_config::load_interconnect_config_from_str;

    fn config(targets: &str) -> InterconnectConfig {
        let json = format!(
            r#"{{
                "VLNVs": {{"Design": "acme:soc:top:1.0", "Interconnect": "acme:soc:xbar:1.0",
                          "Bus": "acme:bus:axi4.absDef:1.0"}},
                "Initiators": [{{"Index": 0, "Name": "cpu", "Instance": "cpu_0", "Bus interface": "m_axi"}}],
                "Targets": {targets}
            }}"#
        );
        load_interconnect_config_from_str(&json).unwrap()
    }

    #[test]
    fn regions_become_half_open() {
        let request = GenerationRequest::from_config(&config(
            r#"[{"Index": 0, "Name": "ram", "Instance": "ram_0", "Bus interface": "s_axi",
                 "Address regions": [{"Start": "0", "End": "fff"}, {"Start": "4000", "End": "4fff"}]}]"#,
        ))
        .unwrap();
        assert_eq!(request.starting_points.len(), 1);
        assert_eq!(request.starting_points[0].interface.instance, "cpu_0");
        let ram = &request.endpoints[0];
        assert_eq!(ram.regions[0], AddressRegion::new(0, 0x1000));
        assert_eq!(ram.span(), Some(AddressRegion::new(0, 0x5000)));
    }

    #[test]
    fn bad_hex_is_address_parse() {
        let err = GenerationRequest::from_config(&config(
            r#"[{"Index": 0, "Name": "ram", "Instance": "ram_0", "Bus interface": "s_axi",
                 "Address regions": [{"Start": "xyz", "End": "fff"}]}]"#,
        ))
        .unwrap_err();
        assert!(matches!(err, GenerateError::AddressParse { ref target, .. } if target == "ram"));
    }

    #[test]
    fn missing_instance_is_config_error() {
        let err = GenerationRequest::from_config(&config(
            r#"[{"Index": 0, "Name": "ram", "Bus interface": "s_axi",
                 "Address regions": [{"Start": "0", "End": "fff"}]}]"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("Targets[0].Instance"));
    }

    #[test]
    fn reversed_region_rejected() {
        let err = GenerationRequest::from_config(&config(
            r#"[{"Index": 0, "Name": "ram", "Instance": "ram_0", "Bus interface": "s_axi",
                 "Address regions": [{"Start": "100", "End": "ff"}]}]"#,
        ))
        .unwrap_err();
        assert!(matches!(err, GenerateError::Config(_)));
    }

    #[test]
    fn endpoint_without_regions_has_no_span() {
        let mut config = config(
            r#"[{"Index": 0, "Name": "gpio", "Instance": "gpio_0", "Bus interface": "s_axi",
                 "Address regions": [{"Start": "0", "End": "ff"}]}]"#,
        );
        config.targets[0].address_regions.clear();
        let request = GenerationRequest::from_config(&config).unwrap();
        assert_eq!(request.endpoints[0].span(), None);
    }

    #[test]
    fn region_beyond_address_width_rejected() {
        let mut config = config(
            r#"[{"Index": 0, "Name": "ram", "Instance": "ram_0", "Bus interface": "s_axi",
                 "Address regions": [{"Start": "10000", "End": "1ffff"}]}]"#,
        );
        config.address_width = 16;
        let err = GenerationRequest::from_config(&config).unwrap_err();
        assert!(matches!(err, GenerateError::Config(_)));
        assert!(err.to_string().contains("exceeds the 16-bit address width"));

        config.address_width = 17;
        assert!(GenerationRequest::from_config(&config).is_ok());
    }
}
