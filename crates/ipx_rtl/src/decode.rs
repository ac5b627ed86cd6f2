//! Address-decode rule computation.

use ipx_common::{format_sized_hex, parse_hex_address};
use ipx_config::InterconnectConfig;

use crate::error::EmitError;

/// One address rule: addresses `start..=end` route to target `target_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeRule {
    /// Crossbar index of the target.
    pub target_index: u32,
    /// First decoded address.
    pub start: u64,
    /// Last decoded address, inclusive.
    pub end: u64,
}

/// Crossbar dimensions and the ordered address rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    /// Number of targets.
    pub no_targets: usize,
    /// Number of initiators.
    pub no_initiators: usize,
    /// Regions beyond the first, summed over all targets.
    pub extra_regions: usize,
    /// Total number of rules: targets plus extra regions.
    pub no_addr_rules: usize,
    /// Address width in bits.
    pub address_width: u32,
    /// ID width of the ports facing the initiators.
    pub id_width: u32,
    /// ID width of the ports facing the targets.
    pub id_width_at_initiators: u32,
    /// Rules in target order, then region order.
    pub rules: Vec<DecodeRule>,
}

/// `ceil(log2(n))`, with `ceil_log2(0) == ceil_log2(1) == 0`.
pub fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// Returns `true` if `address` has no bits at or above `width`.
pub fn fits_width(address: u64, width: u32) -> bool {
    width >= u64::BITS || address >> width == 0
}

impl DecodeTable {
    /// Computes the table for `config`.
    ///
    /// Every address must fit in `config.address_width` bits. A target without
    /// regions still counts towards `no_addr_rules` but contributes no row;
    /// [`is_consistent`](Self::is_consistent) then returns `false`.
    pub fn compute(config: &InterconnectConfig) -> Result<Self, EmitError> {
        if config.targets.is_empty() {
            return Err(EmitError::NoTargetsConfigured);
        }
        let no_targets = config.targets.len();
        let extra_regions: usize = config
            .targets
            .iter()
            .map(|t| t.address_regions.len().saturating_sub(1))
            .sum();

        let mut rules = Vec::with_capacity(no_targets + extra_regions);
        for target in &config.targets {
            for region in &target.address_regions {
                let parse = |text: &str| -> Result<u64, EmitError> {
                    let address =
                        parse_hex_address(text).map_err(|source| EmitError::AddressParse {
                            target: target.name.clone(),
                            source,
                        })?;
                    if !fits_width(address, config.address_width) {
                        return Err(EmitError::AddressOutOfRange {
                            target: target.name.clone(),
                            address,
                            width: config.address_width,
                        });
                    }
                    Ok(address)
                };
                rules.push(DecodeRule {
                    target_index: target.index,
                    start: parse(&region.start)?,
                    end: parse(&region.end)?,
                });
            }
        }

        Ok(Self {
            no_targets,
            no_initiators: config.initiators.len(),
            extra_regions,
            no_addr_rules: no_targets + extra_regions,
            address_width: config.address_width,
            id_width: config.id_width,
            id_width_at_initiators: config.id_width + ceil_log2(no_targets),
            rules,
        })
    }

    /// Returns `true` if the table has exactly one row per counted rule.
    pub fn is_consistent(&self) -> bool {
        self.rules.len() == self.no_addr_rules
    }

    /// Renders an address as a sized literal of the table's address width.
    pub fn literal(&self, address: u64) -> String {
        format_sized_hex(address, self.address_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_config::load_interconnect_config_from_str;

    fn config(targets: &str) -> InterconnectConfig {
        let json = format!(
            r#"{{
                "VLNVs": {{
                    "Design": "acme:soc:top:1.0",
                    "Interconnect": "acme:soc:xbar:1.0",
                    "Bus": "acme:bus:axi4.absDef:1.0"
                }},
                "ID width": 4,
                "Initiators": [{{"Index": 0, "Name": "cpu"}}],
                "Targets": [{targets}]
            }}"#
        );
        load_interconnect_config_from_str(&json).unwrap()
    }

    #[test]
    fn two_targets_two_rules() {
        let table = DecodeTable::compute(&config(
            r#"{"Index": 0, "Name": "rom", "Address regions": [{"Start": "0", "End": "fff"}]},
               {"Index": 1, "Name": "ram", "Address regions": [{"Start": "1000", "End": "1fff"}]}"#,
        ))
        .unwrap();
        assert_eq!(table.no_targets, 2);
        assert_eq!(table.no_initiators, 1);
        assert_eq!(table.no_addr_rules, 2);
        assert_eq!(table.id_width_at_initiators, 5);
        assert!(table.is_consistent());
        assert_eq!(
            table.rules,
            vec![
                DecodeRule { target_index: 0, start: 0, end: 0xfff },
                DecodeRule { target_index: 1, start: 0x1000, end: 0x1fff },
            ]
        );
        assert_eq!(table.literal(0x1fff), "32'h00001fff");
    }

    #[test]
    fn extra_regions_are_counted() {
        let table = DecodeTable::compute(&config(
            r#"{"Index": 0, "Name": "ram", "Address regions": [
                   {"Start": "0", "End": "ff"}, {"Start": "1000", "End": "10ff"}, {"Start": "2000", "End": "20ff"}]},
               {"Index": 1, "Name": "uart", "Address regions": [{"Start": "3000", "End": "30ff"}]},
               {"Index": 2, "Name": "gpio", "Address regions": [{"Start": "4000", "End": "40ff"}]}"#,
        ))
        .unwrap();
        assert_eq!(table.extra_regions, 2);
        assert_eq!(table.no_addr_rules, 5);
        assert_eq!(table.rules.len(), 5);
        assert_eq!(table.rules[2].target_index, 0);
        assert_eq!(table.rules[3].target_index, 1);
        assert_eq!(table.id_width_at_initiators, 4 + 2);
    }

    #[test]
    fn no_targets() {
        assert!(matches!(
            DecodeTable::compute(&config("")),
            Err(EmitError::NoTargetsConfigured)
        ));
    }

    #[test]
    fn malformed_address() {
        let err = DecodeTable::compute(&config(
            r#"{"Index": 0, "Name": "ram", "Address regions": [{"Start": "zz", "End": "ff"}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, EmitError::AddressParse { ref target, .. } if target == "ram"));
    }

    #[test]
    fn address_wider_than_address_width() {
        let mut config = config(
            r#"{"Index": 0, "Name": "ram", "Address regions": [{"Start": "10000", "End": "1ffff"}]}"#,
        );
        config.address_width = 16;
        let err = DecodeTable::compute(&config).unwrap_err();
        assert!(matches!(
            err,
            EmitError::AddressOutOfRange { ref target, address: 0x10000, width: 16 } if target == "ram"
        ));

        config.targets[0].address_regions[0].start = "0".to_string();
        config.targets[0].address_regions[0].end = "ffff".to_string();
        let table = DecodeTable::compute(&config).unwrap();
        assert_eq!(table.literal(0xffff), "16'hffff");
    }

    #[test]
    fn region_less_target_is_inconsistent() {
        let mut config = config(
            r#"{"Index": 0, "Name": "rom", "Address regions": [{"Start": "0", "End": "fff"}]}"#,
        );
        let mut gpio = config.targets[0].clone();
        gpio.index = 1;
        gpio.name = "gpio".to_string();
        gpio.address_regions.clear();
        config.targets.push(gpio);

        let table = DecodeTable::compute(&config).unwrap();
        assert_eq!(table.no_addr_rules, 2);
        assert_eq!(table.rules.len(), 1);
        assert!(!table.is_consistent());
    }

    #[test]
    fn width_fit() {
        assert!(fits_width(0xffff, 16));
        assert!(!fits_width(0x1_0000, 16));
        assert!(fits_width(u64::MAX, 64));
        assert!(fits_width(0, 1));
        assert!(!fits_width(2, 1));
    }

    #[test]
    fn log2_ceiling() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
    }
}
