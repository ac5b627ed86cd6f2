//! Address decode tables computed from interconnect configurations.

use ipx_config::load_interconnect_config_from_str;
use ipx_conformance::soc_config;
use ipx_rtl::{ceil_log2, DecodeTable, EmitError};

#[test]
fn two_targets_give_two_rules() {
    let table = DecodeTable::compute(&soc_config(&[("0", "fff"), ("1000", "1fff")], 6)).unwrap();
    assert_eq!(table.no_targets, 2);
    assert_eq!(table.no_addr_rules, 2);
    assert_eq!(table.id_width_at_initiators, 7);
    assert_eq!(
        table
            .rules
            .iter()
            .map(|r| (r.target_index, r.start, r.end))
            .collect::<Vec<_>>(),
        [(0, 0, 0xfff), (1, 0x1000, 0x1fff)]
    );
    assert!(table.is_consistent());
}

#[test]
fn extra_regions_follow_their_target() {
    let config = load_interconnect_config_from_str(
        r#"{
            "VLNVs": {"Design": "acme:soc:top:1.0", "Interconnect": "acme:soc:xbar:1.0",
                      "Bus": "acme:bus:axi4.absDef:1.0"},
            "Address width": 16, "ID width": 2,
            "Initiators": [{"Index": 0, "Name": "cpu"}, {"Index": 1, "Name": "dma"}],
            "Targets": [
                {"Index": 0, "Name": "ram", "Address regions": [
                    {"Start": "0", "End": "fff"}, {"Start": "8000", "End": "8fff"}]},
                {"Index": 1, "Name": "uart", "Address regions": [{"Start": "1000", "End": "10ff"}]},
                {"Index": 2, "Name": "gpio", "Address regions": [{"Start": "1100", "End": "11ff"}]}
            ]
        }"#,
    )
    .unwrap();
    let table = DecodeTable::compute(&config).unwrap();
    assert_eq!(table.no_initiators, 2);
    assert_eq!(table.extra_regions, 1);
    assert_eq!(table.no_addr_rules, 4);
    assert_eq!(table.id_width_at_initiators, 2 + ceil_log2(3));
    let indices: Vec<u32> = table.rules.iter().map(|r| r.target_index).collect();
    assert_eq!(indices, [0, 0, 1, 2]);
    assert_eq!(table.literal(table.rules[1].start), "16'h8000");
}

#[test]
fn empty_target_list_is_reported() {
    assert!(matches!(
        DecodeTable::compute(&soc_config(&[], 4)),
        Err(EmitError::NoTargetsConfigured)
    ));
}
