//! `ipx decode`: prints the address decode table of a configuration.

use std::path::PathBuf;

use ipx_rtl::{DecodeTable, Protocol};

use crate::{DecodeArgs, GlobalArgs, ReportFormat};

/// Runs the `ipx decode` command.
pub fn run(args: &DecodeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = ipx_config::load_interconnect_config(&PathBuf::from(&args.interconnect))?;
    let table = DecodeTable::compute(&config)?;
    let protocol = Protocol::from_bus_type(&config.bus_type());

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&table, protocol)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&render_json(&table, protocol))?),
    }

    if !table.is_consistent() {
        if !global.quiet {
            eprintln!(
                "warning: {} address rule(s) expected but {} region(s) configured",
                table.no_addr_rules,
                table.rules.len()
            );
        }
        return Ok(1);
    }
    Ok(0)
}

fn render_text(table: &DecodeTable, protocol: Protocol) -> String {
    let mut out = String::new();
    out.push_str(&format!("crossbar        {}\n", protocol.crossbar_module()));
    out.push_str(&format!("NoInitiators    {}\n", table.no_initiators));
    out.push_str(&format!("NoTargets       {}\n", table.no_targets));
    out.push_str(&format!("NoAddrRules     {}\n", table.no_addr_rules));
    out.push_str(&format!("AddrWidth       {}\n", table.address_width));
    out.push_str(&format!("IdWidth         {}\n", table.id_width));
    out.push_str(&format!("IdWidthAtInit.  {}\n", table.id_width_at_initiators));
    for rule in &table.rules {
        out.push_str(&format!(
            "  target {:>3}  {} .. {}\n",
            rule.target_index,
            table.literal(rule.start),
            table.literal(rule.end)
        ));
    }
    out
}

fn render_json(table: &DecodeTable, protocol: Protocol) -> serde_json::Value {
    let rules: Vec<serde_json::Value> = table
        .rules
        .iter()
        .map(|rule| {
            serde_json::json!({
                "idx": rule.target_index,
                "start_addr": table.literal(rule.start),
                "end_addr": table.literal(rule.end),
            })
        })
        .collect();
    serde_json::json!({
        "crossbar": protocol.crossbar_module(),
        "NoInitiators": table.no_initiators,
        "NoTargets": table.no_targets,
        "NoAddrRules": table.no_addr_rules,
        "AddrWidth": table.address_width,
        "IdWidth": table.id_width,
        "IdWidthAtInitiators": table.id_width_at_initiators,
        "AddrMap": rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_config::load_interconnect_config_from_str;

    const CONFIG: &str = r#"{
        "VLNVs": {"Design": "acme:soc:top:1.0", "Interconnect": "acme:soc:xbar:1.0",
                  "Bus": "acme:bus:axi4.absDef:1.0"},
        "Address width": 32, "ID width": 4,
        "Initiators": [{"Index": 0, "Name": "cpu"}],
        "Targets": [
            {"Index": 0, "Name": "rom", "Address regions": [{"Start": "0", "End": "fff"}]},
            {"Index": 1, "Name": "ram", "Address regions": [{"Start": "1000", "End": "1fff"}]}
        ]
    }"#;

    fn table() -> DecodeTable {
        DecodeTable::compute(&load_interconnect_config_from_str(CONFIG).unwrap()).unwrap()
    }

    #[test]
    fn text_lists_rules_in_order() {
        let text = render_text(&table(), Protocol::Axi4);
        assert!(text.contains("NoAddrRules     2"));
        assert!(text.contains("IdWidthAtInit.  5"));
        let rom = text.find("32'h00000000 .. 32'h00000fff").unwrap();
        let ram = text.find("32'h00001000 .. 32'h00001fff").unwrap();
        assert!(rom < ram);
    }

    #[test]
    fn json_has_address_map() {
        let json = render_json(&table(), Protocol::Axi4);
        assert_eq!(json["NoTargets"], 2);
        assert_eq!(json["AddrMap"][1]["idx"], 1);
        assert_eq!(json["AddrMap"][1]["start_addr"], "32'h00001000");
    }

    #[test]
    fn run_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xbar.json");
        std::fs::write(&path, CONFIG).unwrap();
        let args = DecodeArgs {
            interconnect: path.to_string_lossy().into_owned(),
            format: ReportFormat::Json,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }

    #[test]
    fn run_without_targets_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xbar.json");
        std::fs::write(
            &path,
            r#"{"VLNVs": {"Design": "a:b:c:1", "Interconnect": "a:b:x:1", "Bus": "a:b:axi4.absDef:1"}}"#,
        )
        .unwrap();
        let args = DecodeArgs {
            interconnect: path.to_string_lossy().into_owned(),
            format: ReportFormat::Text,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        };
        assert!(run(&args, &global).is_err());
    }
}
