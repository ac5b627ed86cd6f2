//! Validator chain behaviour over whole components.

use ipx_common::Vlnv;
use ipx_conformance::roundtrip;
use ipx_diagnostics::DiagnosticSink;
use ipx_model::{
    AddressBlock, Component, Document, Field, LiteralExpressionParser, MemoryBlock, MemoryMap,
    Register, RegisterData, RegisterFile, Revision,
};
use ipx_validate::{MemoryMapValidator, RegisterFileValidator, ValidationEngine, Validator};

fn block(name: &str, base: &str) -> AddressBlock {
    let mut block = AddressBlock::new(name, base, "'h100", "32");
    let mut register = Register::new("ctrl", "0", "32");
    register.fields.push(Field::new("en", "0", "1"));
    block.register_data.push(RegisterData::Register(register));
    block
}

fn map_with(blocks: Vec<AddressBlock>) -> MemoryMap {
    let mut map = MemoryMap::new("regs");
    map.blocks = blocks.into_iter().map(MemoryBlock::AddressBlock).collect();
    map
}

fn errors_of(map: &MemoryMap) -> Vec<String> {
    let parser = LiteralExpressionParser::new();
    let validator = MemoryMapValidator::new(&parser, &[], &[], &[]);
    let mut errors = Vec::new();
    validator.find_errors_in(&mut errors, map, "component test");
    errors
}

#[test]
fn validate_agrees_with_find_errors() {
    let parser = LiteralExpressionParser::new();
    let validator = MemoryMapValidator::new(&parser, &[], &[], &[]);
    let maps = [
        map_with(vec![block("a", "0"), block("b", "'h100")]),
        map_with(vec![block("a", "0"), block("b", "'h80")]),
        map_with(vec![block("a", "0"), block("a", "'h100")]),
        map_with(vec![block("a", "oops")]),
    ];
    for map in &maps {
        assert_eq!(validator.validate(map), errors_of(map).is_empty());
    }
}

#[test]
fn duplicate_sibling_adds_exactly_one_error() {
    let valid = map_with(vec![block("a", "0")]);
    assert!(errors_of(&valid).is_empty());

    let duplicated = map_with(vec![block("a", "0"), block("a", "'h100")]);
    let errors = errors_of(&duplicated);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].contains("not unique"));
    assert!(errors[0].contains('a'));
}

#[test]
fn register_outside_register_file_is_invalid() {
    let parser = LiteralExpressionParser::new();
    let mut file = RegisterFile::new("dma", "0", "8");
    file.register_data
        .push(RegisterData::Register(Register::new("ctrl", "6", "32")));
    let validator = RegisterFileValidator::new(&parser, 8, "blk", Some(32));
    let mut errors = Vec::new();
    validator.find_errors_in(&mut errors, &file, "address block blk");
    assert!(errors
        .iter()
        .any(|e| e == "Register ctrl is not contained within register file dma"));
    assert!(!validator.validate(&file));
}

#[test]
fn engine_reports_every_finding_with_component_context() {
    let mut component = Component::new(Vlnv::new("acme", "ip", "uart", "1.0"), Revision::Std22);
    component.memory_maps.push(map_with(vec![block("a", "0"), block("b", "'h80")]));
    let sink = DiagnosticSink::new();
    let count = ValidationEngine::new().validate_component(&component, &sink);
    let diagnostics = sink.take_all();
    assert_eq!(count, diagnostics.len());
    assert!(count >= 1);
    assert!(diagnostics
        .iter()
        .all(|d| d.context.as_deref() == Some("component acme:ip:uart:1.0")));
}

#[test]
fn roundtrip_preserves_register_hierarchy() {
    let mut component = Component::new(Vlnv::new("acme", "ip", "uart", "1.0"), Revision::Std14);
    component.memory_maps.push(map_with(vec![block("a", "'h1000")]));
    let document = Document::from(component.clone());
    let Document::Component(parsed) = roundtrip(&document) else {
        panic!("expected a component");
    };
    assert_eq!(parsed, component);
    let MemoryBlock::AddressBlock(block) = &parsed.memory_maps[0].blocks[0] else {
        panic!("expected an address block");
    };
    assert_eq!(block.base_address, "'h1000");
    assert_eq!(block.range, "'h100");
    assert_eq!(block.width, "32");
}
