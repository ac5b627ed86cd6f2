//! Validation engine that runs the validator chain over a component and
//! reports findings as diagnostics.

use std::collections::HashSet;

use ipx_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use ipx_model::{Component, ExpressionParser, LiteralExpressionParser};

use crate::validators::{ComponentSection, ComponentValidator};

/// Runs [`ComponentValidator`] section by section and turns every finding
/// into a `V` diagnostic.
///
/// Findings are emitted at the engine's severity: `error` when validating on
/// request, `warning` when a generator checks its own output.
pub struct ValidationEngine {
    severity: Severity,
    skipped: HashSet<ComponentSection>,
}

impl ValidationEngine {
    /// Creates an engine reporting findings as errors.
    pub fn new() -> Self {
        Self::with_severity(Severity::Error)
    }

    /// Creates an engine reporting findings at `severity`.
    pub fn with_severity(severity: Severity) -> Self {
        Self {
            severity,
            skipped: HashSet::new(),
        }
    }

    /// Excludes a section from subsequent runs.
    pub fn skip(&mut self, section: ComponentSection) {
        self.skipped.insert(section);
    }

    /// Returns the diagnostic code used for findings of `section`.
    pub fn code_for(section: ComponentSection) -> DiagnosticCode {
        let number = match section {
            ComponentSection::Identity => 1,
            ComponentSection::Parameters => 2,
            ComponentSection::Ports => 3,
            ComponentSection::BusInterfaces => 4,
            ComponentSection::Channels => 5,
            ComponentSection::AddressSpaces => 6,
            ComponentSection::MemoryMaps => 7,
            ComponentSection::PowerDomains => 8,
            ComponentSection::RemapStates => 9,
        };
        DiagnosticCode::new(Category::Validation, number)
    }

    /// Validates `component`, resolving expressions against its own parameters.
    ///
    /// Returns the number of findings.
    pub fn validate_component(&self, component: &Component, sink: &DiagnosticSink) -> usize {
        let parser = LiteralExpressionParser::with_parameters(&component.parameters);
        self.validate_component_with(component, &parser, sink)
    }

    /// Validates `component` with a caller-supplied expression parser.
    pub fn validate_component_with(
        &self,
        component: &Component,
        parser: &dyn ExpressionParser,
        sink: &DiagnosticSink,
    ) -> usize {
        let context = format!("component {}", component.vlnv);
        let validator = ComponentValidator::new(parser);
        let mut total = 0;
        for section in ComponentSection::ALL {
            if self.skipped.contains(&section) {
                continue;
            }
            let mut errors = Vec::new();
            validator.find_errors_in_section(&mut errors, component, section, &context);
            total += errors.len();
            for message in errors {
                sink.emit(
                    Diagnostic::new(self.severity, Self::code_for(section), message)
                        .with_context(context.clone()),
                );
            }
        }
        total
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_common::Vlnv;
    use ipx_model::{AddressBlock, MemoryMap, Parameter, Revision};

    fn component() -> Component {
        let mut component = Component::new(Vlnv::new("acme", "ip", "timer", "1.0"), Revision::Std22);
        component.parameters = vec![Parameter::new("BASE", "'h100")];
        component.memory_maps = vec![MemoryMap::new("regs")
            .with_block(AddressBlock::new("a", "0", "BASE", "32"))
            .with_block(AddressBlock::new("b", "BASE", "'h100", "32"))];
        component
    }

    #[test]
    fn clean_component_emits_nothing() {
        let sink = DiagnosticSink::new();
        assert_eq!(ValidationEngine::new().validate_component(&component(), &sink), 0);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn findings_carry_section_code_and_context() {
        let mut c = component();
        c.memory_maps[0].blocks.push(AddressBlock::new("c", "'h80", "'h10", "32").into());
        let sink = DiagnosticSink::new();
        let count = ValidationEngine::new().validate_component(&c, &sink);
        assert_eq!(count, 1);
        let diags = sink.take_all();
        assert_eq!(diags[0].code.to_string(), "V007");
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].context.as_deref(), Some("component acme:ip:timer:1.0"));
        assert_eq!(diags[0].message, "Memory blocks a and c overlap within memory map regs");
    }

    #[test]
    fn warning_severity_and_skipped_sections() {
        let mut c = component();
        c.vlnv = Vlnv::default();
        let sink = DiagnosticSink::new();
        let engine = ValidationEngine::with_severity(Severity::Warning);
        assert_eq!(engine.validate_component(&c, &sink), 1);
        assert_eq!(sink.warning_count(), 1);
        assert!(!sink.has_errors());

        let mut engine = ValidationEngine::new();
        engine.skip(ComponentSection::Identity);
        assert_eq!(engine.validate_component(&c, &DiagnosticSink::new()), 0);
    }
}
