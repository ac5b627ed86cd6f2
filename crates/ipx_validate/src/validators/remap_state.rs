//! Remap states and the port values that select them.

use ipx_model::{ExpressionParser, Port, RemapPort, RemapState};

use crate::helpers::has_valid_name;
use crate::Validator;

/// Checks a remap state against the component's ports.
pub struct RemapStateValidator<'a> {
    parser: &'a dyn ExpressionParser,
    ports: &'a [Port],
}

impl<'a> RemapStateValidator<'a> {
    /// Creates a validator resolving port references among `ports`.
    pub fn new(parser: &'a dyn ExpressionParser, ports: &'a [Port]) -> Self {
        Self { parser, ports }
    }

    /// A scalar port has empty bounds, which count as bit 0.
    fn resolve_bound(&self, bound: &str) -> Option<u64> {
        if bound.trim().is_empty() {
            Some(0)
        } else {
            self.parser.resolve_u64(bound)
        }
    }

    fn has_valid_index(&self, port: &Port, remap_port: &RemapPort) -> bool {
        let Some(index) = &remap_port.port_index else {
            return true;
        };
        let (Some(index), Some(left), Some(right)) = (
            self.parser.resolve_u64(index),
            self.resolve_bound(&port.left_bound),
            self.resolve_bound(&port.right_bound),
        ) else {
            return false;
        };
        (left.min(right)..=left.max(right)).contains(&index)
    }

    fn find_errors_in_port(
        &self,
        errors: &mut Vec<String>,
        remap_port: &RemapPort,
        state: &str,
        context: &str,
    ) {
        let port_ref = &remap_port.port_ref;
        let Some(port) = self.ports.iter().find(|p| p.name == *port_ref) else {
            errors.push(format!(
                "Invalid port reference {port_ref} set for remap state {state} within {context}"
            ));
            return;
        };
        if !self.has_valid_index(port, remap_port) {
            errors.push(format!(
                "Invalid port index {} set for remap port {port_ref} of remap state {state} within {context}",
                remap_port.port_index.as_deref().unwrap_or_default()
            ));
        }
        if !self.parser.is_valid_expression(&remap_port.value) {
            errors.push(format!(
                "Invalid value {} set for remap port {port_ref} of remap state {state} within {context}",
                remap_port.value
            ));
        }
    }
}

impl Validator<RemapState> for RemapStateValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, state: &RemapState, context: &str) {
        let name = &state.name;
        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for remap state {name} within {context}"
            ));
        }
        for remap_port in &state.remap_ports {
            self.find_errors_in_port(errors, remap_port, name, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_model::{Direction, LiteralExpressionParser};

    fn ports() -> Vec<Port> {
        vec![
            Port::new("boot_sel", Direction::In).with_bounds("3", "0"),
            Port::new("remap_en", Direction::In),
        ]
    }

    #[test]
    fn valid_state() {
        let parser = LiteralExpressionParser::new();
        let ports = ports();
        let validator = RemapStateValidator::new(&parser, &ports);
        let state = RemapState::new("boot")
            .with_port("boot_sel", Some("2"), "1")
            .with_port("remap_en", None, "1");
        assert!(validator.validate(&state));
    }

    #[test]
    fn scalar_port_accepts_index_zero_only() {
        let parser = LiteralExpressionParser::new();
        let ports = ports();
        let validator = RemapStateValidator::new(&parser, &ports);
        let state = RemapState::new("boot").with_port("remap_en", Some("0"), "1");
        assert!(validator.validate(&state));

        let state = RemapState::new("boot").with_port("remap_en", Some("1"), "1");
        let mut errors = Vec::new();
        validator.find_errors_in(&mut errors, &state, "component c");
        assert_eq!(
            errors,
            vec!["Invalid port index 1 set for remap port remap_en of remap state boot within component c"]
        );
    }

    #[test]
    fn bad_references() {
        let parser = LiteralExpressionParser::new();
        let ports = ports();
        let validator = RemapStateValidator::new(&parser, &ports);
        let state = RemapState::new("boot")
            .with_port("nope", None, "1")
            .with_port("boot_sel", Some("4"), "1")
            .with_port("remap_en", None, "((");
        let mut errors = Vec::new();
        validator.find_errors_in(&mut errors, &state, "component c");
        assert_eq!(
            errors,
            vec![
                "Invalid port reference nope set for remap state boot within component c",
                "Invalid port index 4 set for remap port boot_sel of remap state boot within component c",
                "Invalid value (( set for remap port remap_en of remap state boot within component c",
            ]
        );
    }
}
