//! Registers and the placement of their fields.

use ipx_common::{AddressRegion, MemoryReserve};
use ipx_model::{ExpressionParser, Register};

use crate::helpers::{
    find_duplicate_name_errors, has_valid_dimension, has_valid_is_present, has_valid_name,
    is_present, resolve_positive,
};
use crate::validators::field::FieldValidator;
use crate::validators::parameter::ParameterValidator;
use crate::Validator;

/// Checks a register, its fields and how the fields sit inside it.
pub struct RegisterValidator<'a> {
    parser: &'a dyn ExpressionParser,
}

impl<'a> RegisterValidator<'a> {
    /// Creates a validator resolving expressions through `parser`.
    pub fn new(parser: &'a dyn ExpressionParser) -> Self {
        Self { parser }
    }

    /// Returns the bit range `[offset, offset + width)` of a present, resolvable field.
    fn field_bits(&self, field: &ipx_model::Field) -> Option<AddressRegion> {
        if !is_present(self.parser, &field.is_present) {
            return None;
        }
        let offset = self.parser.resolve_u64(&field.bit_offset)?;
        let width = resolve_positive(self.parser, &field.bit_width)?;
        Some(AddressRegion::from_base_and_range(offset, width))
    }
}

impl Validator<Register> for RegisterValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, register: &Register, context: &str) {
        let name = &register.name;
        let own_context = format!("register {name}");

        if !has_valid_name(name) {
            errors.push(format!("Invalid name specified for register {name} within {context}"));
        }
        if !has_valid_is_present(self.parser, &register.is_present) {
            errors.push(format!("Invalid is present set for register {name} within {context}"));
        }
        if !has_valid_dimension(self.parser, &register.dimension) {
            errors.push(format!("Invalid dimension set for register {name} within {context}"));
        }
        if self.parser.resolve_u64(&register.address_offset).is_none() {
            errors.push(format!(
                "Invalid address offset set for register {name} within {context}"
            ));
        }
        let size = resolve_positive(self.parser, &register.size);
        if size.is_none() {
            errors.push(format!("Invalid size set for register {name} within {context}"));
        }

        if register.fields.is_empty() {
            errors.push(format!(
                "Register {name} within {context} must contain at least one field"
            ));
        }
        find_duplicate_name_errors(
            errors,
            register.fields.iter().map(|f| f.name.as_str()),
            "fields",
            &own_context,
        );

        let field_validator = FieldValidator::new(self.parser);
        let mut reserve = MemoryReserve::new();
        for field in &register.fields {
            field_validator.find_errors_in(errors, field, &own_context);

            if register.volatile == Some(false) && field.volatile == Some(true) {
                errors.push(format!(
                    "Volatile field {} is placed in non-volatile register {name}",
                    field.name
                ));
            }

            if let Some(bits) = self.field_bits(field) {
                if let Some(size) = size {
                    if !bits.is_contained_in(size) {
                        errors.push(format!(
                            "Field {} is not contained within register {name}",
                            field.name
                        ));
                    }
                }
                reserve.add_region(field.name.clone(), bits);
            }
        }
        reserve.find_errors_in_overlap(errors, "Fields", &own_context);

        ParameterValidator::new(self.parser).find_errors_in_all(
            errors,
            &register.parameters,
            &own_context,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_model::{Field, LiteralExpressionParser};

    fn errors_of(register: &Register) -> Vec<String> {
        let parser = LiteralExpressionParser::new();
        let mut errors = Vec::new();
        RegisterValidator::new(&parser).find_errors_in(&mut errors, register, "address block blk");
        errors
    }

    fn ctrl() -> Register {
        Register::new("ctrl", "'h0", "32")
            .with_field(Field::new("enable", "0", "1"))
            .with_field(Field::new("mode", "1", "3"))
    }

    #[test]
    fn valid_register() {
        let parser = LiteralExpressionParser::new();
        assert!(RegisterValidator::new(&parser).validate(&ctrl()));
        assert!(errors_of(&ctrl()).is_empty());
    }

    #[test]
    fn register_needs_fields() {
        assert_eq!(
            errors_of(&Register::new("empty", "0", "32")),
            vec!["Register empty within address block blk must contain at least one field"]
        );
    }

    #[test]
    fn field_outside_register() {
        let register = ctrl().with_field(Field::new("high", "30", "4"));
        assert_eq!(
            errors_of(&register),
            vec!["Field high is not contained within register ctrl"]
        );
    }

    #[test]
    fn overlapping_fields() {
        let register = ctrl().with_field(Field::new("clash", "2", "2"));
        assert_eq!(
            errors_of(&register),
            vec!["Fields mode and clash overlap within register ctrl"]
        );
    }

    #[test]
    fn absent_field_does_not_overlap() {
        let register = ctrl().with_field(Field {
            is_present: "0".to_string(),
            ..Field::new("clash", "2", "2")
        });
        assert!(errors_of(&register).is_empty());
    }

    #[test]
    fn duplicate_field_names() {
        let register = ctrl().with_field(Field::new("enable", "8", "1"));
        assert_eq!(
            errors_of(&register),
            vec!["Name enable of fields in register ctrl is not unique."]
        );
    }

    #[test]
    fn volatile_field_in_non_volatile_register() {
        let mut register = ctrl();
        register.volatile = Some(false);
        register.fields[0].volatile = Some(true);
        assert_eq!(
            errors_of(&register),
            vec!["Volatile field enable is placed in non-volatile register ctrl"]
        );
    }

    #[test]
    fn unresolvable_expressions_fail_without_overlap_noise() {
        let register = Register::new("r", "base", "0").with_field(Field::new("f", "x", "1"));
        let errors = errors_of(&register);
        assert_eq!(
            errors,
            vec![
                "Invalid address offset set for register r within address block blk",
                "Invalid size set for register r within address block blk",
                "Invalid bit offset set for field f within register r",
            ]
        );
    }
}
