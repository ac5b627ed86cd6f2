//! Bit fields.

use ipx_model::{ExpressionParser, Field};

use crate::helpers::{has_valid_is_present, has_valid_name, resolve_positive};
use crate::validators::parameter::ParameterValidator;
use crate::Validator;

/// Checks a field's own expressions and parameters.
///
/// Placement inside the register is checked by
/// [`RegisterValidator`](crate::RegisterValidator), which knows the size.
pub struct FieldValidator<'a> {
    parser: &'a dyn ExpressionParser,
}

impl<'a> FieldValidator<'a> {
    /// Creates a validator resolving expressions through `parser`.
    pub fn new(parser: &'a dyn ExpressionParser) -> Self {
        Self { parser }
    }

    fn has_valid_bit_offset(&self, field: &Field) -> bool {
        self.parser.resolve_u64(&field.bit_offset).is_some()
    }

    fn has_valid_bit_width(&self, field: &Field) -> bool {
        resolve_positive(self.parser, &field.bit_width).is_some()
    }

    fn has_valid_reset_value(&self, field: &Field) -> bool {
        field.reset_value.is_empty() || self.parser.is_valid_expression(&field.reset_value)
    }

    fn has_valid_reset_mask(&self, field: &Field) -> bool {
        field.reset_mask.is_empty()
            || (!field.reset_value.is_empty() && self.parser.is_valid_expression(&field.reset_mask))
    }

    /// A resolvable reset value must fit into a resolvable bit width.
    fn reset_value_fits(&self, field: &Field) -> bool {
        if field.reset_value.is_empty() {
            return true;
        }
        match (
            self.parser.resolve_u64(&field.reset_value),
            resolve_positive(self.parser, &field.bit_width),
        ) {
            (Some(value), Some(width)) if width < 64 => value < (1u64 << width),
            _ => true,
        }
    }
}

impl Validator<Field> for FieldValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, field: &Field, context: &str) {
        let name = &field.name;
        if !has_valid_name(name) {
            errors.push(format!("Invalid name specified for field {name} within {context}"));
        }
        if !has_valid_is_present(self.parser, &field.is_present) {
            errors.push(format!("Invalid is present set for field {name} within {context}"));
        }
        if !self.has_valid_bit_offset(field) {
            errors.push(format!("Invalid bit offset set for field {name} within {context}"));
        }
        if !self.has_valid_bit_width(field) {
            errors.push(format!("Invalid bit width set for field {name} within {context}"));
        }
        if !self.has_valid_reset_value(field) {
            errors.push(format!("Invalid reset value set for field {name} within {context}"));
        } else if !self.reset_value_fits(field) {
            errors.push(format!(
                "Reset value of field {name} within {context} does not fit in its bit width"
            ));
        }
        if !self.has_valid_reset_mask(field) {
            errors.push(format!("Invalid reset mask set for field {name} within {context}"));
        }
        ParameterValidator::new(self.parser).find_errors_in_all(
            errors,
            &field.parameters,
            &format!("field {name}"),
        );
    }

    fn validate(&self, field: &Field) -> bool {
        has_valid_name(&field.name)
            && has_valid_is_present(self.parser, &field.is_present)
            && self.has_valid_bit_offset(field)
            && self.has_valid_bit_width(field)
            && self.has_valid_reset_value(field)
            && self.reset_value_fits(field)
            && self.has_valid_reset_mask(field)
            && ParameterValidator::new(self.parser).validate_all(&field.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_model::LiteralExpressionParser;

    fn errors_of(field: &Field) -> Vec<String> {
        let parser = LiteralExpressionParser::new();
        let mut errors = Vec::new();
        FieldValidator::new(&parser).find_errors_in(&mut errors, field, "register ctrl");
        errors
    }

    #[test]
    fn valid_field() {
        let parser = LiteralExpressionParser::new();
        let field = Field {
            reset_value: "'h3".to_string(),
            ..Field::new("mode", "1", "2")
        };
        assert!(FieldValidator::new(&parser).validate(&field));
        assert!(errors_of(&field).is_empty());
    }

    #[test]
    fn invalid_offsets_and_widths() {
        let errors = errors_of(&Field::new("", "x", "0"));
        assert_eq!(
            errors,
            vec![
                "Invalid name specified for field  within register ctrl",
                "Invalid bit offset set for field  within register ctrl",
                "Invalid bit width set for field  within register ctrl",
            ]
        );
    }

    #[test]
    fn reset_value_must_fit() {
        let field = Field {
            reset_value: "4".to_string(),
            ..Field::new("mode", "0", "2")
        };
        assert_eq!(
            errors_of(&field),
            vec!["Reset value of field mode within register ctrl does not fit in its bit width"]
        );
    }

    #[test]
    fn reset_mask_needs_value() {
        let field = Field {
            reset_mask: "1".to_string(),
            ..Field::new("en", "0", "1")
        };
        assert_eq!(
            errors_of(&field),
            vec!["Invalid reset mask set for field en within register ctrl"]
        );
    }

    #[test]
    fn bad_presence() {
        let field = Field {
            is_present: "3".to_string(),
            ..Field::new("en", "0", "1")
        };
        assert_eq!(errors_of(&field).len(), 1);
    }
}
