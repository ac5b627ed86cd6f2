//! Parameters: reused by every entity that carries a parameter list.

use ipx_model::{ExpressionParser, Parameter};

use crate::helpers::{find_duplicate_name_errors, has_valid_name};
use crate::Validator;

/// Checks parameter names and value expressions.
pub struct ParameterValidator<'a> {
    parser: &'a dyn ExpressionParser,
}

impl<'a> ParameterValidator<'a> {
    /// Creates a validator resolving values through `parser`.
    pub fn new(parser: &'a dyn ExpressionParser) -> Self {
        Self { parser }
    }

    /// Returns `true` if every parameter is valid and names are unique.
    pub fn validate_all(&self, parameters: &[Parameter]) -> bool {
        crate::helpers::duplicate_names(parameters.iter().map(|p| p.name.as_str())).is_empty()
            && parameters.iter().all(|p| self.validate(p))
    }

    /// Appends errors for a whole parameter list owned by `context`.
    pub fn find_errors_in_all(&self, errors: &mut Vec<String>, parameters: &[Parameter], context: &str) {
        find_duplicate_name_errors(
            errors,
            parameters.iter().map(|p| p.name.as_str()),
            "parameters",
            context,
        );
        for parameter in parameters {
            self.find_errors_in(errors, parameter, context);
        }
    }

    fn has_valid_value(&self, parameter: &Parameter) -> bool {
        !parameter.value.trim().is_empty() && self.parser.is_valid_expression(&parameter.value)
    }
}

impl Validator<Parameter> for ParameterValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, parameter: &Parameter, context: &str) {
        let name = &parameter.name;
        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for parameter {name} within {context}"
            ));
        }
        if parameter.value.trim().is_empty() {
            errors.push(format!(
                "No value specified for parameter {name} within {context}"
            ));
        } else if !self.parser.is_valid_expression(&parameter.value) {
            errors.push(format!(
                "Invalid value {} specified for parameter {name} within {context}",
                parameter.value
            ));
        }
    }

    fn validate(&self, parameter: &Parameter) -> bool {
        has_valid_name(&parameter.name) && self.has_valid_value(parameter)
    }
}
