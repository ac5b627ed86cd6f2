//! Register files, which nest register data recursively.

use ipx_model::{ExpressionParser, RegisterFile};

use crate::helpers::{
    has_valid_dimension, has_valid_is_present, has_valid_name, resolve_positive,
};
use crate::validators::parameter::ParameterValidator;
use crate::validators::register_data::RegisterDataChecker;
use crate::Validator;

/// Checks a register file and everything inside it.
///
/// Children are placed against the file's own range; register sizes are
/// compared with the width of the enclosing address block.
pub struct RegisterFileValidator<'a> {
    parser: &'a dyn ExpressionParser,
    address_unit_bits: u64,
    block_name: &'a str,
    block_width: Option<u64>,
}

impl<'a> RegisterFileValidator<'a> {
    /// Creates a validator for register files inside address block
    /// `block_name` of `block_width` bits, in a map of `address_unit_bits`.
    pub fn new(
        parser: &'a dyn ExpressionParser,
        address_unit_bits: u64,
        block_name: &'a str,
        block_width: Option<u64>,
    ) -> Self {
        Self {
            parser,
            address_unit_bits: address_unit_bits.max(1),
            block_name,
            block_width,
        }
    }
}

impl Validator<RegisterFile> for RegisterFileValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, file: &RegisterFile, context: &str) {
        let name = &file.name;
        let own_context = format!("register file {name}");

        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for register file {name} within {context}"
            ));
        }
        if !has_valid_is_present(self.parser, &file.is_present) {
            errors.push(format!(
                "Invalid is present set for register file {name} within {context}"
            ));
        }
        if !has_valid_dimension(self.parser, &file.dimension) {
            errors.push(format!(
                "Invalid dimension set for register file {name} within {context}"
            ));
        }
        if self.parser.resolve_u64(&file.address_offset).is_none() {
            errors.push(format!(
                "Invalid address offset set for register file {name} within {context}"
            ));
        }
        let range = resolve_positive(self.parser, &file.range);
        if range.is_none() {
            errors.push(format!(
                "Invalid range set for register file {name} within {context}"
            ));
        }

        RegisterDataChecker {
            parser: self.parser,
            address_unit_bits: self.address_unit_bits,
            block_name: self.block_name,
            block_width: self.block_width,
        }
        .find_errors_in(errors, &file.register_data, range, &own_context);

        ParameterValidator::new(self.parser).find_errors_in_all(
            errors,
            &file.parameters,
            &own_context,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_model::{Field, LiteralExpressionParser, Register};

    fn reg(name: &str, offset: &str) -> Register {
        Register::new(name, offset, "32").with_field(Field::new("f", "0", "32"))
    }

    fn errors_of(file: &RegisterFile) -> Vec<String> {
        let parser = LiteralExpressionParser::new();
        let mut errors = Vec::new();
        RegisterFileValidator::new(&parser, 8, "blk", Some(32)).find_errors_in(
            &mut errors,
            file,
            "address block blk",
        );
        errors
    }

    #[test]
    fn valid_file() {
        let file = RegisterFile::new("dma", "'h40", "8")
            .with_data(reg("src", "0"))
            .with_data(reg("dst", "4"));
        assert!(errors_of(&file).is_empty());
    }

    #[test]
    fn register_past_file_end_is_reported_even_with_valid_fields() {
        let file = RegisterFile::new("dma", "0", "8").with_data(reg("late", "6"));
        assert_eq!(
            errors_of(&file),
            vec!["Register late is not contained within register file dma"]
        );
    }

    #[test]
    fn nested_file_past_parent_end() {
        let inner = RegisterFile::new("inner", "4", "8").with_data(reg("r", "0"));
        let file = RegisterFile::new("outer", "0", "8").with_data(inner);
        assert_eq!(
            errors_of(&file),
            vec!["Register file inner is not contained within register file outer"]
        );
    }

    #[test]
    fn overlapping_children() {
        let file = RegisterFile::new("dma", "0", "16")
            .with_data(reg("a", "0"))
            .with_data(reg("b", "2"));
        assert_eq!(
            errors_of(&file),
            vec!["Register data a and b overlap within register file dma"]
        );
    }

    #[test]
    fn register_wider_than_block() {
        let wide = Register::new("wide", "0", "64").with_field(Field::new("f", "0", "64"));
        let file = RegisterFile::new("dma", "0", "16").with_data(wide);
        assert_eq!(
            errors_of(&file),
            vec!["Size of register wide is greater than the width of address block blk within register file dma"]
        );
    }

    #[test]
    fn register_arrays_take_dimension_into_account() {
        let array = Register {
            dimension: "2".to_string(),
            ..reg("arr", "0")
        };
        let file = RegisterFile::new("dma", "0", "4").with_data(array);
        assert_eq!(
            errors_of(&file),
            vec!["Register arr is not contained within register file dma"]
        );
    }

    #[test]
    fn invalid_range() {
        let file = RegisterFile::new("dma", "0", "0").with_data(reg("a", "0"));
        assert_eq!(
            errors_of(&file),
            vec!["Invalid range set for register file dma within address block blk"]
        );
    }

    #[test]
    fn duplicate_names() {
        let file = RegisterFile::new("dma", "0", "16")
            .with_data(reg("a", "0"))
            .with_data(reg("a", "8"));
        assert_eq!(
            errors_of(&file),
            vec!["Name a of register data in register file dma is not unique."]
        );
    }
}
