//! Address blocks and the register data they hold.

use ipx_model::{AddressBlock, ExpressionParser, Usage};

use crate::helpers::{has_valid_is_present, has_valid_name, resolve_positive};
use crate::validators::parameter::ParameterValidator;
use crate::validators::register_data::RegisterDataChecker;
use crate::Validator;

/// Checks an address block inside a memory map of `address_unit_bits`.
pub struct AddressBlockValidator<'a> {
    parser: &'a dyn ExpressionParser,
    address_unit_bits: u64,
}

impl<'a> AddressBlockValidator<'a> {
    /// Creates a validator for blocks in a map with the given address unit size.
    pub fn new(parser: &'a dyn ExpressionParser, address_unit_bits: u64) -> Self {
        Self {
            parser,
            address_unit_bits: address_unit_bits.max(1),
        }
    }
}

impl Validator<AddressBlock> for AddressBlockValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, block: &AddressBlock, context: &str) {
        let name = &block.name;
        let own_context = format!("address block {name}");

        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for address block {name} within {context}"
            ));
        }
        if !has_valid_is_present(self.parser, &block.is_present) {
            errors.push(format!(
                "Invalid is present set for address block {name} within {context}"
            ));
        }
        if self.parser.resolve_u64(&block.base_address).is_none() {
            errors.push(format!(
                "Invalid base address set for address block {name} within {context}"
            ));
        }
        let range = resolve_positive(self.parser, &block.range);
        if range.is_none() {
            errors.push(format!(
                "Invalid range set for address block {name} within {context}"
            ));
        }
        let width = resolve_positive(self.parser, &block.width);
        if width.is_none() {
            errors.push(format!(
                "Invalid width set for address block {name} within {context}"
            ));
        }

        if block.usage == Usage::Reserved && !block.register_data.is_empty() {
            errors.push(format!(
                "Address block {name} within {context} is reserved and cannot contain registers"
            ));
        }

        RegisterDataChecker {
            parser: self.parser,
            address_unit_bits: self.address_unit_bits,
            block_name: name,
            block_width: width,
        }
        .find_errors_in(errors, &block.register_data, range, &own_context);

        ParameterValidator::new(self.parser).find_errors_in_all(
            errors,
            &block.parameters,
            &own_context,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_model::{Field, LiteralExpressionParser, Register, RegisterFile};

    fn reg(name: &str, offset: &str) -> Register {
        Register::new(name, offset, "32").with_field(Field::new("f", "0", "32"))
    }

    fn errors_of(block: &AddressBlock) -> Vec<String> {
        let parser = LiteralExpressionParser::new();
        let mut errors = Vec::new();
        AddressBlockValidator::new(&parser, 8).find_errors_in(&mut errors, block, "memory map regs");
        errors
    }

    #[test]
    fn valid_block() {
        let block = AddressBlock::new("csr", "'h1000", "'h100", "32")
            .with_data(reg("ctrl", "0"))
            .with_data(reg("status", "4"))
            .with_data(RegisterFile::new("dma", "'h10", "8").with_data(reg("src", "0")));
        assert!(errors_of(&block).is_empty());
        let parser = LiteralExpressionParser::new();
        assert!(AddressBlockValidator::new(&parser, 8).validate(&block));
    }

    #[test]
    fn register_past_block_end() {
        let block = AddressBlock::new("csr", "0", "4", "32")
            .with_data(reg("ctrl", "0"))
            .with_data(reg("late", "2"));
        let errors = errors_of(&block);
        assert_eq!(
            errors,
            vec![
                "Register late is not contained within address block csr",
                "Register data ctrl and late overlap within address block csr",
            ]
        );
    }

    #[test]
    fn register_in_file_past_file_range() {
        let file = RegisterFile::new("dma", "0", "4").with_data(reg("wide", "2"));
        let block = AddressBlock::new("csr", "0", "'h100", "32").with_data(file);
        assert_eq!(
            errors_of(&block),
            vec!["Register wide is not contained within register file dma"]
        );
    }

    #[test]
    fn register_wider_than_block_names_the_block() {
        let block = AddressBlock::new("csr", "0", "'h100", "16").with_data(reg("ctrl", "0"));
        assert_eq!(
            errors_of(&block),
            vec!["Size of register ctrl is greater than the width of address block csr"]
        );
    }

    #[test]
    fn reserved_block_with_registers() {
        let block = AddressBlock {
            usage: Usage::Reserved,
            ..AddressBlock::new("hole", "0", "16", "32").with_data(reg("r", "0"))
        };
        assert_eq!(
            errors_of(&block),
            vec!["Address block hole within memory map regs is reserved and cannot contain registers"]
        );
    }

    #[test]
    fn bad_expressions_do_not_cascade() {
        let block = AddressBlock::new("csr", "nowhere", "0", "x").with_data(reg("ctrl", "0"));
        assert_eq!(
            errors_of(&block),
            vec![
                "Invalid base address set for address block csr within memory map regs",
                "Invalid range set for address block csr within memory map regs",
                "Invalid width set for address block csr within memory map regs",
            ]
        );
    }

    #[test]
    fn absent_register_is_not_placed() {
        let ghost = Register {
            is_present: "0".to_string(),
            ..reg("ghost", "0")
        };
        let block = AddressBlock::new("csr", "0", "4", "32")
            .with_data(reg("ctrl", "0"))
            .with_data(ghost);
        assert!(errors_of(&block).is_empty());
    }
}
