//! Placement checks shared by address blocks and register files.

use ipx_common::{AddressRegion, MemoryReserve};
use ipx_model::{ExpressionParser, RegisterData};

use crate::helpers::{dimension, find_duplicate_name_errors, is_present, resolve_positive};
use crate::validators::register::RegisterValidator;
use crate::validators::register_file::RegisterFileValidator;
use crate::Validator;

/// Validates a sequence of registers and register files inside one parent.
pub(crate) struct RegisterDataChecker<'a> {
    pub(crate) parser: &'a dyn ExpressionParser,
    pub(crate) address_unit_bits: u64,
    /// Name of the enclosing address block.
    pub(crate) block_name: &'a str,
    /// Width of the enclosing address block, when it resolves.
    pub(crate) block_width: Option<u64>,
}

impl RegisterDataChecker<'_> {
    /// Returns the address units occupied by a present, resolvable item.
    fn region(&self, data: &RegisterData) -> Option<AddressRegion> {
        if !is_present(self.parser, data.is_present()) {
            return None;
        }
        let offset = self.parser.resolve_u64(data.address_offset())?;
        let count = dimension(self.parser, data.dimension());
        let units = match data {
            RegisterData::Register(register) => {
                let size = resolve_positive(self.parser, &register.size)?;
                size.div_ceil(self.address_unit_bits)
            }
            RegisterData::RegisterFile(file) => resolve_positive(self.parser, &file.range)?,
        };
        Some(AddressRegion::from_base_and_range(
            offset,
            units.saturating_mul(count),
        ))
    }

    /// Appends errors for `items` placed inside a parent of `parent_range`
    /// address units, named `parent` in messages.
    pub(crate) fn find_errors_in(
        &self,
        errors: &mut Vec<String>,
        items: &[RegisterData],
        parent_range: Option<u64>,
        parent: &str,
    ) {
        find_duplicate_name_errors(
            errors,
            items.iter().map(RegisterData::name),
            "register data",
            parent,
        );

        let mut reserve = MemoryReserve::new();
        for item in items {
            match item {
                RegisterData::Register(register) => {
                    RegisterValidator::new(self.parser).find_errors_in(errors, register, parent);
                    if let (Some(size), Some(width)) =
                        (resolve_positive(self.parser, &register.size), self.block_width)
                    {
                        if size > width {
                            let block = format!("address block {}", self.block_name);
                            let location = if parent == block {
                                block
                            } else {
                                format!("{block} within {parent}")
                            };
                            errors.push(format!(
                                "Size of register {} is greater than the width of {location}",
                                register.name
                            ));
                        }
                    }
                }
                RegisterData::RegisterFile(file) => {
                    RegisterFileValidator::new(
                        self.parser,
                        self.address_unit_bits,
                        self.block_name,
                        self.block_width,
                    )
                    .find_errors_in(errors, file, parent);
                }
            }

            if let Some(region) = self.region(item) {
                if let Some(range) = parent_range {
                    if !region.is_contained_in(range) {
                        let kind = match item {
                            RegisterData::Register(_) => "Register",
                            RegisterData::RegisterFile(_) => "Register file",
                        };
                        errors.push(format!(
                            "{kind} {} is not contained within {parent}",
                            item.name()
                        ));
                    }
                }
                reserve.add_region(item.name(), region);
            }
        }
        reserve.find_errors_in_overlap(errors, "Register data", parent);
    }
}
