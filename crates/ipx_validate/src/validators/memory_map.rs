//! Memory maps, their blocks and remaps.

use ipx_common::{AddressRegion, MemoryReserve};
use ipx_model::{
    AddressSpace, BusInterface, ExpressionParser, MemoryBlock, MemoryMap, MemoryRemap, RemapState,
};

use crate::helpers::{
    address_unit_bits, find_duplicate_name_errors, has_valid_is_present, has_valid_name,
    is_present, resolve_positive, DEFAULT_ADDRESS_UNIT_BITS,
};
use crate::validators::address_block::AddressBlockValidator;
use crate::validators::subspace_map::SubspaceMapValidator;
use crate::Validator;

/// Checks a memory map against the component's remap states, bus interfaces
/// and address spaces.
pub struct MemoryMapValidator<'a> {
    parser: &'a dyn ExpressionParser,
    remap_states: &'a [RemapState],
    bus_interfaces: &'a [BusInterface],
    address_spaces: &'a [AddressSpace],
}

impl<'a> MemoryMapValidator<'a> {
    /// Creates a validator resolving references in the given collections.
    pub fn new(
        parser: &'a dyn ExpressionParser,
        remap_states: &'a [RemapState],
        bus_interfaces: &'a [BusInterface],
        address_spaces: &'a [AddressSpace],
    ) -> Self {
        Self {
            parser,
            remap_states,
            bus_interfaces,
            address_spaces,
        }
    }

    fn subspace_validator(&self) -> SubspaceMapValidator<'a> {
        SubspaceMapValidator::new(self.parser, self.bus_interfaces, self.address_spaces)
    }

    fn block_region(&self, block: &MemoryBlock) -> Option<AddressRegion> {
        if !is_present(self.parser, block.is_present()) {
            return None;
        }
        let base = self.parser.resolve_u64(block.base_address())?;
        let range = match block {
            MemoryBlock::AddressBlock(b) => resolve_positive(self.parser, &b.range)?,
            MemoryBlock::SubspaceMap(s) => self.subspace_validator().range_of(s)?,
        };
        Some(AddressRegion::from_base_and_range(base, range))
    }

    /// Checks one list of blocks, either the default layout or a remap.
    fn find_errors_in_blocks(
        &self,
        errors: &mut Vec<String>,
        blocks: &[MemoryBlock],
        aub: Option<u64>,
        context: &str,
    ) {
        find_duplicate_name_errors(
            errors,
            blocks.iter().map(MemoryBlock::name),
            "memory blocks",
            context,
        );

        let mut reserve = MemoryReserve::new();
        for block in blocks {
            match block {
                MemoryBlock::AddressBlock(address_block) => {
                    let unit = aub.unwrap_or(DEFAULT_ADDRESS_UNIT_BITS);
                    AddressBlockValidator::new(self.parser, unit).find_errors_in(
                        errors,
                        address_block,
                        context,
                    );
                    if let (Some(aub), Some(width)) =
                        (aub, resolve_positive(self.parser, &address_block.width))
                    {
                        if width % aub != 0 {
                            errors.push(format!(
                                "Width of address block {} is not a multiple of the address unit bits of {context}",
                                address_block.name
                            ));
                        }
                    }
                }
                MemoryBlock::SubspaceMap(subspace) => {
                    self.subspace_validator()
                        .find_errors_in(errors, subspace, context);
                }
            }
            if let Some(region) = self.block_region(block) {
                reserve.add_region(block.name(), region);
            }
        }
        reserve.find_errors_in_overlap(errors, "Memory blocks", context);
    }

    fn find_errors_in_remap(
        &self,
        errors: &mut Vec<String>,
        remap: &MemoryRemap,
        aub: Option<u64>,
        context: &str,
    ) {
        let name = &remap.name;
        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for memory remap {name} within {context}"
            ));
        }
        if !has_valid_is_present(self.parser, &remap.is_present) {
            errors.push(format!(
                "Invalid is present set for memory remap {name} within {context}"
            ));
        }
        if !self.remap_states.iter().any(|s| s.name == remap.remap_state) {
            errors.push(format!(
                "Invalid remap state {} set for memory remap {name} within {context}",
                remap.remap_state
            ));
        }
        self.find_errors_in_blocks(errors, &remap.blocks, aub, &format!("memory remap {name}"));
    }
}

impl Validator<MemoryMap> for MemoryMapValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, map: &MemoryMap, context: &str) {
        let name = &map.name;
        let own_context = format!("memory map {name}");

        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for memory map {name} within {context}"
            ));
        }
        if !has_valid_is_present(self.parser, &map.is_present) {
            errors.push(format!(
                "Invalid is present set for memory map {name} within {context}"
            ));
        }
        let aub = address_unit_bits(self.parser, &map.address_unit_bits);
        if aub.is_none() {
            errors.push(format!(
                "Invalid address unit bits set for memory map {name} within {context}"
            ));
        }

        self.find_errors_in_blocks(errors, &map.blocks, aub, &own_context);

        find_duplicate_name_errors(
            errors,
            map.remaps.iter().map(|r| r.name.as_str()),
            "memory remaps",
            &own_context,
        );
        let mut used_states: Vec<&str> = Vec::new();
        for remap in &map.remaps {
            self.find_errors_in_remap(errors, remap, aub, &own_context);
            let state = remap.remap_state.as_str();
            if used_states.contains(&state) {
                errors.push(format!(
                    "Remap state {state} is used by more than one memory remap within {own_context}"
                ));
            } else {
                used_states.push(state);
            }
        }
    }
}
