//! Subspace maps, which window an initiator's address space into a memory map.

use ipx_model::{AddressSpace, BusInterface, ExpressionParser, SubspaceMap};

use crate::helpers::{has_valid_is_present, has_valid_name, resolve_positive};
use crate::validators::parameter::ParameterValidator;
use crate::Validator;

/// Checks subspace maps against the component's interfaces and address spaces.
pub struct SubspaceMapValidator<'a> {
    parser: &'a dyn ExpressionParser,
    bus_interfaces: &'a [BusInterface],
    address_spaces: &'a [AddressSpace],
}

impl<'a> SubspaceMapValidator<'a> {
    /// Creates a validator resolving references in the given collections.
    pub fn new(
        parser: &'a dyn ExpressionParser,
        bus_interfaces: &'a [BusInterface],
        address_spaces: &'a [AddressSpace],
    ) -> Self {
        Self {
            parser,
            bus_interfaces,
            address_spaces,
        }
    }

    fn initiator(&self, map: &SubspaceMap) -> Option<&'a BusInterface> {
        self.bus_interfaces
            .iter()
            .find(|b| b.name == map.initiator_ref && b.mode.is_initiator())
    }

    fn address_space(&self, map: &SubspaceMap) -> Option<&'a AddressSpace> {
        let space_ref = self.initiator(map)?.address_space_ref.as_deref()?;
        self.address_spaces.iter().find(|s| s.name == space_ref)
    }

    /// Address units covered by `map`: the referenced segment's range, or the
    /// whole address space when no segment is named.
    pub fn range_of(&self, map: &SubspaceMap) -> Option<u64> {
        let space = self.address_space(map)?;
        match &map.segment_ref {
            Some(segment) => resolve_positive(self.parser, &space.segment(segment)?.range),
            None => resolve_positive(self.parser, &space.range),
        }
    }
}

impl Validator<SubspaceMap> for SubspaceMapValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, map: &SubspaceMap, context: &str) {
        let name = &map.name;

        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for subspace map {name} within {context}"
            ));
        }
        if !has_valid_is_present(self.parser, &map.is_present) {
            errors.push(format!(
                "Invalid is present set for subspace map {name} within {context}"
            ));
        }
        if self.parser.resolve_u64(&map.base_address).is_none() {
            errors.push(format!(
                "Invalid base address set for subspace map {name} within {context}"
            ));
        }

        if self.initiator(map).is_none() {
            errors.push(format!(
                "Invalid initiator reference {} set for subspace map {name} within {context}",
                map.initiator_ref
            ));
        } else if let Some(segment) = &map.segment_ref {
            let found = self
                .address_space(map)
                .is_some_and(|space| space.segment(segment).is_some());
            if !found {
                errors.push(format!(
                    "Invalid segment reference {segment} set for subspace map {name} within {context}"
                ));
            }
        }

        ParameterValidator::new(self.parser).find_errors_in_all(
            errors,
            &map.parameters,
            &format!("subspace map {name}"),
        );
    }
}
