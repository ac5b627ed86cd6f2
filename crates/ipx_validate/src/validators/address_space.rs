//! Address spaces and their segments.

use ipx_common::{AddressRegion, MemoryReserve};
use ipx_model::{AddressSpace, ExpressionParser, Segment};

use crate::helpers::{
    address_unit_bits, find_duplicate_name_errors, has_valid_is_present, has_valid_name,
    is_present, resolve_positive,
};
use crate::validators::parameter::ParameterValidator;
use crate::Validator;

/// Checks a single segment.
pub struct SegmentValidator<'a> {
    parser: &'a dyn ExpressionParser,
}

impl<'a> SegmentValidator<'a> {
    /// Creates a validator resolving expressions through `parser`.
    pub fn new(parser: &'a dyn ExpressionParser) -> Self {
        Self { parser }
    }

    fn region(&self, segment: &Segment) -> Option<AddressRegion> {
        if !is_present(self.parser, &segment.is_present) {
            return None;
        }
        let offset = self.parser.resolve_u64(&segment.address_offset)?;
        let range = resolve_positive(self.parser, &segment.range)?;
        Some(AddressRegion::from_base_and_range(offset, range))
    }
}

impl Validator<Segment> for SegmentValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, segment: &Segment, context: &str) {
        let name = &segment.name;
        if !has_valid_name(name) {
            errors.push(format!("Invalid name specified for segment {name} within {context}"));
        }
        if !has_valid_is_present(self.parser, &segment.is_present) {
            errors.push(format!("Invalid is present set for segment {name} within {context}"));
        }
        if self.parser.resolve_u64(&segment.address_offset).is_none() {
            errors.push(format!(
                "Invalid address offset set for segment {name} within {context}"
            ));
        }
        if resolve_positive(self.parser, &segment.range).is_none() {
            errors.push(format!("Invalid range set for segment {name} within {context}"));
        }
    }

    fn validate(&self, segment: &Segment) -> bool {
        has_valid_name(&segment.name)
            && has_valid_is_present(self.parser, &segment.is_present)
            && self.parser.resolve_u64(&segment.address_offset).is_some()
            && resolve_positive(self.parser, &segment.range).is_some()
    }
}

/// Checks an address space and the placement of its segments.
pub struct AddressSpaceValidator<'a> {
    parser: &'a dyn ExpressionParser,
}

impl<'a> AddressSpaceValidator<'a> {
    /// Creates a validator resolving expressions through `parser`.
    pub fn new(parser: &'a dyn ExpressionParser) -> Self {
        Self { parser }
    }
}

impl Validator<AddressSpace> for AddressSpaceValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<String>, space: &AddressSpace, context: &str) {
        let name = &space.name;
        let own_context = format!("address space {name}");

        if !has_valid_name(name) {
            errors.push(format!(
                "Invalid name specified for address space {name} within {context}"
            ));
        }
        if !has_valid_is_present(self.parser, &space.is_present) {
            errors.push(format!(
                "Invalid is present set for address space {name} within {context}"
            ));
        }
        let range = resolve_positive(self.parser, &space.range);
        if range.is_none() {
            errors.push(format!(
                "Invalid range set for address space {name} within {context}"
            ));
        }
        if resolve_positive(self.parser, &space.width).is_none() {
            errors.push(format!(
                "Invalid width set for address space {name} within {context}"
            ));
        }
        if address_unit_bits(self.parser, &space.address_unit_bits).is_none() {
            errors.push(format!(
                "Invalid address unit bits set for address space {name} within {context}"
            ));
        }

        find_duplicate_name_errors(
            errors,
            space.segments.iter().map(|s| s.name.as_str()),
            "segments",
            &own_context,
        );

        let segment_validator = SegmentValidator::new(self.parser);
        let mut reserve = MemoryReserve::new();
        for segment in &space.segments {
            segment_validator.find_errors_in(errors, segment, &own_context);
            if let Some(region) = segment_validator.region(segment) {
                if range.is_some_and(|r| !region.is_contained_in(r)) {
                    errors.push(format!(
                        "Segment {} is not contained within address space {name}",
                        segment.name
                    ));
                }
                reserve.add_region(segment.name.clone(), region);
            }
        }
        reserve.find_errors_in_overlap(errors, "Segments", &own_context);

        ParameterValidator::new(self.parser).find_errors_in_all(
            errors,
            &space.parameters,
            &own_context,
        );
    }
}
