//! Hierarchical validation of component models.
//!
//! One validator exists per entity type and validators compose top-down
//! along the containment hierarchy: fields inside registers, registers and
//! register files inside address blocks, blocks inside memory maps, segments
//! inside address spaces. Parameter validation is shared by all of them.
//!
//! Validators are pure queries over an immutable snapshot. A validator is
//! built with exactly the collections it cross-references and is meant to be
//! built again for every pass; none of them caches model state.
//!
//! [`ValidationEngine`] runs the full chain over a component and reports each
//! finding to a [`DiagnosticSink`](ipx_diagnostics::DiagnosticSink).

#![warn(missing_docs)]

mod engine;
mod helpers;
mod validators;

pub use engine::ValidationEngine;
pub use validators::{
    AddressBlockValidator, AddressSpaceValidator, ComponentSection, ComponentValidator,
    FieldValidator, MemoryMapValidator, ParameterValidator, PowerDomainValidator,
    RegisterFileValidator, RegisterValidator, RemapStateValidator, SegmentValidator,
    SubspaceMapValidator,
};

/// A validator for one entity type.
///
/// `find_errors_in` appends one human-readable message per violated rule and
/// never stops early. `validate` answers the same question as a boolean; the
/// default implementation runs `find_errors_in` into a scratch list, and
/// implementations may override it with a short-circuiting version.
pub trait Validator<T: ?Sized> {
    /// Appends every problem found in `item` to `errors`.
    ///
    /// `context` names the enclosing entity and appears in messages as
    /// `... within <context>`.
    fn find_errors_in(&self, errors: &mut Vec<String>, item: &T, context: &str);

    /// Returns `true` if `item` has no problems.
    fn validate(&self, item: &T) -> bool {
        let mut errors = Vec::new();
        self.find_errors_in(&mut errors, item, "");
        errors.is_empty()
    }
}
