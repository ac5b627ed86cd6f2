//! One validator per entity type.

pub(crate) mod address_block;
pub(crate) mod address_space;
pub(crate) mod component;
pub(crate) mod field;
pub(crate) mod memory_map;
pub(crate) mod parameter;
pub(crate) mod power_domain;
pub(crate) mod register;
pub(crate) mod register_data;
pub(crate) mod register_file;
pub(crate) mod remap_state;
pub(crate) mod subspace_map;

pub use address_block::AddressBlockValidator;
pub use address_space::{AddressSpaceValidator, SegmentValidator};
pub use component::{ComponentSection, ComponentValidator};
pub use field::FieldValidator;
pub use memory_map::MemoryMapValidator;
pub use parameter::ParameterValidator;
pub use power_domain::PowerDomainValidator;
pub use register::RegisterValidator;
pub use register_file::RegisterFileValidator;
pub use remap_state::RemapStateValidator;
pub use subspace_map::SubspaceMapValidator;
