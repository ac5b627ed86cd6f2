//! Typed model of hardware component descriptors.
//!
//! The model covers the memory-mapped register hierarchy
//! ([`MemoryMap`] down to [`Field`]), initiator address spaces, power
//! domains and remap states, plus the component, design and bus documents
//! the interconnect generator reads and writes. Every numeric property is an
//! expression string; [`ExpressionParser`] resolves them. Documents are
//! loaded and stored through the [`Library`] trait.

#![warn(missing_docs)]

pub mod abstraction;
pub mod address_space;
pub mod bus;
pub mod component;
pub mod design;
pub mod document;
pub mod expression;
pub mod library;
pub mod memory;
pub mod parameter;
pub mod port;
pub mod power;
pub mod remap;

pub use abstraction::{AbstractionDefinition, BusDefinition, PortAbstraction, Presence, WireMode};
pub use address_space::{AddressSpace, Segment};
pub use bus::{BitRange, BusInterface, Channel, InterfaceMode, PortMap, WireSide};
pub use component::{Component, Revision};
pub use design::{
    ActiveInterface, AdHocConnection, ComponentInstance, Design, InterfaceEnd, Interconnection,
    PortReference,
};
pub use document::{Document, DocumentKind};
pub use expression::{ExpressionParser, LiteralExpressionParser};
pub use library::{FileLibrary, Library, LibraryError, MemoryLibrary};
pub use memory::{
    Access, AddressBlock, Field, MemoryBlock, MemoryMap, MemoryRemap, Register, RegisterData,
    RegisterFile, SubspaceMap, Usage,
};
pub use parameter::Parameter;
pub use port::{Direction, Port};
pub use power::PowerDomain;
pub use remap::{RemapPort, RemapState};
