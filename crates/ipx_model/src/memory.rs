//! Memory-mapped register space: memory maps down to bit fields.
//!
//! Containment runs `MemoryMap → MemoryBlock (AddressBlock | SubspaceMap)`,
//! `AddressBlock → RegisterData (Register | RegisterFile)`,
//! `RegisterFile → RegisterData` (recursively) and `Register → Field`.
//! All numeric properties are expression strings resolved through an
//! [`ExpressionParser`](crate::ExpressionParser).

use crate::parameter::Parameter;
use serde::{Deserialize, Serialize};

/// Software access rights of a block, register or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    /// Readable and writable.
    ReadWrite,
    /// Read only.
    ReadOnly,
    /// Write only.
    WriteOnly,
    /// Readable, writable once.
    ReadWriteOnce,
    /// Writable once.
    WriteOnce,
}

/// Intended use of an address block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    /// Plain memory; registers are optional.
    Memory,
    /// Register space.
    #[default]
    Register,
    /// Reserved space; must hold no registers.
    Reserved,
}

/// A bit field inside a register.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Offset of the least significant bit.
    pub bit_offset: String,
    /// Width in bits.
    pub bit_width: String,
    /// Reset value expression.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reset_value: String,
    /// Reset mask expression; requires a reset value.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reset_mask: String,
    /// Software access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    /// Whether hardware may change the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatile: Option<bool>,
    /// Field parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Field {
    /// Creates a field at `bit_offset` spanning `bit_width` bits.
    pub fn new(name: impl Into<String>, bit_offset: impl Into<String>, bit_width: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bit_offset: bit_offset.into(),
            bit_width: bit_width.into(),
            ..Self::default()
        }
    }
}

/// A register: an addressed word made of fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Register {
    /// Register name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Array dimension; empty means a single register.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dimension: String,
    /// Offset from the containing block or register file, in address units.
    pub address_offset: String,
    /// Width in bits.
    pub size: String,
    /// Whether hardware may change the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatile: Option<bool>,
    /// Software access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Register parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Register {
    /// Creates a register without fields.
    pub fn new(name: impl Into<String>, address_offset: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address_offset: address_offset.into(),
            size: size.into(),
            ..Self::default()
        }
    }

    /// Appends a field.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

/// A group of registers with its own address range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterFile {
    /// Register file name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Array dimension; empty means a single instance.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dimension: String,
    /// Offset from the containing block or register file, in address units.
    pub address_offset: String,
    /// Size in address units.
    pub range: String,
    /// Nested registers and register files.
    #[serde(default)]
    pub register_data: Vec<RegisterData>,
    /// Register file parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl RegisterFile {
    /// Creates an empty register file.
    pub fn new(name: impl Into<String>, address_offset: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address_offset: address_offset.into(),
            range: range.into(),
            ..Self::default()
        }
    }

    /// Appends a nested register or register file.
    pub fn with_data(mut self, data: impl Into<RegisterData>) -> Self {
        self.register_data.push(data.into());
        self
    }
}

/// A register or a register file inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegisterData {
    /// A single register.
    Register(Register),
    /// A nested register file.
    RegisterFile(RegisterFile),
}

impl RegisterData {
    /// Returns the item name.
    pub fn name(&self) -> &str {
        match self {
            RegisterData::Register(r) => &r.name,
            RegisterData::RegisterFile(f) => &f.name,
        }
    }

    /// Returns the address offset expression.
    pub fn address_offset(&self) -> &str {
        match self {
            RegisterData::Register(r) => &r.address_offset,
            RegisterData::RegisterFile(f) => &f.address_offset,
        }
    }

    /// Returns the presence expression.
    pub fn is_present(&self) -> &str {
        match self {
            RegisterData::Register(r) => &r.is_present,
            RegisterData::RegisterFile(f) => &f.is_present,
        }
    }

    /// Returns the array dimension expression.
    pub fn dimension(&self) -> &str {
        match self {
            RegisterData::Register(r) => &r.dimension,
            RegisterData::RegisterFile(f) => &f.dimension,
        }
    }
}

impl From<Register> for RegisterData {
    fn from(register: Register) -> Self {
        RegisterData::Register(register)
    }
}

impl From<RegisterFile> for RegisterData {
    fn from(file: RegisterFile) -> Self {
        RegisterData::RegisterFile(file)
    }
}

/// A contiguous block of addresses inside a memory map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressBlock {
    /// Block name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Start address, in address units.
    pub base_address: String,
    /// Size in address units.
    pub range: String,
    /// Data width in bits.
    pub width: String,
    /// Intended use.
    #[serde(default)]
    pub usage: Usage,
    /// Software access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    /// Whether hardware may change contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatile: Option<bool>,
    /// Registers and register files in declaration order.
    #[serde(default)]
    pub register_data: Vec<RegisterData>,
    /// Block parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl AddressBlock {
    /// Creates an empty register block.
    pub fn new(
        name: impl Into<String>,
        base_address: impl Into<String>,
        range: impl Into<String>,
        width: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_address: base_address.into(),
            range: range.into(),
            width: width.into(),
            ..Self::default()
        }
    }

    /// Appends a register or register file.
    pub fn with_data(mut self, data: impl Into<RegisterData>) -> Self {
        self.register_data.push(data.into());
        self
    }
}

/// A window onto the address space of one of the component's initiators.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubspaceMap {
    /// Subspace map name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Start address, in address units.
    pub base_address: String,
    /// Initiator bus interface whose address space is mapped.
    pub initiator_ref: String,
    /// Segment of that address space, if only part of it is mapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_ref: Option<String>,
    /// Subspace map parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

/// An entry of a memory map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemoryBlock {
    /// A block of registers or memory.
    AddressBlock(AddressBlock),
    /// A mapped initiator address space.
    SubspaceMap(SubspaceMap),
}

impl MemoryBlock {
    /// Returns the block name.
    pub fn name(&self) -> &str {
        match self {
            MemoryBlock::AddressBlock(b) => &b.name,
            MemoryBlock::SubspaceMap(s) => &s.name,
        }
    }

    /// Returns the base address expression.
    pub fn base_address(&self) -> &str {
        match self {
            MemoryBlock::AddressBlock(b) => &b.base_address,
            MemoryBlock::SubspaceMap(s) => &s.base_address,
        }
    }

    /// Returns the presence expression.
    pub fn is_present(&self) -> &str {
        match self {
            MemoryBlock::AddressBlock(b) => &b.is_present,
            MemoryBlock::SubspaceMap(s) => &s.is_present,
        }
    }

    /// Returns the block parameters.
    pub fn parameters(&self) -> &[Parameter] {
        match self {
            MemoryBlock::AddressBlock(b) => &b.parameters,
            MemoryBlock::SubspaceMap(s) => &s.parameters,
        }
    }
}

impl From<AddressBlock> for MemoryBlock {
    fn from(block: AddressBlock) -> Self {
        MemoryBlock::AddressBlock(block)
    }
}

impl From<SubspaceMap> for MemoryBlock {
    fn from(map: SubspaceMap) -> Self {
        MemoryBlock::SubspaceMap(map)
    }
}

/// An alternative block layout active in one remap state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryRemap {
    /// Remap name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Remap state selecting this layout.
    pub remap_state: String,
    /// Blocks in declaration order.
    #[serde(default)]
    pub blocks: Vec<MemoryBlock>,
}

/// A memory map: the target-side view of a component's addresses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryMap {
    /// Memory map name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Bits per address unit; empty means 8.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_unit_bits: String,
    /// Blocks in declaration order; the order is significant for output.
    #[serde(default)]
    pub blocks: Vec<MemoryBlock>,
    /// Alternative layouts keyed by remap state.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remaps: Vec<MemoryRemap>,
}

impl MemoryMap {
    /// Creates an empty memory map.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a block.
    pub fn with_block(mut self, block: impl Into<MemoryBlock>) -> Self {
        self.blocks.push(block.into());
        self
    }
}
