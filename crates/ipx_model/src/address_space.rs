//! Initiator-side address spaces and their segments.

use crate::parameter::Parameter;
use serde::{Deserialize, Serialize};

/// A named slice of an address space.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Segment {
    /// Segment name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Offset from the start of the address space.
    pub address_offset: String,
    /// Size in address units.
    pub range: String,
}

impl Segment {
    /// Creates a segment.
    pub fn new(name: impl Into<String>, address_offset: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address_offset: address_offset.into(),
            range: range.into(),
            ..Self::default()
        }
    }
}

/// The addresses an initiator interface can reach.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressSpace {
    /// Address space name.
    pub name: String,
    /// Presence condition; empty means present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub is_present: String,
    /// Size in address units.
    pub range: String,
    /// Data width in bits.
    pub width: String,
    /// Bits per address unit; empty means 8.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_unit_bits: String,
    /// Segments in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
    /// Address space parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl AddressSpace {
    /// Creates an address space without segments.
    pub fn new(name: impl Into<String>, range: impl Into<String>, width: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
            width: width.into(),
            ..Self::default()
        }
    }

    /// Appends a segment.
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Looks up a segment by name.
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }
}
