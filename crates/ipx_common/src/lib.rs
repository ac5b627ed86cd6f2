//! Shared foundational types used across the ipx toolchain.
//!
//! This crate provides the four-part VLNV identifier, hexadecimal address
//! helpers in the notations found in descriptors and configuration files, and
//! the interval reservation used for every overlap and containment check.

#![warn(missing_docs)]

pub mod hex;
pub mod reserve;
pub mod vlnv;

pub use hex::{format_ipxact_hex, format_sized_hex, parse_hex_address, ParseHexError};
pub use reserve::{overlaps, AddressRegion, MemoryReserve, Reservation};
pub use vlnv::{ParseVlnvError, Vlnv};
