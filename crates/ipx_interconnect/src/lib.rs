//! Interconnect generation.
//!
//! Given an [`InterconnectConfig`](ipx_config::InterconnectConfig) naming the
//! initiators and targets of a design, [`InterconnectGenerator`] builds a
//! fabric component exposing one bus interface per connection, adds it to the
//! design with the matching interconnections and saves both through the
//! library. A run moves through the [`Stage`]s in order and aborts with a
//! [`GenerateError`] before anything is saved when the configuration or the
//! library contents are inconsistent.

#![warn(missing_docs)]

pub mod error;
pub mod generator;
pub mod request;
pub mod stage;

pub use error::GenerateError;
pub use generator::{Generated, InterconnectGenerator};
pub use request::{Endpoint, GenerationRequest, InterfaceRef, StartingPoint};
pub use stage::Stage;
