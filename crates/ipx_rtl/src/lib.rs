//! Address-decode computation and crossbar RTL emission.
//!
//! [`DecodeTable::compute`] turns an interconnect configuration into crossbar
//! dimensions and an ordered address rule table. [`FabricWriter`] asks a
//! [`GeneratorPlugin`] for the module skeleton of the generated component and
//! appends local parameters, bus bundles, the rule table, the crossbar
//! configuration and instance, and the assignments binding the component's
//! ports to the crossbar.

#![warn(missing_docs)]

pub mod decode;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod writer;

pub use decode::{ceil_log2, fits_width, DecodeRule, DecodeTable};
pub use error::EmitError;
pub use protocol::{Protocol, Signal, SignalWidth};
pub use registry::{GeneratorPlugin, PluginRegistry, VerilogSkeletonPlugin};
pub use writer::FabricWriter;
