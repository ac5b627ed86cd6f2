//! Generation error types.
//!
//! Every variant aborts the run before anything is persisted, except
//! [`GenerateError::Library`] raised while saving and [`GenerateError::Emit`],
//! which happen after the documents were handed to the library.

use ipx_common::{ParseHexError, Vlnv};
use ipx_config::ConfigError;
use ipx_model::LibraryError;
use ipx_rtl::EmitError;

/// Errors that abort an interconnect generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A referenced document is not in the library.
    #[error("{kind} {vlnv} not found in library")]
    MissingDefinition {
        /// What was looked up, e.g. `abstraction definition`.
        kind: &'static str,
        /// The missing VLNV.
        vlnv: Vlnv,
    },

    /// A target address is not hexadecimal.
    #[error("target '{target}': {source}")]
    AddressParse {
        /// Target owning the address.
        target: String,
        /// The underlying parse failure.
        source: ParseHexError,
    },

    /// Two target regions share addresses.
    #[error("address regions of '{first}' and '{second}' overlap")]
    Overlap {
        /// Target declared first.
        first: String,
        /// Target declared second.
        second: String,
    },

    /// A configured instance does not exist in the design.
    #[error("instance '{instance}' not found in design {design}")]
    MissingInstance {
        /// Instance name from the configuration.
        instance: String,
        /// The design searched.
        design: Vlnv,
    },

    /// A configured bus interface does not exist on its instance.
    #[error("bus interface '{bus}' not found on instance '{instance}'")]
    MissingBusInterface {
        /// Instance name.
        instance: String,
        /// Bus interface name.
        bus: String,
    },

    /// The requested interfaces cannot form an interconnect.
    #[error("topology error: {reason}")]
    Topology {
        /// What is inconsistent.
        reason: String,
    },

    /// The configuration is incomplete for generation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The library failed to load or store a document.
    #[error("library error: {0}")]
    Library(#[from] LibraryError),

    /// RTL emission failed after the documents were saved.
    #[error("RTL emission failed: {0}")]
    Emit(#[from] EmitError),
}
