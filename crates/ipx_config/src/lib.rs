//! Parsing and validation of `ipx.toml` project files and interconnect
//! generation configurations.
//!
//! The project file is TOML and carries the library location and generation
//! defaults. The interconnect configuration is the JSON document consumed by
//! the generator and the RTL emitter; see [`InterconnectConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod interconnect;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use interconnect::{
    AddressPair, InitiatorConfig, InterconnectConfig, ParameterConfig, TargetConfig, VlnvTable,
};
pub use loader::{
    load_config, load_config_from_str, load_interconnect_config,
    load_interconnect_config_from_str, CONFIG_FILE_NAME,
};
pub use types::*;
