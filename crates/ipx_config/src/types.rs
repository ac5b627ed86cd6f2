//! Configuration types deserialized from `ipx.toml`.

use serde::Deserialize;

/// The top-level project configuration parsed from `ipx.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// Where library documents live.
    #[serde(default)]
    pub library: LibraryConfig,
    /// Interconnect generation defaults.
    #[serde(default)]
    pub generate: GenerateConfig,
    /// Validation settings.
    #[serde(default)]
    pub validate: ValidateConfig,
}

/// Core project metadata required in every `ipx.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Location of the document library.
#[derive(Debug, Deserialize)]
pub struct LibraryConfig {
    /// Library root directory, relative to the project directory.
    #[serde(default = "default_library_root")]
    pub root: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_library_root(),
        }
    }
}

/// Defaults applied by `ipx generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateConfig {
    /// Directory receiving emitted RTL, relative to the project directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Output format used to look up the skeleton plugin.
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Clock port name wired into the crossbar instance.
    #[serde(default = "default_clock_port")]
    pub clock_port: String,
    /// Active-low reset port name wired into the crossbar instance.
    #[serde(default = "default_reset_port")]
    pub reset_port: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            output_format: default_output_format(),
            clock_port: default_clock_port(),
            reset_port: default_reset_port(),
        }
    }
}

/// Settings for `ipx validate`.
#[derive(Debug, Default, Deserialize)]
pub struct ValidateConfig {
    /// Treat warnings as errors when computing the exit status.
    #[serde(default)]
    pub warnings_as_errors: bool,
}

fn default_library_root() -> String {
    "ipxact".to_string()
}

fn default_output_dir() -> String {
    "rtl".to_string()
}

fn default_output_format() -> String {
    "verilog".to_string()
}

fn default_clock_port() -> String {
    "clk_i".to_string()
}

fn default_reset_port() -> String {
    "rst_ni".to_string()
}
