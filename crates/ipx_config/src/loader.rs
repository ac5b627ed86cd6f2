//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::interconnect::InterconnectConfig;
use crate::types::ProjectConfig;
use std::collections::HashSet;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE_NAME: &str = "ipx.toml";

/// Loads and validates an `ipx.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates an `ipx.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            format: "TOML",
            message: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.trim().is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.library.root.trim().is_empty() {
        return Err(ConfigError::MissingField("library.root".to_string()));
    }
    if config.generate.output_format.trim().is_empty() {
        return Err(ConfigError::MissingField(
            "generate.output_format".to_string(),
        ));
    }
    Ok(())
}

/// Loads and validates an interconnect configuration JSON file.
pub fn load_interconnect_config(path: &Path) -> Result<InterconnectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_interconnect_config_from_str(&content)
}

/// Parses and validates an interconnect configuration from a JSON string.
pub fn load_interconnect_config_from_str(content: &str) -> Result<InterconnectConfig, ConfigError> {
    let config: InterconnectConfig =
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            format: "JSON",
            message: e.to_string(),
        })?;
    validate_interconnect_config(&config)?;
    Ok(config)
}

fn validate_interconnect_config(config: &InterconnectConfig) -> Result<(), ConfigError> {
    let vlnvs = &config.vlnvs;
    for (role, vlnv) in [
        ("Design", &vlnvs.design),
        ("Interconnect", &vlnvs.interconnect),
        ("Bus", &vlnvs.bus),
    ] {
        if !vlnv.is_valid() {
            return Err(ConfigError::MissingField(format!("VLNVs.{role}")));
        }
    }

    if config.address_width == 0 || config.address_width > 64 {
        return Err(ConfigError::ValidationError(format!(
            "Address width must be between 1 and 64, got {}",
            config.address_width
        )));
    }
    if config.id_width == 0 {
        return Err(ConfigError::ValidationError(
            "ID width must be positive".to_string(),
        ));
    }
    if config.user_width == 0 {
        return Err(ConfigError::ValidationError(
            "User width must be positive".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for initiator in &config.initiators {
        if !seen.insert(initiator.index) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate initiator index {}",
                initiator.index
            )));
        }
        if initiator.data_width == 0 {
            return Err(ConfigError::ValidationError(format!(
                "Data width of initiator '{}' must be positive",
                initiator.name
            )));
        }
    }

    seen.clear();
    for target in &config.targets {
        if !seen.insert(target.index) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate target index {}",
                target.index
            )));
        }
        if target.data_width == 0 {
            return Err(ConfigError::ValidationError(format!(
                "Data width of target '{}' must be positive",
                target.name
            )));
        }
        if target.address_regions.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "target '{}' has no address regions",
                target.name
            )));
        }
    }
    Ok(())
}
