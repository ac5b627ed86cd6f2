//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The `ipx.toml` or interconnect file could not be read.
    #[error("cannot read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The document is not well-formed `format` or does not match the schema.
    #[error("malformed {format} configuration: {message}")]
    ParseError {
        /// `"TOML"` or `"JSON"`.
        format: &'static str,
        /// Message from the deserializer.
        message: String,
    },

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("VLNVs.Design".to_string());
        assert_eq!(format!("{err}"), "missing required field: VLNVs.Design");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError {
            format: "JSON",
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "malformed JSON configuration: expected value at line 1 column 1"
        );
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("Address width must be between 1 and 64".to_string());
        assert_eq!(
            format!("{err}"),
            "validation error: Address width must be between 1 and 64"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("cannot read configuration file:"));
    }
}
