//! Errors raised while computing decode tables or writing RTL.

use ipx_common::ParseHexError;

/// A failure of address-decode computation or RTL emission.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The configuration lists no targets, so there is nothing to decode.
    #[error("no targets configured")]
    NoTargetsConfigured,

    /// A target address region is not hexadecimal.
    #[error("target '{target}': {source}")]
    AddressParse {
        /// Name of the target owning the region.
        target: String,
        /// The underlying parse failure.
        source: ParseHexError,
    },

    /// A region address does not fit in the configured address width.
    #[error("target '{target}': address {address:#x} does not fit in {width} address bits")]
    AddressOutOfRange {
        /// Name of the target owning the region.
        target: String,
        /// The offending address.
        address: u64,
        /// Configured address width.
        width: u32,
    },

    /// The rule table does not hold one row per counted rule.
    #[error("address map has {rules} entries for {expected} rules")]
    RuleCountMismatch {
        /// Rows in the table.
        rules: usize,
        /// `NoAddrRules`.
        expected: usize,
    },

    /// No generator plugin is registered for the requested output format.
    #[error("no generator plugin registered for output format '{0}'")]
    PluginNotFound(String),

    /// Reading the skeleton or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_address_out_of_range() {
        let err = EmitError::AddressOutOfRange {
            target: "ram".to_string(),
            address: 0x10000,
            width: 16,
        };
        assert_eq!(
            err.to_string(),
            "target 'ram': address 0x10000 does not fit in 16 address bits"
        );
    }

    #[test]
    fn display_rule_count_mismatch() {
        let err = EmitError::RuleCountMismatch { rules: 1, expected: 2 };
        assert_eq!(err.to_string(), "address map has 1 entries for 2 rules");
    }
}
