//! Hexadecimal address notation.
//!
//! Descriptors write addresses as `'h1000`, configuration files as bare
//! `1000`, and humans as `0x1000`. All three parse to the same value.

/// Error returned when an address string is not hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hexadecimal address: '{input}'")]
pub struct ParseHexError {
    /// The input string that failed to parse.
    pub input: String,
}

/// Parses a hexadecimal address with an optional `'h`, `0x` or `0X` prefix.
///
/// Underscore digit separators are accepted.
pub fn parse_hex_address(input: &str) -> Result<u64, ParseHexError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("'h")
        .or_else(|| trimmed.strip_prefix("'H"))
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseHexError {
            input: input.to_string(),
        });
    }
    u64::from_str_radix(&digits, 16).map_err(|_| ParseHexError {
        input: input.to_string(),
    })
}

/// Formats a value in descriptor notation: `'h` and at least four uppercase digits.
pub fn format_ipxact_hex(value: u64) -> String {
    format!("'h{value:04X}")
}

/// Formats a value as a sized Verilog literal of `width` bits.
///
/// The digit count is fixed at `ceil(width / 4)` so every literal of one
/// width lines up.
pub fn format_sized_hex(value: u64, width: u32) -> String {
    let digits = width.div_ceil(4).max(1) as usize;
    format!("{width}'h{value:0digits$x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_prefixes() {
        assert_eq!(parse_hex_address("1000"), Ok(0x1000));
        assert_eq!(parse_hex_address("0x1000"), Ok(0x1000));
        assert_eq!(parse_hex_address("'h1000"), Ok(0x1000));
        assert_eq!(parse_hex_address("0XfF"), Ok(0xff));
        assert_eq!(parse_hex_address(" dead_beef "), Ok(0xdead_beef));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hex_address("").is_err());
        assert!(parse_hex_address("0x").is_err());
        assert!(parse_hex_address("12g4").is_err());
        assert!(parse_hex_address("-1").is_err());
        assert!(parse_hex_address("+1000").is_err());
        assert!(parse_hex_address("0x+10").is_err());
    }

    #[test]
    fn ipxact_notation_pads_to_four_digits() {
        assert_eq!(format_ipxact_hex(0x20), "'h0020");
        assert_eq!(format_ipxact_hex(0x2000), "'h2000");
        assert_eq!(format_ipxact_hex(0x12345), "'h12345");
    }

    #[test]
    fn sized_literal_width() {
        assert_eq!(format_sized_hex(0x1000, 32), "32'h00001000");
        assert_eq!(format_sized_hex(0xfff, 12), "12'hfff");
        assert_eq!(format_sized_hex(1, 5), "5'h01");
        assert_eq!(format_sized_hex(0, 64), "64'h0000000000000000");
    }
}
