//! Expression and naming checks shared by the validators.

use ipx_model::ExpressionParser;

/// Bits per address unit when a map or space leaves it unset.
pub(crate) const DEFAULT_ADDRESS_UNIT_BITS: u64 = 8;

/// Returns `true` if `name` contains something other than whitespace.
pub(crate) fn has_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// An empty presence condition means present; otherwise it must be 0 or 1.
pub(crate) fn has_valid_is_present(parser: &dyn ExpressionParser, expression: &str) -> bool {
    expression.is_empty() || matches!(parser.resolve_u64(expression), Some(0) | Some(1))
}

/// Returns `false` only when the presence condition resolves to 0.
pub(crate) fn is_present(parser: &dyn ExpressionParser, expression: &str) -> bool {
    expression.is_empty() || parser.resolve_u64(expression) != Some(0)
}

/// Resolves an expression that must be strictly positive.
pub(crate) fn resolve_positive(parser: &dyn ExpressionParser, expression: &str) -> Option<u64> {
    parser.resolve_u64(expression).filter(|v| *v > 0)
}

/// An empty dimension means one element; otherwise it must be positive.
pub(crate) fn has_valid_dimension(parser: &dyn ExpressionParser, expression: &str) -> bool {
    expression.is_empty() || resolve_positive(parser, expression).is_some()
}

/// Number of array elements; unresolvable dimensions count as one.
pub(crate) fn dimension(parser: &dyn ExpressionParser, expression: &str) -> u64 {
    if expression.is_empty() {
        1
    } else {
        resolve_positive(parser, expression).unwrap_or(1)
    }
}

/// Resolves address unit bits, defaulting an empty expression to 8.
pub(crate) fn address_unit_bits(parser: &dyn ExpressionParser, expression: &str) -> Option<u64> {
    if expression.is_empty() {
        Some(DEFAULT_ADDRESS_UNIT_BITS)
    } else {
        resolve_positive(parser, expression)
    }
}

/// Returns every name occurring more than once, each reported once, in the
/// order its second occurrence is met.
pub(crate) fn duplicate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for name in names {
        if seen.contains(&name) {
            if !duplicates.contains(&name) {
                duplicates.push(name);
            }
        } else {
            seen.push(name);
        }
    }
    duplicates
}

/// Appends `Name <n> of <collection> in <context> is not unique.` per duplicate.
pub(crate) fn find_duplicate_name_errors<'a>(
    errors: &mut Vec<String>,
    names: impl IntoIterator<Item = &'a str>,
    collection: &str,
    context: &str,
) {
    for name in duplicate_names(names) {
        errors.push(format!(
            "Name {name} of {collection} in {context} is not unique."
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipx_model::LiteralExpressionParser;

    #[test]
    fn names() {
        assert!(has_valid_name("regs"));
        assert!(!has_valid_name(""));
        assert!(!has_valid_name("  \t"));
    }

    #[test]
    fn presence() {
        let parser = LiteralExpressionParser::new();
        assert!(has_valid_is_present(&parser, ""));
        assert!(has_valid_is_present(&parser, "1"));
        assert!(has_valid_is_present(&parser, "0"));
        assert!(!has_valid_is_present(&parser, "2"));
        assert!(!has_valid_is_present(&parser, "maybe"));
        assert!(is_present(&parser, ""));
        assert!(!is_present(&parser, "0"));
        assert!(is_present(&parser, "junk"));
    }

    #[test]
    fn dimensions_and_aub() {
        let parser = LiteralExpressionParser::new();
        assert!(has_valid_dimension(&parser, ""));
        assert!(!has_valid_dimension(&parser, "0"));
        assert_eq!(dimension(&parser, "4"), 4);
        assert_eq!(dimension(&parser, ""), 1);
        assert_eq!(address_unit_bits(&parser, ""), Some(8));
        assert_eq!(address_unit_bits(&parser, "16"), Some(16));
        assert_eq!(address_unit_bits(&parser, "0"), None);
    }

    #[test]
    fn duplicates_reported_once_in_order() {
        let names = ["a", "b", "a", "c", "b", "a"];
        assert_eq!(duplicate_names(names), vec!["a", "b"]);
        assert!(duplicate_names(["x", "y"]).is_empty());
    }
}
