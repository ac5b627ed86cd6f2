//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
///
/// Each category maps to the subsystem that raised it (e.g., `V001` for a
/// validation finding, `G101` for a generator warning).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Model validation findings, prefixed with `V`.
    Validation,
    /// Interconnect generation, prefixed with `G`.
    Generation,
    /// Configuration loading, prefixed with `C`.
    Config,
    /// RTL emission, prefixed with `R`.
    Rtl,
    /// Library access, prefixed with `L`.
    Library,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Validation => 'V',
            Category::Generation => 'G',
            Category::Config => 'C',
            Category::Rtl => 'R',
            Category::Library => 'L',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `V001`, `G101`, `R002`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Validation.prefix(), 'V');
        assert_eq!(Category::Generation.prefix(), 'G');
        assert_eq!(Category::Config.prefix(), 'C');
        assert_eq!(Category::Rtl.prefix(), 'R');
        assert_eq!(Category::Library.prefix(), 'L');
    }

    #[test]
    fn display_format() {
        let code = DiagnosticCode::new(Category::Validation, 1);
        assert_eq!(format!("{code}"), "V001");

        let code = DiagnosticCode::new(Category::Generation, 101);
        assert_eq!(format!("{code}"), "G101");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Rtl, 2);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
