//! Vendor:Library:Name:Version identifiers.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A four-part identifier uniquely naming a library document.
///
/// Parses from and displays as `vendor:library:name:version`. Every part must
/// be non-empty for the identifier to be considered valid. Serializes as the
/// colon-separated string; the empty string stands for an unset identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Vlnv {
    /// The vendor part.
    pub vendor: String,
    /// The library part.
    pub library: String,
    /// The name part.
    pub name: String,
    /// The version part.
    pub version: String,
}

impl Vlnv {
    /// Creates a new identifier from its four parts.
    pub fn new(
        vendor: impl Into<String>,
        library: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            library: library.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Returns `true` if all four parts are non-empty and free of separators.
    pub fn is_valid(&self) -> bool {
        [&self.vendor, &self.library, &self.name, &self.version]
            .iter()
            .all(|part| !part.trim().is_empty() && !part.contains(':'))
    }

    /// Returns the library-relative directory holding this document.
    pub fn directory(&self) -> PathBuf {
        [&self.vendor, &self.library, &self.name, &self.version]
            .iter()
            .collect()
    }
}

impl fmt::Display for Vlnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.vendor, self.library, self.name, self.version
        )
    }
}

/// Error type for parsing VLNV strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid VLNV: '{input}' (expected vendor:library:name:version)")]
pub struct ParseVlnvError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Vlnv {
    type Err = ParseVlnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [vendor, library, name, version]
                if parts.iter().all(|part| !part.is_empty()) =>
            {
                Ok(Vlnv::new(*vendor, *library, *name, *version))
            }
            _ => Err(ParseVlnvError {
                input: s.to_string(),
            }),
        }
    }
}

impl Serialize for Vlnv {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if *self == Vlnv::default() {
            serializer.serialize_str("")
        } else {
            serializer.collect_str(self)
        }
    }
}

impl<'de> Deserialize<'de> for Vlnv {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VlnvVisitor;

        impl<'de> Visitor<'de> for VlnvVisitor {
            type Value = Vlnv;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a vendor:library:name:version string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v.trim().is_empty() {
                    return Ok(Vlnv::default());
                }
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(VlnvVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_four_parts() {
        let v: Vlnv = "acme:ip:uart:1.0".parse().unwrap();
        assert_eq!(v.vendor, "acme");
        assert_eq!(v.library, "ip");
        assert_eq!(v.name, "uart");
        assert_eq!(v.version, "1.0");
        assert!(v.is_valid());
    }

    #[test]
    fn parse_trims_whitespace() {
        let v: Vlnv = " acme : ip : uart : 1.0 ".parse().unwrap();
        assert_eq!(v.to_string(), "acme:ip:uart:1.0");
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert!("acme:ip:uart".parse::<Vlnv>().is_err());
        assert!("acme:ip::1.0".parse::<Vlnv>().is_err());
        assert!("".parse::<Vlnv>().is_err());
        assert!("a:b:c:d:e".parse::<Vlnv>().is_err());
    }

    #[test]
    fn default_is_invalid() {
        assert!(!Vlnv::default().is_valid());
    }

    #[test]
    fn directory_layout() {
        let v = Vlnv::new("acme", "ip", "uart", "1.0");
        assert_eq!(v.directory(), PathBuf::from("acme/ip/uart/1.0"));
    }

    #[test]
    fn error_message_names_input() {
        let err = "bad".parse::<Vlnv>().unwrap_err();
        assert!(err.to_string().contains("'bad'"));
    }

    #[test]
    fn serde_uses_string_form() {
        let v = Vlnv::new("acme", "ip", "uart", "1.0");
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"acme:ip:uart:1.0\"");
        let back: Vlnv = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn serde_empty_string_is_unset() {
        let back: Vlnv = serde_json::from_str("\"\"").unwrap();
        assert_eq!(back, Vlnv::default());
        assert_eq!(serde_json::to_string(&Vlnv::default()).unwrap(), "\"\"");
    }

    #[test]
    fn serde_rejects_malformed() {
        assert!(serde_json::from_str::<Vlnv>("\"acme:ip\"").is_err());
    }
}
