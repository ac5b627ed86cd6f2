//! Power domains.

use crate::parameter::Parameter;
use serde::{Deserialize, Serialize};

/// A power domain of a component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PowerDomain {
    /// Domain name.
    pub name: String,
    /// Boolean expression; non-zero when the domain can never be switched off.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub always_on: String,
    /// Name of the enclosing power domain, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_domain_of: Option<String>,
    /// Domain parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl PowerDomain {
    /// Creates a top-level power domain.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Nests this domain inside `parent`.
    pub fn sub_domain_of(mut self, parent: impl Into<String>) -> Self {
        self.sub_domain_of = Some(parent.into());
        self
    }
}
