//! Physical ports on a component boundary.

use serde::{Deserialize, Serialize};

/// The direction of a port on a component boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Data flows into the component.
    #[default]
    In,
    /// Data flows out of the component.
    Out,
    /// Data flows both ways.
    InOut,
    /// Not a real signal.
    Phantom,
}

impl Direction {
    /// Returns the direction seen from the other side of a connection.
    pub fn mirrored(self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
            other => other,
        }
    }

    /// Returns the Verilog keyword for this direction, if it has one.
    pub fn verilog_keyword(self) -> Option<&'static str> {
        match self {
            Direction::In => Some("input"),
            Direction::Out => Some("output"),
            Direction::InOut => Some("inout"),
            Direction::Phantom => None,
        }
    }
}

/// A physical port of a component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Port {
    /// Port name.
    pub name: String,
    /// Direction of data flow.
    pub direction: Direction,
    /// Left vector bound expression; empty for scalar ports.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub left_bound: String,
    /// Right vector bound expression; empty for scalar ports.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub right_bound: String,
    /// Value driven when unconnected.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_value: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Port {
    /// Creates a scalar port.
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
            ..Self::default()
        }
    }

    /// Sets the vector bounds.
    pub fn with_bounds(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_bound = left.into();
        self.right_bound = right.into();
        self
    }

    /// Returns `true` if the port has vector bounds.
    pub fn is_vector(&self) -> bool {
        !self.left_bound.is_empty() || !self.right_bound.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_direction() {
        assert_eq!(Direction::In.mirrored(), Direction::Out);
        assert_eq!(Direction::Out.mirrored(), Direction::In);
        assert_eq!(Direction::InOut.mirrored(), Direction::InOut);
        assert_eq!(Direction::Phantom.mirrored(), Direction::Phantom);
    }

    #[test]
    fn keywords() {
        assert_eq!(Direction::In.verilog_keyword(), Some("input"));
        assert_eq!(Direction::Phantom.verilog_keyword(), None);
    }

    #[test]
    fn vector_detection() {
        assert!(!Port::new("clk", Direction::In).is_vector());
        assert!(Port::new("data", Direction::Out).with_bounds("31", "0").is_vector());
    }
}
