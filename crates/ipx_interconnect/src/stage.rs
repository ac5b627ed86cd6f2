//! Progress of a generation run.

use std::fmt;

/// The stages a generation run passes through, in order.
///
/// A run only ever moves forward one stage at a time. When a run aborts, the
/// generator stays at the last stage it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Stage {
    /// Nothing has happened yet.
    #[default]
    Idle,
    /// The design component, its design and every named instance are loaded.
    DesignLoaded,
    /// Every requested interface has a mode on the fabric.
    InterfacesClassified,
    /// The fabric's bus interfaces, ports and port maps exist.
    BusesSynthesized,
    /// The global address space is built and endpoints are known not to overlap.
    AddressSpaceComputed,
    /// The fabric and the design are persisted.
    Finalized,
}

impl Stage {
    /// Returns the stage after this one, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Idle => Some(Stage::DesignLoaded),
            Stage::DesignLoaded => Some(Stage::InterfacesClassified),
            Stage::InterfacesClassified => Some(Stage::BusesSynthesized),
            Stage::BusesSynthesized => Some(Stage::AddressSpaceComputed),
            Stage::AddressSpaceComputed => Some(Stage::Finalized),
            Stage::Finalized => None,
        }
    }

    /// Returns `true` once the run has completed.
    pub fn is_finished(self) -> bool {
        self == Stage::Finalized
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::DesignLoaded => "design loaded",
            Stage::InterfacesClassified => "interfaces classified",
            Stage::BusesSynthesized => "buses synthesized",
            Stage::AddressSpaceComputed => "address space computed",
            Stage::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_strictly_sequential() {
        let mut stage = Stage::Idle;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen.len(), 6);
        assert!(stage.is_finished());
    }

    #[test]
    fn display_names() {
        assert_eq!(Stage::BusesSynthesized.to_string(), "buses synthesized");
        assert_eq!(Stage::default(), Stage::Idle);
    }
}
