//! The documents a library stores.

use crate::abstraction::{AbstractionDefinition, BusDefinition};
use crate::component::Component;
use crate::design::Design;
use ipx_common::Vlnv;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a library document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// A component.
    Component,
    /// A design.
    Design,
    /// An abstraction definition.
    AbstractionDefinition,
    /// A bus definition.
    BusDefinition,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Component => "component",
            DocumentKind::Design => "design",
            DocumentKind::AbstractionDefinition => "abstraction definition",
            DocumentKind::BusDefinition => "bus definition",
        };
        f.write_str(name)
    }
}

/// Any library document, tagged by kind when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "document", rename_all = "snake_case")]
pub enum Document {
    /// A component.
    Component(Component),
    /// A design.
    Design(Design),
    /// An abstraction definition.
    AbstractionDefinition(AbstractionDefinition),
    /// A bus definition.
    BusDefinition(BusDefinition),
}

impl Document {
    /// Returns the document identifier.
    pub fn vlnv(&self) -> &Vlnv {
        match self {
            Document::Component(c) => &c.vlnv,
            Document::Design(d) => &d.vlnv,
            Document::AbstractionDefinition(a) => &a.vlnv,
            Document::BusDefinition(b) => &b.vlnv,
        }
    }

    /// Returns the document kind.
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Component(_) => DocumentKind::Component,
            Document::Design(_) => DocumentKind::Design,
            Document::AbstractionDefinition(_) => DocumentKind::AbstractionDefinition,
            Document::BusDefinition(_) => DocumentKind::BusDefinition,
        }
    }
}

impl From<Component> for Document {
    fn from(component: Component) -> Self {
        Document::Component(component)
    }
}

impl From<Design> for Document {
    fn from(design: Design) -> Self {
        Document::Design(design)
    }
}

impl From<AbstractionDefinition> for Document {
    fn from(abstraction: AbstractionDefinition) -> Self {
        Document::AbstractionDefinition(abstraction)
    }
}

impl From<BusDefinition> for Document {
    fn from(bus: BusDefinition) -> Self {
        Document::BusDefinition(bus)
    }
}
