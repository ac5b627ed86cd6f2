//! Loading and persisting documents by VLNV.
//!
//! [`Library`] is the only path through which the generator touches
//! storage. [`FileLibrary`] keeps one JSON file per document under
//! `<root>/<vendor>/<library>/<name>/<version>/`; [`MemoryLibrary`] keeps
//! documents in a map and is what tests use.

use crate::abstraction::{AbstractionDefinition, BusDefinition};
use crate::component::Component;
use crate::design::Design;
use crate::document::{Document, DocumentKind};
use ipx_common::Vlnv;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors raised by library access.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// No document with the VLNV exists.
    #[error("document {0} not found in library")]
    NotFound(Vlnv),

    /// The document exists but is of another kind.
    #[error("document {vlnv} is not a {expected}")]
    WrongKind {
        /// Requested identifier.
        vlnv: Vlnv,
        /// Kind the caller asked for.
        expected: DocumentKind,
    },

    /// The document file could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A document without a valid VLNV cannot be stored.
    #[error("cannot store a document without a valid VLNV ('{0}')")]
    InvalidVlnv(Vlnv),

    /// Reading or writing failed.
    #[error("library I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage of documents keyed by VLNV.
pub trait Library {
    /// Loads the document identified by `vlnv`.
    fn load(&self, vlnv: &Vlnv) -> Result<Document, LibraryError>;

    /// Stores `document`, replacing any previous version.
    fn save(&mut self, document: &Document) -> Result<(), LibraryError>;

    /// Returns the directory holding the document identified by `vlnv`.
    fn resolve_directory(&self, vlnv: &Vlnv) -> PathBuf;

    /// Returns `true` if a document with `vlnv` exists.
    fn contains(&self, vlnv: &Vlnv) -> bool {
        self.load(vlnv).is_ok()
    }

    /// Loads a component.
    fn load_component(&self, vlnv: &Vlnv) -> Result<Component, LibraryError> {
        match self.load(vlnv)? {
            Document::Component(c) => Ok(c),
            _ => Err(wrong_kind(vlnv, DocumentKind::Component)),
        }
    }

    /// Loads a design.
    fn load_design(&self, vlnv: &Vlnv) -> Result<Design, LibraryError> {
        match self.load(vlnv)? {
            Document::Design(d) => Ok(d),
            _ => Err(wrong_kind(vlnv, DocumentKind::Design)),
        }
    }

    /// Loads an abstraction definition.
    fn load_abstraction(&self, vlnv: &Vlnv) -> Result<AbstractionDefinition, LibraryError> {
        match self.load(vlnv)? {
            Document::AbstractionDefinition(a) => Ok(a),
            _ => Err(wrong_kind(vlnv, DocumentKind::AbstractionDefinition)),
        }
    }

    /// Loads a bus definition.
    fn load_bus_definition(&self, vlnv: &Vlnv) -> Result<BusDefinition, LibraryError> {
        match self.load(vlnv)? {
            Document::BusDefinition(b) => Ok(b),
            _ => Err(wrong_kind(vlnv, DocumentKind::BusDefinition)),
        }
    }
}

fn wrong_kind(vlnv: &Vlnv, expected: DocumentKind) -> LibraryError {
    LibraryError::WrongKind {
        vlnv: vlnv.clone(),
        expected,
    }
}

/// A library held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    documents: BTreeMap<Vlnv, Document>,
}

impl MemoryLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document, replacing any with the same VLNV.
    pub fn insert(&mut self, document: impl Into<Document>) {
        let document = document.into();
        self.documents.insert(document.vlnv().clone(), document);
    }

    /// Returns the number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Library for MemoryLibrary {
    fn load(&self, vlnv: &Vlnv) -> Result<Document, LibraryError> {
        self.documents
            .get(vlnv)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(vlnv.clone()))
    }

    fn save(&mut self, document: &Document) -> Result<(), LibraryError> {
        if !document.vlnv().is_valid() {
            return Err(LibraryError::InvalidVlnv(document.vlnv().clone()));
        }
        self.insert(document.clone());
        Ok(())
    }

    fn resolve_directory(&self, vlnv: &Vlnv) -> PathBuf {
        vlnv.directory()
    }
}

/// A library of JSON files on disk.
#[derive(Debug, Clone)]
pub struct FileLibrary {
    root: PathBuf,
}

impl FileLibrary {
    /// Creates a library rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the library root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file holding the document identified by `vlnv`.
    pub fn document_path(&self, vlnv: &Vlnv) -> PathBuf {
        self.resolve_directory(vlnv)
            .join(format!("{}.{}.json", vlnv.name, vlnv.version))
    }
}

impl Library for FileLibrary {
    fn load(&self, vlnv: &Vlnv) -> Result<Document, LibraryError> {
        let path = self.document_path(vlnv);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LibraryError::NotFound(vlnv.clone()))
            }
            Err(e) => return Err(LibraryError::Io(e)),
        };
        serde_json::from_str(&content).map_err(|e| LibraryError::Parse {
            path,
            message: e.to_string(),
        })
    }

    fn save(&mut self, document: &Document) -> Result<(), LibraryError> {
        let vlnv = document.vlnv();
        if !vlnv.is_valid() {
            return Err(LibraryError::InvalidVlnv(vlnv.clone()));
        }
        std::fs::create_dir_all(self.resolve_directory(vlnv))?;
        let json = serde_json::to_string_pretty(document).map_err(|e| LibraryError::Parse {
            path: self.document_path(vlnv),
            message: e.to_string(),
        })?;
        std::fs::write(self.document_path(vlnv), json)?;
        Ok(())
    }

    fn resolve_directory(&self, vlnv: &Vlnv) -> PathBuf {
        self.root.join(vlnv.directory())
    }

    fn contains(&self, vlnv: &Vlnv) -> bool {
        self.document_path(vlnv).is_file()
    }
}
