//! Diagnostic creation, severity management, and rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels,
//! codes, a location context, notes and help lines. The thread-safe
//! [`DiagnosticSink`] is the single channel through which validators, the
//! interconnect generator and the RTL emitter report to the user, and
//! [`DiagnosticRenderer`] implementations format the result for a terminal or
//! as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
