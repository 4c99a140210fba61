//! bitproto: a schema language and bit-packed wire codec for fixed-size
//! binary message formats (see `spec.md`/`SPEC_FULL.md` at the workspace
//! root for the full component breakdown).
//!
//! The pipeline a `.bitproto` file passes through, front to back:
//!
//! 1. [`bitproto_parser`] (a separate crate) lexes and parses source text
//!    into a borrowed syntax tree.
//! 2. [`resolve`] walks `import` statements, loading and parsing every
//!    transitively reachable file.
//! 3. [`analyze`] performs the two-pass declare/define walk that produces
//!    the resolved [`ir::Workspace`], plus lint diagnostics.
//! 4. [`bitplan`] optionally computes a static bit-offset table for a
//!    non-extensible message.
//! 5. [`codec`] encodes/decodes a [`value::Value`] against the resolved IR,
//!    and formats values as JSON.

pub mod analyze;
pub mod bitplan;
pub mod codec;
pub mod descriptor;
pub mod diagnostic;
pub mod error;
pub mod ir;
pub mod resolve;
pub mod value;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::Error;
pub use ir::Workspace;
pub use resolve::load_workspace;
