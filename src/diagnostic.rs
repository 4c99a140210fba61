//! Compile-time diagnostics (§7 of the schema spec): errors abort code
//! generation, lint warnings don't. Every diagnostic carries the file it
//! came from plus a source position so a caller can print
//! `file:line:column: message` the way a compiler does.

use std::fmt;
use std::path::PathBuf;

use bitproto_parser::ast::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// The category a diagnostic belongs to, mirroring the kinds enumerated in
/// the error-handling section of the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntactic,
    Name,
    Type,
    Extensibility,
    Import,
    Lint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub pos: Pos,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<PathBuf>, pos: Pos, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            file: file.into(),
            pos,
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    pub fn warning(file: impl Into<PathBuf>, pos: Pos, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            file: file.into(),
            pos,
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.file.display(),
            self.pos.line,
            self.pos.column,
            level,
            self.message
        )
    }
}

/// Accumulates diagnostics during resolution/analysis. Kept as a flat `Vec`
/// (a handful of protos at a time, no need for anything fancier) rather
/// than bailing out on the first error, so `check` can report everything
/// wrong with a schema in one pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.items.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}
