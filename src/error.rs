//! Library-level errors. Compile diagnostics (lexical/syntactic/name/type
//! problems in a `.bitproto` file) are [`crate::diagnostic::Diagnostic`]s,
//! accumulated rather than returned one at a time; this enum is for the
//! handful of operations that fail as a single event instead — reading a
//! file, or asking the bit-layout planner to do something the format
//! forbids.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{path}` ({count} error(s)) — run `bitproto check` for details")]
    CompileFailed { path: PathBuf, count: usize },

    #[error("no message named `{0}` in this schema")]
    UnknownMessage(String),

    #[error("cannot compute a static bit layout for `{0}`: extensibility makes field offsets producer-dependent")]
    Extensible(String),
}
